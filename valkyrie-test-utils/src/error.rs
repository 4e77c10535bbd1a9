use thiserror::Error;

#[derive(Error, Debug)]
pub enum TestError {
    #[error(transparent)]
    EsiError(#[from] eve_esi::Error),
    #[error(transparent)]
    RedisError(#[from] fred::error::Error),
    #[error(transparent)]
    SerdeJsonError(#[from] serde_json::Error),
}
