use super::Error;

/// Strategy for handling errors in a retry context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorRetryStrategy {
    /// Retry with exponential backoff (server errors)
    Retry,
    /// Failed permanently (bad request)
    Fail,
}

/// Classifies a reqwest error by HTTP status, treating connection issues as transient.
fn reqwest_retry_strategy(reqwest_error: &reqwest::Error) -> ErrorRetryStrategy {
    if let Some(status) = reqwest_error.status() {
        match status {
            // 500 - Internal Server Error
            //
            // Upstream is temporarily unavailable, backoff and retry later.
            s if s.is_server_error() => ErrorRetryStrategy::Retry,

            // 400 - Client Error
            // We're making invalid requests, this is a flaw in the code that needs
            // to be fixed (or the ID simply does not exist).
            s if s.is_client_error() => ErrorRetryStrategy::Fail,

            // Unexpected response
            _ => ErrorRetryStrategy::Fail,
        }
    } else if reqwest_error.is_decode() {
        // Body arrived but did not match the expected shape, retrying won't change that
        ErrorRetryStrategy::Fail
    } else {
        // Network error or connection issue - should retry
        ErrorRetryStrategy::Retry
    }
}

impl Error {
    /// Determine error retry strategy based upon application Error type
    pub fn to_retry_strategy(&self) -> ErrorRetryStrategy {
        match self {
            // ESI request errors - internal errors, bad requests, rate limiting
            Self::EsiError(eve_esi::Error::ReqwestError(reqwest_error)) => {
                reqwest_retry_strategy(reqwest_error)
            }

            // RedisQ & ESI universe requests made with our own HTTP client
            Self::ReqwestError(reqwest_error) => reqwest_retry_strategy(reqwest_error),

            // Valkey errors - connection issues are transient, anything else is a bug
            Self::RedisError(redis_error) => match redis_error.kind() {
                fred::error::ErrorKind::IO
                | fred::error::ErrorKind::Timeout
                | fred::error::ErrorKind::Canceled => ErrorRetryStrategy::Retry,
                _ => ErrorRetryStrategy::Fail,
            },

            // ESI errors - other errors, OAuth, parsing, etc
            Self::EsiError(_) => ErrorRetryStrategy::Fail,

            // Configuration errors - permanent failures, won't resolve with retry
            Self::ConfigError(_) => ErrorRetryStrategy::Fail,

            // Reference errors - ESI payload is missing data, retrying won't add it
            Self::ReferenceError(_) => ErrorRetryStrategy::Fail,

            // Parse errors - permanent failures (bad data format)
            Self::ParseError(_) => ErrorRetryStrategy::Fail,

            // Serialization errors - permanent failures (schema mismatch)
            Self::SerdeJsonError(_) => ErrorRetryStrategy::Fail,

            // InternalError - permanent failures (internal error within Valkyrie's code)
            Self::InternalError(_) => ErrorRetryStrategy::Fail,

            // Job scheduler errors - permanent failures (configuration issue)
            Self::SchedulerError(_) => ErrorRetryStrategy::Fail,
        }
    }
}
