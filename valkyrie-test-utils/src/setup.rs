use mockito::{Mock, Server, ServerGuard};

use crate::{constant::TEST_USER_AGENT, error::TestError};

/// Mock HTTP server plus an ESI client pointed at it.
///
/// The same server doubles as the RedisQ endpoint for fetcher tests, see
/// [`TestSetup::redisq_url`].
pub struct TestSetup {
    pub server: ServerGuard,
    pub esi_client: eve_esi::Client,
    pub mocks: Vec<Mock>,
}

impl TestSetup {
    pub async fn new() -> Result<Self, TestError> {
        let mock_server = Server::new_async().await;
        let mock_server_url = mock_server.url();

        let esi_config = eve_esi::Config::builder()
            .esi_url(&mock_server_url)
            .build()?;

        let esi_client = eve_esi::Client::builder()
            .config(esi_config)
            .user_agent(TEST_USER_AGENT)
            .build()?;

        Ok(TestSetup {
            server: mock_server,
            esi_client,
            mocks: Vec::new(),
        })
    }

    /// Base URL standing in for ESI.
    pub fn esi_url(&self) -> String {
        self.server.url()
    }

    /// URL standing in for the RedisQ listen endpoint.
    pub fn redisq_url(&self) -> String {
        format!("{}/listen.php", self.server.url())
    }

    /// Assert all mock endpoints were called as expected.
    ///
    /// # Panics
    /// Panics if any mock endpoint was not called the expected number of times
    pub fn assert_mocks(&self) {
        for mock in &self.mocks {
            mock.assert();
        }
    }
}
