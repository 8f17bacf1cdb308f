//
//  scm-client
//  bitbucket/mod.rs
//

//! Bitbucket Cloud driver.
//!
//! A partial driver over the Bitbucket Cloud 2.0 API: repository lookup and
//! permission queries are live, while the remaining repository operations
//! return [`ApiError::NotSupported`](crate::common::ApiError::NotSupported)
//! without a network call. The commit-status state tables are exported for
//! consumers that handle Bitbucket build statuses out of band.

use std::sync::Arc;

use crate::client::{Credentials, HttpTransport, Transport};
use crate::common::ApiError;

mod repo;

pub use repo::{convert_from_state, convert_state, BitbucketRepositoryService};

/// Default Bitbucket Cloud base URL.
pub const BITBUCKET_BASE_URL: &str = "https://api.bitbucket.org";

/// Facade over the Bitbucket resource services.
#[derive(Clone)]
pub struct BitbucketClient {
    transport: Arc<dyn Transport>,
}

impl BitbucketClient {
    /// Creates an unauthenticated client for bitbucket.org.
    pub fn new() -> Result<Self, ApiError> {
        Self::custom(BITBUCKET_BASE_URL)
    }

    /// Creates an unauthenticated client for a custom base URL.
    pub fn custom(base_url: &str) -> Result<Self, ApiError> {
        Ok(Self::with_transport(Arc::new(HttpTransport::new(base_url)?)))
    }

    /// Creates a client authenticated with a username and app password.
    pub fn with_app_password(
        base_url: &str,
        username: &str,
        password: &str,
    ) -> Result<Self, ApiError> {
        let transport =
            HttpTransport::new(base_url)?.with_credentials(Credentials::basic(username, password));
        Ok(Self::with_transport(Arc::new(transport)))
    }

    /// Creates a client over an arbitrary transport.
    pub fn with_transport(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Repository operations.
    pub fn repositories(&self) -> BitbucketRepositoryService {
        BitbucketRepositoryService::new(self.transport.clone())
    }
}
