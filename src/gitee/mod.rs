//
//  scm-client
//  gitee/mod.rs
//

//! Gitee API v5 driver.
//!
//! This module maps the Gitee REST API (`https://gitee.com/api/v5`) and its
//! webhook format onto the normalized domain model. It is a full driver:
//! every resource service is implemented, and the handful of operations
//! Gitee has no equivalent for (commit statuses, issue locking, closing a
//! pull request without merging) return
//! [`ApiError::NotSupported`](crate::common::ApiError::NotSupported)
//! without a network call.
//!
//! # Example
//!
//! ```rust,no_run
//! use scm_client::gitee::GiteeClient;
//! use scm_client::common::{IssueService, IssueListOptions};
//!
//! # async fn example() -> Result<(), scm_client::common::ApiError> {
//! let client = GiteeClient::with_token("https://gitee.com", "your-token")?;
//! let opts = IssueListOptions { page: 1, size: 30, open: true, closed: false };
//! let (issues, _res) = client.issues().list("octocat/hello-world", &opts).await?;
//! for issue in issues {
//!     println!("#{} {}", issue.number, issue.title);
//! }
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use crate::client::{Credentials, HttpTransport, Transport};
use crate::common::ApiError;

mod content;
mod git;
mod issue;
mod pr;
mod release;
mod repo;
mod user;
mod webhook;

pub use content::GiteeContentService;
pub use git::GiteeGitService;
pub use issue::GiteeIssueService;
pub use pr::GiteePullRequestService;
pub use release::GiteeReleaseService;
pub use repo::{convert_from_state, convert_state, GiteeRepositoryService};
pub use user::GiteeUserService;
pub use webhook::{GiteeWebhookService, GITEE_EVENT_HEADER, GITEE_TOKEN_HEADER};

/// Default Gitee base URL.
pub const GITEE_BASE_URL: &str = "https://gitee.com";

/// Facade over all Gitee resource services.
///
/// Aggregates one instance of each per-resource service bound to a single
/// shared transport (base URL + credentials). There is no cross-service
/// mutable state; the client and every service it hands out are safe for
/// concurrent reuse.
#[derive(Clone)]
pub struct GiteeClient {
    transport: Arc<dyn Transport>,
}

impl GiteeClient {
    /// Creates an unauthenticated client for gitee.com.
    pub fn new() -> Result<Self, ApiError> {
        Self::custom(GITEE_BASE_URL)
    }

    /// Creates an unauthenticated client for a self-hosted Gitee instance.
    pub fn custom(base_url: &str) -> Result<Self, ApiError> {
        Ok(Self::with_transport(Arc::new(HttpTransport::new(base_url)?)))
    }

    /// Creates a client authenticated with a personal access token.
    pub fn with_token(base_url: &str, token: &str) -> Result<Self, ApiError> {
        let transport = HttpTransport::new(base_url)?.with_credentials(Credentials::bearer(token));
        Ok(Self::with_transport(Arc::new(transport)))
    }

    /// Creates a client over an arbitrary transport.
    ///
    /// Intended for tests (fake transports) and for sharing one connection
    /// pool across clients.
    pub fn with_transport(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Repository, hook, and commit-status operations.
    pub fn repositories(&self) -> GiteeRepositoryService {
        GiteeRepositoryService::new(self.transport.clone())
    }

    /// Issue tracker operations.
    pub fn issues(&self) -> GiteeIssueService {
        GiteeIssueService::new(self.transport.clone())
    }

    /// Pull request operations.
    pub fn pull_requests(&self) -> GiteePullRequestService {
        GiteePullRequestService::new(self.transport.clone())
    }

    /// Branch, tag, commit, and diff operations.
    pub fn git(&self) -> GiteeGitService {
        GiteeGitService::new(self.transport.clone())
    }

    /// Repository content operations.
    pub fn contents(&self) -> GiteeContentService {
        GiteeContentService::new(self.transport.clone())
    }

    /// Release operations.
    pub fn releases(&self) -> GiteeReleaseService {
        GiteeReleaseService::new(self.transport.clone())
    }

    /// Account operations.
    pub fn users(&self) -> GiteeUserService {
        GiteeUserService::new(self.transport.clone())
    }

    /// Inbound webhook parsing and verification.
    pub fn webhooks(&self) -> GiteeWebhookService {
        GiteeWebhookService::new()
    }
}
