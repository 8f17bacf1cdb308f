//
//  scm-client
//  common/services.rs
//

//! Uniform per-resource operation contracts.
//!
//! Every provider driver implements these traits over the shared
//! [`Transport`](crate::client::Transport). The contract is the same across
//! providers: each operation takes a repository identifier
//! (`namespace/name`) plus operation-specific parameters, builds the
//! provider endpoint, performs one request, and converts the response into
//! the normalized entity paired with [`Response`] metadata.
//!
//! # Semantics
//!
//! - List operations accept pagination options and return one page; the
//!   caller iterates pages.
//! - Operations a provider cannot express return
//!   [`ApiError::NotSupported`] immediately, without a network call.
//! - Find/List are side-effect free and safe to retry; Create is not
//!   idempotent and is never retried by this layer.

use async_trait::async_trait;
use reqwest::header::HeaderMap;

use crate::common::types::*;
use crate::common::webhook::{SecretResolver, WebhookEvent};
use crate::common::{ApiError, ApiResult, Response};

/// Repository, webhook-subscription, and commit-status operations.
#[async_trait]
pub trait RepositoryService: Send + Sync {
    /// Returns a repository by `namespace/name`.
    async fn find(&self, repo: &str) -> ApiResult<Repository>;

    /// Returns a webhook subscription by ID.
    async fn find_hook(&self, repo: &str, id: &str) -> ApiResult<Hook>;

    /// Returns the authenticated user's permissions on the repository.
    async fn find_perms(&self, repo: &str) -> ApiResult<Perm>;

    /// Returns a page of repositories visible to the authenticated user.
    async fn list(&self, opts: &ListOptions) -> ApiResult<Vec<Repository>>;

    /// Returns a page of webhook subscriptions.
    async fn list_hooks(&self, repo: &str, opts: &ListOptions) -> ApiResult<Vec<Hook>>;

    /// Returns a page of commit statuses for a ref.
    async fn list_status(&self, repo: &str, ref_: &str, opts: &ListOptions)
        -> ApiResult<Vec<Status>>;

    /// Creates a webhook subscription.
    async fn create_hook(&self, repo: &str, input: &HookInput) -> ApiResult<Hook>;

    /// Creates a commit status against a ref.
    async fn create_status(&self, repo: &str, ref_: &str, input: &StatusInput)
        -> ApiResult<Status>;

    /// Updates a webhook subscription.
    async fn update_hook(&self, repo: &str, id: &str, input: &HookInput) -> ApiResult<Hook>;

    /// Deletes a webhook subscription.
    async fn delete_hook(&self, repo: &str, id: &str) -> Result<Response, ApiError>;
}

/// Issue tracker operations.
#[async_trait]
pub trait IssueService: Send + Sync {
    /// Returns an issue by number.
    async fn find(&self, repo: &str, number: u64) -> ApiResult<Issue>;

    /// Returns an issue comment by ID.
    async fn find_comment(&self, repo: &str, index: u64, id: u64) -> ApiResult<Comment>;

    /// Returns a page of issues.
    async fn list(&self, repo: &str, opts: &IssueListOptions) -> ApiResult<Vec<Issue>>;

    /// Returns a page of comments on an issue.
    async fn list_comments(
        &self,
        repo: &str,
        index: u64,
        opts: &ListOptions,
    ) -> ApiResult<Vec<Comment>>;

    /// Opens a new issue.
    async fn create(&self, repo: &str, input: &IssueInput) -> ApiResult<Issue>;

    /// Adds a comment to an issue.
    async fn create_comment(
        &self,
        repo: &str,
        number: u64,
        input: &CommentInput,
    ) -> ApiResult<Comment>;

    /// Deletes an issue comment.
    async fn delete_comment(
        &self,
        repo: &str,
        number: u64,
        id: u64,
    ) -> Result<Response, ApiError>;

    /// Closes an issue.
    async fn close(&self, repo: &str, number: u64) -> Result<Response, ApiError>;

    /// Locks the issue discussion.
    async fn lock(&self, repo: &str, number: u64) -> Result<Response, ApiError>;

    /// Unlocks the issue discussion.
    async fn unlock(&self, repo: &str, number: u64) -> Result<Response, ApiError>;
}

/// Pull request operations.
#[async_trait]
pub trait PullRequestService: Send + Sync {
    /// Returns a pull request by number.
    async fn find(&self, repo: &str, number: u64) -> ApiResult<PullRequest>;

    /// Returns a pull request comment by ID.
    async fn find_comment(&self, repo: &str, index: u64, id: u64) -> ApiResult<Comment>;

    /// Returns a page of pull requests.
    async fn list(&self, repo: &str, opts: &PullRequestListOptions)
        -> ApiResult<Vec<PullRequest>>;

    /// Returns a page of changed files in a pull request.
    async fn list_changes(
        &self,
        repo: &str,
        number: u64,
        opts: &ListOptions,
    ) -> ApiResult<Vec<Change>>;

    /// Returns a page of comments on a pull request.
    async fn list_comments(
        &self,
        repo: &str,
        index: u64,
        opts: &ListOptions,
    ) -> ApiResult<Vec<Comment>>;

    /// Returns a page of commits in a pull request.
    async fn list_commits(
        &self,
        repo: &str,
        number: u64,
        opts: &ListOptions,
    ) -> ApiResult<Vec<Commit>>;

    /// Opens a new pull request.
    async fn create(&self, repo: &str, input: &PullRequestInput) -> ApiResult<PullRequest>;

    /// Adds a comment to a pull request.
    async fn create_comment(
        &self,
        repo: &str,
        index: u64,
        input: &CommentInput,
    ) -> ApiResult<Comment>;

    /// Deletes a pull request comment.
    async fn delete_comment(
        &self,
        repo: &str,
        index: u64,
        id: u64,
    ) -> Result<Response, ApiError>;

    /// Merges a pull request.
    async fn merge(&self, repo: &str, number: u64) -> Result<Response, ApiError>;

    /// Closes a pull request without merging.
    async fn close(&self, repo: &str, number: u64) -> Result<Response, ApiError>;
}

/// Branch, tag, commit, and diff operations.
#[async_trait]
pub trait GitService: Send + Sync {
    /// Creates a branch from a commit.
    async fn create_branch(&self, repo: &str, params: &CreateBranch)
        -> Result<Response, ApiError>;

    /// Returns a branch reference by name.
    async fn find_branch(&self, repo: &str, name: &str) -> ApiResult<Reference>;

    /// Returns a commit by SHA or ref.
    async fn find_commit(&self, repo: &str, ref_: &str) -> ApiResult<Commit>;

    /// Returns a tag reference by name.
    async fn find_tag(&self, repo: &str, name: &str) -> ApiResult<Reference>;

    /// Returns a page of branches.
    async fn list_branches(&self, repo: &str, opts: &ListOptions) -> ApiResult<Vec<Reference>>;

    /// Returns a page of commits.
    async fn list_commits(&self, repo: &str, opts: &CommitListOptions)
        -> ApiResult<Vec<Commit>>;

    /// Returns a page of tags.
    async fn list_tags(&self, repo: &str, opts: &ListOptions) -> ApiResult<Vec<Reference>>;

    /// Returns the files changed by a single commit.
    async fn list_changes(&self, repo: &str, ref_: &str, opts: &ListOptions)
        -> ApiResult<Vec<Change>>;

    /// Returns the files changed between two refs.
    async fn compare_changes(
        &self,
        repo: &str,
        source: &str,
        target: &str,
        opts: &ListOptions,
    ) -> ApiResult<Vec<Change>>;
}

/// Repository content operations.
#[async_trait]
pub trait ContentService: Send + Sync {
    /// Returns the decoded content of a file at a ref.
    async fn find(&self, repo: &str, path: &str, ref_: &str) -> ApiResult<Content>;

    /// Creates a file.
    async fn create(
        &self,
        repo: &str,
        path: &str,
        params: &ContentParams,
    ) -> Result<Response, ApiError>;

    /// Updates a file.
    async fn update(
        &self,
        repo: &str,
        path: &str,
        params: &ContentParams,
    ) -> Result<Response, ApiError>;

    /// Deletes a file.
    async fn delete(
        &self,
        repo: &str,
        path: &str,
        params: &ContentParams,
    ) -> Result<Response, ApiError>;

    /// Lists directory entries at a path and ref.
    async fn list(
        &self,
        repo: &str,
        path: &str,
        ref_: &str,
        opts: &ListOptions,
    ) -> ApiResult<Vec<ContentInfo>>;
}

/// Release operations.
#[async_trait]
pub trait ReleaseService: Send + Sync {
    /// Returns a release by numeric ID.
    async fn find(&self, repo: &str, id: i64) -> ApiResult<Release>;

    /// Returns a release by tag name.
    async fn find_by_tag(&self, repo: &str, tag: &str) -> ApiResult<Release>;

    /// Returns a page of releases.
    async fn list(&self, repo: &str, opts: &ReleaseListOptions) -> ApiResult<Vec<Release>>;

    /// Publishes a release.
    async fn create(&self, repo: &str, input: &ReleaseInput) -> ApiResult<Release>;

    /// Updates a release by numeric ID.
    async fn update(&self, repo: &str, id: i64, input: &ReleaseInput) -> ApiResult<Release>;

    /// Updates a release by tag name.
    async fn update_by_tag(
        &self,
        repo: &str,
        tag: &str,
        input: &ReleaseInput,
    ) -> ApiResult<Release>;

    /// Deletes a release by numeric ID.
    async fn delete(&self, repo: &str, id: i64) -> Result<Response, ApiError>;

    /// Deletes a release by tag name.
    async fn delete_by_tag(&self, repo: &str, tag: &str) -> Result<Response, ApiError>;
}

/// Account operations.
#[async_trait]
pub trait UserService: Send + Sync {
    /// Returns the authenticated user.
    async fn find(&self) -> ApiResult<User>;

    /// Returns a user by login.
    async fn find_login(&self, login: &str) -> ApiResult<User>;

    /// Returns the authenticated user's email address.
    async fn find_email(&self) -> ApiResult<String>;
}

/// Inbound webhook parsing and verification.
///
/// No network access: `parse` consumes the already-buffered request body
/// and headers. Header names (event type, signature token) are
/// provider-specific constants defined by each driver.
pub trait WebhookService: Send + Sync {
    /// Parses, classifies, and verifies one inbound webhook delivery.
    ///
    /// The secret resolver is invoked with the parsed event; an empty token
    /// skips verification. Any step failure returns immediately with a
    /// typed error and no partial event.
    fn parse(
        &self,
        headers: &HeaderMap,
        body: &[u8],
        secret: &dyn SecretResolver,
    ) -> Result<WebhookEvent, ApiError>;
}
