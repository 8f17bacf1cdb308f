//
//  scm-client
//  common/webhook.rs
//

//! Normalized webhook events and the secret-resolver contract.
//!
//! Each provider driver parses its inbound webhook payloads into the event
//! types defined here. Dispatch is a single stateless pass: classify the
//! event from the provider's event-name header, unmarshal the wire shape,
//! sub-classify (for example plain push vs. tag deletion via the all-zero
//! SHA sentinel), convert, then verify the delivery signature.
//!
//! # Verification ordering
//!
//! Signature verification happens only after a successful parse, so
//! malformed payloads never reach signature checking. Parse errors and
//! authentication errors are therefore distinguishable; this asymmetry is
//! intentional.

use serde::{Deserialize, Serialize};

use crate::common::types::{Commit, PullRequest, Reference, Repository, User};
use crate::common::ApiError;

/// The 40-character all-zero SHA git uses to mean "ref did not exist" /
/// "ref no longer exists".
pub const ZERO_SHA: &str = "0000000000000000000000000000000000000000";

/// Maximum accepted webhook body size in bytes. Larger payloads fail closed.
pub const MAX_WEBHOOK_SIZE: usize = 10_000_000;

/// Normalized webhook action.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    /// Action string not recognized.
    #[default]
    Unknown,
    /// Ref or resource was created.
    Create,
    /// Ref or resource was deleted.
    Delete,
    /// Pull request was opened.
    Open,
    /// Pull request was reopened.
    Reopen,
    /// Pull request was closed.
    Close,
    /// Pull request source branch was updated.
    Sync,
    /// Pull request was merged.
    Merge,
    /// Pull request entered testing.
    Test,
    /// Pull request passed testing.
    Tested,
    /// Pull request was approved.
    Approved,
}

/// A push delivery: one or more commits pushed to a ref.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PushHook {
    /// Fully qualified ref that was pushed to.
    #[serde(rename = "ref")]
    pub ref_: String,
    /// SHA of the ref before the push (all zeros for ref creation).
    pub before: String,
    /// SHA of the ref after the push (all zeros for ref deletion).
    pub after: String,
    /// Repository the push targeted.
    pub repo: Repository,
    /// Head commit of the push.
    pub commit: Commit,
    /// User who performed the push.
    pub sender: User,
    /// Commits contained in the push, in provider order.
    pub commits: Vec<Commit>,
}

/// A tag create/delete delivery.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TagHook {
    /// Whether the tag was created or deleted.
    pub action: Action,
    /// The tag reference.
    #[serde(rename = "ref")]
    pub ref_: Reference,
    /// Repository the tag belongs to.
    pub repo: Repository,
    /// User who created or deleted the tag.
    pub sender: User,
}

/// A branch create/delete delivery.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BranchHook {
    /// Whether the branch was created or deleted.
    pub action: Action,
    /// The branch reference.
    #[serde(rename = "ref")]
    pub ref_: Reference,
    /// Repository the branch belongs to.
    pub repo: Repository,
    /// User who created or deleted the branch.
    pub sender: User,
}

/// A pull request lifecycle delivery.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PullRequestHook {
    /// What happened to the pull request.
    pub action: Action,
    /// Snapshot of the pull request at delivery time.
    pub pull_request: PullRequest,
    /// Repository the pull request targets.
    pub repo: Repository,
    /// User who triggered the event.
    pub sender: User,
}

/// A parsed, classified inbound webhook delivery.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum WebhookEvent {
    /// Commits pushed to a branch or tag.
    Push(PushHook),
    /// Tag created or deleted.
    Tag(TagHook),
    /// Branch created or deleted.
    Branch(BranchHook),
    /// Pull request opened, updated, merged, tested, or approved.
    PullRequest(PullRequestHook),
}

impl WebhookEvent {
    /// Returns the repository the event targets.
    pub fn repo(&self) -> &Repository {
        match self {
            WebhookEvent::Push(h) => &h.repo,
            WebhookEvent::Tag(h) => &h.repo,
            WebhookEvent::Branch(h) => &h.repo,
            WebhookEvent::PullRequest(h) => &h.repo,
        }
    }

    /// Returns the user who triggered the event.
    pub fn sender(&self) -> &User {
        match self {
            WebhookEvent::Push(h) => &h.sender,
            WebhookEvent::Tag(h) => &h.sender,
            WebhookEvent::Branch(h) => &h.sender,
            WebhookEvent::PullRequest(h) => &h.sender,
        }
    }
}

/// Resolves the shared secret expected for a parsed webhook delivery.
///
/// The dispatcher calls the resolver with the already-parsed event so
/// implementations can look the secret up per repository. Returning an
/// empty string skips verification entirely (the event is trusted).
///
/// A blanket implementation is provided for closures:
///
/// ```rust
/// use scm_client::common::{SecretResolver, WebhookEvent};
///
/// fn resolver(_event: &WebhookEvent) -> Result<String, scm_client::common::ApiError> {
///     Ok("topsecret".to_string())
/// }
/// fn takes_resolver(_r: &dyn SecretResolver) {}
/// takes_resolver(&resolver);
/// ```
pub trait SecretResolver {
    /// Returns the expected token for this delivery, or an empty string to
    /// skip verification.
    fn resolve(&self, event: &WebhookEvent) -> Result<String, ApiError>;
}

impl<F> SecretResolver for F
where
    F: Fn(&WebhookEvent) -> Result<String, ApiError>,
{
    fn resolve(&self, event: &WebhookEvent) -> Result<String, ApiError> {
        self(event)
    }
}
