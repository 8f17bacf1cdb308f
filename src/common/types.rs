//
//  scm-client
//  common/types.rs
//

//! Normalized, provider-agnostic domain entities.
//!
//! Every converter in the provider drivers produces values of these types.
//! All entities are transient, immutable values constructed fresh per API
//! call or per webhook delivery; nothing here is persisted or mutated after
//! construction.
//!
//! # Identifier convention
//!
//! Entity IDs are string-typed to accommodate numeric IDs (Gitee) and UUIDs
//! (Bitbucket) behind one stable, provider-scoped identifier.
//!
//! # Zero values
//!
//! Where a provider lacks a concept (for example draft releases on Gitee),
//! the converter hard-codes the normalized field to a fixed default. This is
//! documented per driver and is not a bug.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A git repository on a hosting provider.
///
/// # Fields
///
/// * `id` - Stable provider-scoped identifier (numeric ID or UUID as string)
/// * `namespace` - Owner segment of the `namespace/name` identifier
/// * `name` - Repository name
/// * `branch` - Default branch
/// * `private` - Whether the repository is private
/// * `visibility` - Normalized visibility level
/// * `clone` - HTTPS clone URL
/// * `clone_ssh` - SSH clone URL
/// * `link` - Web URL of the repository
/// * `perm` - Permissions of the authenticated user, when reported
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Repository {
    /// Stable provider-scoped identifier.
    pub id: String,
    /// Owner segment of the repository identifier.
    pub namespace: String,
    /// Repository name.
    pub name: String,
    /// Default branch.
    pub branch: String,
    /// Whether the repository is private.
    pub private: bool,
    /// Normalized visibility level.
    pub visibility: Visibility,
    /// HTTPS clone URL.
    pub clone: String,
    /// SSH clone URL.
    pub clone_ssh: String,
    /// Web URL of the repository.
    pub link: String,
    /// Permissions of the authenticated user, when reported.
    pub perm: Option<Perm>,
    /// Creation timestamp, when reported.
    pub created: Option<DateTime<Utc>>,
    /// Last-update timestamp, when reported.
    pub updated: Option<DateTime<Utc>>,
}

/// Repository permissions of the authenticated user.
///
/// By convention of the conversion logic (not enforced by this type), the
/// flags are monotonic: `admin` implies `push` implies `pull`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Perm {
    /// Read access.
    pub pull: bool,
    /// Write access.
    pub push: bool,
    /// Administrative access.
    pub admin: bool,
}

/// Normalized repository visibility.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    /// Visibility could not be determined.
    #[default]
    Undefined,
    /// Anyone can see the repository.
    Public,
    /// Members of the owning organization can see the repository.
    Internal,
    /// Only collaborators can see the repository.
    Private,
}

/// A repository webhook subscription.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Hook {
    /// Provider-scoped hook identifier.
    pub id: String,
    /// URL the provider delivers events to.
    pub target: String,
    /// Whether deliveries are enabled.
    pub active: bool,
    /// Normalized names of the subscribed events (push, tag, issues,
    /// comment, merge, ...). Mapped through a fixed per-provider table.
    pub events: Vec<String>,
    /// Whether signature verification is disabled for deliveries.
    pub skip_verify: bool,
}

/// Parameters for creating or updating a webhook subscription.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HookInput {
    /// URL the provider should deliver events to.
    pub target: String,
    /// Shared secret used to sign deliveries.
    pub secret: String,
    /// Disables delivery signature verification when set.
    pub skip_verify: bool,
    /// Normalized event subscriptions.
    pub events: HookEvents,
    /// Provider-native event names passed through untranslated, for events
    /// the normalized set does not cover.
    pub native_events: Vec<String>,
}

/// Normalized webhook event subscriptions.
///
/// Each driver maps these booleans onto its provider's event taxonomy
/// through a fixed lookup table.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct HookEvents {
    /// Branch create/delete events.
    pub branch: bool,
    /// Issue lifecycle events.
    pub issue: bool,
    /// Issue comment events.
    pub issue_comment: bool,
    /// Pull request lifecycle events.
    pub pull_request: bool,
    /// Pull request comment events.
    pub pull_request_comment: bool,
    /// Push events.
    pub push: bool,
    /// Tag create/delete events.
    pub tag: bool,
}

/// Normalized commit-status state.
///
/// State mapping is lossy and asymmetric between the read direction
/// (provider string to normalized state) and the write direction
/// (normalized state to provider string); each driver documents its two
/// tables separately, and they are not guaranteed inverses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum State {
    /// State string not recognized by the read-direction table.
    #[default]
    Unknown,
    /// Build is queued.
    Pending,
    /// Build is executing.
    Running,
    /// Build passed.
    Success,
    /// Build failed.
    Failure,
    /// Build errored before completing.
    Error,
    /// Build was canceled.
    Canceled,
}

/// A commit status reported against a ref.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Status {
    /// Normalized state.
    pub state: State,
    /// Status label (the provider's "context" or "name").
    pub label: String,
    /// Human-readable description.
    pub desc: String,
    /// Link to build details.
    pub target: String,
}

/// Parameters for creating a commit status.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatusInput {
    /// State to report.
    pub state: State,
    /// Status label.
    pub label: String,
    /// Human-readable description.
    pub desc: String,
    /// Link to build details.
    pub target: String,
}

/// An issue in a repository tracker.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    /// Issue number within the repository.
    pub number: u64,
    /// Short summary.
    pub title: String,
    /// Issue description.
    pub body: String,
    /// Web URL of the issue.
    pub link: String,
    /// Label names, in provider order.
    pub labels: Vec<String>,
    /// Whether the discussion is locked.
    pub locked: bool,
    /// Whether the issue is closed.
    pub closed: bool,
    /// The user who opened the issue.
    pub author: User,
    /// Creation timestamp, when reported.
    pub created: Option<DateTime<Utc>>,
    /// Last-update timestamp, when reported.
    pub updated: Option<DateTime<Utc>>,
}

/// Parameters for creating an issue.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IssueInput {
    /// Issue title.
    pub title: String,
    /// Issue description.
    pub body: String,
}

/// A comment on an issue or pull request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    /// Provider-scoped comment identifier.
    pub id: u64,
    /// Comment text.
    pub body: String,
    /// The comment author.
    pub author: User,
    /// Creation timestamp, when reported.
    pub created: Option<DateTime<Utc>>,
    /// Last-update timestamp, when reported.
    pub updated: Option<DateTime<Utc>>,
}

/// Parameters for creating a comment.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CommentInput {
    /// Comment text.
    pub body: String,
}

/// A pull (merge) request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PullRequest {
    /// Pull request number.
    pub number: u64,
    /// Short summary.
    pub title: String,
    /// Pull request description.
    pub body: String,
    /// Head commit SHA, when reported.
    pub sha: String,
    /// Merge reference (for example `refs/merge-requests/1/head`).
    #[serde(rename = "ref")]
    pub ref_: String,
    /// Source branch.
    pub source: String,
    /// Target branch.
    pub target: String,
    /// `namespace/name` of the fork the change originates from.
    pub fork: String,
    /// Web URL of the pull request.
    pub link: String,
    /// Whether the pull request is closed.
    pub closed: bool,
    /// Whether the pull request was merged.
    pub merged: bool,
    /// The user who opened the pull request.
    pub author: User,
    /// Labels attached to the pull request, in provider order.
    pub labels: Vec<Label>,
    /// Creation timestamp, when reported.
    pub created: Option<DateTime<Utc>>,
    /// Last-update timestamp, when reported.
    pub updated: Option<DateTime<Utc>>,
}

/// Parameters for creating a pull request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PullRequestInput {
    /// Pull request title.
    pub title: String,
    /// Pull request description.
    pub body: String,
    /// Source branch.
    pub source: String,
    /// Target branch.
    pub target: String,
}

/// A label attached to an issue or pull request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    /// Label name.
    pub name: String,
}

/// A git commit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Commit {
    /// Commit SHA.
    pub sha: String,
    /// Commit message.
    pub message: String,
    /// Web URL of the commit.
    pub link: String,
    /// Author signature.
    pub author: Signature,
    /// Committer signature.
    pub committer: Signature,
}

/// A commit author or committer identity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Signature {
    /// Provider login, when known.
    pub login: String,
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: String,
    /// Avatar URL, when known.
    pub avatar: String,
    /// Authoring timestamp, when reported.
    pub date: Option<DateTime<Utc>>,
}

/// A single file change within a commit or pull request diff.
///
/// The `added`/`deleted`/`renamed` flags are derived heuristically from
/// provider diff stats and are not always reliable; see the driver
/// converters for the exact rules.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Change {
    /// File path.
    pub path: String,
    /// Whether the file was added.
    pub added: bool,
    /// Whether the file was deleted.
    pub deleted: bool,
    /// Whether the file was renamed.
    pub renamed: bool,
}

/// A git reference (branch or tag).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reference {
    /// Short name (`main`, `v1.0.0`).
    pub name: String,
    /// Fully qualified path (`refs/heads/main`, `refs/tags/v1.0.0`).
    pub path: String,
    /// Commit SHA the reference points at.
    pub sha: String,
}

/// Parameters for creating a branch.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateBranch {
    /// Name of the branch to create.
    pub name: String,
    /// Commit SHA or ref the branch starts from.
    pub sha: String,
}

/// File content retrieved from a repository.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Content {
    /// File path.
    pub path: String,
    /// Decoded file bytes.
    pub data: Vec<u8>,
    /// SHA of the content object.
    pub sha: String,
    /// Blob identifier (equal to `sha` for providers without a separate
    /// blob ID).
    pub blob_id: String,
}

/// Parameters for creating, updating, or deleting repository content.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContentParams {
    /// Branch the change is committed to.
    pub branch: String,
    /// Commit message.
    pub message: String,
    /// New file bytes (ignored for deletes).
    pub data: Vec<u8>,
    /// Author/committer identity for the commit.
    pub signature: Signature,
}

/// Directory-listing entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentInfo {
    /// Entry path.
    pub path: String,
    /// Entry kind derived from the git file mode.
    pub kind: ContentKind,
}

/// Kind of a tree entry, derived from the standard git file-mode constants.
///
/// `0100644`, `0100664`, and `0100755` map to [`File`](Self::File);
/// `0040000` to [`Directory`](Self::Directory); `0120000` to
/// [`Symlink`](Self::Symlink); `0160000` to [`Gitlink`](Self::Gitlink);
/// anything else to [`Unsupported`](Self::Unsupported).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    /// File mode not in the recognized set.
    #[default]
    Unsupported,
    /// Regular or executable file.
    File,
    /// Directory (tree).
    Directory,
    /// Symbolic link.
    Symlink,
    /// Submodule commit reference.
    Gitlink,
}

/// A published release.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Release {
    /// Provider-scoped release identifier.
    pub id: i64,
    /// Release title.
    pub title: String,
    /// Release notes.
    pub description: String,
    /// Download link of the first release asset, when any exist.
    pub link: String,
    /// Tag the release was cut from.
    pub tag: String,
    /// Branch or commit the tag targets.
    pub commitish: String,
    /// Whether the release is a draft. Hard-coded to `false` for providers
    /// without draft releases.
    pub draft: bool,
    /// Whether the release is a prerelease.
    pub prerelease: bool,
}

/// Parameters for creating or updating a release.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReleaseInput {
    /// Release title.
    pub title: String,
    /// Release notes.
    pub description: String,
    /// Tag the release is cut from.
    pub tag: String,
    /// Branch or commit the tag targets.
    pub commitish: String,
    /// Whether to create as a draft (ignored by providers without drafts).
    pub draft: bool,
    /// Whether to mark as a prerelease.
    pub prerelease: bool,
}

/// A provider account.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Provider login.
    pub login: String,
    /// Display name.
    pub name: String,
    /// Email address, when visible.
    pub email: String,
    /// Avatar URL.
    pub avatar: String,
}

/// Pagination options for list operations.
///
/// Zero means "let the provider pick its default". The caller iterates
/// pages; no operation auto-paginates.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ListOptions {
    /// 1-indexed page number.
    pub page: u32,
    /// Items per page.
    pub size: u32,
}

/// Pagination and state filters for issue listings.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct IssueListOptions {
    /// 1-indexed page number.
    pub page: u32,
    /// Items per page.
    pub size: u32,
    /// Include open issues.
    pub open: bool,
    /// Include closed issues.
    pub closed: bool,
}

/// Pagination and state filters for pull request listings.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct PullRequestListOptions {
    /// 1-indexed page number.
    pub page: u32,
    /// Items per page.
    pub size: u32,
    /// Include open pull requests.
    pub open: bool,
    /// Include closed pull requests.
    pub closed: bool,
}

/// Pagination and filters for commit listings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CommitListOptions {
    /// 1-indexed page number.
    pub page: u32,
    /// Items per page.
    pub size: u32,
    /// Branch, tag, or SHA to list from.
    #[serde(rename = "ref")]
    pub ref_: String,
    /// Only commits touching this path.
    pub path: String,
}

/// Pagination options for release listings.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ReleaseListOptions {
    /// 1-indexed page number.
    pub page: u32,
    /// Items per page.
    pub size: u32,
}
