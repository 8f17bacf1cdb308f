//
//  scm-client
//  gitee/webhook.rs
//

//! Inbound webhook parsing and verification for Gitee.
//!
//! Gitee names the delivery type in the `X-Gitee-Event` header and carries a
//! plain shared token in `X-Gitee-Token`. Push and tag-push deliveries share
//! one payload shape; a tag push whose `after` SHA is all zeros is a tag
//! deletion, everything else stays a push event because the push payload
//! carries the full commit metadata.
//!
//! Verification runs only after a successful parse. The secret resolver is
//! handed the parsed event; an empty token disables verification for that
//! delivery.

use chrono::{DateTime, Utc};
use reqwest::header::HeaderMap;
use serde::Deserialize;

use crate::common::encode::trim_ref;
use crate::common::webhook::{
    Action, PullRequestHook, PushHook, TagHook, WebhookEvent, MAX_WEBHOOK_SIZE, ZERO_SHA,
};
use crate::common::{
    ApiError, Commit, PullRequest, Reference, Repository, SecretResolver, Signature, User,
    WebhookService,
};

/// Header naming the delivery type.
pub const GITEE_EVENT_HEADER: &str = "X-Gitee-Event";

/// Header carrying the shared verification token.
pub const GITEE_TOKEN_HEADER: &str = "X-Gitee-Token";

/// Gitee implementation of [`WebhookService`].
#[derive(Debug, Default)]
pub struct GiteeWebhookService;

impl GiteeWebhookService {
    pub(crate) fn new() -> Self {
        Self
    }
}

impl WebhookService for GiteeWebhookService {
    fn parse(
        &self,
        headers: &HeaderMap,
        body: &[u8],
        secret: &dyn SecretResolver,
    ) -> Result<WebhookEvent, ApiError> {
        if body.len() > MAX_WEBHOOK_SIZE {
            return Err(ApiError::PayloadTooLarge);
        }

        let kind = headers
            .get(GITEE_EVENT_HEADER)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();
        let event = match kind {
            "Push Hook" | "Tag Push Hook" => parse_push_hook(body)?,
            "Merge Request Hook" => parse_pull_request_hook(body)?,
            // includes "Issue Hook", which has no normalized counterpart
            _ => return Err(ApiError::UnknownEvent),
        };

        let token = secret.resolve(&event)?;
        if token.is_empty() {
            return Ok(event);
        }
        let delivered = headers
            .get(GITEE_TOKEN_HEADER)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();
        if token != delivered {
            return Err(ApiError::SignatureInvalid);
        }
        Ok(event)
    }
}

fn parse_push_hook(body: &[u8]) -> Result<WebhookEvent, ApiError> {
    let src: GiteePushHook = serde_json::from_slice(body)?;
    if src.hook_name == "tag_push_hooks" && src.after == ZERO_SHA {
        return Ok(WebhookEvent::Tag(convert_tag_hook(&src)));
    }
    // ref creation (all-zero before SHA) stays a push event: the push
    // payload carries commit metadata a creation event would lose
    Ok(WebhookEvent::Push(convert_push_hook(&src)))
}

fn parse_pull_request_hook(body: &[u8]) -> Result<WebhookEvent, ApiError> {
    let src: GiteePullRequestHook = serde_json::from_slice(body)?;
    match src.action.as_str() {
        "open" | "approved" | "tested" | "merge" | "test" | "assign" => {}
        _ => return Err(ApiError::UnknownEvent),
    }
    Ok(WebhookEvent::PullRequest(convert_pull_request_hook(&src)))
}

fn convert_push_hook(src: &GiteePushHook) -> PushHook {
    PushHook {
        ref_: src.ref_.clone(),
        before: src.before.clone(),
        after: src.after.clone(),
        repo: convert_hook_repository(&src.repository),
        commit: Commit {
            sha: src.head_commit.id.clone(),
            message: src.head_commit.message.clone(),
            link: src.head_commit.url.clone(),
            author: Signature {
                login: src.head_commit.author.user_name.clone(),
                name: src.head_commit.author.name.clone(),
                email: src.head_commit.author.email.clone(),
                ..Default::default()
            },
            committer: Signature {
                login: src.head_commit.committer.user_name.clone(),
                name: src.head_commit.committer.name.clone(),
                email: src.head_commit.committer.email.clone(),
                ..Default::default()
            },
        },
        sender: convert_hook_sender(&src.sender),
        commits: src
            .commits
            .iter()
            .map(|c| Commit {
                sha: c.id.clone(),
                message: c.message.clone(),
                link: c.url.clone(),
                author: Signature {
                    name: c.author.name.clone(),
                    email: c.author.email.clone(),
                    ..Default::default()
                },
                committer: Signature {
                    name: c.author.name.clone(),
                    email: c.author.email.clone(),
                    ..Default::default()
                },
            })
            .collect(),
    }
}

fn convert_tag_hook(src: &GiteePushHook) -> TagHook {
    let (action, sha) = if src.after == ZERO_SHA {
        (Action::Delete, src.before.clone())
    } else {
        (Action::Create, src.after.clone())
    };
    TagHook {
        action,
        ref_: Reference {
            name: trim_ref(&src.ref_).to_string(),
            path: String::new(),
            sha,
        },
        repo: convert_hook_repository(&src.repository),
        sender: convert_hook_sender(&src.sender),
    }
}

fn convert_pull_request_hook(src: &GiteePullRequestHook) -> PullRequestHook {
    let action = match src.action.as_str() {
        "open" => Action::Open,
        "tested" => Action::Tested,
        "approved" => Action::Approved,
        "merge" => Action::Merge,
        "test" => Action::Test,
        _ => Action::Sync,
    };
    PullRequestHook {
        action,
        pull_request: PullRequest {
            number: src.pull_request.id,
            title: src.pull_request.title.clone(),
            body: src.pull_request.body.clone(),
            sha: src.pull_request.merge_commit_sha.clone(),
            ref_: src.pull_request.merge_reference_name.clone(),
            source: src.pull_request.head.ref_.clone(),
            target: src.pull_request.base.ref_.clone(),
            fork: src.pull_request.path_with_namespace.clone(),
            link: src.pull_request.html_url.clone(),
            closed: src.pull_request.closed_at.is_some(),
            merged: src.pull_request.merged,
            author: User {
                login: src.pull_request.user.login.clone(),
                name: src.pull_request.user.name.clone(),
                email: src.pull_request.user.email.clone(),
                avatar: src.pull_request.user.avatar_url.clone(),
            },
            created: src.pull_request.created_at,
            updated: src.pull_request.updated_at,
            ..Default::default()
        },
        repo: Repository {
            id: src.repository.id.clone(),
            namespace: src.repository.namespace.clone(),
            name: src.repository.name.clone(),
            branch: src.repository.default_branch.clone(),
            private: src.repository.private,
            clone: src.repository.clone_url.clone(),
            clone_ssh: src.repository.git_ssh_url.clone(),
            link: src.repository.html_url.clone(),
            ..Default::default()
        },
        sender: convert_hook_sender(&src.sender),
    }
}

fn convert_hook_repository(from: &GiteeHookRepository) -> Repository {
    Repository {
        id: from.id.clone(),
        namespace: from.namespace.clone(),
        name: from.name.clone(),
        branch: from.default_branch.clone(),
        private: from.private,
        clone: from.git_url.clone(),
        clone_ssh: from.ssh_url.clone(),
        link: from.html_url.clone(),
        ..Default::default()
    }
}

fn convert_hook_sender(from: &GiteeHookSender) -> User {
    User {
        login: from.login.clone(),
        name: from.name.clone(),
        email: from.email.clone(),
        avatar: from.avatar_url.clone(),
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct GiteePushHook {
    hook_name: String,
    before: String,
    after: String,
    #[serde(rename = "ref")]
    ref_: String,
    head_commit: GiteeHookHeadCommit,
    sender: GiteeHookSender,
    commits: Vec<GiteeHookCommit>,
    repository: GiteeHookRepository,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct GiteeHookHeadCommit {
    id: String,
    message: String,
    author: GiteeHookIdentity,
    committer: GiteeHookIdentity,
    url: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct GiteeHookIdentity {
    name: String,
    email: String,
    user_name: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct GiteeHookCommit {
    id: String,
    message: String,
    url: String,
    author: GiteeHookIdentity,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct GiteeHookSender {
    login: String,
    name: String,
    email: String,
    avatar_url: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct GiteeHookRepository {
    id: String,
    namespace: String,
    name: String,
    git_url: String,
    ssh_url: String,
    html_url: String,
    default_branch: String,
    private: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct GiteePullRequestHook {
    action: String,
    pull_request: GiteeHookPullRequest,
    repository: GiteeHookPrRepository,
    sender: GiteeHookSender,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct GiteeHookPullRequest {
    id: u64,
    title: String,
    body: String,
    merge_commit_sha: String,
    merge_reference_name: String,
    path_with_namespace: String,
    html_url: String,
    merged: bool,
    closed_at: Option<DateTime<Utc>>,
    created_at: Option<DateTime<Utc>>,
    updated_at: Option<DateTime<Utc>>,
    base: GiteeHookRef,
    head: GiteeHookRef,
    user: GiteeHookSender,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct GiteeHookRef {
    #[serde(rename = "ref")]
    ref_: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct GiteeHookPrRepository {
    id: String,
    namespace: String,
    name: String,
    clone_url: String,
    git_ssh_url: String,
    html_url: String,
    default_branch: String,
    private: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::{HeaderName, HeaderValue};

    const ZEROS: &str = "0000000000000000000000000000000000000000";

    fn headers(event: &str, token: Option<&str>) -> HeaderMap {
        let mut map = HeaderMap::new();
        map.insert(
            HeaderName::from_static("x-gitee-event"),
            HeaderValue::from_str(event).unwrap(),
        );
        if let Some(token) = token {
            map.insert(
                HeaderName::from_static("x-gitee-token"),
                HeaderValue::from_str(token).unwrap(),
            );
        }
        map
    }

    fn no_secret(_: &WebhookEvent) -> Result<String, ApiError> {
        Ok(String::new())
    }

    fn push_body(hook_name: &str, before: &str, after: &str) -> String {
        format!(
            r#"{{
                "hook_name": "{hook_name}",
                "before": "{before}",
                "after": "{after}",
                "ref": "refs/heads/master",
                "head_commit": {{
                    "id": "6113728f27ae82c7b1a177c8d03f9e96e0adf246",
                    "message": "Update README.md",
                    "author": {{"name": "The Octocat", "email": "octocat@gitee.com", "user_name": "octocat"}},
                    "committer": {{"name": "The Octocat", "email": "octocat@gitee.com", "user_name": "octocat"}},
                    "url": "https://gitee.com/octocat/hello-world/commit/6113728f"
                }},
                "sender": {{"login": "octocat", "name": "The Octocat", "email": "octocat@gitee.com", "avatar_url": ""}},
                "commits": [
                    {{
                        "id": "6113728f27ae82c7b1a177c8d03f9e96e0adf246",
                        "message": "Update README.md",
                        "url": "https://gitee.com/octocat/hello-world/commit/6113728f",
                        "author": {{"name": "The Octocat", "email": "octocat@gitee.com"}}
                    }}
                ],
                "repository": {{
                    "id": "297",
                    "namespace": "octocat",
                    "name": "hello-world",
                    "git_url": "https://gitee.com/octocat/hello-world.git",
                    "ssh_url": "git@gitee.com:octocat/hello-world.git",
                    "html_url": "https://gitee.com/octocat/hello-world",
                    "default_branch": "master",
                    "private": false
                }}
            }}"#
        )
    }

    #[test]
    fn test_parse_push() {
        let service = GiteeWebhookService::new();
        let body = push_body("push_hooks", "4d3c2b1a", "6113728f");

        let event = service
            .parse(&headers("Push Hook", None), body.as_bytes(), &no_secret)
            .unwrap();

        let WebhookEvent::Push(push) = event else {
            panic!("expected a push event");
        };
        assert_eq!(push.ref_, "refs/heads/master");
        assert_eq!(push.repo.namespace, "octocat");
        assert_eq!(push.commit.author.login, "octocat");
        assert_eq!(push.commits.len(), 1);
        assert_eq!(push.commits[0].author.name, "The Octocat");
        assert_eq!(push.sender.login, "octocat");
    }

    #[test]
    fn test_branch_creation_stays_push() {
        let service = GiteeWebhookService::new();
        let body = push_body("push_hooks", ZEROS, "6113728f");

        let event = service
            .parse(&headers("Push Hook", None), body.as_bytes(), &no_secret)
            .unwrap();

        assert!(matches!(event, WebhookEvent::Push(_)));
    }

    #[test]
    fn test_tag_creation_stays_push() {
        let service = GiteeWebhookService::new();
        let body = push_body("tag_push_hooks", ZEROS, "6113728f");

        let event = service
            .parse(&headers("Tag Push Hook", None), body.as_bytes(), &no_secret)
            .unwrap();

        assert!(matches!(event, WebhookEvent::Push(_)));
    }

    #[test]
    fn test_tag_deletion_classifies_as_tag_event() {
        let service = GiteeWebhookService::new();
        let body = push_body("tag_push_hooks", "6113728f", ZEROS)
            .replace("refs/heads/master", "refs/tags/v1.0.0");

        let event = service
            .parse(&headers("Tag Push Hook", None), body.as_bytes(), &no_secret)
            .unwrap();

        let WebhookEvent::Tag(tag) = event else {
            panic!("expected a tag event");
        };
        assert_eq!(tag.action, Action::Delete);
        assert_eq!(tag.ref_.name, "v1.0.0");
        assert_eq!(tag.ref_.sha, "6113728f");
        assert_eq!(tag.repo.name, "hello-world");
    }

    #[test]
    fn test_parse_pull_request() {
        let service = GiteeWebhookService::new();
        let body = r#"{
            "action": "open",
            "pull_request": {
                "id": 1347,
                "title": "new-feature",
                "body": "Please pull these awesome changes",
                "merge_commit_sha": "9c5d631e",
                "merge_reference_name": "refs/pull/1347/MERGE",
                "path_with_namespace": "octocat/hello-world",
                "html_url": "https://gitee.com/octocat/hello-world/pulls/1347",
                "merged": false,
                "closed_at": null,
                "created_at": "2017-05-20T22:11:34Z",
                "updated_at": "2017-05-20T22:11:34Z",
                "base": {"ref": "master"},
                "head": {"ref": "new-feature"},
                "user": {"login": "octocat", "name": "The Octocat", "email": "", "avatar_url": ""}
            },
            "repository": {
                "id": "297",
                "namespace": "octocat",
                "name": "hello-world",
                "clone_url": "https://gitee.com/octocat/hello-world.git",
                "git_ssh_url": "git@gitee.com:octocat/hello-world.git",
                "html_url": "https://gitee.com/octocat/hello-world",
                "default_branch": "master",
                "private": false
            },
            "sender": {"login": "octocat", "name": "The Octocat", "email": "", "avatar_url": ""}
        }"#;

        let event = service
            .parse(
                &headers("Merge Request Hook", None),
                body.as_bytes(),
                &no_secret,
            )
            .unwrap();

        let WebhookEvent::PullRequest(hook) = event else {
            panic!("expected a pull request event");
        };
        assert_eq!(hook.action, Action::Open);
        assert_eq!(hook.pull_request.number, 1347);
        assert_eq!(hook.pull_request.source, "new-feature");
        assert_eq!(hook.pull_request.target, "master");
        assert!(!hook.pull_request.closed);
        assert_eq!(hook.repo.id, "297");
    }

    #[test]
    fn test_pull_request_unknown_action_rejected() {
        let service = GiteeWebhookService::new();
        let body = r#"{"action": "label_changed", "pull_request": {}, "repository": {}, "sender": {}}"#;

        let err = service
            .parse(
                &headers("Merge Request Hook", None),
                body.as_bytes(),
                &no_secret,
            )
            .unwrap_err();

        assert!(matches!(err, ApiError::UnknownEvent));
    }

    #[test]
    fn test_unknown_event_header_rejected() {
        let service = GiteeWebhookService::new();

        for event in ["Issue Hook", "Note Hook", ""] {
            let err = service
                .parse(&headers(event, None), b"{}", &no_secret)
                .unwrap_err();
            assert!(matches!(err, ApiError::UnknownEvent));
        }
    }

    #[test]
    fn test_signature_verification() {
        let service = GiteeWebhookService::new();
        let body = push_body("push_hooks", "4d3c2b1a", "6113728f");
        fn resolver(_: &WebhookEvent) -> Result<String, ApiError> {
            Ok("topsecret".to_string())
        }

        // matching token
        let event = service.parse(
            &headers("Push Hook", Some("topsecret")),
            body.as_bytes(),
            &resolver,
        );
        assert!(event.is_ok());

        // mismatching token
        let err = service
            .parse(
                &headers("Push Hook", Some("wrong")),
                body.as_bytes(),
                &resolver,
            )
            .unwrap_err();
        assert!(matches!(err, ApiError::SignatureInvalid));

        // missing token header
        let err = service
            .parse(&headers("Push Hook", None), body.as_bytes(), &resolver)
            .unwrap_err();
        assert!(matches!(err, ApiError::SignatureInvalid));

        // empty resolver token skips verification
        let event = service.parse(
            &headers("Push Hook", Some("anything")),
            body.as_bytes(),
            &no_secret,
        );
        assert!(event.is_ok());
    }

    #[test]
    fn test_oversized_body_fails_closed() {
        let service = GiteeWebhookService::new();
        let body = vec![b'{'; MAX_WEBHOOK_SIZE + 1];

        let err = service
            .parse(&headers("Push Hook", None), &body, &no_secret)
            .unwrap_err();

        assert!(matches!(err, ApiError::PayloadTooLarge));
    }

    #[test]
    fn test_malformed_body_is_decode_error() {
        let service = GiteeWebhookService::new();

        let err = service
            .parse(&headers("Push Hook", None), b"not json", &no_secret)
            .unwrap_err();

        assert!(matches!(err, ApiError::Decode(_)));
    }
}
