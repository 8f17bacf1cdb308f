//
//  scm-client
//  gitee/pr.rs
//

//! Pull request operations for Gitee.
//!
//! Gitee exposes no endpoint to close a pull request without merging, so
//! [`PullRequestService::close`] fails fast with [`ApiError::NotSupported`].
//! Pull request comments share the issue-comment wire shape and converter.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Method;
use serde::{Deserialize, Serialize};

use crate::client::{execute_empty, execute_json, Transport};
use crate::common::encode::{encode_list_options, encode_pr_list_options, encode_repo};
use crate::common::{
    ApiError, ApiResult, Change, Comment, CommentInput, Commit, Label, ListOptions, PullRequest,
    PullRequestInput, PullRequestListOptions, PullRequestService, Response, User,
};

use super::git::{convert_commit, GiteeCommit};
use super::issue::{convert_issue_comment, GiteeCommentInput, GiteeIssueComment};

/// Gitee implementation of [`PullRequestService`].
pub struct GiteePullRequestService {
    transport: Arc<dyn Transport>,
}

impl GiteePullRequestService {
    pub(crate) fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }
}

#[async_trait]
impl PullRequestService for GiteePullRequestService {
    async fn find(&self, repo: &str, number: u64) -> ApiResult<PullRequest> {
        let path = format!("api/v5/repos/{}/pulls/{}", encode_repo(repo), number);
        let (out, res): (GiteePr, _) =
            execute_json(&*self.transport, Method::GET, &path, None).await?;
        Ok((convert_pull_request(&out), res))
    }

    async fn find_comment(&self, repo: &str, _index: u64, id: u64) -> ApiResult<Comment> {
        let path = format!("api/v5/repos/{}/pulls/comments/{}", encode_repo(repo), id);
        let (out, res): (GiteeIssueComment, _) =
            execute_json(&*self.transport, Method::GET, &path, None).await?;
        Ok((convert_issue_comment(&out), res))
    }

    async fn list(&self, repo: &str, opts: &PullRequestListOptions) -> ApiResult<Vec<PullRequest>> {
        let path = format!(
            "api/v5/repos/{}/pulls?{}",
            encode_repo(repo),
            encode_pr_list_options(opts)
        );
        let (out, res): (Vec<GiteePr>, _) =
            execute_json(&*self.transport, Method::GET, &path, None).await?;
        Ok((out.iter().map(convert_pull_request).collect(), res))
    }

    async fn list_changes(
        &self,
        repo: &str,
        number: u64,
        opts: &ListOptions,
    ) -> ApiResult<Vec<Change>> {
        let path = format!(
            "api/v5/repos/{}/pulls/{}/files?{}",
            encode_repo(repo),
            number,
            encode_list_options(opts)
        );
        let (out, res): (Vec<GiteeChange>, _) =
            execute_json(&*self.transport, Method::GET, &path, None).await?;
        Ok((out.iter().map(convert_change).collect(), res))
    }

    async fn list_comments(
        &self,
        repo: &str,
        index: u64,
        opts: &ListOptions,
    ) -> ApiResult<Vec<Comment>> {
        let path = format!(
            "api/v5/repos/{}/pulls/{}/comments?{}",
            encode_repo(repo),
            index,
            encode_list_options(opts)
        );
        let (out, res): (Vec<GiteeIssueComment>, _) =
            execute_json(&*self.transport, Method::GET, &path, None).await?;
        Ok((out.iter().map(convert_issue_comment).collect(), res))
    }

    async fn list_commits(
        &self,
        repo: &str,
        number: u64,
        _opts: &ListOptions,
    ) -> ApiResult<Vec<Commit>> {
        // the endpoint does not paginate
        let path = format!("api/v5/repos/{}/pulls/{}/commits", encode_repo(repo), number);
        let (out, res): (Vec<GiteeCommit>, _) =
            execute_json(&*self.transport, Method::GET, &path, None).await?;
        Ok((out.iter().map(convert_commit).collect(), res))
    }

    async fn create(&self, repo: &str, input: &PullRequestInput) -> ApiResult<PullRequest> {
        let path = format!("api/v5/repos/{}/pulls", encode_repo(repo));
        let body = serde_json::to_value(GiteePrCreate {
            title: input.title.clone(),
            head: input.source.clone(),
            base: input.target.clone(),
            body: input.body.clone(),
        })?;
        let (out, res): (GiteePr, _) =
            execute_json(&*self.transport, Method::POST, &path, Some(body)).await?;
        Ok((convert_pull_request(&out), res))
    }

    async fn create_comment(
        &self,
        repo: &str,
        index: u64,
        input: &CommentInput,
    ) -> ApiResult<Comment> {
        let path = format!("api/v5/repos/{}/pulls/{}/comments", encode_repo(repo), index);
        let body = serde_json::to_value(GiteeCommentInput {
            body: input.body.clone(),
        })?;
        let (out, res): (GiteeIssueComment, _) =
            execute_json(&*self.transport, Method::POST, &path, Some(body)).await?;
        Ok((convert_issue_comment(&out), res))
    }

    async fn delete_comment(&self, repo: &str, index: u64, id: u64) -> Result<Response, ApiError> {
        let path = format!(
            "api/v5/repos/{}/pulls/{}/comments/{}",
            encode_repo(repo),
            index,
            id
        );
        execute_empty(&*self.transport, Method::DELETE, &path, None).await
    }

    async fn merge(&self, repo: &str, number: u64) -> Result<Response, ApiError> {
        let path = format!("api/v5/repos/{}/pulls/{}/merge", encode_repo(repo), number);
        execute_empty(&*self.transport, Method::PUT, &path, None).await
    }

    async fn close(&self, _repo: &str, _number: u64) -> Result<Response, ApiError> {
        Err(ApiError::NotSupported)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct GiteePr {
    url: String,
    number: u64,
    state: String,
    title: String,
    body: String,
    user: GiteePrUser,
    head: GiteePrRef,
    base: GiteePrRef,
    created_at: Option<DateTime<Utc>>,
    updated_at: Option<DateTime<Utc>>,
    labels: Vec<GiteePrLabel>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct GiteePrUser {
    login: String,
    name: String,
    avatar_url: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct GiteePrRef {
    #[serde(rename = "ref")]
    ref_: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct GiteePrLabel {
    name: String,
}

#[derive(Debug, Serialize)]
struct GiteePrCreate {
    title: String,
    head: String,
    base: String,
    body: String,
}

/// Wire shape of a changed file, shared with the git diff endpoints.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(super) struct GiteeChange {
    filename: String,
    additions: i64,
    deletions: i64,
    status: String,
}

fn convert_pull_request(from: &GiteePr) -> PullRequest {
    PullRequest {
        number: from.number,
        title: from.title.clone(),
        body: from.body.clone(),
        sha: String::new(),
        ref_: format!("refs/merge-requests/{}/head", from.number),
        source: from.head.ref_.clone(),
        target: from.base.ref_.clone(),
        fork: String::new(),
        link: from.url.clone(),
        closed: from.state != "opened",
        merged: from.state == "merged",
        author: User {
            login: from.user.login.clone(),
            name: from.user.name.clone(),
            avatar: from.user.avatar_url.clone(),
            ..Default::default()
        },
        labels: from
            .labels
            .iter()
            .map(|l| Label {
                name: l.name.clone(),
            })
            .collect(),
        created: from.created_at,
        updated: from.updated_at,
    }
}

// TODO: replace the additions/deletions heuristic with the status field once
// the status vocabulary ("added"/"deleted"/"renamed") is confirmed against
// live payloads; the current flags misclassify one-line edits.
pub(super) fn convert_change(from: &GiteeChange) -> Change {
    Change {
        path: from.filename.clone(),
        added: from.additions == 1,
        deleted: from.deletions == 1,
        renamed: from.status == "modified",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::FakeTransport;

    const PR_BODY: &str = r#"{
        "url": "https://gitee.com/api/v5/repos/octocat/hello-world/pulls/1347",
        "number": 1347,
        "state": "opened",
        "title": "new-feature",
        "body": "Please pull these awesome changes",
        "user": {
            "login": "octocat",
            "name": "The Octocat",
            "avatar_url": "https://gitee.com/assets/octocat.png"
        },
        "head": {"ref": "new-feature"},
        "base": {"ref": "master"},
        "created_at": "2017-05-20T22:11:34Z",
        "updated_at": "2018-05-20T22:11:34Z",
        "labels": [{"id": 1, "name": "enhancement"}]
    }"#;

    #[tokio::test]
    async fn test_find() {
        let transport = Arc::new(FakeTransport::returning(PR_BODY));
        let service = GiteePullRequestService::new(transport.clone());

        let (pr, _) = service.find("octocat/hello-world", 1347).await.unwrap();

        assert_eq!(
            transport.last_path(),
            "api/v5/repos/octocat%2Fhello-world/pulls/1347"
        );
        assert_eq!(pr.number, 1347);
        assert_eq!(pr.ref_, "refs/merge-requests/1347/head");
        assert_eq!(pr.source, "new-feature");
        assert_eq!(pr.target, "master");
        assert!(!pr.closed);
        assert!(!pr.merged);
        assert_eq!(pr.labels, vec![Label { name: "enhancement".to_string() }]);
    }

    #[tokio::test]
    async fn test_list_encodes_state_filter() {
        let transport = Arc::new(FakeTransport::returning("[]"));
        let service = GiteePullRequestService::new(transport.clone());
        let opts = PullRequestListOptions {
            page: 2,
            size: 50,
            open: false,
            closed: true,
        };

        service.list("octocat/hello-world", &opts).await.unwrap();

        assert_eq!(
            transport.last_path(),
            "api/v5/repos/octocat%2Fhello-world/pulls?page=2&per_page=50&state=closed"
        );
    }

    #[tokio::test]
    async fn test_list_changes() {
        let body = r#"[
            {"filename": "README.md", "additions": 1, "deletions": 0, "status": "added"},
            {"filename": "src/main.rs", "additions": 12, "deletions": 3, "status": "modified"}
        ]"#;
        let transport = Arc::new(FakeTransport::returning(body));
        let service = GiteePullRequestService::new(transport.clone());

        let (changes, _) = service
            .list_changes("octocat/hello-world", 1347, &ListOptions { page: 1, size: 30 })
            .await
            .unwrap();

        assert_eq!(
            transport.last_path(),
            "api/v5/repos/octocat%2Fhello-world/pulls/1347/files?page=1&per_page=30"
        );
        assert_eq!(changes.len(), 2);
        assert_eq!(changes[0].path, "README.md");
        assert!(changes[0].added);
        assert!(!changes[0].renamed);
        assert!(changes[1].renamed);
    }

    #[tokio::test]
    async fn test_merge_and_close() {
        let transport = Arc::new(FakeTransport::returning(""));
        let service = GiteePullRequestService::new(transport.clone());

        service.merge("octocat/hello-world", 1347).await.unwrap();
        assert_eq!(
            transport.last_path(),
            "api/v5/repos/octocat%2Fhello-world/pulls/1347/merge"
        );
        assert_eq!(transport.call_count(), 1);

        let err = service.close("octocat/hello-world", 1347).await.unwrap_err();
        assert!(matches!(err, ApiError::NotSupported));
        assert_eq!(transport.call_count(), 1);
    }

    #[tokio::test]
    async fn test_comment_paths() {
        let comment_body = r#"{
            "id": 901,
            "user": {"login": "octocat", "name": "The Octocat", "avatar_url": ""},
            "body": "looks good",
            "created_at": "2017-05-20T22:11:34Z",
            "updated_at": "2017-05-20T22:11:34Z"
        }"#;
        let transport = Arc::new(FakeTransport::returning(comment_body));
        let service = GiteePullRequestService::new(transport.clone());

        let (comment, _) = service
            .find_comment("octocat/hello-world", 1347, 901)
            .await
            .unwrap();
        assert_eq!(
            transport.last_path(),
            "api/v5/repos/octocat%2Fhello-world/pulls/comments/901"
        );
        assert_eq!(comment.id, 901);

        service
            .create_comment(
                "octocat/hello-world",
                1347,
                &CommentInput {
                    body: "looks good".to_string(),
                },
            )
            .await
            .unwrap();
        assert_eq!(
            transport.last_path(),
            "api/v5/repos/octocat%2Fhello-world/pulls/1347/comments"
        );

        service
            .delete_comment("octocat/hello-world", 1347, 901)
            .await
            .unwrap();
        assert_eq!(
            transport.last_path(),
            "api/v5/repos/octocat%2Fhello-world/pulls/1347/comments/901"
        );
    }

    #[test]
    fn test_convert_change_heuristics() {
        let change = GiteeChange {
            filename: "docs/guide.md".to_string(),
            additions: 1,
            deletions: 1,
            status: "modified".to_string(),
        };
        let converted = convert_change(&change);
        assert!(converted.added);
        assert!(converted.deleted);
        assert!(converted.renamed);
    }

    #[test]
    fn test_closed_and_merged_flags() {
        let mut pr = GiteePr {
            number: 1,
            state: "merged".to_string(),
            ..Default::default()
        };
        let converted = convert_pull_request(&pr);
        assert!(converted.closed);
        assert!(converted.merged);

        pr.state = "closed".to_string();
        let converted = convert_pull_request(&pr);
        assert!(converted.closed);
        assert!(!converted.merged);
    }
}
