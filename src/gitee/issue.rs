//
//  scm-client
//  gitee/issue.rs
//

//! Issue tracker operations for Gitee.
//!
//! Gitee has no issue-locking API, so [`IssueService::lock`] and
//! [`IssueService::unlock`] fail fast with [`ApiError::NotSupported`]. Issue
//! creation passes the title and description as query parameters; closing an
//! issue goes through the owner-scoped endpoint with the repository name in
//! the request body, which is how Gitee models issue edits.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use url::form_urlencoded;

use crate::client::{execute_empty, execute_json, Transport};
use crate::common::encode::{
    encode_issue_list_options, encode_list_options, encode_repo, split_repo,
};
use crate::common::{
    ApiError, ApiResult, Comment, CommentInput, Issue, IssueInput, IssueListOptions, IssueService,
    ListOptions, Response, User,
};

/// Gitee implementation of [`IssueService`].
pub struct GiteeIssueService {
    transport: Arc<dyn Transport>,
}

impl GiteeIssueService {
    pub(crate) fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }
}

#[async_trait]
impl IssueService for GiteeIssueService {
    async fn find(&self, repo: &str, number: u64) -> ApiResult<Issue> {
        let path = format!("api/v5/repos/{}/issues/{}", encode_repo(repo), number);
        let (out, res): (GiteeIssue, _) =
            execute_json(&*self.transport, Method::GET, &path, None).await?;
        Ok((convert_issue(&out), res))
    }

    async fn find_comment(&self, repo: &str, _index: u64, id: u64) -> ApiResult<Comment> {
        // comment IDs are repository-global, so the issue index is unused
        let path = format!("api/v5/repos/{}/issues/notes/{}", encode_repo(repo), id);
        let (out, res): (GiteeIssueComment, _) =
            execute_json(&*self.transport, Method::GET, &path, None).await?;
        Ok((convert_issue_comment(&out), res))
    }

    async fn list(&self, repo: &str, opts: &IssueListOptions) -> ApiResult<Vec<Issue>> {
        let path = format!(
            "api/v5/repos/{}/issues?{}",
            encode_repo(repo),
            encode_issue_list_options(opts)
        );
        let (out, res): (Vec<GiteeIssue>, _) =
            execute_json(&*self.transport, Method::GET, &path, None).await?;
        Ok((out.iter().map(convert_issue).collect(), res))
    }

    async fn list_comments(
        &self,
        repo: &str,
        index: u64,
        opts: &ListOptions,
    ) -> ApiResult<Vec<Comment>> {
        let path = format!(
            "api/v5/repos/{}/issues/{}/notes?{}",
            encode_repo(repo),
            index,
            encode_list_options(opts)
        );
        let (out, res): (Vec<GiteeIssueComment>, _) =
            execute_json(&*self.transport, Method::GET, &path, None).await?;
        Ok((out.iter().map(convert_issue_comment).collect(), res))
    }

    async fn create(&self, repo: &str, input: &IssueInput) -> ApiResult<Issue> {
        let query: String = form_urlencoded::Serializer::new(String::new())
            .append_pair("title", &input.title)
            .append_pair("description", &input.body)
            .finish();
        let path = format!("api/v5/repos/{}/issues?{}", encode_repo(repo), query);
        let (out, res): (GiteeIssue, _) =
            execute_json(&*self.transport, Method::POST, &path, None).await?;
        Ok((convert_issue(&out), res))
    }

    async fn create_comment(
        &self,
        repo: &str,
        number: u64,
        input: &CommentInput,
    ) -> ApiResult<Comment> {
        let path = format!(
            "api/v5/repos/{}/issues/{}/comments",
            encode_repo(repo),
            number
        );
        let body = serde_json::to_value(GiteeCommentInput {
            body: input.body.clone(),
        })?;
        let (out, res): (GiteeIssueComment, _) =
            execute_json(&*self.transport, Method::POST, &path, Some(body)).await?;
        Ok((convert_issue_comment(&out), res))
    }

    async fn delete_comment(&self, repo: &str, _number: u64, id: u64) -> Result<Response, ApiError> {
        let path = format!("api/v5/repos/{}/issues/comments/{}", encode_repo(repo), id);
        execute_empty(&*self.transport, Method::DELETE, &path, None).await
    }

    async fn close(&self, repo: &str, number: u64) -> Result<Response, ApiError> {
        let (owner, name) = split_repo(repo);
        let path = format!("api/v5/repos/{}/issues/{}", encode_repo(owner), number);
        let body = serde_json::to_value(GiteeIssueEdit {
            repo: name.to_string(),
            state: "closed".to_string(),
        })?;
        execute_empty(&*self.transport, Method::PATCH, &path, Some(body)).await
    }

    async fn lock(&self, _repo: &str, _number: u64) -> Result<Response, ApiError> {
        Err(ApiError::NotSupported)
    }

    async fn unlock(&self, _repo: &str, _number: u64) -> Result<Response, ApiError> {
        Err(ApiError::NotSupported)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct GiteeIssue {
    number: u64,
    state: String,
    title: String,
    body: String,
    web_url: String,
    discussion_locked: bool,
    labels: Vec<GiteeLabel>,
    user: GiteeIssueUser,
    created_at: Option<DateTime<Utc>>,
    updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct GiteeLabel {
    name: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct GiteeIssueUser {
    login: String,
    name: String,
    avatar_url: String,
}

/// Wire shape of an issue note, shared with pull request comments.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(super) struct GiteeIssueComment {
    id: u64,
    user: GiteeIssueUser,
    body: String,
    created_at: Option<DateTime<Utc>>,
    updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
pub(super) struct GiteeCommentInput {
    pub(super) body: String,
}

/// Wire shape of the issue-edit request used to close an issue.
#[derive(Debug, Serialize)]
struct GiteeIssueEdit {
    repo: String,
    state: String,
}

fn convert_issue(from: &GiteeIssue) -> Issue {
    Issue {
        number: from.number,
        title: from.title.clone(),
        body: from.body.clone(),
        link: from.web_url.clone(),
        labels: from.labels.iter().map(|l| l.name.clone()).collect(),
        locked: from.discussion_locked,
        closed: from.state == "closed",
        author: User {
            login: from.user.login.clone(),
            name: from.user.name.clone(),
            avatar: from.user.avatar_url.clone(),
            ..Default::default()
        },
        created: from.created_at,
        updated: from.updated_at,
    }
}

pub(super) fn convert_issue_comment(from: &GiteeIssueComment) -> Comment {
    Comment {
        id: from.id,
        body: from.body.clone(),
        author: User {
            login: from.user.login.clone(),
            name: from.user.name.clone(),
            avatar: from.user.avatar_url.clone(),
            ..Default::default()
        },
        created: from.created_at,
        updated: from.updated_at,
    }
}
