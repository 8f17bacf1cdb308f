//
//  scm-client
//  gitee/git.rs
//

//! Branch, tag, commit, and diff operations for Gitee.
//!
//! Branches and tags share one wire shape; the converters differ only in the
//! ref prefix used for the fully qualified path. Single-commit diffs reuse
//! the commit endpoint, which inlines the changed files.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Method;
use serde::{Deserialize, Serialize};

use crate::client::{execute_empty, execute_json, Transport};
use crate::common::encode::{
    encode_commit_list_options, encode_list_options, encode_repo, expand_ref, trim_ref,
};
use crate::common::{
    ApiError, ApiResult, Change, Commit, CommitListOptions, CreateBranch, GitService, ListOptions,
    Reference, Response, Signature,
};

use super::pr::{convert_change, GiteeChange};

/// Gitee implementation of [`GitService`].
pub struct GiteeGitService {
    transport: Arc<dyn Transport>,
}

impl GiteeGitService {
    pub(crate) fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }
}

#[async_trait]
impl GitService for GiteeGitService {
    async fn create_branch(&self, repo: &str, params: &CreateBranch) -> Result<Response, ApiError> {
        let path = format!("api/v5/repos/{}/branches", encode_repo(repo));
        let body = serde_json::to_value(GiteeCreateBranch {
            branch_name: params.name.clone(),
            refs: params.sha.clone(),
        })?;
        execute_empty(&*self.transport, Method::POST, &path, Some(body)).await
    }

    async fn find_branch(&self, repo: &str, name: &str) -> ApiResult<Reference> {
        let path = format!("api/v5/repos/{}/branches/{}", encode_repo(repo), name);
        let (out, res): (GiteeBranch, _) =
            execute_json(&*self.transport, Method::GET, &path, None).await?;
        Ok((convert_branch(&out), res))
    }

    async fn find_commit(&self, repo: &str, ref_: &str) -> ApiResult<Commit> {
        let path = format!("api/v5/repos/{}/commits/{}", encode_repo(repo), trim_ref(ref_));
        let (out, res): (GiteeCommit, _) =
            execute_json(&*self.transport, Method::GET, &path, None).await?;
        Ok((convert_commit(&out), res))
    }

    async fn find_tag(&self, repo: &str, name: &str) -> ApiResult<Reference> {
        let path = format!("api/v5/repos/{}/tags/{}", encode_repo(repo), name);
        let (out, res): (GiteeBranch, _) =
            execute_json(&*self.transport, Method::GET, &path, None).await?;
        Ok((convert_tag(&out), res))
    }

    async fn list_branches(&self, repo: &str, opts: &ListOptions) -> ApiResult<Vec<Reference>> {
        let path = format!(
            "api/v5/repos/{}/branches?{}",
            encode_repo(repo),
            encode_list_options(opts)
        );
        let (out, res): (Vec<GiteeBranch>, _) =
            execute_json(&*self.transport, Method::GET, &path, None).await?;
        Ok((out.iter().map(convert_branch).collect(), res))
    }

    async fn list_commits(&self, repo: &str, opts: &CommitListOptions) -> ApiResult<Vec<Commit>> {
        let path = format!(
            "api/v5/repos/{}/commits?{}",
            encode_repo(repo),
            encode_commit_list_options(opts)
        );
        let (out, res): (Vec<GiteeCommit>, _) =
            execute_json(&*self.transport, Method::GET, &path, None).await?;
        Ok((out.iter().map(convert_commit).collect(), res))
    }

    async fn list_tags(&self, repo: &str, opts: &ListOptions) -> ApiResult<Vec<Reference>> {
        let path = format!(
            "api/v5/repos/{}/tags?{}",
            encode_repo(repo),
            encode_list_options(opts)
        );
        let (out, res): (Vec<GiteeBranch>, _) =
            execute_json(&*self.transport, Method::GET, &path, None).await?;
        Ok((out.iter().map(convert_tag).collect(), res))
    }

    async fn list_changes(
        &self,
        repo: &str,
        ref_: &str,
        _opts: &ListOptions,
    ) -> ApiResult<Vec<Change>> {
        // the commit endpoint inlines the full file list; no pagination
        let path = format!("api/v5/repos/{}/commits/{}", encode_repo(repo), ref_);
        let (out, res): (GiteeCommit, _) =
            execute_json(&*self.transport, Method::GET, &path, None).await?;
        Ok((out.files.iter().map(convert_change).collect(), res))
    }

    async fn compare_changes(
        &self,
        repo: &str,
        source: &str,
        target: &str,
        _opts: &ListOptions,
    ) -> ApiResult<Vec<Change>> {
        let path = format!(
            "api/v5/repos/{}/compare/{}...{}",
            encode_repo(repo),
            source,
            target
        );
        let (out, res): (GiteeCompare, _) =
            execute_json(&*self.transport, Method::GET, &path, None).await?;
        Ok((out.files.iter().map(convert_change).collect(), res))
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct GiteeBranch {
    name: String,
    commit: GiteeBranchCommit,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct GiteeBranchCommit {
    sha: String,
}

#[derive(Debug, Serialize)]
struct GiteeCreateBranch {
    branch_name: String,
    refs: String,
}

/// Wire shape of a commit, shared with the pull request commit listing.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(super) struct GiteeCommit {
    sha: String,
    html_url: String,
    commit: GiteeCommitDetail,
    files: Vec<GiteeChange>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct GiteeCommitDetail {
    author: GiteeCommitSignature,
    // the live API misspells this key
    #[serde(alias = "commiter")]
    committer: GiteeCommitSignature,
    message: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct GiteeCommitSignature {
    name: String,
    email: String,
    date: Option<DateTime<Utc>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct GiteeCompare {
    files: Vec<GiteeChange>,
}

pub(super) fn convert_commit(from: &GiteeCommit) -> Commit {
    Commit {
        sha: from.sha.clone(),
        message: from.commit.message.clone(),
        link: from.html_url.clone(),
        author: convert_signature(&from.commit.author),
        committer: convert_signature(&from.commit.committer),
    }
}

fn convert_signature(from: &GiteeCommitSignature) -> Signature {
    Signature {
        login: from.name.clone(),
        name: from.name.clone(),
        email: from.email.clone(),
        avatar: String::new(),
        date: from.date,
    }
}

fn convert_branch(from: &GiteeBranch) -> Reference {
    Reference {
        name: trim_ref(&from.name).to_string(),
        path: expand_ref(&from.name, "refs/heads/"),
        sha: from.commit.sha.clone(),
    }
}

fn convert_tag(from: &GiteeBranch) -> Reference {
    Reference {
        name: trim_ref(&from.name).to_string(),
        path: expand_ref(&from.name, "refs/tags/"),
        sha: from.commit.sha.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::FakeTransport;

    const COMMIT_BODY: &str = r#"{
        "sha": "7fd1a60b01f91b314f59955a4e4d4e80d8edf11d",
        "html_url": "https://gitee.com/octocat/hello-world/commit/7fd1a60b",
        "commit": {
            "author": {
                "name": "Monalisa Octocat",
                "email": "support@gitee.com",
                "date": "2011-04-14T16:00:49Z"
            },
            "commiter": {
                "name": "Monalisa Octocat",
                "email": "support@gitee.com",
                "date": "2011-04-14T16:00:49Z"
            },
            "message": "Fix all the bugs"
        },
        "files": [
            {"filename": "README.md", "additions": 1, "deletions": 0, "status": "added"}
        ]
    }"#;

    #[tokio::test]
    async fn test_find_branch() {
        let body = r#"{"name": "master", "commit": {"sha": "7fd1a60b01f91b314f59955a4e4d4e80d8edf11d"}}"#;
        let transport = Arc::new(FakeTransport::returning(body));
        let service = GiteeGitService::new(transport.clone());

        let (branch, _) = service
            .find_branch("octocat/hello-world", "master")
            .await
            .unwrap();

        assert_eq!(
            transport.last_path(),
            "api/v5/repos/octocat%2Fhello-world/branches/master"
        );
        assert_eq!(branch.name, "master");
        assert_eq!(branch.path, "refs/heads/master");
        assert_eq!(branch.sha, "7fd1a60b01f91b314f59955a4e4d4e80d8edf11d");
    }

    #[tokio::test]
    async fn test_find_tag_expands_tag_prefix() {
        let body = r#"{"name": "v1.0.0", "commit": {"sha": "deadbeef"}}"#;
        let transport = Arc::new(FakeTransport::returning(body));
        let service = GiteeGitService::new(transport.clone());

        let (tag, _) = service.find_tag("octocat/hello-world", "v1.0.0").await.unwrap();

        assert_eq!(tag.name, "v1.0.0");
        assert_eq!(tag.path, "refs/tags/v1.0.0");
    }

    #[tokio::test]
    async fn test_find_commit_trims_ref() {
        let transport = Arc::new(FakeTransport::returning(COMMIT_BODY));
        let service = GiteeGitService::new(transport.clone());

        let (commit, _) = service
            .find_commit("octocat/hello-world", "refs/heads/master")
            .await
            .unwrap();

        assert_eq!(
            transport.last_path(),
            "api/v5/repos/octocat%2Fhello-world/commits/master"
        );
        assert_eq!(commit.sha, "7fd1a60b01f91b314f59955a4e4d4e80d8edf11d");
        assert_eq!(commit.message, "Fix all the bugs");
        assert_eq!(commit.author.name, "Monalisa Octocat");
        assert_eq!(commit.committer.email, "support@gitee.com");
        assert!(commit.author.date.is_some());
    }

    #[tokio::test]
    async fn test_list_commits_encodes_filters() {
        let transport = Arc::new(FakeTransport::returning("[]"));
        let service = GiteeGitService::new(transport.clone());
        let opts = CommitListOptions {
            page: 2,
            size: 50,
            ref_: "master".to_string(),
            path: String::new(),
        };

        service.list_commits("octocat/hello-world", &opts).await.unwrap();

        assert_eq!(
            transport.last_path(),
            "api/v5/repos/octocat%2Fhello-world/commits?page=2&per_page=50&sha=master"
        );
    }

    #[tokio::test]
    async fn test_list_changes_takes_commit_files() {
        let transport = Arc::new(FakeTransport::returning(COMMIT_BODY));
        let service = GiteeGitService::new(transport.clone());

        let (changes, _) = service
            .list_changes("octocat/hello-world", "7fd1a60b", &ListOptions::default())
            .await
            .unwrap();

        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].path, "README.md");
        assert!(changes[0].added);
    }

    #[tokio::test]
    async fn test_compare_changes_path() {
        let body = r#"{"files": [{"filename": "src/lib.rs", "additions": 3, "deletions": 2, "status": "modified"}]}"#;
        let transport = Arc::new(FakeTransport::returning(body));
        let service = GiteeGitService::new(transport.clone());

        let (changes, _) = service
            .compare_changes("octocat/hello-world", "master", "develop", &ListOptions::default())
            .await
            .unwrap();

        assert_eq!(
            transport.last_path(),
            "api/v5/repos/octocat%2Fhello-world/compare/master...develop"
        );
        assert_eq!(changes.len(), 1);
    }

    #[tokio::test]
    async fn test_create_branch() {
        let transport = Arc::new(FakeTransport::returning(""));
        let service = GiteeGitService::new(transport.clone());
        let params = CreateBranch {
            name: "feature".to_string(),
            sha: "master".to_string(),
        };

        service.create_branch("octocat/hello-world", &params).await.unwrap();

        assert_eq!(
            transport.last_path(),
            "api/v5/repos/octocat%2Fhello-world/branches"
        );
        assert_eq!(transport.call_count(), 1);
    }
}
