//
//  scm-client
//  bitbucket/repo.rs
//

//! Repository operations for Bitbucket Cloud.
//!
//! Only [`RepositoryService::find`] and [`RepositoryService::find_perms`]
//! are live. Bitbucket identifies repositories by UUID and reports the
//! authenticated user's access level as a single permission string, which
//! expands to the monotonic pull/push/admin flags.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Method;
use serde::Deserialize;

use crate::client::{execute_json, Transport};
use crate::common::encode::split_repo;
use crate::common::{
    ApiError, ApiResult, Hook, HookInput, ListOptions, Perm, Repository, Response,
    RepositoryService, State, Status, StatusInput, Visibility,
};

/// Bitbucket implementation of [`RepositoryService`].
pub struct BitbucketRepositoryService {
    transport: Arc<dyn Transport>,
}

impl BitbucketRepositoryService {
    pub(crate) fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }
}

#[async_trait]
impl RepositoryService for BitbucketRepositoryService {
    async fn find(&self, repo: &str) -> ApiResult<Repository> {
        let path = format!("2.0/repositories/{repo}");
        let (out, res): (BitbucketRepo, _) =
            execute_json(&*self.transport, Method::GET, &path, None).await?;
        Ok((convert_repository(&out), res))
    }

    async fn find_hook(&self, _repo: &str, _id: &str) -> ApiResult<Hook> {
        Err(ApiError::NotSupported)
    }

    async fn find_perms(&self, repo: &str) -> ApiResult<Perm> {
        let path = format!("2.0/user/permissions/repositories?q=repository.full_name=\"{repo}\"");
        let (out, res): (BitbucketPerms, _) =
            execute_json(&*self.transport, Method::GET, &path, None).await?;
        Ok((convert_perms(&out), res))
    }

    async fn list(&self, _opts: &ListOptions) -> ApiResult<Vec<Repository>> {
        Err(ApiError::NotSupported)
    }

    async fn list_hooks(&self, _repo: &str, _opts: &ListOptions) -> ApiResult<Vec<Hook>> {
        Err(ApiError::NotSupported)
    }

    async fn list_status(
        &self,
        _repo: &str,
        _ref: &str,
        _opts: &ListOptions,
    ) -> ApiResult<Vec<Status>> {
        Err(ApiError::NotSupported)
    }

    async fn create_hook(&self, _repo: &str, _input: &HookInput) -> ApiResult<Hook> {
        Err(ApiError::NotSupported)
    }

    async fn create_status(
        &self,
        _repo: &str,
        _ref: &str,
        _input: &StatusInput,
    ) -> ApiResult<Status> {
        Err(ApiError::NotSupported)
    }

    async fn update_hook(&self, _repo: &str, _id: &str, _input: &HookInput) -> ApiResult<Hook> {
        Err(ApiError::NotSupported)
    }

    async fn delete_hook(&self, _repo: &str, _id: &str) -> Result<Response, ApiError> {
        Err(ApiError::NotSupported)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct BitbucketRepo {
    uuid: String,
    full_name: String,
    is_private: bool,
    created_on: Option<DateTime<Utc>>,
    updated_on: Option<DateTime<Utc>>,
    mainbranch: BitbucketBranch,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct BitbucketBranch {
    name: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct BitbucketPerms {
    values: Vec<BitbucketPermEntry>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct BitbucketPermEntry {
    permission: String,
}

fn convert_repository(from: &BitbucketRepo) -> Repository {
    let (namespace, name) = split_repo(&from.full_name);
    Repository {
        id: from.uuid.clone(),
        namespace: namespace.to_string(),
        name: name.to_string(),
        branch: from.mainbranch.name.clone(),
        private: from.is_private,
        visibility: if from.is_private {
            Visibility::Private
        } else {
            Visibility::Public
        },
        clone: format!("https://bitbucket.org/{}.git", from.full_name),
        clone_ssh: format!("git@bitbucket.org:{}.git", from.full_name),
        link: format!("https://bitbucket.org/{}", from.full_name),
        perm: None,
        created: from.created_on,
        updated: from.updated_on,
    }
}

/// Expands Bitbucket's single permission string into the monotonic flags.
///
/// Anything other than exactly one matching entry yields an empty
/// permission set.
fn convert_perms(from: &BitbucketPerms) -> Perm {
    if from.values.len() != 1 {
        return Perm::default();
    }
    match from.values[0].permission.as_str() {
        "admin" => Perm {
            pull: true,
            push: true,
            admin: true,
        },
        "write" => Perm {
            pull: true,
            push: true,
            admin: false,
        },
        _ => Perm {
            pull: true,
            push: false,
            admin: false,
        },
    }
}

/// Maps a Bitbucket build-status string onto the normalized [`State`].
pub fn convert_state(from: &str) -> State {
    match from {
        "error" => State::Error,
        "failure" => State::Failure,
        "pending" => State::Pending,
        "success" => State::Success,
        _ => State::Unknown,
    }
}

/// Maps a normalized [`State`] onto the Bitbucket build-status string.
///
/// Lossy in the write direction: unreportable states collapse to `error`.
pub fn convert_from_state(from: State) -> &'static str {
    match from {
        State::Pending | State::Running => "pending",
        State::Success => "success",
        State::Failure => "failure",
        _ => "error",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::FakeTransport;

    const REPO_BODY: &str = r#"{
        "uuid": "{7dd600e6-0d9c-4801-b967-cb4cc17359ff}",
        "scm": "git",
        "full_name": "atlassian/stash-example-plugin",
        "is_private": true,
        "created_on": "2011-12-14T03:10:42.000Z",
        "updated_on": "2016-05-20T22:11:34.000Z",
        "mainbranch": {"type": "branch", "name": "master"}
    }"#;

    #[tokio::test]
    async fn test_find() {
        let transport = Arc::new(FakeTransport::returning(REPO_BODY));
        let service = BitbucketRepositoryService::new(transport.clone());

        let (repo, _) = service.find("atlassian/stash-example-plugin").await.unwrap();

        assert_eq!(
            transport.last_path(),
            "2.0/repositories/atlassian/stash-example-plugin"
        );
        assert_eq!(repo.id, "{7dd600e6-0d9c-4801-b967-cb4cc17359ff}");
        assert_eq!(repo.namespace, "atlassian");
        assert_eq!(repo.name, "stash-example-plugin");
        assert_eq!(repo.branch, "master");
        assert!(repo.private);
        assert_eq!(
            repo.link,
            "https://bitbucket.org/atlassian/stash-example-plugin"
        );
        assert_eq!(
            repo.clone,
            "https://bitbucket.org/atlassian/stash-example-plugin.git"
        );
        assert_eq!(
            repo.clone_ssh,
            "git@bitbucket.org:atlassian/stash-example-plugin.git"
        );
        assert!(repo.created.is_some());
    }

    #[tokio::test]
    async fn test_find_perms_query() {
        let body = r#"{"values": [{"permission": "write"}]}"#;
        let transport = Arc::new(FakeTransport::returning(body));
        let service = BitbucketRepositoryService::new(transport.clone());

        let (perm, _) = service
            .find_perms("atlassian/stash-example-plugin")
            .await
            .unwrap();

        assert_eq!(
            transport.last_path(),
            "2.0/user/permissions/repositories?q=repository.full_name=\"atlassian/stash-example-plugin\""
        );
        assert!(perm.pull);
        assert!(perm.push);
        assert!(!perm.admin);
    }

    #[tokio::test]
    async fn test_unsupported_operations_make_no_calls() {
        let transport = Arc::new(FakeTransport::returning("{}"));
        let service = BitbucketRepositoryService::new(transport.clone());
        let repo = "atlassian/stash-example-plugin";

        assert!(matches!(
            service.find_hook(repo, "1").await.unwrap_err(),
            ApiError::NotSupported
        ));
        assert!(matches!(
            service.list(&ListOptions::default()).await.unwrap_err(),
            ApiError::NotSupported
        ));
        assert!(matches!(
            service
                .list_hooks(repo, &ListOptions::default())
                .await
                .unwrap_err(),
            ApiError::NotSupported
        ));
        assert!(matches!(
            service
                .list_status(repo, "master", &ListOptions::default())
                .await
                .unwrap_err(),
            ApiError::NotSupported
        ));
        assert!(matches!(
            service
                .create_hook(repo, &HookInput::default())
                .await
                .unwrap_err(),
            ApiError::NotSupported
        ));
        assert!(matches!(
            service
                .create_status(repo, "master", &StatusInput::default())
                .await
                .unwrap_err(),
            ApiError::NotSupported
        ));
        assert!(matches!(
            service
                .update_hook(repo, "1", &HookInput::default())
                .await
                .unwrap_err(),
            ApiError::NotSupported
        ));
        assert!(matches!(
            service.delete_hook(repo, "1").await.unwrap_err(),
            ApiError::NotSupported
        ));

        assert_eq!(transport.call_count(), 0);
    }

    #[test]
    fn test_convert_perms_shapes() {
        let admin = BitbucketPerms {
            values: vec![BitbucketPermEntry {
                permission: "admin".to_string(),
            }],
        };
        assert_eq!(
            convert_perms(&admin),
            Perm {
                pull: true,
                push: true,
                admin: true
            }
        );

        let read = BitbucketPerms {
            values: vec![BitbucketPermEntry {
                permission: "read".to_string(),
            }],
        };
        assert_eq!(
            convert_perms(&read),
            Perm {
                pull: true,
                push: false,
                admin: false
            }
        );

        // zero or multiple entries yield no access
        assert_eq!(convert_perms(&BitbucketPerms::default()), Perm::default());
        let many = BitbucketPerms {
            values: vec![BitbucketPermEntry::default(), BitbucketPermEntry::default()],
        };
        assert_eq!(convert_perms(&many), Perm::default());
    }

    #[test]
    fn test_state_read_table() {
        assert_eq!(convert_state("error"), State::Error);
        assert_eq!(convert_state("failure"), State::Failure);
        assert_eq!(convert_state("pending"), State::Pending);
        assert_eq!(convert_state("success"), State::Success);
        assert_eq!(convert_state("running"), State::Unknown);
    }

    #[test]
    fn test_state_write_table() {
        assert_eq!(convert_from_state(State::Pending), "pending");
        assert_eq!(convert_from_state(State::Running), "pending");
        assert_eq!(convert_from_state(State::Success), "success");
        assert_eq!(convert_from_state(State::Failure), "failure");
        assert_eq!(convert_from_state(State::Error), "error");
        assert_eq!(convert_from_state(State::Canceled), "error");
        assert_eq!(convert_from_state(State::Unknown), "error");
    }
}
