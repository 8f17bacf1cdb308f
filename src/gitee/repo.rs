//
//  scm-client
//  gitee/repo.rs
//

//! Repository, webhook-subscription, and commit-status operations for Gitee.
//!
//! Gitee exposes no commit-status API, so [`RepositoryService::list_status`]
//! and [`RepositoryService::create_status`] fail fast with
//! [`ApiError::NotSupported`]. The state-mapping tables are still defined
//! here ([`convert_state`], [`convert_from_state`]) because webhook payloads
//! and downstream consumers use them.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Method;
use serde::{Deserialize, Serialize};

use crate::client::{execute_empty, execute_json, Transport};
use crate::common::encode::{encode_list_options, encode_repo, split_repo};
use crate::common::{
    ApiError, ApiResult, Hook, HookInput, ListOptions, Perm, Repository, Response, RepositoryService,
    State, Status, StatusInput, Visibility,
};

/// Gitee implementation of [`RepositoryService`].
pub struct GiteeRepositoryService {
    transport: Arc<dyn Transport>,
}

impl GiteeRepositoryService {
    pub(crate) fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }
}

#[async_trait]
impl RepositoryService for GiteeRepositoryService {
    async fn find(&self, repo: &str) -> ApiResult<Repository> {
        let path = format!("api/v5/repos/{}", encode_repo(repo));
        let (out, res): (GiteeRepo, _) =
            execute_json(&*self.transport, Method::GET, &path, None).await?;
        Ok((convert_repository(&out), res))
    }

    async fn find_hook(&self, repo: &str, id: &str) -> ApiResult<Hook> {
        let path = format!("api/v5/repos/{}/hooks/{}", encode_repo(repo), id);
        let (out, res): (GiteeHook, _) =
            execute_json(&*self.transport, Method::GET, &path, None).await?;
        Ok((convert_hook(&out), res))
    }

    async fn find_perms(&self, repo: &str) -> ApiResult<Perm> {
        let (repository, res) = self.find(repo).await?;
        Ok((repository.perm.unwrap_or_default(), res))
    }

    async fn list(&self, opts: &ListOptions) -> ApiResult<Vec<Repository>> {
        let path = format!("api/v5/repos?{}", encode_list_options(opts));
        let (out, res): (Vec<GiteeRepo>, _) =
            execute_json(&*self.transport, Method::GET, &path, None).await?;
        Ok((out.iter().map(convert_repository).collect(), res))
    }

    async fn list_hooks(&self, repo: &str, opts: &ListOptions) -> ApiResult<Vec<Hook>> {
        let path = format!(
            "api/v5/repos/{}/hooks?{}",
            encode_repo(repo),
            encode_list_options(opts)
        );
        let (out, res): (Vec<GiteeHook>, _) =
            execute_json(&*self.transport, Method::GET, &path, None).await?;
        Ok((out.iter().map(convert_hook).collect(), res))
    }

    async fn list_status(
        &self,
        _repo: &str,
        _ref: &str,
        _opts: &ListOptions,
    ) -> ApiResult<Vec<Status>> {
        Err(ApiError::NotSupported)
    }

    async fn create_hook(&self, repo: &str, input: &HookInput) -> ApiResult<Hook> {
        let path = format!("api/v5/repos/{}/hooks", encode_repo(repo));
        let body = serde_json::to_value(GiteeHookCreate::from_input(input))?;
        let (out, res): (GiteeHook, _) =
            execute_json(&*self.transport, Method::POST, &path, Some(body)).await?;
        Ok((convert_hook(&out), res))
    }

    async fn create_status(
        &self,
        _repo: &str,
        _ref: &str,
        _input: &StatusInput,
    ) -> ApiResult<Status> {
        Err(ApiError::NotSupported)
    }

    async fn update_hook(&self, repo: &str, id: &str, input: &HookInput) -> ApiResult<Hook> {
        let path = format!("api/v5/repos/{}/hooks/{}", encode_repo(repo), id);
        let body = serde_json::to_value(GiteeHookCreate::from_input(input))?;
        let (out, res): (GiteeHook, _) =
            execute_json(&*self.transport, Method::PATCH, &path, Some(body)).await?;
        Ok((convert_hook(&out), res))
    }

    async fn delete_hook(&self, repo: &str, id: &str) -> Result<Response, ApiError> {
        let path = format!("api/v5/repos/{}/hooks/{}", encode_repo(repo), id);
        execute_empty(&*self.transport, Method::DELETE, &path, None).await
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct GiteeRepo {
    id: i64,
    path: String,
    path_with_namespace: String,
    default_branch: String,
    private: bool,
    #[serde(rename = "url")]
    web_url: String,
    ssh_url: String,
    html_url: String,
    namespace: GiteeNamespace,
    permission: GiteePermission,
    created_at: Option<DateTime<Utc>>,
    updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct GiteeNamespace {
    path: String,
    full_path: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct GiteePermission {
    pull: bool,
    push: bool,
    admin: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct GiteeHook {
    id: i64,
    url: String,
    password: String,
    push_events: bool,
    tag_push_events: bool,
    issues_events: bool,
    note_events: bool,
    merge_requests_events: bool,
}

/// Wire shape of a hook create/update request.
#[derive(Debug, Default, Serialize)]
struct GiteeHookCreate {
    url: String,
    encryption_type: i32,
    password: String,
    push_events: bool,
    tag_push_events: bool,
    issues_events: bool,
    note_events: bool,
    merge_requests_events: bool,
}

impl GiteeHookCreate {
    fn from_input(input: &HookInput) -> Self {
        let mut create = Self {
            url: input.target.clone(),
            push_events: input.events.push || input.events.branch,
            tag_push_events: input.events.tag,
            issues_events: input.events.issue,
            note_events: input.events.issue_comment || input.events.pull_request_comment,
            merge_requests_events: input.events.pull_request,
            ..Default::default()
        };
        if !input.skip_verify {
            create.encryption_type = 1;
            create.password = input.secret.clone();
        }
        create
    }
}

fn convert_repository(from: &GiteeRepo) -> Repository {
    let mut namespace = if !from.namespace.full_path.is_empty() {
        from.namespace.full_path.clone()
    } else {
        from.namespace.path.clone()
    };
    if namespace.is_empty() {
        let (owner, _) = split_repo(&from.path_with_namespace);
        namespace = owner.to_string();
    }
    Repository {
        id: from.id.to_string(),
        namespace,
        name: from.path.clone(),
        branch: from.default_branch.clone(),
        private: from.private,
        visibility: convert_visibility(from.private),
        clone: from.html_url.clone(),
        clone_ssh: from.ssh_url.clone(),
        link: from.web_url.clone(),
        perm: Some(Perm {
            pull: from.permission.pull,
            push: from.permission.push,
            admin: from.permission.admin,
        }),
        created: from.created_at,
        updated: from.updated_at,
    }
}

fn convert_visibility(private: bool) -> Visibility {
    if private {
        Visibility::Private
    } else {
        Visibility::Public
    }
}

fn convert_hook(from: &GiteeHook) -> Hook {
    Hook {
        id: from.id.to_string(),
        target: from.url.clone(),
        active: true,
        events: convert_hook_events(from),
        skip_verify: from.password.is_empty(),
    }
}

/// Maps Gitee's per-event booleans onto normalized event names.
fn convert_hook_events(from: &GiteeHook) -> Vec<String> {
    let mut events = Vec::new();
    if from.issues_events {
        events.push("issues".to_string());
    }
    if from.tag_push_events {
        events.push("tag".to_string());
    }
    if from.push_events {
        events.push("push".to_string());
    }
    if from.note_events {
        events.push("comment".to_string());
    }
    if from.merge_requests_events {
        events.push("merge".to_string());
    }
    events
}

/// Maps a Gitee commit-status string onto the normalized [`State`].
///
/// Unrecognized strings map to [`State::Unknown`].
pub fn convert_state(from: &str) -> State {
    match from {
        "canceled" => State::Canceled,
        "failed" => State::Failure,
        "pending" => State::Pending,
        "running" => State::Running,
        "success" => State::Success,
        _ => State::Unknown,
    }
}

/// Maps a normalized [`State`] onto the Gitee commit-status string.
///
/// The write direction is lossy: states Gitee cannot express collapse to
/// `failed`. Not the inverse of [`convert_state`].
pub fn convert_from_state(from: State) -> &'static str {
    match from {
        State::Pending => "pending",
        State::Running => "running",
        State::Success => "success",
        State::Canceled => "canceled",
        _ => "failed",
    }
}
