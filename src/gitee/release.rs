//
//  scm-client
//  gitee/release.rs
//

//! Release operations for Gitee.
//!
//! Gitee addresses releases by tag name for updates and deletes; the
//! ID-keyed variants ([`ReleaseService::update`], [`ReleaseService::delete`])
//! fail fast with [`ApiError::NotSupported`]. Draft releases do not exist on
//! Gitee, so the converter hard-codes `draft` to false.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Method;
use serde::{Deserialize, Serialize};

use crate::client::{execute_empty, execute_json, Transport};
use crate::common::encode::{encode_list_options, encode_repo};
use crate::common::{
    ApiError, ApiResult, ListOptions, Release, ReleaseInput, ReleaseListOptions, ReleaseService,
    Response,
};

/// Gitee implementation of [`ReleaseService`].
pub struct GiteeReleaseService {
    transport: Arc<dyn Transport>,
}

impl GiteeReleaseService {
    pub(crate) fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }
}

#[async_trait]
impl ReleaseService for GiteeReleaseService {
    async fn find(&self, repo: &str, id: i64) -> ApiResult<Release> {
        let path = format!("api/v5/repos/{}/releases/{}", encode_repo(repo), id);
        let (out, res): (GiteeRelease, _) =
            execute_json(&*self.transport, Method::GET, &path, None).await?;
        Ok((convert_release(&out), res))
    }

    async fn find_by_tag(&self, repo: &str, tag: &str) -> ApiResult<Release> {
        let path = format!("api/v5/repos/{}/releases/tags/{}", encode_repo(repo), tag);
        let (out, res): (GiteeRelease, _) =
            execute_json(&*self.transport, Method::GET, &path, None).await?;
        Ok((convert_release(&out), res))
    }

    async fn list(&self, repo: &str, opts: &ReleaseListOptions) -> ApiResult<Vec<Release>> {
        let page_opts = ListOptions {
            page: opts.page,
            size: opts.size,
        };
        let path = format!(
            "api/v5/repos/{}/releases?{}",
            encode_repo(repo),
            encode_list_options(&page_opts)
        );
        let (out, res): (Vec<GiteeRelease>, _) =
            execute_json(&*self.transport, Method::GET, &path, None).await?;
        Ok((out.iter().map(convert_release).collect(), res))
    }

    async fn create(&self, repo: &str, input: &ReleaseInput) -> ApiResult<Release> {
        let path = format!("api/v5/repos/{}/releases", encode_repo(repo));
        let body = serde_json::to_value(GiteeReleaseInput {
            name: input.title.clone(),
            description: input.description.clone(),
            tag_name: input.tag.clone(),
        })?;
        let (out, res): (GiteeRelease, _) =
            execute_json(&*self.transport, Method::POST, &path, Some(body)).await?;
        Ok((convert_release(&out), res))
    }

    async fn update(&self, _repo: &str, _id: i64, _input: &ReleaseInput) -> ApiResult<Release> {
        // releases are addressable by tag only
        Err(ApiError::NotSupported)
    }

    async fn update_by_tag(
        &self,
        repo: &str,
        tag: &str,
        input: &ReleaseInput,
    ) -> ApiResult<Release> {
        let path = format!("api/v5/repos/{}/releases/{}", encode_repo(repo), tag);
        let body = serde_json::to_value(GiteeReleaseInput {
            name: input.title.clone(),
            description: input.description.clone(),
            tag_name: input.tag.clone(),
        })?;
        let (out, res): (GiteeRelease, _) =
            execute_json(&*self.transport, Method::PUT, &path, Some(body)).await?;
        Ok((convert_release(&out), res))
    }

    async fn delete(&self, _repo: &str, _id: i64) -> Result<Response, ApiError> {
        Err(ApiError::NotSupported)
    }

    async fn delete_by_tag(&self, repo: &str, tag: &str) -> Result<Response, ApiError> {
        let path = format!("api/v5/repos/{}/releases/{}", encode_repo(repo), tag);
        execute_empty(&*self.transport, Method::DELETE, &path, None).await
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct GiteeRelease {
    id: i64,
    name: String,
    description: String,
    tag_name: String,
    assets: Vec<GiteeReleaseAsset>,
    target_commitish: String,
    prerelease: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct GiteeReleaseAsset {
    browser_download_url: String,
}

#[derive(Debug, Serialize)]
struct GiteeReleaseInput {
    name: String,
    description: String,
    tag_name: String,
}

fn convert_release(from: &GiteeRelease) -> Release {
    Release {
        id: from.id,
        title: from.name.clone(),
        description: from.description.clone(),
        link: from
            .assets
            .first()
            .map(|a| a.browser_download_url.clone())
            .unwrap_or_default(),
        tag: from.tag_name.clone(),
        commitish: from.target_commitish.clone(),
        // no draft releases on gitee
        draft: false,
        prerelease: from.prerelease,
    }
}
