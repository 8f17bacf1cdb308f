//
//  scm-client
//  gitee/content.rs
//

//! Repository content operations for Gitee.
//!
//! File bodies travel base64-encoded in both directions. Reads accept padded
//! and unpadded encodings; writes always send standard padded base64.
//! Directory listings come from the git tree endpoint, with the entry kind
//! derived from the git file mode.

use std::sync::Arc;

use async_trait::async_trait;
use base64::engine::general_purpose::{STANDARD, STANDARD_NO_PAD};
use base64::Engine;
use reqwest::Method;
use serde::{Deserialize, Serialize};

use crate::client::{execute_empty, execute_json, Transport};
use crate::common::encode::{encode_list_options, encode_path, encode_repo};
use crate::common::{
    ApiError, ApiResult, Content, ContentInfo, ContentKind, ContentParams, ContentService,
    ListOptions, Response,
};

/// Gitee implementation of [`ContentService`].
pub struct GiteeContentService {
    transport: Arc<dyn Transport>,
}

impl GiteeContentService {
    pub(crate) fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }
}

#[async_trait]
impl ContentService for GiteeContentService {
    async fn find(&self, repo: &str, path: &str, ref_: &str) -> ApiResult<Content> {
        let endpoint = format!(
            "api/v5/repos/{}/contents/{}?ref={}",
            encode_repo(repo),
            encode_path(path),
            ref_
        );
        let (out, res): (GiteeContent, _) =
            execute_json(&*self.transport, Method::GET, &endpoint, None).await?;
        let data = decode_content(&out.content)?;
        Ok((
            Content {
                path: out.path,
                data,
                sha: out.sha.clone(),
                blob_id: out.sha,
            },
            res,
        ))
    }

    async fn create(
        &self,
        repo: &str,
        path: &str,
        params: &ContentParams,
    ) -> Result<Response, ApiError> {
        let endpoint = format!(
            "api/v5/repos/{}/contents/{}",
            encode_repo(repo),
            encode_path(path)
        );
        let body = serde_json::to_value(GiteeContentWrite::from_params(params, true))?;
        execute_empty(&*self.transport, Method::POST, &endpoint, Some(body)).await
    }

    async fn update(
        &self,
        repo: &str,
        path: &str,
        params: &ContentParams,
    ) -> Result<Response, ApiError> {
        let endpoint = format!(
            "api/v5/repos/{}/contents/{}",
            encode_repo(repo),
            encode_path(path)
        );
        let body = serde_json::to_value(GiteeContentWrite::from_params(params, true))?;
        execute_empty(&*self.transport, Method::PUT, &endpoint, Some(body)).await
    }

    async fn delete(
        &self,
        repo: &str,
        path: &str,
        params: &ContentParams,
    ) -> Result<Response, ApiError> {
        let endpoint = format!(
            "api/v5/repos/{}/contents/{}",
            encode_repo(repo),
            encode_path(path)
        );
        let body = serde_json::to_value(GiteeContentWrite::from_params(params, false))?;
        execute_empty(&*self.transport, Method::DELETE, &endpoint, Some(body)).await
    }

    async fn list(
        &self,
        repo: &str,
        _path: &str,
        ref_: &str,
        opts: &ListOptions,
    ) -> ApiResult<Vec<ContentInfo>> {
        // the tree endpoint is keyed by ref only; entries carry full paths
        let endpoint = format!(
            "api/v5/repos/{}/git/trees/{}?{}",
            encode_repo(repo),
            ref_,
            encode_list_options(opts)
        );
        let (out, res): (Vec<GiteeObject>, _) =
            execute_json(&*self.transport, Method::GET, &endpoint, None).await?;
        Ok((out.iter().map(convert_content_info).collect(), res))
    }
}

/// Decodes a base64 file body, accepting both padded and unpadded forms.
fn decode_content(encoded: &str) -> Result<Vec<u8>, ApiError> {
    STANDARD
        .decode(encoded)
        .or_else(|_| STANDARD_NO_PAD.decode(encoded))
        .map_err(|err| ApiError::Conversion(format!("invalid base64 content: {err}")))
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct GiteeContent {
    path: String,
    content: String,
    sha: String,
}

#[derive(Debug, Serialize)]
struct GiteeContentWrite {
    content: String,
    message: String,
    branch: String,
    #[serde(rename = "committer[name]")]
    committer_name: String,
    #[serde(rename = "committer[email]")]
    committer_email: String,
    #[serde(rename = "author[name]")]
    author_name: String,
    #[serde(rename = "author[email]")]
    author_email: String,
}

impl GiteeContentWrite {
    fn from_params(params: &ContentParams, with_data: bool) -> Self {
        Self {
            content: if with_data {
                STANDARD.encode(&params.data)
            } else {
                String::new()
            },
            message: params.message.clone(),
            branch: params.branch.clone(),
            committer_name: params.signature.name.clone(),
            committer_email: params.signature.email.clone(),
            author_name: params.signature.name.clone(),
            author_email: params.signature.email.clone(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct GiteeObject {
    path: String,
    mode: String,
}

fn convert_content_info(from: &GiteeObject) -> ContentInfo {
    let mode = i64::from_str_radix(&from.mode, 8).unwrap_or(0);
    let kind = match mode {
        0o100644 | 0o100664 | 0o100755 => ContentKind::File,
        0o040000 => ContentKind::Directory,
        0o120000 => ContentKind::Symlink,
        0o160000 => ContentKind::Gitlink,
        _ => ContentKind::Unsupported,
    };
    ContentInfo {
        path: from.path.clone(),
        kind,
    }
}
