//
//  scm-client
//  gitee/user.rs
//

//! Account operations for Gitee. Only the authenticated user is reachable;
//! lookup by login fails fast with [`ApiError::NotSupported`].

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Method;
use serde::Deserialize;

use crate::client::{execute_json, Transport};
use crate::common::{ApiError, ApiResult, User, UserService};

/// Gitee implementation of [`UserService`].
pub struct GiteeUserService {
    transport: Arc<dyn Transport>,
}

impl GiteeUserService {
    pub(crate) fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }
}

#[async_trait]
impl UserService for GiteeUserService {
    async fn find(&self) -> ApiResult<User> {
        let (out, res): (GiteeUser, _) =
            execute_json(&*self.transport, Method::GET, "api/v5/user", None).await?;
        Ok((convert_user(&out), res))
    }

    async fn find_login(&self, _login: &str) -> ApiResult<User> {
        Err(ApiError::NotSupported)
    }

    async fn find_email(&self) -> ApiResult<String> {
        let (user, res) = self.find().await?;
        Ok((user.email, res))
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct GiteeUser {
    login: String,
    name: String,
    email: String,
    avatar_url: String,
}

fn convert_user(from: &GiteeUser) -> User {
    User {
        login: from.login.clone(),
        name: from.name.clone(),
        email: from.email.clone(),
        avatar: from.avatar_url.clone(),
    }
}
