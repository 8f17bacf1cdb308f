//
//  scm-client
//  lib.rs
//

//! # SCM Client Library
//!
//! A unified client abstraction over multiple source-code-hosting platform
//! REST APIs, exposing a single vendor-neutral interface for repositories,
//! issues, pull requests, commits, contents, releases, users, hooks, and
//! webhook parsing.
//!
//! ## Overview
//!
//! Each supported provider (currently Gitee and Bitbucket Cloud) gets its own
//! driver module that maps the provider's wire shapes, pagination conventions,
//! and event taxonomy onto one normalized domain model. The interesting part
//! of this crate is the translation layer: pure converter functions per
//! provider, and a webhook dispatcher that authenticates and classifies
//! inbound events.
//!
//! ## Module Structure
//!
//! - [`client`]: The [`Transport`](client::Transport) execution primitive and
//!   a `reqwest`-backed implementation
//! - [`common`]: Normalized entities, service traits, errors, and encoding
//!   helpers shared by all drivers
//! - [`gitee`]: Gitee API v5 driver
//! - [`bitbucket`]: Bitbucket Cloud API v2.0 driver
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use scm_client::gitee::GiteeClient;
//! use scm_client::common::RepositoryService;
//!
//! # async fn example() -> Result<(), scm_client::common::ApiError> {
//! let client = GiteeClient::new()?;
//! let (repo, res) = client.repositories().find("octocat/hello-world").await?;
//! println!("{}/{} (HTTP {})", repo.namespace, repo.name, res.status);
//! # Ok(())
//! # }
//! ```
//!
//! ## Design Notes
//!
//! - Every operation is a single synchronous request/response cycle delegated
//!   to the shared transport; services hold no mutable state and are safe for
//!   concurrent reuse.
//! - Operations a provider cannot express return
//!   [`ApiError::NotSupported`](common::ApiError::NotSupported) before any
//!   network call is made.
//! - Nothing is retried internally; retry, backoff, and rate-limit handling
//!   belong to the caller or the injected transport.

/// Transport execution primitive and the default HTTP implementation.
///
/// Defines the [`Transport`](client::Transport) trait every resource service
/// is built on, plus [`HttpTransport`](client::HttpTransport), which performs
/// authenticated HTTP calls against a provider base URL.
pub mod client;

/// Normalized domain model, service contracts, and shared helpers.
///
/// Contains the provider-agnostic entities all converters produce, the
/// uniform per-resource service traits, the library error type, and the
/// pure encoding helpers (repository identifiers, list options, git refs).
pub mod common;

/// Gitee API v5 driver.
///
/// Full driver: repository, issue, pull request, git, content, release,
/// and user services plus the webhook dispatcher.
pub mod gitee;

/// Bitbucket Cloud API v2.0 driver.
///
/// Repository lookup and permissions; hook and commit-status operations are
/// not supported by this driver and fail fast without a network call.
pub mod bitbucket;

pub use client::{Credentials, HttpTransport, RawResponse, Transport};
pub use common::{ApiError, ApiResult, Rate, Response};
