//
//  scm-client
//  common/encode.rs
//

//! Stateless encoding helpers shared by the provider drivers.
//!
//! Pure functions only: repository-identifier percent encoding, list-option
//! to query-string encoding, git ref trimming/expansion, and `namespace/name`
//! splitting. No hidden state, no side effects.

use url::form_urlencoded;

/// Percent-encodes a `namespace/name` repository identifier for use as a
/// single path segment (the `/` becomes `%2F`).
pub fn encode_repo(repo: &str) -> String {
    form_urlencoded::byte_serialize(repo.as_bytes()).collect()
}

/// Percent-encodes a file path for use as a single path segment.
pub fn encode_path(path: &str) -> String {
    form_urlencoded::byte_serialize(path.as_bytes()).collect()
}

/// Splits a combined `namespace/name` identifier on the first separator.
///
/// Returns empty strings for the missing halves when the input has no
/// separator.
///
/// # Example
///
/// ```rust
/// use scm_client::common::encode::split_repo;
///
/// assert_eq!(split_repo("octocat/hello-world"), ("octocat", "hello-world"));
/// ```
pub fn split_repo(repo: &str) -> (&str, &str) {
    match repo.split_once('/') {
        Some((namespace, name)) => (namespace, name),
        None => ("", repo),
    }
}

/// Strips the `refs/heads/` or `refs/tags/` prefix from a fully qualified
/// ref, returning the short name unchanged if no prefix is present.
pub fn trim_ref(ref_: &str) -> &str {
    ref_.trim_start_matches("refs/heads/")
        .trim_start_matches("refs/tags/")
}

/// Prefixes a short ref name with the given prefix unless it is already
/// fully qualified.
pub fn expand_ref(name: &str, prefix: &str) -> String {
    if name.starts_with("refs/") {
        name.to_string()
    } else {
        format!("{prefix}{name}")
    }
}

/// Encodes pagination options into a query string (`page=N&per_page=N`).
///
/// Zero-valued fields are omitted so the provider defaults apply.
pub fn encode_list_options(opts: &crate::common::ListOptions) -> String {
    let mut params = form_urlencoded::Serializer::new(String::new());
    if opts.page > 0 {
        params.append_pair("page", &opts.page.to_string());
    }
    if opts.size > 0 {
        params.append_pair("per_page", &opts.size.to_string());
    }
    params.finish()
}

/// Encodes issue listing options, including the state filter.
///
/// `open`/`closed` collapse to a single `state` value; requesting both or
/// neither yields `all`.
pub fn encode_issue_list_options(opts: &crate::common::IssueListOptions) -> String {
    let mut params = form_urlencoded::Serializer::new(String::new());
    if opts.page > 0 {
        params.append_pair("page", &opts.page.to_string());
    }
    if opts.size > 0 {
        params.append_pair("per_page", &opts.size.to_string());
    }
    let state = match (opts.open, opts.closed) {
        (true, false) => "open",
        (false, true) => "closed",
        _ => "all",
    };
    params.append_pair("state", state);
    params.finish()
}

/// Encodes pull request listing options, including the state filter.
pub fn encode_pr_list_options(opts: &crate::common::PullRequestListOptions) -> String {
    let mut params = form_urlencoded::Serializer::new(String::new());
    if opts.page > 0 {
        params.append_pair("page", &opts.page.to_string());
    }
    if opts.size > 0 {
        params.append_pair("per_page", &opts.size.to_string());
    }
    let state = match (opts.open, opts.closed) {
        (true, false) => "open",
        (false, true) => "closed",
        _ => "all",
    };
    params.append_pair("state", state);
    params.finish()
}

/// Encodes commit listing options (`sha`, `path`, pagination).
pub fn encode_commit_list_options(opts: &crate::common::CommitListOptions) -> String {
    let mut params = form_urlencoded::Serializer::new(String::new());
    if opts.page > 0 {
        params.append_pair("page", &opts.page.to_string());
    }
    if opts.size > 0 {
        params.append_pair("per_page", &opts.size.to_string());
    }
    if !opts.ref_.is_empty() {
        params.append_pair("sha", &opts.ref_);
    }
    if !opts.path.is_empty() {
        params.append_pair("path", &opts.path);
    }
    params.finish()
}
