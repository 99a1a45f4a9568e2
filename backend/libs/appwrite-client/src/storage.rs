//! Storage URL helpers
//!
//! Post images are stored as public "view" URLs of the form
//! `{endpoint}/storage/buckets/{bucket}/files/{file_id}/view?project={project}&mode=admin`.

use once_cell::sync::Lazy;
use regex::Regex;

static FILE_ID_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"files/([a-zA-Z0-9]+)/view").expect("valid file id pattern"));

/// Build the view URL for a stored file
pub fn file_view_url(endpoint: &str, project_id: &str, bucket_id: &str, file_id: &str) -> String {
    format!(
        "{}/storage/buckets/{}/files/{}/view?project={}&mode=admin",
        endpoint.trim_end_matches('/'),
        bucket_id,
        file_id,
        project_id
    )
}

/// Turn a view URL into its download counterpart
pub fn download_url_from_view(view_url: &str) -> String {
    let replaced = view_url.replacen("/view", "/download", 1);
    match replaced.split_once("&mode=admin") {
        Some((head, _)) => head.to_string(),
        None => replaced,
    }
}

/// Extract the file id from a view URL, `None` when the URL has another shape
pub fn file_id_from_view_url(url: &str) -> Option<&str> {
    FILE_ID_PATTERN
        .captures(url)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}
