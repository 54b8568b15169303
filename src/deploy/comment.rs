use crate::deploy::context::DeployDetails;

/// HTML marker that states that a comment was made by this integration.
/// Every rendered comment contains it exactly once.
pub const DEPLOY_COMMENT_MARKER: &str = "<!-- netlify-pr-deploy-info -->";

const NOT_AVAILABLE: &str = "N/A";

/// A comment that can be posted to a pull request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    text: String,
}

impl Comment {
    pub fn new(text: String) -> Self {
        Self {
            text: strip_marker(&text),
        }
    }

    pub fn render(&self) -> String {
        format!("{DEPLOY_COMMENT_MARKER}\n{}", self.text)
    }
}

/// Returns true if the comment body was written by this integration.
pub fn is_deploy_comment(body: &str) -> bool {
    body.contains(DEPLOY_COMMENT_MARKER)
}

// Substituted values must not smuggle in another copy of the marker. Removing one copy can
// join its surroundings into a new one, so repeat until none is left.
fn strip_marker(value: &str) -> String {
    let mut value = value.to_string();
    while value.contains(DEPLOY_COMMENT_MARKER) {
        value = value.replace(DEPLOY_COMMENT_MARKER, "");
    }
    value
}

pub fn deploy_preview_comment(details: &DeployDetails) -> Comment {
    let site = &details.site_label;
    let commit = match &details.commit_url {
        Some(url) => format!("[{}]({url})", details.short_commit()),
        None => details.short_commit().to_string(),
    };
    let deploy_log = details.deploy_log_url.as_deref().unwrap_or(NOT_AVAILABLE);
    let (preview, preview_url) = match &details.deploy_url {
        Some(url) => (format!("[{url}]({url})"), url.as_str()),
        None => (NOT_AVAILABLE.to_string(), NOT_AVAILABLE),
    };
    let qr_code = match &details.qr_code_url {
        Some(url) => format!(
            r#"|<span aria-hidden="true">📱</span> Preview on mobile | <details><summary>Toggle QR Code...</summary><br /><br />![QR Code]({url})<br /><br />_Use your smartphone camera to open QR code link._</details> |
"#
        ),
        None => String::new(),
    };

    Comment::new(format!(
        r#"### <span aria-hidden="true">✅</span> Deploy Preview for *{site}* ready!


|  Name | Link |
|:-:|------------------------|
|<span aria-hidden="true">🔨</span> Latest commit | {commit} |
|<span aria-hidden="true">🔍</span> Latest deploy log | {deploy_log} |
|<span aria-hidden="true">😎</span> Deploy Preview | {preview} |
|<span aria-hidden="true">🌳</span> Backend environment | `{backend}` |
{qr_code}---
<!-- [{site} Preview]({preview_url}) -->"#,
        backend = details.backend_env,
    ))
}
