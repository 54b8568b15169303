use std::fmt::{Display, Formatter};

use crate::github::api::base_github_url;
use crate::github::GithubCredentials;

/// Deploy context in which the site was built.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DeployContext {
    DeployPreview,
    /// Production, branch deploys, manual triggers...
    Other(String),
}

impl DeployContext {
    pub fn parse(value: &str) -> Self {
        match value.trim() {
            "deploy-preview" => Self::DeployPreview,
            other => Self::Other(other.to_string()),
        }
    }
}

impl Display for DeployContext {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            DeployContext::DeployPreview => f.write_str("deploy-preview"),
            DeployContext::Other(context) => f.write_str(context),
        }
    }
}

/// Everything a single run knows about the deploy that triggered it.
/// It is assembled once at process start and never modified afterwards.
#[derive(Debug)]
pub struct DeployEvent {
    pub context: DeployContext,
    pub is_pull_request: bool,
    /// Number of the pull request, as received from the environment.
    pub review_id: Option<String>,
    pub repository_url: Option<String>,
    pub deploy_url: Option<String>,
    pub commit_ref: Option<String>,
    /// Value of the (configurable) backend environment variable.
    pub backend_env_value: Option<String>,
    pub site_name: Option<String>,
    pub site_id: Option<String>,
    pub deploy_id: Option<String>,
    pub credentials: GithubCredentials,
    /// Append a QR code pointing to the deploy preview.
    pub qr_code: bool,
    pub github_api_url: String,
}

impl DeployEvent {
    /// Creates an event for the given context with every optional input missing.
    pub fn new(context: DeployContext, is_pull_request: bool) -> Self {
        Self {
            context,
            is_pull_request,
            review_id: None,
            repository_url: None,
            deploy_url: None,
            commit_ref: None,
            backend_env_value: None,
            site_name: None,
            site_id: None,
            deploy_id: None,
            credentials: GithubCredentials::default(),
            qr_code: false,
            github_api_url: base_github_url().to_string(),
        }
    }

    /// Returns true if the event has everything needed to publish a comment.
    pub fn is_actionable(&self) -> bool {
        self.context == DeployContext::DeployPreview
            && self.is_pull_request
            && self.review_id.is_some()
            && self.repository_url.is_some()
            && (self.credentials.has_token() || self.credentials.has_app_credentials())
    }
}
