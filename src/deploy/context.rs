use url::Url;

use crate::deploy::event::DeployEvent;
use crate::github::{CommitSha, GithubAuth, GithubRepoName, PullRequestNumber, RepoUrlError};

/// Label used when neither a site name nor a usable deploy URL is available.
pub const DEFAULT_SITE_LABEL: &str = "site";

/// Placeholder for values that were not provided by the deploy environment.
pub const UNKNOWN_VALUE: &str = "unknown";

const DEPLOY_LOG_BASE_URL: &str = "https://app.netlify.com/sites";
const QR_CODE_ENDPOINT: &str = "https://api.qrserver.com/v1/create-qr-code/";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ResolveError {
    #[error("{0} environment variable is not set")]
    MissingVariable(&'static str),
    #[error("REVIEW_ID `{0}` is not a valid pull request number")]
    InvalidReviewId(String),
    #[error(transparent)]
    InvalidRepositoryUrl(#[from] RepoUrlError),
    #[error(
        "No GitHub credentials: set GITHUB_TOKEN, or GITHUB_APP_ID, GITHUB_APP_PRIVATE_KEY and GITHUB_APP_INSTALLATION_ID"
    )]
    MissingCredentials,
}

/// Data shown in the deploy comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployDetails {
    pub site_label: String,
    pub commit: Option<CommitSha>,
    pub commit_url: Option<String>,
    pub deploy_url: Option<String>,
    pub deploy_log_url: Option<String>,
    pub backend_env: String,
    pub qr_code_url: Option<String>,
}

impl DeployDetails {
    pub fn short_commit(&self) -> &str {
        self.commit
            .as_ref()
            .map(|commit| commit.short())
            .unwrap_or(UNKNOWN_VALUE)
    }
}

/// A deploy that passed validation and can be published.
#[derive(Debug)]
pub struct ResolvedDeploy {
    pub repository: GithubRepoName,
    pub pr: PullRequestNumber,
    pub auth: GithubAuth,
    pub api_url: String,
    pub details: DeployDetails,
}

/// Validates the required inputs of the event and derives everything needed for publishing.
pub fn resolve_deploy(event: DeployEvent) -> Result<ResolvedDeploy, ResolveError> {
    let review_id = event
        .review_id
        .ok_or(ResolveError::MissingVariable("REVIEW_ID"))?;
    let pr = match review_id.parse::<PullRequestNumber>() {
        Ok(pr) if pr.0 > 0 => pr,
        _ => return Err(ResolveError::InvalidReviewId(review_id)),
    };

    let repository_url = event
        .repository_url
        .ok_or(ResolveError::MissingVariable("REPOSITORY_URL"))?;
    let repository = GithubRepoName::from_repository_url(&repository_url)?;

    let auth = GithubAuth::select(event.credentials).ok_or(ResolveError::MissingCredentials)?;

    let commit = event.commit_ref.map(CommitSha::from);
    let commit_url = commit.as_ref().map(|sha| repository.commit_url(sha));
    let site_label = event
        .site_name
        .or_else(|| event.deploy_url.as_deref().and_then(site_label_from_url))
        .unwrap_or_else(|| DEFAULT_SITE_LABEL.to_string());
    let deploy_log_url = match (&event.site_id, &event.deploy_id) {
        (Some(site_id), Some(deploy_id)) => Some(build_deploy_log_url(site_id, deploy_id)),
        _ => None,
    };
    let qr_code_url = if event.qr_code {
        event.deploy_url.as_deref().and_then(build_qr_code_url)
    } else {
        None
    };

    Ok(ResolvedDeploy {
        repository,
        pr,
        auth,
        api_url: event.github_api_url,
        details: DeployDetails {
            site_label,
            commit,
            commit_url,
            deploy_url: event.deploy_url,
            deploy_log_url,
            backend_env: event
                .backend_env_value
                .unwrap_or_else(|| UNKNOWN_VALUE.to_string()),
            qr_code_url,
        },
    })
}

/// Derives the site label from the host of the deploy URL, skipping its first label.
/// `https://deploy-preview-1--app.example.com` => `example.com`.
fn site_label_from_url(deploy_url: &str) -> Option<String> {
    let url = Url::parse(deploy_url).ok()?;
    if !matches!(url.scheme(), "http" | "https") {
        return None;
    }
    let labels: Vec<&str> = url.host_str()?.split('.').collect();
    match labels.as_slice() {
        [_, domain, tld, ..] => Some(format!("{domain}.{tld}")),
        _ => None,
    }
}

fn build_deploy_log_url(site_id: &str, deploy_id: &str) -> String {
    format!("{DEPLOY_LOG_BASE_URL}/{site_id}/deploys/{deploy_id}")
}

/// URL of an image with a QR code encoding the deploy URL.
fn build_qr_code_url(deploy_url: &str) -> Option<String> {
    Url::parse_with_params(
        QR_CODE_ENDPOINT,
        &[("size", "150x150"), ("data", deploy_url)],
    )
    .ok()
    .map(String::from)
}
