use std::ffi::OsString;

use clap::error::ErrorKind;
use clap::Parser;
use octocrab::models::{AppId, InstallationId};
use secrecy::{SecretString, SecretVec};

use crate::deploy::{DeployContext, DeployEvent};
use crate::github::api::base_github_url;
use crate::github::GithubCredentials;
use crate::utils::text::non_empty;

/// Name of the variable holding the backend environment label, unless configured otherwise.
pub const DEFAULT_BACKEND_ENV_VAR: &str = "VITE_GATEWAY_API_URL";

/// Options of a single run, read from the command line or (usually) from the environment of the
/// deploy.
///
/// Every input is optional. Missing values end the run with a log message instead of a usage
/// error.
#[derive(clap::Parser, Debug)]
#[command(version, about = "Posts deploy preview details to the pull request")]
pub struct DeployOpts {
    /// Deploy context. Only `deploy-preview` deploys are commented on.
    #[arg(long, env = "CONTEXT")]
    pub context: Option<String>,

    /// `true` if the deploy was triggered by a pull request.
    #[arg(long, env = "PULL_REQUEST")]
    pub pull_request: Option<String>,

    /// Number of the pull request.
    #[arg(long, env = "REVIEW_ID")]
    pub review_id: Option<String>,

    /// URL of the GitHub repository (HTTPS or SSH).
    #[arg(long, env = "REPOSITORY_URL")]
    pub repository_url: Option<String>,

    /// URL of the deploy preview.
    #[arg(long, env = "DEPLOY_PRIME_URL")]
    pub deploy_url: Option<String>,

    /// Commit that was deployed.
    #[arg(long, env = "COMMIT_REF")]
    pub commit_ref: Option<String>,

    /// Name of the environment variable that describes the backend used by the preview.
    #[arg(long, env = "BACKEND_ENV_VAR_NAME", default_value = DEFAULT_BACKEND_ENV_VAR)]
    pub backend_env_var: String,

    #[arg(long, env = "DEPLOY_ID")]
    pub deploy_id: Option<String>,

    #[arg(long, env = "SITE_ID")]
    pub site_id: Option<String>,

    #[arg(long, env = "SITE_NAME")]
    pub site_name: Option<String>,

    /// Personal access token used to post the comment.
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub github_token: Option<String>,

    /// Github App ID.
    #[arg(long, env = "GITHUB_APP_ID")]
    pub app_id: Option<String>,

    /// Private key used to authenticate as a Github App.
    #[arg(
        long,
        env = "GITHUB_APP_PRIVATE_KEY",
        hide_env_values = true,
        allow_hyphen_values = true
    )]
    pub private_key: Option<String>,

    /// Installation of the Github App that has access to the repository.
    #[arg(long, env = "GITHUB_APP_INSTALLATION_ID")]
    pub installation_id: Option<String>,

    /// Add a QR code linking to the deploy preview. `0`, `false`, `no`, `off` and an empty value
    /// disable it.
    #[arg(
        long,
        env = "DEPLOY_COMMENT_QR_CODE",
        action = clap::ArgAction::SetTrue,
        value_parser = clap::builder::FalseyValueParser::new()
    )]
    pub qr_code: bool,

    /// Base URL of the GitHub REST API.
    #[arg(long, env = "GITHUB_API_URL", default_value = base_github_url())]
    pub github_api_url: String,
}

/// Parses the options from `args` and the environment.
///
/// Help and version requests print their output and exit. Any other parse error is logged and
/// `None` is returned, the process still exits successfully.
pub fn read_opts<I, T>(args: I) -> Option<DeployOpts>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    match DeployOpts::try_parse_from(args) {
        Ok(opts) => Some(opts),
        Err(error) if matches!(error.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            error.exit()
        }
        Err(error) => {
            tracing::error!("Cannot read deploy options: {error}");
            None
        }
    }
}

impl DeployOpts {
    /// Builds the deploy event. `lookup` resolves the value of the configurable backend
    /// environment variable.
    pub fn into_event(self, lookup: impl Fn(&str) -> Option<String>) -> DeployEvent {
        let backend_env_value = non_empty(lookup(self.backend_env_var.trim()));
        let credentials = GithubCredentials {
            token: non_empty(self.github_token).map(SecretString::new),
            app_id: parse_id("GITHUB_APP_ID", self.app_id).map(AppId),
            private_key: non_empty(self.private_key)
                .map(|key| SecretVec::new(normalize_private_key(&key).into_bytes())),
            installation_id: parse_id("GITHUB_APP_INSTALLATION_ID", self.installation_id)
                .map(InstallationId),
        };

        DeployEvent {
            context: DeployContext::parse(self.context.as_deref().unwrap_or_default()),
            is_pull_request: self.pull_request.as_deref().map(str::trim) == Some("true"),
            review_id: non_empty(self.review_id),
            repository_url: non_empty(self.repository_url),
            deploy_url: non_empty(self.deploy_url),
            commit_ref: non_empty(self.commit_ref),
            backend_env_value,
            site_name: non_empty(self.site_name),
            site_id: non_empty(self.site_id),
            deploy_id: non_empty(self.deploy_id),
            credentials,
            qr_code: self.qr_code,
            github_api_url: self.github_api_url,
        }
    }
}

/// Numeric IDs that do not parse are ignored, so that the remaining credentials can still be used.
fn parse_id(name: &str, value: Option<String>) -> Option<u64> {
    let value = non_empty(value)?;
    match value.trim().parse::<u64>() {
        Ok(id) => Some(id),
        Err(error) => {
            tracing::warn!("Ignoring {name} `{value}`: {error}");
            None
        }
    }
}

/// Private keys stored in single-line environment variables often have escaped newlines.
fn normalize_private_key(key: &str) -> String {
    key.trim().replace("\\n", "\n")
}
