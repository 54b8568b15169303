use std::fmt::{Debug, Formatter};

use anyhow::Context;
use octocrab::models::{AppId, InstallationId};
use octocrab::Octocrab;
use secrecy::{ExposeSecret, SecretString, SecretVec};

pub mod client;

pub fn base_github_url() -> &'static str {
    "https://api.github.com"
}

/// Credentials read from the environment. Any of them may be missing, [`GithubAuth::select`]
/// decides which authentication mode (if any) can be used.
#[derive(Default)]
pub struct GithubCredentials {
    pub token: Option<SecretString>,
    pub app_id: Option<AppId>,
    pub private_key: Option<SecretVec<u8>>,
    pub installation_id: Option<InstallationId>,
}

impl GithubCredentials {
    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    /// Returns true if all three parts of the GitHub App credentials are present.
    pub fn has_app_credentials(&self) -> bool {
        self.app_id.is_some() && self.private_key.is_some() && self.installation_id.is_some()
    }
}

impl Debug for GithubCredentials {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GithubCredentials")
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("app_id", &self.app_id)
            .field("private_key", &self.private_key.as_ref().map(|_| "<redacted>"))
            .field("installation_id", &self.installation_id)
            .finish()
    }
}

/// How the integration authenticates against the GitHub API during a run.
pub enum GithubAuth {
    /// Personal access token (or any other bearer token).
    Token(SecretString),
    /// GitHub App acting as one of its installations.
    Installation {
        app_id: AppId,
        private_key: SecretVec<u8>,
        installation_id: InstallationId,
    },
}

impl GithubAuth {
    /// Picks the authentication mode. Full app credentials win over a personal token.
    pub fn select(credentials: GithubCredentials) -> Option<Self> {
        match credentials {
            GithubCredentials {
                app_id: Some(app_id),
                private_key: Some(private_key),
                installation_id: Some(installation_id),
                ..
            } => Some(GithubAuth::Installation {
                app_id,
                private_key,
                installation_id,
            }),
            GithubCredentials {
                token: Some(token), ..
            } => Some(GithubAuth::Token(token)),
            _ => None,
        }
    }
}

impl Debug for GithubAuth {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            GithubAuth::Token(_) => f.write_str("Token(<redacted>)"),
            GithubAuth::Installation {
                app_id,
                installation_id,
                ..
            } => write!(
                f,
                "Installation {{ app_id: {app_id}, installation_id: {installation_id} }}"
            ),
        }
    }
}

/// Creates an Octocrab client talking to the API at `base_url`, authenticated with `auth`.
pub fn create_github_client(auth: GithubAuth, base_url: &str) -> anyhow::Result<Octocrab> {
    let builder = Octocrab::builder()
        .base_uri(base_url.trim_end_matches('/'))
        .with_context(|| format!("Invalid GitHub API URL `{base_url}`"))?;

    match auth {
        GithubAuth::Token(token) => builder
            .personal_token(token.expose_secret().to_string())
            .build()
            .context("Could not create octocrab client"),
        GithubAuth::Installation {
            app_id,
            private_key,
            installation_id,
        } => {
            let key = jsonwebtoken::EncodingKey::from_rsa_pem(private_key.expose_secret().as_ref())
                .context("Could not encode private key")?;
            let client = builder
                .app(app_id, key)
                .build()
                .context("Could not create octocrab builder")?;
            // The installation client requests (and caches) an installation access token
            // on its first API call.
            Ok(client.installation(installation_id))
        }
    }
}
