use anyhow::Error;
use tracing::span::Span;

use crate::github::api::client::GithubResponseError;

pub trait LogError {
    fn log_error(&self, error: Error);
}

impl LogError for Span {
    fn log_error(&self, error: Error) {
        self.in_scope(|| {
            tracing::error!("Error: {error:?}");
            if let Some(response) = github_response(&error) {
                tracing::error!(
                    status = response.status,
                    documentation = response.documentation_url.unwrap_or_default(),
                    "GitHub request failed: `{}` {}",
                    response.message,
                    response.errors
                );
            }
        });
    }
}

/// Details of an unsuccessful GitHub response found in the error chain.
#[derive(Debug, Default, PartialEq, Eq)]
pub(crate) struct GithubResponse<'a> {
    pub status: Option<u16>,
    pub message: &'a str,
    /// Error payload returned by GitHub, as pretty-printed JSON.
    pub errors: String,
    pub documentation_url: Option<&'a str>,
}

pub(crate) fn github_response(error: &Error) -> Option<GithubResponse<'_>> {
    let status = error
        .chain()
        .find_map(|cause| cause.downcast_ref::<GithubResponseError>())
        .map(|error| error.status);
    let github_error = error
        .chain()
        .find_map(|cause| match cause.downcast_ref::<octocrab::Error>() {
            Some(octocrab::Error::GitHub { source, .. }) => Some(source),
            _ => None,
        });

    match github_error {
        Some(source) => Some(GithubResponse {
            status,
            message: &source.message,
            errors: source
                .errors
                .as_ref()
                .and_then(|errors| serde_json::to_string_pretty(errors).ok())
                .unwrap_or_default(),
            documentation_url: source.documentation_url.as_deref(),
        }),
        None => status.map(|status| GithubResponse {
            status: Some(status),
            ..Default::default()
        }),
    }
}
