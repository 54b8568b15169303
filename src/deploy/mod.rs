//! Publishing of the deploy preview comment.
//!
//! A run goes through three stages: the trigger gate decides whether the deploy should be
//! commented on at all, the resolver validates the inputs, and the publisher creates or updates
//! the comment. No stage ever fails the process, every problem ends the run with a log message.
use octocrab::models::CommentId;
use tracing::Instrument;

use crate::github::{create_github_client, GithubCommentClient};
use crate::utils::logging::LogError;

pub mod comment;
pub mod context;
mod event;
pub mod gate;
pub mod publish;

pub use context::{resolve_deploy, DeployDetails, ResolveError, ResolvedDeploy};
pub use event::{DeployContext, DeployEvent};
pub use gate::{check_trigger, GateDecision, SkipReason};
pub use publish::{publish_comment, CommentClient, PublishOutcome};

/// Terminal state of a single run.
#[derive(Debug, PartialEq, Eq)]
pub enum RunOutcome {
    /// The deploy does not qualify for a comment.
    Skipped(SkipReason),
    /// Required configuration was missing or malformed.
    Aborted(ResolveError),
    Updated(CommentId),
    Created(CommentId),
    /// The GitHub API could not be reached or rejected a request.
    Failed,
}

impl From<PublishOutcome> for RunOutcome {
    fn from(value: PublishOutcome) -> Self {
        match value {
            PublishOutcome::Updated(id) => RunOutcome::Updated(id),
            PublishOutcome::Created(id) => RunOutcome::Created(id),
        }
    }
}

/// Posts or updates the deploy comment for the given event.
pub async fn run_deploy_notification(event: DeployEvent) -> RunOutcome {
    if let GateDecision::Skip(reason) = check_trigger(&event) {
        tracing::debug!("Skipping deploy comment: {reason:?}");
        return RunOutcome::Skipped(reason);
    }

    let deploy = match resolve_deploy(event) {
        Ok(deploy) => deploy,
        Err(error) => {
            tracing::error!("Cannot publish deploy comment: {error}");
            return RunOutcome::Aborted(error);
        }
    };

    let span = tracing::info_span!(
        "Deploy comment",
        pr = format!("{}#{}", deploy.repository, deploy.pr)
    );
    match publish_deploy(deploy).instrument(span.clone()).await {
        Ok(outcome) => {
            span.in_scope(|| tracing::info!("Deploy comment published: {outcome:?}"));
            outcome.into()
        }
        Err(error) => {
            span.log_error(error.context("Failed to post comment to GitHub"));
            RunOutcome::Failed
        }
    }
}

async fn publish_deploy(deploy: ResolvedDeploy) -> anyhow::Result<PublishOutcome> {
    tracing::debug!("Authenticating with {:?}", deploy.auth);
    let client = create_github_client(deploy.auth, &deploy.api_url)?;
    let client = GithubCommentClient::new(client, deploy.repository);
    let comment = comment::deploy_preview_comment(&deploy.details);
    publish_comment(&client, deploy.pr, &comment).await
}
