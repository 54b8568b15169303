use async_trait::async_trait;
use octocrab::models::CommentId;

use crate::deploy::comment::{is_deploy_comment, Comment};
use crate::github::{GithubRepoName, PullRequestNumber};

/// A comment attached to an issue or a pull request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueComment {
    pub id: CommentId,
    pub body: String,
}

/// Provides access to the comments of pull requests of a single repository.
#[async_trait]
pub trait CommentClient {
    fn repository(&self) -> &GithubRepoName;

    /// Return all comments of the pull request, in the order in which they were created.
    async fn list_comments(&self, pr: PullRequestNumber) -> anyhow::Result<Vec<IssueComment>>;

    /// Replace the body of an existing comment.
    async fn update_comment(&self, id: CommentId, body: &str) -> anyhow::Result<()>;

    /// Post a new comment to the pull request. Returns the ID of the created comment.
    async fn create_comment(&self, pr: PullRequestNumber, body: &str) -> anyhow::Result<CommentId>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishOutcome {
    Updated(CommentId),
    Created(CommentId),
}

/// Creates the deploy comment on the pull request, or updates it if it already exists.
///
/// The first comment containing the deploy marker is considered to be ours, all other comments
/// are left untouched. Exactly one mutation is performed.
pub async fn publish_comment<Client: CommentClient + ?Sized>(
    client: &Client,
    pr: PullRequestNumber,
    comment: &Comment,
) -> anyhow::Result<PublishOutcome> {
    let comments = client.list_comments(pr).await?;
    let body = comment.render();

    match comments
        .iter()
        .find(|comment| is_deploy_comment(&comment.body))
    {
        Some(existing) => {
            tracing::debug!(
                "Updating deploy comment {} on {}#{pr}",
                existing.id,
                client.repository()
            );
            client.update_comment(existing.id, &body).await?;
            Ok(PublishOutcome::Updated(existing.id))
        }
        None => {
            tracing::debug!("Creating deploy comment on {}#{pr}", client.repository());
            let id = client.create_comment(pr, &body).await?;
            Ok(PublishOutcome::Created(id))
        }
    }
}
