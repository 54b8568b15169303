use anyhow::Context;
use async_trait::async_trait;
use octocrab::models::issues::Comment;
use octocrab::models::CommentId;
use octocrab::{FromResponse, Octocrab, Page};
use serde_json::json;

use crate::deploy::publish::{CommentClient, IssueComment};
use crate::github::{GithubRepoName, PullRequestNumber};

/// Maximum page size allowed by the GitHub API.
const COMMENTS_PER_PAGE: u8 = 100;

/// GitHub answered a request with an unsuccessful status code.
///
/// The source contains the error payload returned by GitHub, if it could be parsed.
#[derive(Debug, thiserror::Error)]
#[error("GitHub responded with status {status}")]
pub struct GithubResponseError {
    pub status: u16,
    #[source]
    pub source: octocrab::Error,
}

/// Provides access to the issue comments of a single repository using the GitHub API.
pub struct GithubCommentClient {
    client: Octocrab,
    repo_name: GithubRepoName,
}

impl GithubCommentClient {
    pub fn new(client: Octocrab, repo_name: GithubRepoName) -> Self {
        Self { client, repo_name }
    }

    fn format_pr(&self, pr: PullRequestNumber) -> String {
        format!("{}#{}", self.repo_name, pr)
    }

    fn repo_route(&self) -> String {
        format!(
            "/repos/{}/{}",
            self.repo_name.owner(),
            self.repo_name.name()
        )
    }

    /// Sends a `GET` request to `uri` (a route or an absolute URL) and parses the response.
    async fn get<R: FromResponse>(&self, uri: String) -> anyhow::Result<R> {
        let response = self.client._get(uri).await?;
        let status = response.status().as_u16();
        let response = octocrab::map_github_error(response)
            .await
            .map_err(|source| GithubResponseError { status, source })?;
        Ok(R::from_response(response).await?)
    }

    /// Sends a `POST` request with a JSON body to `route` and parses the response.
    async fn post<R: FromResponse>(
        &self,
        route: String,
        body: &serde_json::Value,
    ) -> anyhow::Result<R> {
        let response = self.client._post(route, Some(body)).await?;
        let status = response.status().as_u16();
        let response = octocrab::map_github_error(response)
            .await
            .map_err(|source| GithubResponseError { status, source })?;
        Ok(R::from_response(response).await?)
    }
}

#[async_trait]
impl CommentClient for GithubCommentClient {
    fn repository(&self) -> &GithubRepoName {
        &self.repo_name
    }

    /// Loads all comments of the pull request, following pagination until the last page.
    async fn list_comments(&self, pr: PullRequestNumber) -> anyhow::Result<Vec<IssueComment>> {
        let route = format!(
            "{}/issues/{pr}/comments?per_page={COMMENTS_PER_PAGE}",
            self.repo_route()
        );
        let mut page: Page<Comment> = self
            .get(route)
            .await
            .with_context(|| format!("Cannot list comments of {}", self.format_pr(pr)))?;

        let mut comments = page.take_items();
        while let Some(next) = page.next.take() {
            page = self
                .get(next.to_string())
                .await
                .with_context(|| format!("Cannot load all comments of {}", self.format_pr(pr)))?;
            comments.append(&mut page.take_items());
        }
        Ok(comments.into_iter().map(github_comment_to_comment).collect())
    }

    async fn update_comment(&self, id: CommentId, body: &str) -> anyhow::Result<()> {
        let route = format!("{}/issues/comments/{id}", self.repo_route());
        let _: Comment = self
            .post(route, &json!({ "body": body }))
            .await
            .with_context(|| format!("Cannot update comment {id} in {}", self.repo_name))?;
        Ok(())
    }

    /// The comment will be posted as the user (or GitHub App) owning the credentials.
    async fn create_comment(&self, pr: PullRequestNumber, body: &str) -> anyhow::Result<CommentId> {
        let route = format!("{}/issues/{pr}/comments", self.repo_route());
        let comment: Comment = self
            .post(route, &json!({ "body": body }))
            .await
            .with_context(|| format!("Cannot post comment to {}", self.format_pr(pr)))?;
        Ok(comment.id)
    }
}

fn github_comment_to_comment(comment: Comment) -> IssueComment {
    IssueComment {
        id: comment.id,
        body: comment.body.unwrap_or_default(),
    }
}
