//! Contains definitions of common types (repository name, pull request number, commit)
//! needed for working with GitHub repositories.
use std::fmt::{Debug, Display, Formatter};
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;

pub mod api;

pub use api::client::GithubCommentClient;
pub use api::{create_github_client, GithubAuth, GithubCredentials};

/// Matches `github.com[:/]owner/name[.git]` at the end of a repository URL.
/// Covers both `https://github.com/owner/name` and `git@github.com:owner/name.git`.
/// The host has to start at the beginning, after a `/` or after a `@`.
static REPOSITORY_URL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|[/@])github\.com[:/]([^/]+)/(.+?)(?:\.git)?/?$")
        .expect("invalid repository regex")
});

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("Could not parse repository URL `{0}`")]
pub struct RepoUrlError(pub String);

/// Unique identifier of a GitHub repository
#[derive(Debug, PartialEq, Eq, Hash, Clone)]
pub struct GithubRepoName {
    owner: String,
    name: String,
}

impl GithubRepoName {
    pub fn new(owner: &str, name: &str) -> Self {
        Self {
            owner: owner.to_string(),
            name: name.to_string(),
        }
    }

    /// Extracts the owner and name from a repository URL.
    /// A trailing `.git` is stripped from the name.
    pub fn from_repository_url(url: &str) -> Result<Self, RepoUrlError> {
        let captures = REPOSITORY_URL_PATTERN
            .captures(url.trim())
            .ok_or_else(|| RepoUrlError(url.to_string()))?;
        let owner = &captures[1];
        let name = &captures[2];
        // Deeper paths (`/owner/name/tree/main`) do not identify a repository.
        if name.contains('/') {
            return Err(RepoUrlError(url.to_string()));
        }
        Ok(Self::new(owner, name))
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// URL of the page of the given commit on github.com.
    pub fn commit_url(&self, sha: &CommitSha) -> String {
        format!("https://github.com/{}/{}/commit/{}", self.owner, self.name, sha)
    }
}

impl Display for GithubRepoName {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!("{}/{}", self.owner, self.name))
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommitSha(pub String);

impl CommitSha {
    /// Abbreviated form of the SHA, as shown in the GitHub UI.
    pub fn short(&self) -> &str {
        crate::utils::text::prefix(&self.0, 7)
    }
}

impl From<String> for CommitSha {
    fn from(value: String) -> Self {
        Self(value)
    }
}
impl AsRef<str> for CommitSha {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}
impl Display for CommitSha {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.0, f)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PullRequestNumber(pub u64);

impl From<u64> for PullRequestNumber {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl FromStr for PullRequestNumber {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<u64>().map(Self)
    }
}

impl Display for PullRequestNumber {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        <u64 as Display>::fmt(&self.0, f)
    }
}
