//! This is the library of the deploy preview commenter.
//!
//! A run takes a [`deploy::DeployEvent`] assembled once at process entry, decides whether the
//! deploy qualifies for a pull request comment, and then creates or updates a single comment
//! describing the deploy.
pub mod config;
pub mod deploy;
pub mod github;
pub mod utils;

pub use config::{read_opts, DeployOpts};
pub use deploy::{run_deploy_notification, DeployEvent, RunOutcome};
