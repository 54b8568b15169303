use crate::deploy::event::{DeployContext, DeployEvent};

#[derive(Debug, PartialEq, Eq)]
pub enum GateDecision {
    Proceed,
    Skip(SkipReason),
}

/// Why a deploy does not get a comment. Skipping is the expected outcome for most deploys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    NotDeployPreview(String),
    NotPullRequest,
}

/// Only deploy previews of pull requests are commented on.
pub fn check_trigger(event: &DeployEvent) -> GateDecision {
    if let DeployContext::Other(context) = &event.context {
        return GateDecision::Skip(SkipReason::NotDeployPreview(context.clone()));
    }
    if !event.is_pull_request {
        return GateDecision::Skip(SkipReason::NotPullRequest);
    }
    GateDecision::Proceed
}
