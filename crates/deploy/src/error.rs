//! Error taxonomy for planning and executing a deployment run.

use alloy_core::primitives::U256;

use crate::{DeploymentResult, StepId};

/// A malformed plan, detected before any transaction is sent.
///
/// Positions are 1-based, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlanValidationError {
    #[error("deployment plan has no steps")]
    EmptyPlan,

    #[error("step {position} reuses the id `{step}` declared at step {first}")]
    DuplicateStep {
        position: usize,
        step: StepId,
        first: usize,
    },

    #[error("step {position} (`{step}`) references its own address")]
    SelfReference { position: usize, step: StepId },

    #[error(
        "step {position} (`{step}`) references `{reference}`, which is only deployed later at step {target}"
    )]
    ForwardReference {
        position: usize,
        step: StepId,
        reference: StepId,
        target: usize,
    },

    #[error("step {position} (`{step}`) references unknown step `{reference}`")]
    UnknownReference {
        position: usize,
        step: StepId,
        reference: StepId,
    },

    #[error(
        "step `{step}` references `{reference}`, which is not deployed on network `{network}`"
    )]
    ExcludedReference {
        step: StepId,
        reference: StepId,
        network: String,
    },

    #[error("step {position} (`{step}`) uses undefined parameter `{param}`")]
    UnknownParameter {
        position: usize,
        step: StepId,
        param: String,
    },
}

/// Failure reported by a [`crate::ContractDeployer`] for a single deployment.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DeployError {
    #[error("no artifact found for contract `{0}`")]
    ArtifactNotFound(String),

    #[error("constructor reverted: {0}")]
    Reverted(String),

    #[error("insufficient funds: need {required} wei, have {available} wei")]
    InsufficientFunds { required: U256, available: U256 },

    #[error("transport error: {0}")]
    Transport(String),

    #[error("{0}")]
    Other(String),
}

/// Outcome of a run that did not deploy every step.
#[derive(Debug, thiserror::Error)]
pub enum SequencerError {
    #[error("invalid deployment plan: {0}")]
    Validation(#[from] PlanValidationError),

    #[error("deployment failed at step {position} (`{step}`): {source}")]
    Deploy {
        position: usize,
        step: StepId,
        #[source]
        source: DeployError,
        completed: DeploymentResult,
    },

    #[error("run interrupted before step {position} (`{step}`)")]
    Interrupted {
        position: usize,
        step: StepId,
        completed: DeploymentResult,
    },
}

impl SequencerError {
    /// Steps that were deployed before the run stopped.
    ///
    /// `None` for validation failures, where nothing was attempted.
    pub fn completed(&self) -> Option<&DeploymentResult> {
        match self {
            SequencerError::Validation(_) => None,
            SequencerError::Deploy { completed, .. }
            | SequencerError::Interrupted { completed, .. } => Some(completed),
        }
    }

    /// The 1-based position of the step the run stopped at, if any step was reached.
    pub fn position(&self) -> Option<usize> {
        match self {
            SequencerError::Validation(_) => None,
            SequencerError::Deploy { position, .. }
            | SequencerError::Interrupted { position, .. } => Some(*position),
        }
    }
}
