//! plancake-deploy - Ordered contract deployment with address threading.
//!
//! This crate runs a [`DeploymentPlan`] step by step against a [`ContractDeployer`],
//! feeding the address of each deployed contract into the constructor arguments
//! of the steps that reference it.

mod dry_run;
mod error;
mod plan;
mod plan_file;
mod plan_hash;
mod result;
mod sequencer;
mod traits;
mod validation;
mod value;

pub use dry_run::{DEFAULT_SENDER, DryRunCall, DryRunDeployer};
pub use error::{DeployError, PlanValidationError, SequencerError};
pub use plan::{Argument, DeploymentPlan, DeploymentStep, StepId};
pub use plan_file::{PLAN_FILENAME, PlanFile};
pub use plan_hash::PlanFingerprint;
pub use result::DeploymentResult;
pub use sequencer::{RunState, Sequencer, execute};
pub use traits::ContractDeployer;
pub use value::{Amount, AmountParseError, Value};

pub use alloy_core::primitives::{Address, U256};
