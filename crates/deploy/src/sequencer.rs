//! Sequential execution of a deployment plan.
//!
//! The sequencer walks a validated [`DeploymentPlan`] in declaration order. Before
//! each step it replaces references with the addresses recorded so far, then hands
//! the step to a [`ContractDeployer`] and waits for the outcome. The first failure
//! ends the run. Contracts already deployed stay deployed; stopping only means no
//! further transactions are issued.

use std::fmt;

use tokio::sync::watch;

use crate::{
    Argument, ContractDeployer, DeploymentPlan, DeploymentResult, DeploymentStep,
    PlanFingerprint, PlanValidationError, SequencerError, Value,
};

/// Where a sequencer is in its run. Positions are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunState {
    /// No step has been attempted.
    #[default]
    Pending,
    /// The step at `position` has been submitted and is awaiting its outcome.
    Running { position: usize },
    /// Every step deployed.
    Succeeded,
    /// The step at `position` failed. `0` means the plan was rejected before any step.
    Failed { position: usize },
    /// A stop was requested and the step at `position` was never submitted.
    Interrupted { position: usize },
}

impl RunState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            RunState::Succeeded | RunState::Failed { .. } | RunState::Interrupted { .. }
        )
    }
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunState::Pending => write!(f, "pending"),
            RunState::Running { position } => write!(f, "running-step-{position}"),
            RunState::Succeeded => write!(f, "succeeded"),
            RunState::Failed { position } => write!(f, "failed-at-step-{position}"),
            RunState::Interrupted { position } => write!(f, "interrupted-before-step-{position}"),
        }
    }
}

/// Runs deployment plans against a [`ContractDeployer`].
///
/// Each call to [`Sequencer::execute`] starts from an empty [`DeploymentResult`].
pub struct Sequencer<D> {
    deployer: D,
    state: RunState,
    stop: Option<watch::Receiver<bool>>,
}

impl<D: ContractDeployer> Sequencer<D> {
    pub fn new(deployer: D) -> Self {
        Self {
            deployer,
            state: RunState::Pending,
            stop: None,
        }
    }

    /// Decline to submit further steps once `stop` reads `true`.
    ///
    /// The signal is checked before each step. A deployment already submitted is
    /// always awaited to completion.
    pub fn with_stop_signal(mut self, stop: watch::Receiver<bool>) -> Self {
        self.stop = Some(stop);
        self
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn deployer(&self) -> &D {
        &self.deployer
    }

    pub fn into_deployer(self) -> D {
        self.deployer
    }

    fn stop_requested(&self) -> bool {
        self.stop.as_ref().is_some_and(|stop| *stop.borrow())
    }

    /// Deploy every step of `plan`, in order, one at a time.
    pub async fn execute(
        &mut self,
        plan: &DeploymentPlan,
    ) -> Result<DeploymentResult, SequencerError> {
        self.state = RunState::Pending;

        if let Err(err) = plan.validate() {
            self.state = RunState::Failed { position: 0 };
            tracing::error!(error = %err, "Deployment plan rejected, nothing was deployed");
            return Err(err.into());
        }

        let total = plan.len();
        tracing::info!(
            steps = total,
            fingerprint = %PlanFingerprint::of(plan),
            "Starting deployment run"
        );

        let mut result = DeploymentResult::new();

        for (index, step) in plan.steps().iter().enumerate() {
            let position = index + 1;

            if self.stop_requested() {
                self.state = RunState::Interrupted { position };
                tracing::warn!(
                    position,
                    step = %step.id,
                    deployed = result.len(),
                    "Stop requested, not submitting further steps"
                );
                return Err(SequencerError::Interrupted {
                    position,
                    step: step.id.clone(),
                    completed: result,
                });
            }

            self.state = RunState::Running { position };

            let args = match resolve_arguments(step, position, &result) {
                Ok(args) => args,
                Err(err) => {
                    self.state = RunState::Failed { position };
                    return Err(err.into());
                }
            };

            tracing::info!(
                position,
                total,
                step = %step.id,
                contract = %step.contract,
                args = %render_args(&args),
                value = %step.value.unwrap_or_default(),
                "Deploying contract"
            );

            match self.deployer.deploy(&step.contract, &args, step.value).await {
                Ok(address) => {
                    tracing::info!(
                        position,
                        step = %step.id,
                        address = %address,
                        "Contract deployed"
                    );
                    result.record(step.id.clone(), address);
                }
                Err(source) => {
                    self.state = RunState::Failed { position };
                    tracing::error!(
                        position,
                        step = %step.id,
                        contract = %step.contract,
                        error = %source,
                        deployed = result.len(),
                        "Deployment failed, aborting run"
                    );
                    return Err(SequencerError::Deploy {
                        position,
                        step: step.id.clone(),
                        source,
                        completed: result,
                    });
                }
            }
        }

        self.state = RunState::Succeeded;
        tracing::info!(deployed = result.len(), "Deployment run complete");

        Ok(result)
    }
}

/// Run `plan` against `deployer` with a fresh [`Sequencer`].
///
/// Pass `&mut deployer` to keep access to the deployer afterwards.
pub async fn execute<D: ContractDeployer>(
    plan: &DeploymentPlan,
    deployer: D,
) -> Result<DeploymentResult, SequencerError> {
    Sequencer::new(deployer).execute(plan).await
}

/// Replace every reference in `step` with the address recorded for it.
fn resolve_arguments(
    step: &DeploymentStep,
    position: usize,
    deployed: &DeploymentResult,
) -> Result<Vec<Value>, PlanValidationError> {
    step.args
        .iter()
        .map(|arg| match arg {
            Argument::Literal(value) => Ok(value.clone()),
            Argument::Reference(reference) => deployed
                .get(reference.as_str())
                .map(Value::Address)
                .ok_or_else(|| PlanValidationError::UnknownReference {
                    position,
                    step: step.id.clone(),
                    reference: reference.clone(),
                }),
        })
        .collect()
}

fn render_args(args: &[Value]) -> String {
    let rendered: Vec<String> = args.iter().map(ToString::to_string).collect();
    format!("[{}]", rendered.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DeployError, DeploymentStep};
    use alloy_core::primitives::{Address, address};

    /// Hands out addresses 0x..01, 0x..02, ... and fails on one contract name.
    #[derive(Default)]
    struct CountingDeployer {
        deployed: u8,
        fail_on: Option<&'static str>,
    }

    impl ContractDeployer for CountingDeployer {
        async fn deploy(
            &mut self,
            contract: &str,
            _args: &[Value],
            _value: Option<crate::Amount>,
        ) -> Result<Address, DeployError> {
            if self.fail_on == Some(contract) {
                return Err(DeployError::Reverted("boom".to_string()));
            }
            self.deployed += 1;
            Ok(Address::with_last_byte(self.deployed))
        }
    }

    fn plan() -> DeploymentPlan {
        DeploymentPlan::new(DeploymentStep::new("Token").arg(1u64))
            .then(DeploymentStep::new("Bounty").reference("Token"))
    }

    #[tokio::test]
    async fn test_state_after_success() {
        let mut sequencer = Sequencer::new(CountingDeployer::default());
        assert_eq!(sequencer.state(), RunState::Pending);

        let result = sequencer.execute(&plan()).await.unwrap();

        assert_eq!(sequencer.state(), RunState::Succeeded);
        assert!(sequencer.state().is_terminal());
        assert_eq!(
            result.get("Bounty"),
            Some(address!("0000000000000000000000000000000000000002"))
        );
    }

    #[tokio::test]
    async fn test_state_after_failure() {
        let mut sequencer = Sequencer::new(CountingDeployer {
            fail_on: Some("Bounty"),
            ..Default::default()
        });

        let err = sequencer.execute(&plan()).await.unwrap_err();

        assert_eq!(sequencer.state(), RunState::Failed { position: 2 });
        assert_eq!(sequencer.state().to_string(), "failed-at-step-2");
        assert_eq!(err.position(), Some(2));
    }

    #[tokio::test]
    async fn test_state_after_rejected_plan() {
        let mut sequencer = Sequencer::new(CountingDeployer::default());
        let plan = DeploymentPlan::new(DeploymentStep::new("Bounty").reference("Token"));

        let err = sequencer.execute(&plan).await.unwrap_err();

        assert!(matches!(err, SequencerError::Validation(_)));
        assert_eq!(sequencer.state(), RunState::Failed { position: 0 });
        assert_eq!(sequencer.deployer().deployed, 0);
    }

    #[tokio::test]
    async fn test_each_run_starts_empty() {
        let mut sequencer = Sequencer::new(CountingDeployer::default());

        let first = sequencer.execute(&plan()).await.unwrap();
        let second = sequencer.execute(&plan()).await.unwrap();

        assert_eq!(first.len(), 2);
        assert_eq!(second.len(), 2);
        assert_eq!(
            second.get("Token"),
            Some(address!("0000000000000000000000000000000000000003"))
        );
    }

    #[test]
    fn test_render_args() {
        let args = vec![Value::from(5u64), Value::from("Tok")];
        assert_eq!(render_args(&args), "[5, \"Tok\"]");
    }
}
