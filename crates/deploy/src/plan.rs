//! Declarative deployment plans.
//!
//! A [`DeploymentPlan`] is an ordered list of [`DeploymentStep`]s. Each step names a
//! contract and its constructor arguments, which are either literal [`Value`]s or
//! references to the address produced by an earlier step.
//!
//! # Example
//!
//! ```
//! use plancake_deploy::{DeploymentPlan, DeploymentStep};
//!
//! let plan = DeploymentPlan::new(
//!     DeploymentStep::new("AzbitToken")
//!         .arg(1_000_000_000u64)
//!         .arg("Azbit Token")
//!         .arg("AZ"),
//! )
//! .then(DeploymentStep::new("AzbitBounty").reference("AzbitToken"))
//! .then(DeploymentStep::new("AzbitAirdrop").reference("AzbitToken"));
//!
//! assert!(plan.validate().is_ok());
//! ```

use std::borrow::Borrow;

use derive_more::{Deref, Display};
use serde::Serialize;

use crate::{Amount, Value};

/// Identifier of a step within a plan.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Display, Deref, Serialize)]
#[serde(transparent)]
pub struct StepId(String);

impl StepId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for StepId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for StepId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&StepId> for StepId {
    fn from(id: &StepId) -> Self {
        id.clone()
    }
}

impl Borrow<str> for StepId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// A constructor argument as declared in a plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Argument {
    /// Passed to the constructor unchanged.
    Literal(Value),
    /// Replaced with the address the referenced step deployed to.
    Reference(StepId),
}

impl Argument {
    pub fn reference(&self) -> Option<&StepId> {
        match self {
            Argument::Reference(id) => Some(id),
            Argument::Literal(_) => None,
        }
    }
}

/// A single contract deployment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeploymentStep {
    /// Identifier under which the deployed address is recorded.
    pub id: StepId,
    /// Name of the contract artifact to deploy.
    pub contract: String,
    /// Constructor arguments, in order.
    pub args: Vec<Argument>,
    /// Wei sent to the contract at creation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Amount>,
    /// Networks this step runs on. Empty means every network.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub networks: Vec<String>,
}

impl DeploymentStep {
    /// Create a step deploying `contract`, recorded under the contract's name.
    pub fn new(contract: impl Into<String>) -> Self {
        let contract = contract.into();
        Self {
            id: StepId::new(contract.clone()),
            contract,
            args: Vec::new(),
            value: None,
            networks: Vec::new(),
        }
    }

    /// Record the deployment under `id` instead of the contract name.
    pub fn with_id(mut self, id: impl Into<StepId>) -> Self {
        self.id = id.into();
        self
    }

    /// Append a literal constructor argument.
    pub fn arg(mut self, value: impl Into<Value>) -> Self {
        self.args.push(Argument::Literal(value.into()));
        self
    }

    /// Append the address of an earlier step as a constructor argument.
    pub fn reference(mut self, step: impl Into<StepId>) -> Self {
        self.args.push(Argument::Reference(step.into()));
        self
    }

    /// Send `amount` to the contract when it is created.
    pub fn value(mut self, amount: Amount) -> Self {
        self.value = Some(amount);
        self
    }

    /// Restrict the step to the given network. May be called more than once.
    pub fn on_network(mut self, network: impl Into<String>) -> Self {
        self.networks.push(network.into());
        self
    }

    /// Whether this step runs when targeting `network`.
    pub fn runs_on(&self, network: &str) -> bool {
        self.networks.is_empty() || self.networks.iter().any(|n| n == network)
    }

    /// Steps referenced by this step's arguments, in argument order.
    pub fn references(&self) -> impl Iterator<Item = &StepId> {
        self.args.iter().filter_map(Argument::reference)
    }
}

/// An ordered, immutable list of deployment steps.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct DeploymentPlan {
    steps: Vec<DeploymentStep>,
}

impl DeploymentPlan {
    /// Create a plan whose first step is `step`.
    pub fn new(step: DeploymentStep) -> Self {
        Self { steps: vec![step] }
    }

    /// Append a step to run after every step already in the plan.
    pub fn then(mut self, step: DeploymentStep) -> Self {
        self.steps.push(step);
        self
    }

    pub fn steps(&self) -> &[DeploymentStep] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Find a step by id.
    pub fn step(&self, id: &str) -> Option<&DeploymentStep> {
        self.steps.iter().find(|step| step.id.as_str() == id)
    }

    /// 1-based position of the step with the given id.
    pub fn position_of(&self, id: &str) -> Option<usize> {
        self.steps
            .iter()
            .position(|step| step.id.as_str() == id)
            .map(|index| index + 1)
    }
}

impl FromIterator<DeploymentStep> for DeploymentPlan {
    fn from_iter<I: IntoIterator<Item = DeploymentStep>>(iter: I) -> Self {
        Self {
            steps: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for DeploymentPlan {
    type Item = DeploymentStep;
    type IntoIter = std::vec::IntoIter<DeploymentStep>;

    fn into_iter(self) -> Self::IntoIter {
        self.steps.into_iter()
    }
}
