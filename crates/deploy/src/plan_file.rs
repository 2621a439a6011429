//! TOML plan files.
//!
//! ```toml
//! [params]
//! initial_supply = 1000000000
//! token_name = "Azbit Token"
//!
//! [[steps]]
//! contract = "AzbitToken"
//! args = [{ param = "initial_supply" }, { param = "token_name" }, "AZ"]
//!
//! [[steps]]
//! contract = "AzbitBounty"
//! args = [{ ref = "AzbitToken" }]
//! value = "0.5 ether"
//! networks = ["mainnet"]
//! ```

use std::{collections::BTreeMap, path::Path, str::FromStr};

use alloy_core::primitives::{Address, U256};
use anyhow::{Context, Result};
use serde::{Deserialize, Deserializer};

use crate::{Amount, Argument, DeploymentPlan, DeploymentStep, PlanValidationError, StepId, Value};

/// The file name looked up when a plan path points at a directory.
pub const PLAN_FILENAME: &str = "Deploy.toml";

/// Deserialize a U256 from a decimal or `0x`-prefixed hex string.
fn deserialize_u256_from_str<'de, D>(deserializer: D) -> std::result::Result<U256, D::Error>
where
    D: Deserializer<'de>,
{
    let s: String = Deserialize::deserialize(deserializer)?;
    U256::from_str(s.trim()).map_err(serde::de::Error::custom)
}

/// Raw contents of a plan file, before params are substituted.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlanFile {
    /// Named literals, referenced from step arguments as `{ param = "<name>" }`.
    #[serde(default)]
    pub params: BTreeMap<String, ParamEntry>,
    /// Steps in deployment order.
    #[serde(default)]
    pub steps: Vec<StepEntry>,
}

/// A step as written in a plan file.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StepEntry {
    /// Defaults to `contract`.
    pub id: Option<String>,
    pub contract: String,
    #[serde(default)]
    pub args: Vec<ArgumentEntry>,
    pub value: Option<Amount>,
    #[serde(default)]
    pub networks: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RefEntry {
    #[serde(rename = "ref")]
    pub step: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ParamRefEntry {
    pub param: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AddressEntry {
    pub address: Address,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UintEntry {
    #[serde(deserialize_with = "deserialize_u256_from_str")]
    pub uint: U256,
}

/// A bare TOML scalar.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ScalarEntry {
    Bool(bool),
    Integer(i64),
    Text(String),
}

impl From<ScalarEntry> for Value {
    fn from(scalar: ScalarEntry) -> Self {
        match scalar {
            ScalarEntry::Bool(b) => Value::Bool(b),
            ScalarEntry::Integer(n) if n >= 0 => Value::Uint(U256::from(n as u64)),
            ScalarEntry::Integer(n) => Value::Int(n),
            ScalarEntry::Text(s) => Value::String(s),
        }
    }
}

/// A value declared under `[params]`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ParamEntry {
    Address(AddressEntry),
    Uint(UintEntry),
    Scalar(ScalarEntry),
}

impl From<ParamEntry> for Value {
    fn from(param: ParamEntry) -> Self {
        match param {
            ParamEntry::Address(entry) => Value::Address(entry.address),
            ParamEntry::Uint(entry) => Value::Uint(entry.uint),
            ParamEntry::Scalar(scalar) => scalar.into(),
        }
    }
}

/// A constructor argument as written in a plan file.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ArgumentEntry {
    Reference(RefEntry),
    Param(ParamRefEntry),
    Address(AddressEntry),
    Uint(UintEntry),
    Scalar(ScalarEntry),
}

impl PlanFile {
    /// Parse a plan file from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse plan file as TOML")
    }

    /// Substitute params and build the plan.
    ///
    /// The plan is not validated here; see [`DeploymentPlan::validate`].
    pub fn into_plan(self) -> std::result::Result<DeploymentPlan, PlanValidationError> {
        let params: BTreeMap<String, Value> = self
            .params
            .into_iter()
            .map(|(name, entry)| (name, entry.into()))
            .collect();

        self.steps
            .into_iter()
            .enumerate()
            .map(|(index, entry)| entry.into_step(index + 1, &params))
            .collect()
    }
}

impl StepEntry {
    fn into_step(
        self,
        position: usize,
        params: &BTreeMap<String, Value>,
    ) -> std::result::Result<DeploymentStep, PlanValidationError> {
        let id = StepId::new(self.id.unwrap_or_else(|| self.contract.clone()));

        let args = self
            .args
            .into_iter()
            .map(|arg| match arg {
                ArgumentEntry::Reference(entry) => Ok(Argument::Reference(entry.step.into())),
                ArgumentEntry::Param(entry) => params
                    .get(&entry.param)
                    .cloned()
                    .map(Argument::Literal)
                    .ok_or_else(|| PlanValidationError::UnknownParameter {
                        position,
                        step: id.clone(),
                        param: entry.param,
                    }),
                ArgumentEntry::Address(entry) => Ok(Argument::Literal(Value::Address(entry.address))),
                ArgumentEntry::Uint(entry) => Ok(Argument::Literal(Value::Uint(entry.uint))),
                ArgumentEntry::Scalar(scalar) => Ok(Argument::Literal(scalar.into())),
            })
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(DeploymentStep {
            id,
            contract: self.contract,
            args,
            value: self.value,
            networks: self.networks,
        })
    }
}

impl DeploymentPlan {
    /// Parse a plan from the TOML plan file format.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let plan = PlanFile::from_toml_str(content)?.into_plan()?;
        Ok(plan)
    }

    /// Load a plan from a TOML file.
    ///
    /// If `path` is a directory, `Deploy.toml` inside it is loaded.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            anyhow::bail!("Plan file or directory not found: {}", path.display());
        }

        let plan_path = if path.is_dir() {
            path.join(PLAN_FILENAME)
        } else {
            path.to_path_buf()
        };

        let content = std::fs::read_to_string(&plan_path)
            .context(format!("Failed to read plan from {}", plan_path.display()))?;
        let plan = Self::from_toml_str(&content)
            .context(format!("Invalid plan file {}", plan_path.display()))?;

        tracing::info!(path = %plan_path.display(), steps = plan.len(), "Plan loaded");
        Ok(plan)
    }
}
