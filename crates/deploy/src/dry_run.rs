//! A deployer that predicts addresses instead of sending transactions.

use std::path::PathBuf;

use alloy_core::primitives::{Address, U256, address};

use crate::{Amount, ContractDeployer, DeployError, Value};

/// The first account of the well-known Anvil/Hardhat test mnemonic.
pub const DEFAULT_SENDER: Address = address!("f39fd6e51aad88f6f4ce6ab8827279cfffb92266");

/// A deployment accepted by the [`DryRunDeployer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DryRunCall {
    pub contract: String,
    pub args: Vec<Value>,
    pub value: Option<Amount>,
    pub nonce: u64,
    pub address: Address,
}

/// Simulates contract creation from a single sender account.
///
/// Each deployment lands at the CREATE address for the sender's current nonce, and
/// the nonce advances only when a deployment succeeds, just as a rejected
/// transaction would leave it on chain. Nothing leaves the process.
#[derive(Debug, Clone)]
pub struct DryRunDeployer {
    sender: Address,
    nonce: u64,
    balance: Option<U256>,
    artifacts_dir: Option<PathBuf>,
    calls: Vec<DryRunCall>,
}

impl Default for DryRunDeployer {
    fn default() -> Self {
        Self::new(DEFAULT_SENDER)
    }
}

impl DryRunDeployer {
    /// Simulate deployments from `sender`, starting at nonce 0 with unlimited funds.
    pub fn new(sender: Address) -> Self {
        Self {
            sender,
            nonce: 0,
            balance: None,
            artifacts_dir: None,
            calls: Vec::new(),
        }
    }

    /// Start from `nonce` instead of 0.
    pub fn nonce(mut self, nonce: u64) -> Self {
        self.nonce = nonce;
        self
    }

    /// Track a finite balance; value transfers beyond it fail.
    pub fn balance(mut self, balance: Amount) -> Self {
        self.balance = Some(balance.wei());
        self
    }

    /// Require `<dir>/<Contract>.json` to exist for every deployed contract.
    pub fn artifacts_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.artifacts_dir = Some(dir.into());
        self
    }

    pub fn sender(&self) -> Address {
        self.sender
    }

    /// The nonce the next deployment will use.
    pub fn next_nonce(&self) -> u64 {
        self.nonce
    }

    /// Remaining simulated balance, if one is tracked.
    pub fn remaining_balance(&self) -> Option<Amount> {
        self.balance.map(Amount::from_wei)
    }

    /// Deployments accepted so far, in order.
    pub fn calls(&self) -> &[DryRunCall] {
        &self.calls
    }

    async fn check_artifact(&self, contract: &str) -> Result<(), DeployError> {
        let Some(dir) = &self.artifacts_dir else {
            return Ok(());
        };

        let artifact = dir.join(format!("{contract}.json"));
        match tokio::fs::try_exists(&artifact).await {
            Ok(true) => Ok(()),
            Ok(false) => Err(DeployError::ArtifactNotFound(contract.to_string())),
            Err(e) => Err(DeployError::Other(format!(
                "failed to check artifact {}: {e}",
                artifact.display()
            ))),
        }
    }
}

impl ContractDeployer for DryRunDeployer {
    async fn deploy(
        &mut self,
        contract: &str,
        args: &[Value],
        value: Option<Amount>,
    ) -> Result<Address, DeployError> {
        self.check_artifact(contract).await?;

        let next_nonce = self
            .nonce
            .checked_add(1)
            .ok_or_else(|| DeployError::Other("sender nonce exhausted".to_string()))?;

        if let (Some(available), Some(value)) = (self.balance, value) {
            let required = value.wei();
            let remaining = available.checked_sub(required).ok_or(
                DeployError::InsufficientFunds {
                    required,
                    available,
                },
            )?;
            self.balance = Some(remaining);
        }

        let address = self.sender.create(self.nonce);

        tracing::debug!(
            contract,
            nonce = self.nonce,
            address = %address,
            "Simulated contract creation"
        );

        self.calls.push(DryRunCall {
            contract: contract.to_string(),
            args: args.to_vec(),
            value,
            nonce: self.nonce,
            address,
        });
        self.nonce = next_nonce;

        Ok(address)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempdir::TempDir;

    #[tokio::test]
    async fn test_addresses_follow_nonce() {
        let mut deployer = DryRunDeployer::default().nonce(3);

        let first = deployer.deploy("A", &[], None).await.unwrap();
        let second = deployer.deploy("B", &[], None).await.unwrap();

        assert_eq!(first, DEFAULT_SENDER.create(3));
        assert_eq!(second, DEFAULT_SENDER.create(4));
        assert_ne!(first, second);
        assert_eq!(deployer.next_nonce(), 5);
        assert_eq!(deployer.calls().len(), 2);
        assert_eq!(deployer.calls()[1].contract, "B");
    }

    #[tokio::test]
    async fn test_balance_is_debited() {
        let mut deployer = DryRunDeployer::default().balance(Amount::from_wei(U256::from(100)));

        deployer
            .deploy("Airdrop", &[], Some(Amount::from_wei(U256::from(60))))
            .await
            .unwrap();
        assert_eq!(
            deployer.remaining_balance(),
            Some(Amount::from_wei(U256::from(40)))
        );

        let err = deployer
            .deploy("Airdrop2", &[], Some(Amount::from_wei(U256::from(41))))
            .await
            .unwrap_err();
        assert_eq!(
            err,
            DeployError::InsufficientFunds {
                required: U256::from(41),
                available: U256::from(40),
            }
        );

        // A rejected deployment does not consume the nonce.
        assert_eq!(deployer.next_nonce(), 1);
        assert_eq!(deployer.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_exhausted_nonce_is_an_error() {
        let mut deployer = DryRunDeployer::default()
            .nonce(u64::MAX)
            .balance(Amount::from_wei(U256::from(10)));

        let err = deployer
            .deploy("A", &[], Some(Amount::from_wei(U256::from(5))))
            .await
            .unwrap_err();

        assert_eq!(err, DeployError::Other("sender nonce exhausted".to_string()));
        assert_eq!(deployer.next_nonce(), u64::MAX);
        assert_eq!(
            deployer.remaining_balance(),
            Some(Amount::from_wei(U256::from(10))),
            "Balance should not be debited for a rejected deployment"
        );
        assert!(deployer.calls().is_empty());
    }

    #[tokio::test]
    async fn test_missing_artifact() {
        let temp_dir = TempDir::new("plancake-artifacts").expect("Failed to create temp dir");
        std::fs::write(temp_dir.path().join("AzbitToken.json"), "{}")
            .expect("Failed to write artifact");

        let mut deployer = DryRunDeployer::default().artifacts_dir(temp_dir.path());

        assert!(deployer.deploy("AzbitToken", &[], None).await.is_ok());
        assert_eq!(
            deployer.deploy("AzbitBounty", &[], None).await,
            Err(DeployError::ArtifactNotFound("AzbitBounty".to_string()))
        );
    }
}
