//! The capability a sequencer uses to put contracts on chain.

use std::future::Future;

use alloy_core::primitives::Address;

use crate::{Amount, DeployError, Value};

/// Deploys a named contract and reports where it landed.
///
/// Implementations own everything the sequencer does not: locating or compiling
/// the artifact, encoding constructor arguments, signing, broadcasting and
/// waiting for the receipt. The returned future resolves once the deployment is
/// final, either with the new contract's address or with the reason it failed.
///
/// The sequencer awaits each call before issuing the next one, so implementations
/// may rely on calls arriving one at a time, in plan order.
pub trait ContractDeployer: Send {
    /// Deploy `contract` with already-resolved constructor `args`, sending `value`
    /// wei to it at creation when set.
    fn deploy(
        &mut self,
        contract: &str,
        args: &[Value],
        value: Option<Amount>,
    ) -> impl Future<Output = Result<Address, DeployError>> + Send;
}

impl<D: ContractDeployer> ContractDeployer for &mut D {
    fn deploy(
        &mut self,
        contract: &str,
        args: &[Value],
        value: Option<Amount>,
    ) -> impl Future<Output = Result<Address, DeployError>> + Send {
        (**self).deploy(contract, args, value)
    }
}
