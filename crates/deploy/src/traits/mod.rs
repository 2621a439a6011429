//! Seams between the sequencer and the outside world.
//!
//! The sequencer never talks to a chain itself. It drives a [`ContractDeployer`],
//! which may broadcast real transactions, simulate them (see
//! [`crate::DryRunDeployer`]) or record calls in tests.

mod deployer;

pub use deployer::ContractDeployer;
