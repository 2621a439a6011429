use std::fmt;

use sha2::{Digest, Sha256};

use crate::DeploymentPlan;

/// SHA-256 fingerprint of a deployment plan.
///
/// Two plans share a fingerprint exactly when they would issue the same deployments
/// in the same order: contract names, step ids, arguments, values and network
/// conditions all feed the hash.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PlanFingerprint(String);

impl PlanFingerprint {
    /// Compute the fingerprint of `plan`.
    ///
    /// The plan is serialized to JSON before hashing. Field order is fixed by the
    /// type definitions, so the same plan always produces the same bytes.
    pub fn of(plan: &DeploymentPlan) -> Self {
        let json =
            serde_json::to_vec(plan).expect("DeploymentPlan serialization should never fail");

        let mut hasher = Sha256::new();
        hasher.update(&json);
        Self(hex::encode(hasher.finalize()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First 12 hex characters, for log lines and tables.
    pub fn short(&self) -> &str {
        &self.0[..12]
    }
}

impl fmt::Display for PlanFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
