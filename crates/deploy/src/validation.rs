//! Backward-reference validation and network selection for deployment plans.

use std::collections::HashMap;

use crate::{DeploymentPlan, PlanValidationError, StepId};

impl DeploymentPlan {
    /// Check that the plan is executable in declaration order.
    ///
    /// Every reference must name a step declared strictly earlier, which also rules
    /// out cycles. Step ids must be unique. Returns the first problem found.
    pub fn validate(&self) -> Result<(), PlanValidationError> {
        if self.is_empty() {
            return Err(PlanValidationError::EmptyPlan);
        }

        let declared: HashMap<&str, usize> = self
            .steps()
            .iter()
            .enumerate()
            .rev()
            .map(|(index, step)| (step.id.as_str(), index + 1))
            .collect();

        for (index, step) in self.steps().iter().enumerate() {
            let position = index + 1;

            let first = declared
                .get(step.id.as_str())
                .copied()
                .unwrap_or(position);
            if first != position {
                return Err(PlanValidationError::DuplicateStep {
                    position,
                    step: step.id.clone(),
                    first,
                });
            }

            for reference in step.references() {
                match declared.get(reference.as_str()) {
                    None => {
                        return Err(PlanValidationError::UnknownReference {
                            position,
                            step: step.id.clone(),
                            reference: reference.clone(),
                        });
                    }
                    Some(&target) if target == position => {
                        return Err(PlanValidationError::SelfReference {
                            position,
                            step: step.id.clone(),
                        });
                    }
                    Some(&target) if target > position => {
                        return Err(PlanValidationError::ForwardReference {
                            position,
                            step: step.id.clone(),
                            reference: reference.clone(),
                            target,
                        });
                    }
                    Some(_) => {}
                }
            }
        }

        Ok(())
    }

    /// Select the steps that run on `network` and validate the result.
    ///
    /// The declared plan is validated first, so positions in errors refer to the
    /// plan as written.
    pub fn for_network(&self, network: &str) -> Result<DeploymentPlan, PlanValidationError> {
        self.validate()?;

        let (kept, dropped): (Vec<_>, Vec<_>) =
            self.steps().iter().partition(|step| step.runs_on(network));

        for step in &kept {
            if let Some(reference) = step
                .references()
                .find(|reference| dropped.iter().any(|d| &d.id == *reference))
            {
                return Err(PlanValidationError::ExcludedReference {
                    step: step.id.clone(),
                    reference: StepId::from(reference),
                    network: network.to_string(),
                });
            }
        }

        if !dropped.is_empty() {
            tracing::debug!(
                network,
                skipped = ?dropped.iter().map(|step| step.id.as_str()).collect::<Vec<_>>(),
                "Skipping steps not targeting this network"
            );
        }

        let filtered: DeploymentPlan = kept.into_iter().cloned().collect();
        filtered.validate()?;
        Ok(filtered)
    }
}
