//! Human-readable and JSON rendering of plans and run outcomes.

use comfy_table::{Table, presets::UTF8_FULL};
use plancake_deploy::{Argument, DeploymentPlan, DeploymentResult, SequencerError};

/// One row per step: position, id, contract, arguments and value.
pub fn plan_table(plan: &DeploymentPlan) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_header(vec!["#", "Step", "Contract", "Arguments", "Value"]);

    for (index, step) in plan.steps().iter().enumerate() {
        let args: Vec<String> = step
            .args
            .iter()
            .map(|arg| match arg {
                Argument::Literal(value) => value.to_string(),
                Argument::Reference(step) => format!("&{step}"),
            })
            .collect();

        table.add_row(vec![
            (index + 1).to_string(),
            step.id.to_string(),
            step.contract.clone(),
            args.join(", "),
            step.value.map(|v| v.to_string()).unwrap_or_default(),
        ]);
    }

    table
}

/// One row per deployed step, in deployment order.
pub fn result_table(plan: &DeploymentPlan, result: &DeploymentResult) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_header(vec!["#", "Step", "Contract", "Address"]);

    for (index, (step, address)) in result.iter().enumerate() {
        let contract = plan
            .step(step.as_str())
            .map(|s| s.contract.clone())
            .unwrap_or_default();
        table.add_row(vec![
            (index + 1).to_string(),
            step.to_string(),
            contract,
            address.to_string(),
        ]);
    }

    table
}

/// JSON document describing a finished run.
pub fn outcome_json(outcome: &Result<DeploymentResult, SequencerError>) -> serde_json::Value {
    match outcome {
        Ok(result) => serde_json::json!({
            "status": "succeeded",
            "deployed": result,
        }),
        Err(err) => serde_json::json!({
            "status": "failed",
            "failed_at": err.position(),
            "error": err.to_string(),
            "deployed": err.completed().cloned().unwrap_or_default(),
        }),
    }
}
