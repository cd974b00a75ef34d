// ABOUTME: Status command implementation.
// ABOUTME: Shows one deployment record, human-readable or as JSON.

use barua::config::Config;
use barua::error::Result;
use barua::output::{Output, OutputMode};
use barua::publish::PublishError;
use barua::types::DeploymentId;

/// Show a deployment's record.
pub fn status(config: Config, deployment_id: &str, output: Output) -> Result<()> {
    let tracker = super::build_tracker(&config)?;
    let deployment_id = DeploymentId::new(deployment_id);

    let deployment = tracker
        .load(&deployment_id)
        .map_err(PublishError::from)?
        .ok_or(PublishError::DeploymentNotFound(deployment_id))?;

    if output.mode() == OutputMode::Json {
        if let Ok(json) = serde_json::to_string_pretty(&deployment) {
            println!("{json}");
        }
        return Ok(());
    }

    println!("Deployment {}", deployment.id);
    println!("  journey:    {}", deployment.journey_id);
    println!("  status:     {}", deployment.status);
    println!("  created:    {}", deployment.created_at);
    if let Some(completed) = deployment.completed_at {
        println!("  completed:  {completed}");
    }
    if let Some(rolled_back) = deployment.rolled_back_at {
        println!("  rolled back: {rolled_back}");
    }

    println!("  items:");
    for item in &deployment.items {
        let mut line = format!("    {} ({}) {}", item.name, item.kind, item.status);
        if let Some(external_id) = &item.external_id {
            line.push_str(&format!(" [{external_id}]"));
        }
        if let Some(error) = &item.error {
            line.push_str(&format!(": {error}"));
        }
        println!("{line}");
    }

    if let Some(summary) = &deployment.summary {
        println!(
            "  summary:    published {}, failed {}, skipped {} of {}",
            summary.published, summary.failed, summary.skipped, summary.total
        );
    }

    Ok(())
}
