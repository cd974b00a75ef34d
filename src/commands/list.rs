// ABOUTME: List command implementation.
// ABOUTME: Shows deployment history, newest first, for one journey or all.

use barua::config::Config;
use barua::error::Result;
use barua::output::{Output, OutputMode};
use barua::publish::PublishError;

/// List deployments, newest first.
pub fn list(config: Config, all: bool, output: Output) -> Result<()> {
    let tracker = super::build_tracker(&config)?;

    let journey = (!all).then_some(&config.journey);
    let deployments = tracker.list(journey).map_err(PublishError::from)?;

    if output.mode() == OutputMode::Json {
        for deployment in &deployments {
            if let Ok(json) = serde_json::to_string(deployment) {
                println!("{json}");
            }
        }
        return Ok(());
    }

    if deployments.is_empty() {
        output.progress("No deployments recorded.");
        return Ok(());
    }

    for deployment in &deployments {
        let counts = match &deployment.summary {
            Some(s) => format!(
                "published {}, failed {}, skipped {} of {}",
                s.published, s.failed, s.skipped, s.total
            ),
            None => format!("{} item(s)", deployment.items.len()),
        };
        println!(
            "{}  {}  {}  {} ({})",
            deployment.id, deployment.journey_id, deployment.status, deployment.created_at, counts
        );
    }

    Ok(())
}
