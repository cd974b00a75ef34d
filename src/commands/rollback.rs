// ABOUTME: Rollback command implementation.
// ABOUTME: Restores a tracked deployment's items to their pre-publish content.

use barua::config::Config;
use barua::error::{Error, Result};
use barua::output::Output;
use barua::types::DeploymentId;

/// Roll back a deployment by id.
pub async fn rollback(
    config: Config,
    deployment_id: &str,
    force: bool,
    mut output: Output,
) -> Result<()> {
    output.start_timer();

    let publisher = super::build_publisher(&config)?;
    let deployment_id = DeploymentId::new(deployment_id);

    output.progress(&format!("Rolling back deployment {deployment_id}"));

    let report = publisher.rollback(&deployment_id, force).await?;

    for item in &report.items {
        if item.restored {
            output.progress(&format!("  ✓ restored {} ({})", item.item_id, item.external_id));
        } else {
            output.warning(&format!(
                "failed to restore {} ({}): {}",
                item.item_id,
                item.external_id,
                item.error.as_deref().unwrap_or("unknown error")
            ));
        }
    }

    let summary = format!(
        "Rollback of {}: restored {}, failed {}",
        report.deployment_id, report.restored, report.failed
    );

    if report.success {
        output.success(&summary);
        Ok(())
    } else {
        output.error(&summary);
        Err(Error::RollbackIncomplete {
            failed: report.failed,
            total: report.restored + report.failed,
        })
    }
}
