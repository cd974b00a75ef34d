// ABOUTME: Publish command implementation.
// ABOUTME: Runs a batch publish and renders per-item progress and the final summary.

use barua::config::Config;
use barua::error::{Error, Result};
use barua::output::{Output, OutputMode};
use barua::publish::{ItemStatus, PublishOptions};

/// Publish the configured journey's items.
pub async fn publish(
    config: Config,
    dry_run: bool,
    skip_validation: bool,
    force: bool,
    mut output: Output,
) -> Result<()> {
    output.start_timer();

    let publisher = super::build_publisher(&config)?;
    let items = config.items();

    output.progress(&format!(
        "Publishing journey '{}' ({} item(s)){}",
        config.journey,
        items.len(),
        if dry_run { " [dry run]" } else { "" }
    ));

    let show_progress = output.mode() == OutputMode::Normal;
    let options = PublishOptions {
        skip_validation,
        dry_run,
        force,
        on_progress: Some(Box::new(move |progress| {
            if !show_progress {
                return;
            }
            match progress.status {
                ItemStatus::Pending => {
                    println!(
                        "  → [{}/{}] {}...",
                        progress.current, progress.total, progress.item_name
                    );
                }
                ItemStatus::Published => println!("  ✓ published"),
                ItemStatus::Failed => println!("  ✗ failed"),
                ItemStatus::Skipped => println!("  - skipped (dry run)"),
                ItemStatus::Restored => {}
            }
        })),
    };

    let report = publisher
        .batch_publish(&config.journey, &items, options)
        .await?;

    for warning in &report.warnings {
        output.warning(&warning.message);
    }

    if let Some(validation) = &report.validation {
        for issue in &validation.errors {
            let attribution = issue
                .item_id
                .as_ref()
                .map(|id| format!(" [{id}]"))
                .unwrap_or_default();
            output.error(&format!("{}{attribution}", issue.message));
        }
        return Err(Error::ValidationFailed(validation.errors.len()));
    }

    let summary = format!(
        "Deployment {}: published {}, failed {}, skipped {} of {}",
        report.deployment_id, report.published, report.failed, report.skipped, report.total
    );

    if report.success {
        output.success(&summary);
        Ok(())
    } else {
        output.error(&summary);
        Err(Error::BatchFailed {
            failed: report.failed,
            total: report.total,
        })
    }
}
