// ABOUTME: CLI command implementations.
// ABOUTME: Thin consumers of the library's Publisher and Tracker APIs.

mod list;
mod publish;
mod rollback;
mod status;

pub use list::list;
pub use publish::publish;
pub use rollback::rollback;
pub use status::status;

use std::sync::Arc;

use barua::config::Config;
use barua::error::Result;
use barua::platform::HttpTemplateStore;
use barua::publish::{Publisher, Tracker};
use barua::validate::Validator;

/// Build the tracker for this project's state directory.
fn build_tracker(config: &Config) -> Result<Arc<Tracker>> {
    let root = match &config.state_dir {
        Some(dir) => dir.clone(),
        None => Tracker::default_root().map_err(barua::publish::PublishError::from)?,
    };
    Ok(Arc::new(Tracker::new(root)))
}

/// Wire a publisher from config: HTTP store, tracker, validator.
fn build_publisher(config: &Config) -> Result<Publisher> {
    let store = HttpTemplateStore::connect(&config.store_config()?)?;
    let tracker = build_tracker(config)?;

    let validator = match &config.spam_phrases {
        Some(phrases) => Validator::new().with_spam_phrases(phrases.clone()),
        None => Validator::new(),
    };

    Ok(Publisher::new(Arc::new(store), tracker).with_validator(validator))
}
