// ABOUTME: Config scaffolding for new projects.
// ABOUTME: Creates barua.yml template files.

use std::path::Path;

use crate::error::{Error, Result};
use crate::types::JourneyId;

use super::CONFIG_FILENAME;

pub fn init_config(dir: &Path, journey: Option<&str>, force: bool) -> Result<()> {
    let config_path = dir.join(CONFIG_FILENAME);

    if config_path.exists() && !force {
        return Err(Error::AlreadyExists(config_path));
    }

    let journey = match journey {
        Some(j) => JourneyId::new(j).map_err(|e| Error::InvalidConfig(e.to_string()))?,
        None => JourneyId::new("my-journey").expect("default journey id is valid"),
    };

    std::fs::write(&config_path, generate_template_yaml(&journey))?;

    Ok(())
}

fn generate_template_yaml(journey: &JourneyId) -> String {
    format!(
        r#"journey: {journey}
platform:
  base_url: https://api.crm.example/v1
  token:
    env: CRM_API_TOKEN
  location:
    env: CRM_LOCATION_ID
  # request_delay: 250ms
  # request_timeout: 30s
items:
  - id: welcome-email
    name: Welcome Email
    type: email
    subject: Welcome aboard!
    body: "<p>Thanks for joining us.</p>"
  - id: day-3-sms
    name: Day 3 Check-in
    type: sms
    message: "How is it going so far? Reply STOP to opt out."
"#
    )
}
