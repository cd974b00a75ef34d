// ABOUTME: Core domain types shared across the crate.
// ABOUTME: Phantom-typed ids, journey ids, and content item definitions.

mod id;
mod item;
mod journey_id;

pub use id::{DeploymentId, DeploymentMarker, ExternalId, ExternalMarker, Id, ItemId, ItemMarker};
pub use item::{ContentItem, ItemKind};
pub use journey_id::{JourneyId, JourneyIdError};
