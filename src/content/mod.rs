//! Content layer: card records, sources, errata resolution and the catalog.

pub mod card;
pub mod catalog;
pub mod errata;
pub mod loader;
pub mod objective;
pub mod resolver;
pub mod ship;
pub mod source;
pub mod squadron;
pub mod validate;

pub use card::{UpgradeCard, UpgradeRestrictions};
pub use catalog::{Catalog, ContentState, ContentStore, ReloadOutcome};
pub use errata::ErrataRegistry;
pub use objective::ObjectiveRecord;
pub use resolver::resolve;
pub use ship::ShipRecord;
pub use source::{ContentToggles, EnabledSources};
pub use squadron::SquadronRecord;
