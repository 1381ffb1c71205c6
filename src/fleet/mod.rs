//! Fleet layer: slot allocation, selection state, upgrade eligibility and
//! gamemode validation.

pub mod eligibility;
pub mod gamemode;
pub mod slots;
pub mod state;
pub mod validator;

pub use eligibility::{evaluate, is_greyed_out, FleetContext, ShipContext};
pub use gamemode::GamemodeProfile;
pub use slots::SlotPools;
pub use state::{FleetDoc, FleetState, FleetTotals, ShipBuild};
pub use validator::validate_fleet;
