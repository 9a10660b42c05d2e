//! Typed NX-OS state on top of `nxfleet-api`, plus fleet-wide dispatch.
//!
//! The crate has three layers:
//!
//! - **Normalization** ([`normalize`]) -- projects raw NXAPI JSON onto stable
//!   shapes: `TABLE_x`/`ROW_x` unwrapping with scalar-or-list coercion
//!   ([`normalize::get_table_row`]), typed readers with sentinel fallbacks
//!   ([`normalize::Fields`]), and the release-drift registry
//!   ([`normalize::drift`]).
//!
//! - **Entities** ([`entity`]) -- one struct per CLI. Pick a subject, call
//!   [`Entity::refresh`] against an [`NxapiClient`](nxfleet_api::NxapiClient),
//!   read scalars. Missing data reads as `"na"`, `-1` or `-1.0`; only
//!   transport failures are errors.
//!
//! - **Fleet dispatch** ([`fleet`]) -- [`Fleet::dispatch`] resolves each
//!   inventory name, opens a session, runs a worker per device concurrently,
//!   and returns every worker's lines in input order.
//!
//! [`timer::parse_timer`] converts the many NX-OS duration spellings to
//! seconds and backs every `*_secs` accessor.

pub mod entity;
pub mod error;
pub mod fleet;
pub mod normalize;
pub mod timer;

// ── Primary re-exports ──────────────────────────────────────────────
pub use entity::{Entity, Family, refresh_entity};
pub use error::CoreError;
pub use fleet::{CredentialSource, DeviceSession, Fleet, InventoryResolver, fan_out};
pub use normalize::{FLOAT_MISSING, Fields, INT_MISSING, NA, Row};
pub use timer::parse_timer;
