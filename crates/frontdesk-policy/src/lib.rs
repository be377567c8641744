//! Policy enforcement for the Frontdesk assistant.
//!
//! Two pure components sit between the caller and any data:
//!
//! - [`gate::AccessGate`]: role-based authorization against the static
//!   intent catalog, evaluated before any data access.
//! - [`sanitize`]: field-level whitelist projection applied to every
//!   payload before it reaches response composition. This is the privacy
//!   boundary between the record store and the Text Oracle.

pub mod gate;
pub mod sanitize;

pub use gate::{AccessGate, Decision};
pub use sanitize::sanitize;
