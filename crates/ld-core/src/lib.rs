//! ld-core: stable foundation for linedash.
//!
//! Contains:
//! - numeric (Real + tolerances + float helpers)
//! - ids (station identifiers)
//! - stations (station catalog: display names + baseline failure rates)
//! - error (shared error types)

pub mod error;
pub mod ids;
pub mod numeric;
pub mod stations;

pub use error::{LdError, LdResult};
pub use ids::*;
pub use numeric::*;
pub use stations::{StationCatalog, StationSpec};
