//! Read-only reports: summary counts and rosters.

mod roster;
mod summary;

pub use roster::*;
pub use summary::*;
