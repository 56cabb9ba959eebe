//! Command implementations

pub mod check;
pub mod sync;

pub use check::run_check;
pub use sync::run_sync;
