//! Type system utilities and aliases.
//!
//! ## Modules
//!
//! - [`aliases`]: Type aliases for single-threaded shared state.

pub mod aliases;

pub use aliases::*;
