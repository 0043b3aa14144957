//! Request handlers.

pub mod compose;
pub mod health;

pub use compose::*;
pub use health::*;
