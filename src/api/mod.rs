//! API Lambda handler and response helpers

pub mod handler;
pub mod helpers;

pub use handler::handler;
