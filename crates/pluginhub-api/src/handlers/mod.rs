//! Request handlers.

pub mod health;
pub mod plugin_market;
