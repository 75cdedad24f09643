//! HTTP handlers

pub mod health;
pub mod rpc;

pub use rpc::{router, AppState};
