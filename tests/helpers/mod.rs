//! Shared test helpers
#![allow(dead_code)]

pub mod database_helper;
pub mod test_data;

pub use database_helper::TestDatabase;
pub use test_data::*;
