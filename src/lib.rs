//! Client library for a personal book catalog service.
//!
//! - `services::schema`: runtime-loaded search schema with a cached handle
//! - `services::decode`: binary search-response decoding into typed records
//! - `services::shelf`: bookshelf CRUD with read-after-write reconciliation
//! - `services::discovery`: search and suggestion flows behind a
//!   presentation sink

pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod utils;
