//! # Goggles API
//!
//! Versioned JSON REST API for swim-meet results and team management:
//! meetings, swimmers, teams, results, reservations, seasons and friends.
//!
//! ## Architecture
//!
//! - [`models`]: declarative resource registry, validation, lookups, timings
//! - [`db`]: repository traits, filters, in-memory and Postgres backends
//! - [`auth`]: session tokens, passwords and grant checks
//! - [`services`]: generic CRUD and the few endpoints with real logic
//! - [`http`]: axum router, handlers, pagination and error mapping
//! - [`config`]: environment configuration

// Allow large error types - RepositoryError contains rich context for debugging
#![allow(clippy::result_large_err)]

pub mod auth;
pub mod config;
pub mod db;
pub mod models;
pub mod services;

#[cfg(feature = "http-server")]
pub mod http;
