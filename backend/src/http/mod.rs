//! HTTP server module.
//!
//! An axum front end over the service layer:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │  HTTP Layer (axum handlers)                               │
//! │  - JWT session + grant checks                             │
//! │  - parameter coercion, pagination headers                 │
//! └───────────────────┬──────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼──────────────────────────────────────┐
//! │  Service Layer (services/)                                │
//! │  - generic entity CRUD, reservations, entry times         │
//! └───────────────────┬──────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼──────────────────────────────────────┐
//! │  Repository Layer (db/)                                   │
//! │  - LocalRepository / PostgresRepository                   │
//! └──────────────────────────────────────────────────────────┘
//! ```

pub mod auth;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod lookup;
pub mod pagination;
pub mod params;
pub mod reservations;
pub mod router;
pub mod session;
pub mod settings;
pub mod state;
pub mod tools;

pub use error::{AppError, X_ERROR_DETAIL};
pub use router::create_router;
pub use state::AppState;
