//! Service layer between the HTTP handlers and the repository.
//!
//! Services take a `&dyn FullRepository` and never touch HTTP types, so they
//! are unit tested directly against the in-memory backend.

pub mod bootstrap;
pub mod entities;
pub mod entry_time;
pub mod reservations;

pub use entities::EntityError;
pub use entry_time::{find_entry_time, EntryTime, EntryTimeType};
pub use reservations::{create_reservation, ReservationError};
