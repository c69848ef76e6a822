//! Domain model: resource registry, validation, lookups and timings.

pub mod lookup;
pub mod resource;
pub mod resources;
pub mod timing;
pub mod validation;

pub use lookup::{lookup_entry, lookup_table, LookupEntry};
pub use resource::{
    Access, Cascade, FieldDef, FieldKind, FilterKind, Ops, Permission, Reference, ResourceDef,
    SaveContext,
};
pub use resources::{resource, RESOURCES};
pub use timing::Timing;
pub use validation::{ParamError, ValidationErrors};
