//! Declarative resource definitions.
//!
//! Each API resource is described once by a static [`ResourceDef`]: its
//! table, URL nouns, fields, filters, references and access policy. The
//! generic controllers and the entity services are driven entirely by these
//! definitions.

use crate::db::models::Record;

use super::validation::ValidationErrors;

/// Storage/coercion type of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Integer,
    Decimal,
    Text,
    Boolean,
    /// ISO `YYYY-MM-DD`
    Date,
}

impl FieldKind {
    pub fn name(self) -> &'static str {
        match self {
            FieldKind::Integer => "integer",
            FieldKind::Decimal => "decimal",
            FieldKind::Text => "string",
            FieldKind::Boolean => "boolean",
            FieldKind::Date => "date",
        }
    }
}

/// How a field may be used to filter list endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterKind {
    None,
    Exact,
    Like,
}

/// What a `*_id` field points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reference {
    None,
    /// Row of another entity table.
    Entity(&'static str),
    /// Entry of a static lookup table.
    Lookup(&'static str),
}

#[derive(Debug, Clone, Copy)]
pub struct FieldDef {
    pub name: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    pub filter: FilterKind,
    pub reference: Reference,
    /// Never serialized in responses.
    pub hidden: bool,
    /// Computed server side; ignored in request bodies.
    pub derived: bool,
}

impl FieldDef {
    pub const fn new(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            required: false,
            filter: FilterKind::None,
            reference: Reference::None,
            hidden: false,
            derived: false,
        }
    }

    pub const fn int(name: &'static str) -> Self {
        Self::new(name, FieldKind::Integer)
    }

    pub const fn decimal(name: &'static str) -> Self {
        Self::new(name, FieldKind::Decimal)
    }

    pub const fn text(name: &'static str) -> Self {
        Self::new(name, FieldKind::Text)
    }

    pub const fn flag(name: &'static str) -> Self {
        Self::new(name, FieldKind::Boolean)
    }

    pub const fn date(name: &'static str) -> Self {
        Self::new(name, FieldKind::Date)
    }

    /// Integer foreign key to another entity table.
    pub const fn belongs_to(name: &'static str, table: &'static str) -> Self {
        Self {
            reference: Reference::Entity(table),
            ..Self::int(name)
        }
    }

    /// Integer foreign key to a static lookup table.
    pub const fn lookup(name: &'static str, table: &'static str) -> Self {
        Self {
            reference: Reference::Lookup(table),
            ..Self::int(name)
        }
    }

    pub const fn required(self) -> Self {
        Self {
            required: true,
            ..self
        }
    }

    pub const fn exact(self) -> Self {
        Self {
            filter: FilterKind::Exact,
            ..self
        }
    }

    pub const fn like(self) -> Self {
        Self {
            filter: FilterKind::Like,
            ..self
        }
    }

    pub const fn hidden(self) -> Self {
        Self {
            hidden: true,
            ..self
        }
    }

    pub const fn derived(self) -> Self {
        Self {
            derived: true,
            ..self
        }
    }

    /// Attribute key used when a reference is expanded (`meeting_id` -> `meeting`).
    pub fn association_name(&self) -> &'static str {
        self.name.strip_suffix("_id").unwrap_or(self.name)
    }
}

/// Rights needed for an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    /// Any valid session.
    Session,
    /// CRUD grant on the named entity (admins always pass).
    Crud(&'static str),
    /// Admin grant.
    Admin,
}

#[derive(Debug, Clone, Copy)]
pub struct Access {
    pub read: Permission,
    pub write: Permission,
    pub delete: Permission,
}

impl Access {
    /// Session to read, CRUD grant on `entity` to change anything.
    pub const fn crud(entity: &'static str) -> Self {
        Self {
            read: Permission::Session,
            write: Permission::Crud(entity),
            delete: Permission::Crud(entity),
        }
    }

    /// Like [`Access::crud`] but deleting requires an admin.
    pub const fn crud_admin_delete(entity: &'static str) -> Self {
        Self {
            read: Permission::Session,
            write: Permission::Crud(entity),
            delete: Permission::Admin,
        }
    }

    pub const fn admin() -> Self {
        Self {
            read: Permission::Admin,
            write: Permission::Admin,
            delete: Permission::Admin,
        }
    }
}

/// Endpoints mounted for a resource.
#[derive(Debug, Clone, Copy)]
pub struct Ops {
    pub show: bool,
    pub list: bool,
    pub create: bool,
    pub update: bool,
    pub delete: bool,
}

impl Ops {
    pub const ALL: Ops = Ops {
        show: true,
        list: true,
        create: true,
        update: true,
        delete: true,
    };

    /// Everything but the generic create (a dedicated endpoint exists).
    pub const NO_CREATE: Ops = Ops {
        create: false,
        ..Ops::ALL
    };
}

/// Child rows removed together with a parent row.
#[derive(Debug, Clone, Copy)]
pub struct Cascade {
    pub table: &'static str,
    pub foreign_key: &'static str,
}

/// Context handed to save hooks.
#[derive(Debug, Clone, Copy)]
pub struct SaveContext<'a> {
    pub current_user_id: i64,
    /// Stored row when updating, `None` when creating.
    pub existing: Option<&'a Record>,
}

impl SaveContext<'_> {
    pub fn is_create(&self) -> bool {
        self.existing.is_none()
    }
}

/// Normalizes or derives attributes right before they are validated and stored.
pub type SaveHook = fn(&mut Record, &SaveContext<'_>) -> Result<(), ValidationErrors>;

pub struct ResourceDef {
    /// Storage table, also the plural path segment.
    pub table: &'static str,
    /// Singular path segment.
    pub singular: &'static str,
    pub fields: &'static [FieldDef],
    pub access: Access,
    pub ops: Ops,
    pub cascades: &'static [Cascade],
    pub before_save: Option<SaveHook>,
}

impl std::fmt::Debug for ResourceDef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceDef")
            .field("table", &self.table)
            .field("singular", &self.singular)
            .finish_non_exhaustive()
    }
}

impl ResourceDef {
    pub fn plural(&self) -> &'static str {
        self.table
    }

    pub fn field(&self, name: &str) -> Option<&'static FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn exact_filter_keys(&self) -> Vec<&'static str> {
        self.filter_keys(FilterKind::Exact)
    }

    pub fn like_filter_keys(&self) -> Vec<&'static str> {
        self.filter_keys(FilterKind::Like)
    }

    fn filter_keys(&self, kind: FilterKind) -> Vec<&'static str> {
        self.fields
            .iter()
            .filter(|f| f.filter == kind)
            .map(|f| f.name)
            .collect()
    }

    /// Copy of `record` without hidden fields.
    pub fn present(&self, record: &Record) -> Record {
        let mut out = record.clone();
        for field in self.fields.iter().filter(|f| f.hidden) {
            out.remove(field.name);
        }
        out
    }
}
