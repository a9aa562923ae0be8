use thiserror::Error;

/// Result type alias using RelboxError
pub type Result<T> = std::result::Result<T, RelboxError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code that callers and tests can match on
/// without parsing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Structural
    InvalidInput,
    SchemaInvalid,
    UnbalancedGroup,

    // Write side
    ConstraintViolation,
    UnsavedRelation,
    NotPersisted,

    // Read side
    Hydration,
    TypeMismatch,
    UnknownField,
    NotFound,

    // Integration/IO
    Persistence,
    Config,
    Io,
    Serialization,

    // Internal
    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            ExErrorKind::SchemaInvalid => "ERR_SCHEMA_INVALID",
            ExErrorKind::UnbalancedGroup => "ERR_UNBALANCED_GROUP",
            ExErrorKind::ConstraintViolation => "ERR_CONSTRAINT_VIOLATION",
            ExErrorKind::UnsavedRelation => "ERR_UNSAVED_RELATION",
            ExErrorKind::NotPersisted => "ERR_NOT_PERSISTED",
            ExErrorKind::Hydration => "ERR_HYDRATION",
            ExErrorKind::TypeMismatch => "ERR_TYPE_MISMATCH",
            ExErrorKind::UnknownField => "ERR_UNKNOWN_FIELD",
            ExErrorKind::NotFound => "ERR_NOT_FOUND",
            ExErrorKind::Persistence => "ERR_PERSISTENCE",
            ExErrorKind::Config => "ERR_CONFIG",
            ExErrorKind::Io => "ERR_IO",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }
}

/// Canonical structured error type
///
/// Carries a classification kind for programmatic handling and optional
/// context (operation, table, field, entity id) for debugging.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    table: Option<String>,
    field: Option<String>,
    entity_id: Option<i64>,
    message: String,
    source: Option<Box<ExError>>,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            table: None,
            field: None,
            entity_id: None,
            message: String::new(),
            source: None,
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add table context
    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = Some(table.into());
        self
    }

    /// Add field context
    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    /// Add entity identity context
    pub fn with_entity_id(mut self, id: i64) -> Self {
        self.entity_id = Some(id);
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Add source error
    pub fn with_source(mut self, source: ExError) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Get the operation context, if any
    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    /// Get the table context, if any
    pub fn table(&self) -> Option<&str> {
        self.table.as_deref()
    }

    /// Get the field context, if any
    pub fn field(&self) -> Option<&str> {
        self.field.as_deref()
    }

    /// Get the entity identity context, if any
    pub fn entity_id(&self) -> Option<i64> {
        self.entity_id
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the source error, if any
    pub fn source_error(&self) -> Option<&ExError> {
        self.source.as_deref()
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(table) = &self.table {
            write!(f, " (table: {})", table)?;
        }
        if let Some(field) = &self.field {
            write!(f, " (field: {})", field)?;
        }
        if let Some(id) = self.entity_id {
            write!(f, " (id: {})", id)?;
        }
        if let Some(source) = &self.source {
            write!(f, " caused by {}", source)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

// ========== End Error Facility ==========

/// Typed error taxonomy for relbox operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RelboxError {
    // ===== Schema Errors =====
    /// The class carries no table marker
    #[error("Class {class} has no table marker")]
    MissingTableMarker { class: String },

    /// The class has no 64-bit `id` field
    #[error("Class {class} has no 64-bit integer `id` field")]
    MissingIdentity { class: String },

    /// The identity is the only mapped column
    #[error("Class {class} maps only the `id` column, which is unsupported")]
    IdentityOnly { class: String },

    /// A column field has a type outside the storable set
    #[error("Unsupported column type {type_name} on {class}.{field}")]
    UnsupportedColumnType {
        class: String,
        field: String,
        type_name: String,
    },

    /// A relation field targets a class that is not itself a table
    #[error("Relation {class}.{field} targets {target}, which is not a table")]
    RelationTargetNotMapped {
        class: String,
        field: String,
        target: String,
    },

    /// A non-identity field maps onto the identity column name
    #[error("Field {class}.{field} maps to column `id`, reserved for the 64-bit identity")]
    ReservedColumnName { class: String, field: String },

    /// Two fields map onto the same column
    #[error("Class {class} maps more than one field to column {column}")]
    DuplicateColumn { class: String, column: String },

    /// Two classes contain each other, directly or transitively
    #[error("Relation {class}.{field} forms a cycle through {target}")]
    CyclicRelation {
        class: String,
        field: String,
        target: String,
    },

    // ===== Condition Errors =====
    /// begin_group / end_group calls do not balance
    #[error("Condition has {open} unbalanced group(s)")]
    UnbalancedGroup { open: i32 },

    // ===== Write Errors =====
    /// A statement touched an unexpected number of rows
    #[error("{op} on {table} affected {actual} row(s), expected {expected}")]
    ConstraintViolation {
        table: String,
        op: String,
        expected: usize,
        actual: usize,
    },

    /// A related object has not been saved yet
    #[error("Related object in {field} (table {target}) has no identity; save it first")]
    UnsavedRelation { field: String, target: String },

    /// The instance was never persisted
    #[error("Instance of {table} has no identity")]
    NotPersisted { table: String },

    // ===== Read Errors =====
    /// A row group could not be turned into an object
    #[error("Cannot hydrate {table}: {reason}")]
    Hydration { table: String, reason: String },

    /// A value does not fit the field it is written to
    #[error("Expected {expected} value, found {found}")]
    ValueMismatch { expected: String, found: String },

    /// An accessor was asked for a field it does not know
    #[error("Unknown field {field} on {class}")]
    UnknownField { class: String, field: String },

    // ===== Internal =====
    /// A builder invariant was broken
    #[error("Internal invariant violated: {reason}")]
    Internal { reason: String },
}

impl RelboxError {
    /// Whether this error describes a bad class shape
    pub fn is_schema_error(&self) -> bool {
        matches!(
            self,
            RelboxError::MissingTableMarker { .. }
                | RelboxError::MissingIdentity { .. }
                | RelboxError::IdentityOnly { .. }
                | RelboxError::UnsupportedColumnType { .. }
                | RelboxError::RelationTargetNotMapped { .. }
                | RelboxError::CyclicRelation { .. }
                | RelboxError::ReservedColumnName { .. }
                | RelboxError::DuplicateColumn { .. }
        )
    }
}

/// Conversion from RelboxError to ExError
impl From<RelboxError> for ExError {
    fn from(err: RelboxError) -> Self {
        let message = err.to_string();
        match err {
            RelboxError::MissingTableMarker { class }
            | RelboxError::MissingIdentity { class }
            | RelboxError::IdentityOnly { class } => ExError::new(ExErrorKind::SchemaInvalid)
                .with_op("describe")
                .with_table(class)
                .with_message(message),

            RelboxError::UnsupportedColumnType { class, field, .. }
            | RelboxError::RelationTargetNotMapped { class, field, .. }
            | RelboxError::CyclicRelation { class, field, .. }
            | RelboxError::ReservedColumnName { class, field } => {
                ExError::new(ExErrorKind::SchemaInvalid)
                    .with_op("describe")
                    .with_table(class)
                    .with_field(field)
                    .with_message(message)
            }

            RelboxError::DuplicateColumn { class, .. } => ExError::new(ExErrorKind::SchemaInvalid)
                .with_op("describe")
                .with_table(class)
                .with_message(message),

            RelboxError::UnbalancedGroup { .. } => ExError::new(ExErrorKind::UnbalancedGroup)
                .with_op("build_condition")
                .with_message(message),

            RelboxError::ConstraintViolation { table, op, .. } => {
                ExError::new(ExErrorKind::ConstraintViolation)
                    .with_op(op)
                    .with_table(table)
                    .with_message(message)
            }

            RelboxError::UnsavedRelation { field, target } => {
                ExError::new(ExErrorKind::UnsavedRelation)
                    .with_table(target)
                    .with_field(field)
                    .with_message(message)
            }

            RelboxError::NotPersisted { table } => ExError::new(ExErrorKind::NotPersisted)
                .with_table(table)
                .with_message(message),

            RelboxError::Hydration { table, .. } => ExError::new(ExErrorKind::Hydration)
                .with_op("hydrate")
                .with_table(table)
                .with_message(message),

            RelboxError::ValueMismatch { .. } => {
                ExError::new(ExErrorKind::TypeMismatch).with_message(message)
            }

            RelboxError::UnknownField { class, field } => ExError::new(ExErrorKind::UnknownField)
                .with_table(class)
                .with_field(field)
                .with_message(message),

            RelboxError::Internal { .. } => {
                ExError::new(ExErrorKind::Internal).with_message(message)
            }
        }
    }
}
