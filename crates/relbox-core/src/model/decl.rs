//! Declared shape of a mapped class.
//!
//! A `ClassDecl` is what an annotation scanner or a hand-written
//! registration hands to the catalog: the class name, an optional table
//! marker and every field with its declared type and mapping. Nothing here
//! is validated; `catalog::describe` does that.

use crate::errors::Result;
use crate::model::schema::Cardinality;
use crate::value::Value;

/// Declared type of a field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldType {
    Bool,
    Byte,
    Short,
    Int,
    Long,
    Float,
    Double,
    String,
    Date,
    Bytes,
    /// Any other type, named for diagnostics.
    Other(String),
}

impl FieldType {
    pub fn name(&self) -> &str {
        match self {
            FieldType::Bool => "bool",
            FieldType::Byte => "i8",
            FieldType::Short => "i16",
            FieldType::Int => "i32",
            FieldType::Long => "i64",
            FieldType::Float => "f32",
            FieldType::Double => "f64",
            FieldType::String => "String",
            FieldType::Date => "DateTime<Utc>",
            FieldType::Bytes => "Vec<u8>",
            FieldType::Other(name) => name,
        }
    }
}

/// Column constraints, all off by default.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnAttrs {
    pub name: Option<String>,
    pub not_null: bool,
    pub unique: bool,
    pub primary_key: bool,
    pub auto_increment: bool,
}

impl ColumnAttrs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store the field under a different column name.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn not_null(mut self) -> Self {
        self.not_null = true;
        self
    }

    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self
    }

    pub fn auto_increment(mut self) -> Self {
        self.auto_increment = true;
        self
    }
}

/// Reference to another record type, resolved lazily so that declarations
/// can point at each other without recursing at construction time.
#[derive(Clone, Copy)]
pub struct TypeRef {
    type_name: &'static str,
    declare: fn() -> ClassDecl,
}

impl TypeRef {
    pub fn of<T: Record>() -> Self {
        Self {
            type_name: std::any::type_name::<T>(),
            declare: T::declare,
        }
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn declare(&self) -> ClassDecl {
        (self.declare)()
    }
}

impl std::fmt::Debug for TypeRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("TypeRef").field(&self.type_name).finish()
    }
}

/// How a field is persisted.
#[derive(Debug, Clone)]
pub enum FieldMapping {
    /// Not persisted at all.
    Unmapped,
    /// Stored in a column of the class table.
    Column(ColumnAttrs),
    /// Stored as rows of a mapping table.
    Relation {
        target: TypeRef,
        cardinality: Cardinality,
    },
}

#[derive(Debug, Clone)]
pub struct FieldDecl {
    pub name: String,
    pub ty: FieldType,
    pub mapping: FieldMapping,
}

/// Declaration of one class.
#[derive(Debug, Clone)]
pub struct ClassDecl {
    class_name: String,
    /// `None` when the class carries no table marker; `Some(None)` when the
    /// marker uses the class name.
    table: Option<Option<String>>,
    fields: Vec<FieldDecl>,
}

impl ClassDecl {
    pub fn new(class_name: impl Into<String>) -> Self {
        Self {
            class_name: class_name.into(),
            table: None,
            fields: Vec::new(),
        }
    }

    /// Mark the class as a table named after the class.
    pub fn table(mut self) -> Self {
        self.table = Some(None);
        self
    }

    /// Mark the class as a table with an explicit name.
    pub fn table_named(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        self.table = Some(if name.is_empty() { None } else { Some(name) });
        self
    }

    /// Declare the 64-bit identity field `id`.
    pub fn id(self) -> Self {
        self.field(crate::model::schema::ID_COLUMN, FieldType::Long)
    }

    /// Declare a field with no persistence mapping.
    pub fn field(mut self, name: impl Into<String>, ty: FieldType) -> Self {
        self.fields.push(FieldDecl {
            name: name.into(),
            ty,
            mapping: FieldMapping::Unmapped,
        });
        self
    }

    /// Declare a column field.
    pub fn column(mut self, name: impl Into<String>, ty: FieldType, attrs: ColumnAttrs) -> Self {
        self.fields.push(FieldDecl {
            name: name.into(),
            ty,
            mapping: FieldMapping::Column(attrs),
        });
        self
    }

    /// Declare a relation field holding one or more `T`.
    pub fn relation<T: Record>(mut self, name: impl Into<String>, cardinality: Cardinality) -> Self {
        let target = TypeRef::of::<T>();
        let ty = match cardinality {
            Cardinality::Single => FieldType::Other(target.type_name().to_string()),
            Cardinality::Array | Cardinality::List => {
                FieldType::Other(format!("Vec<{}>", target.type_name()))
            }
        };
        self.fields.push(FieldDecl {
            name: name.into(),
            ty,
            mapping: FieldMapping::Relation {
                target,
                cardinality,
            },
        });
        self
    }

    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    pub fn has_table_marker(&self) -> bool {
        self.table.is_some()
    }

    /// Table name, if the class is marked as a table.
    pub fn table_name(&self) -> Option<&str> {
        self.table
            .as_ref()
            .map(|name| name.as_deref().unwrap_or(&self.class_name))
    }

    pub fn fields(&self) -> &[FieldDecl] {
        &self.fields
    }
}

/// A plain data type that can be persisted.
///
/// Implementations describe themselves through `declare` and expose their
/// fields by name. Accessors are only ever called with field names the
/// declaration contains.
pub trait Record: 'static {
    /// Declared shape of the type.
    fn declare() -> ClassDecl;

    /// Current identity; 0 means "not persisted".
    fn id(&self) -> i64;

    /// Overwrite the identity.
    ///
    /// Only the repository calls this: after an insert commits and after a
    /// remove commits.
    fn set_id(&mut self, id: i64);

    /// Value of a column field, `None` for an unknown field.
    fn column(&self, field: &str) -> Option<Value>;

    /// Write a column field read back from the database.
    fn set_column(&mut self, field: &str, value: Value) -> Result<()>;

    /// Identities of the objects held by a relation field, by position.
    ///
    /// `None` entries are absent elements; they are not written but still
    /// occupy their position.
    fn relation_ids(&self, field: &str) -> Vec<Option<i64>>;
}

/// Relation ids of an optional single object.
pub fn single_id<T: Record>(value: Option<&T>) -> Vec<Option<i64>> {
    value.map(|v| vec![Some(v.id())]).unwrap_or_default()
}

/// Relation ids of a sequence, in order.
pub fn sequence_ids<T: Record>(values: &[T]) -> Vec<Option<i64>> {
    values.iter().map(|v| Some(v.id())).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_name_defaults_to_class_name() {
        let decl = ClassDecl::new("Course").table();
        assert_eq!(decl.table_name(), Some("Course"));

        let decl = ClassDecl::new("Course").table_named("courses");
        assert_eq!(decl.table_name(), Some("courses"));

        let decl = ClassDecl::new("Course").table_named("");
        assert_eq!(decl.table_name(), Some("Course"));
    }

    #[test]
    fn test_unmarked_class_has_no_table_name() {
        let decl = ClassDecl::new("Loose");
        assert!(!decl.has_table_marker());
        assert_eq!(decl.table_name(), None);
    }

    #[test]
    fn test_column_attrs_builder() {
        let attrs = ColumnAttrs::new().named("title").not_null().unique();
        assert_eq!(attrs.name.as_deref(), Some("title"));
        assert!(attrs.not_null && attrs.unique);
        assert!(!attrs.primary_key && !attrs.auto_increment);
    }
}
