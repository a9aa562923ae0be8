#![allow(dead_code)]

use relbox_core::model::{sequence_ids, single_id};
use relbox_core::{Cardinality, ClassDecl, ColumnAttrs, FieldType, Record, RelboxError, Value};

fn unknown(class: &str, field: &str) -> RelboxError {
    RelboxError::UnknownField {
        class: class.to_string(),
        field: field.to_string(),
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Course {
    pub id: i64,
    pub name: String,
}

impl Record for Course {
    fn declare() -> ClassDecl {
        ClassDecl::new("Course")
            .table()
            .id()
            .column("name", FieldType::String, ColumnAttrs::new().not_null())
    }

    fn id(&self) -> i64 {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = id;
    }

    fn column(&self, field: &str) -> Option<Value> {
        match field {
            "name" => Some(Value::from(&self.name)),
            _ => None,
        }
    }

    fn set_column(&mut self, field: &str, value: Value) -> relbox_core::Result<()> {
        match field {
            "name" => self.name = value.try_into()?,
            _ => return Err(unknown("Course", field)),
        }
        Ok(())
    }

    fn relation_ids(&self, _field: &str) -> Vec<Option<i64>> {
        Vec::new()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Clazz {
    pub id: i64,
    pub name: String,
}

impl Record for Clazz {
    fn declare() -> ClassDecl {
        ClassDecl::new("Clazz")
            .table_named("clazz")
            .id()
            .column("name", FieldType::String, ColumnAttrs::new().named("title"))
    }

    fn id(&self) -> i64 {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = id;
    }

    fn column(&self, field: &str) -> Option<Value> {
        match field {
            "name" => Some(Value::from(&self.name)),
            _ => None,
        }
    }

    fn set_column(&mut self, field: &str, value: Value) -> relbox_core::Result<()> {
        match field {
            "name" => self.name = value.try_into()?,
            _ => return Err(unknown("Clazz", field)),
        }
        Ok(())
    }

    fn relation_ids(&self, _field: &str) -> Vec<Option<i64>> {
        Vec::new()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Student {
    pub id: i64,
    pub name: String,
    pub age: i32,
    pub clazz: Option<Clazz>,
    pub course_list: Vec<Course>,
    pub favorite_courses: Option<Vec<Course>>,
    pub nickname: String,
}

impl Record for Student {
    fn declare() -> ClassDecl {
        ClassDecl::new("Student")
            .table()
            .id()
            .column("name", FieldType::String, ColumnAttrs::new().not_null())
            .column("age", FieldType::Int, ColumnAttrs::new())
            .relation::<Clazz>("clazz", Cardinality::Single)
            .relation::<Course>("course_list", Cardinality::List)
            .relation::<Course>("favorite_courses", Cardinality::Array)
            .field("nickname", FieldType::String)
    }

    fn id(&self) -> i64 {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = id;
    }

    fn column(&self, field: &str) -> Option<Value> {
        match field {
            "name" => Some(Value::from(&self.name)),
            "age" => Some(Value::from(self.age)),
            _ => None,
        }
    }

    fn set_column(&mut self, field: &str, value: Value) -> relbox_core::Result<()> {
        match field {
            "name" => self.name = value.try_into()?,
            "age" => self.age = value.try_into()?,
            _ => return Err(unknown("Student", field)),
        }
        Ok(())
    }

    fn relation_ids(&self, field: &str) -> Vec<Option<i64>> {
        match field {
            "clazz" => single_id(self.clazz.as_ref()),
            "course_list" => sequence_ids(&self.course_list),
            "favorite_courses" => self
                .favorite_courses
                .as_deref()
                .map(sequence_ids)
                .unwrap_or_default(),
            _ => Vec::new(),
        }
    }
}

/// Record whose accessors only cover part of its declaration.
#[derive(Debug, Clone, Default)]
pub struct Lopsided {
    pub id: i64,
}

impl Record for Lopsided {
    fn declare() -> ClassDecl {
        ClassDecl::new("Lopsided")
            .table()
            .id()
            .column("a", FieldType::Int, ColumnAttrs::new())
            .column("b", FieldType::Int, ColumnAttrs::new())
    }

    fn id(&self) -> i64 {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = id;
    }

    fn column(&self, field: &str) -> Option<Value> {
        match field {
            "a" => Some(Value::Int(1)),
            _ => None,
        }
    }

    fn set_column(&mut self, _field: &str, _value: Value) -> relbox_core::Result<()> {
        Ok(())
    }

    fn relation_ids(&self, _field: &str) -> Vec<Option<i64>> {
        Vec::new()
    }
}

macro_rules! declared_only {
    ($name:ident, $decl:expr) => {
        #[derive(Debug, Clone, Default)]
        pub struct $name;

        impl Record for $name {
            fn declare() -> ClassDecl {
                $decl
            }

            fn id(&self) -> i64 {
                0
            }

            fn set_id(&mut self, _id: i64) {}

            fn column(&self, _field: &str) -> Option<Value> {
                None
            }

            fn set_column(&mut self, _field: &str, _value: Value) -> relbox_core::Result<()> {
                Ok(())
            }

            fn relation_ids(&self, _field: &str) -> Vec<Option<i64>> {
                Vec::new()
            }
        }
    };
}

declared_only!(
    Unmarked,
    ClassDecl::new("Unmarked")
        .id()
        .column("x", FieldType::Int, ColumnAttrs::new())
);

declared_only!(
    PointsAtUnmarked,
    ClassDecl::new("PointsAtUnmarked")
        .table()
        .id()
        .column("x", FieldType::Int, ColumnAttrs::new())
        .relation::<Unmarked>("loose", Cardinality::Single)
);

declared_only!(
    CycleA,
    ClassDecl::new("CycleA")
        .table()
        .id()
        .column("x", FieldType::Int, ColumnAttrs::new())
        .relation::<CycleB>("b", Cardinality::Single)
);

declared_only!(
    CycleB,
    ClassDecl::new("CycleB")
        .table()
        .id()
        .column("y", FieldType::Int, ColumnAttrs::new())
        .relation::<CycleA>("a", Cardinality::List)
);
