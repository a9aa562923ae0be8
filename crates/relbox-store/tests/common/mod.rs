#![allow(dead_code)]

use chrono::{DateTime, Utc};
use relbox_core::model::{sequence_ids, single_id};
use relbox_core::{Cardinality, ClassDecl, ColumnAttrs, FieldType, Record, RelboxError, Value};
use relbox_store::{Database, Entity, Related, StoreConfig};

fn unknown(class: &str, field: &str) -> RelboxError {
    RelboxError::UnknownField {
        class: class.to_string(),
        field: field.to_string(),
    }
}

pub fn memory_db() -> Database {
    Database::open(StoreConfig::in_memory()).unwrap()
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Course {
    pub id: i64,
    pub name: String,
}

impl Course {
    pub fn named(name: &str) -> Self {
        Self {
            id: 0,
            name: name.to_string(),
        }
    }
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

impl Entity for Course {
    fn set_relation(&mut self, _field: &str, _related: Related<'_, '_>) -> relbox_store::Result<()> {
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Clazz {
    pub id: i64,
    pub name: String,
}

impl Clazz {
    pub fn named(name: &str) -> Self {
        Self {
            id: 0,
            name: name.to_string(),
        }
    }
}

impl Record for Clazz {
    fn declare() -> ClassDecl {
        ClassDecl::new("Clazz")
            .table()
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

impl Entity for Clazz {
    fn set_relation(&mut self, _field: &str, _related: Related<'_, '_>) -> relbox_store::Result<()> {
        Ok(())
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

impl Student {
    pub fn named(name: &str, age: i32) -> Self {
        Self {
            name: name.to_string(),
            age,
            ..Self::default()
        }
    }
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

impl Entity for Student {
    fn set_relation(&mut self, field: &str, related: Related<'_, '_>) -> relbox_store::Result<()> {
        match field {
            "clazz" => self.clazz = related.one()?,
            "course_list" => self.course_list = related.many()?,
            "favorite_courses" => self.favorite_courses = Some(related.many()?),
            _ => {}
        }
        Ok(())
    }
}

/// Owner two levels above `Course`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct School {
    pub id: i64,
    pub name: String,
    pub students: Vec<Student>,
}

impl Record for School {
    fn declare() -> ClassDecl {
        ClassDecl::new("School")
            .table()
            .id()
            .column("name", FieldType::String, ColumnAttrs::new())
            .relation::<Student>("students", Cardinality::List)
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
            _ => return Err(unknown("School", field)),
        }
        Ok(())
    }

    fn relation_ids(&self, field: &str) -> Vec<Option<i64>> {
        match field {
            "students" => sequence_ids(&self.students),
            _ => Vec::new(),
        }
    }
}

impl Entity for School {
    fn set_relation(&mut self, field: &str, related: Related<'_, '_>) -> relbox_store::Result<()> {
        if field == "students" {
            self.students = related.many()?;
        }
        Ok(())
    }
}

/// Ordered list that may contain gaps.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Playlist {
    pub id: i64,
    pub title: String,
    pub tracks: Vec<Option<Course>>,
}

impl Record for Playlist {
    fn declare() -> ClassDecl {
        ClassDecl::new("Playlist")
            .table()
            .id()
            .column("title", FieldType::String, ColumnAttrs::new())
            .relation::<Course>("tracks", Cardinality::List)
    }

    fn id(&self) -> i64 {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = id;
    }

    fn column(&self, field: &str) -> Option<Value> {
        match field {
            "title" => Some(Value::from(&self.title)),
            _ => None,
        }
    }

    fn set_column(&mut self, field: &str, value: Value) -> relbox_core::Result<()> {
        match field {
            "title" => self.title = value.try_into()?,
            _ => return Err(unknown("Playlist", field)),
        }
        Ok(())
    }

    fn relation_ids(&self, field: &str) -> Vec<Option<i64>> {
        match field {
            "tracks" => self
                .tracks
                .iter()
                .map(|t| t.as_ref().map(|c| c.id))
                .collect(),
            _ => Vec::new(),
        }
    }
}

impl Entity for Playlist {
    fn set_relation(&mut self, field: &str, related: Related<'_, '_>) -> relbox_store::Result<()> {
        if field == "tracks" {
            self.tracks = related.many::<Course>()?.into_iter().map(Some).collect();
        }
        Ok(())
    }
}

/// One column of every storage kind.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sample {
    pub id: i64,
    pub flag: bool,
    pub tiny: i8,
    pub small: i16,
    pub medium: i32,
    pub large: i64,
    pub ratio: f32,
    pub precise: f64,
    pub label: Option<String>,
    pub taken_at: Option<DateTime<Utc>>,
    pub payload: Vec<u8>,
}

impl Record for Sample {
    fn declare() -> ClassDecl {
        ClassDecl::new("Sample")
            .table()
            .id()
            .column("flag", FieldType::Bool, ColumnAttrs::new())
            .column("tiny", FieldType::Byte, ColumnAttrs::new())
            .column("small", FieldType::Short, ColumnAttrs::new())
            .column("medium", FieldType::Int, ColumnAttrs::new())
            .column("large", FieldType::Long, ColumnAttrs::new())
            .column("ratio", FieldType::Float, ColumnAttrs::new())
            .column("precise", FieldType::Double, ColumnAttrs::new())
            .column("label", FieldType::String, ColumnAttrs::new())
            .column("taken_at", FieldType::Date, ColumnAttrs::new())
            .column("payload", FieldType::Bytes, ColumnAttrs::new())
    }

    fn id(&self) -> i64 {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = id;
    }

    fn column(&self, field: &str) -> Option<Value> {
        let value = match field {
            "flag" => Value::from(self.flag),
            "tiny" => Value::from(self.tiny),
            "small" => Value::from(self.small),
            "medium" => Value::from(self.medium),
            "large" => Value::from(self.large),
            "ratio" => Value::from(self.ratio),
            "precise" => Value::from(self.precise),
            "label" => Value::from(self.label.clone()),
            "taken_at" => Value::from(self.taken_at),
            "payload" => Value::from(self.payload.clone()),
            _ => return None,
        };
        Some(value)
    }

    fn set_column(&mut self, field: &str, value: Value) -> relbox_core::Result<()> {
        match field {
            "flag" => self.flag = value.try_into()?,
            "tiny" => self.tiny = value.try_into()?,
            "small" => self.small = value.try_into()?,
            "medium" => self.medium = value.try_into()?,
            "large" => self.large = value.try_into()?,
            "ratio" => self.ratio = value.try_into()?,
            "precise" => self.precise = value.try_into()?,
            "label" => self.label = value.optional()?,
            "taken_at" => self.taken_at = value.optional()?,
            "payload" => self.payload = value.try_into()?,
            _ => return Err(unknown("Sample", field)),
        }
        Ok(())
    }

    fn relation_ids(&self, _field: &str) -> Vec<Option<i64>> {
        Vec::new()
    }
}

impl Entity for Sample {
    fn set_relation(&mut self, _field: &str, _related: Related<'_, '_>) -> relbox_store::Result<()> {
        Ok(())
    }
}

/// Rejects negative scores when read back.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Score {
    pub id: i64,
    pub points: i32,
}

impl Record for Score {
    fn declare() -> ClassDecl {
        ClassDecl::new("Score")
            .table()
            .id()
            .column("points", FieldType::Int, ColumnAttrs::new())
    }

    fn id(&self) -> i64 {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = id;
    }

    fn column(&self, field: &str) -> Option<Value> {
        match field {
            "points" => Some(Value::from(self.points)),
            _ => None,
        }
    }

    fn set_column(&mut self, field: &str, value: Value) -> relbox_core::Result<()> {
        match field {
            "points" => {
                let points: i32 = value.try_into()?;
                if points < 0 {
                    return Err(RelboxError::ValueMismatch {
                        expected: "non-negative points".to_string(),
                        found: points.to_string(),
                    });
                }
                self.points = points;
            }
            _ => return Err(unknown("Score", field)),
        }
        Ok(())
    }

    fn relation_ids(&self, _field: &str) -> Vec<Option<i64>> {
        Vec::new()
    }
}

impl Entity for Score {
    fn set_relation(&mut self, _field: &str, _related: Related<'_, '_>) -> relbox_store::Result<()> {
        Ok(())
    }
}

/// Column declared NOT NULL but optional on the Rust side.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ticket {
    pub id: i64,
    pub code: Option<String>,
    pub courses: Vec<Course>,
}

impl Record for Ticket {
    fn declare() -> ClassDecl {
        ClassDecl::new("Ticket")
            .table()
            .id()
            .column("code", FieldType::String, ColumnAttrs::new().not_null())
            .relation::<Course>("courses", Cardinality::List)
    }

    fn id(&self) -> i64 {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = id;
    }

    fn column(&self, field: &str) -> Option<Value> {
        match field {
            "code" => Some(Value::from(self.code.clone())),
            _ => None,
        }
    }

    fn set_column(&mut self, field: &str, value: Value) -> relbox_core::Result<()> {
        match field {
            "code" => self.code = value.optional()?,
            _ => return Err(unknown("Ticket", field)),
        }
        Ok(())
    }

    fn relation_ids(&self, field: &str) -> Vec<Option<i64>> {
        match field {
            "courses" => sequence_ids(&self.courses),
            _ => Vec::new(),
        }
    }
}

impl Entity for Ticket {
    fn set_relation(&mut self, field: &str, related: Related<'_, '_>) -> relbox_store::Result<()> {
        if field == "courses" {
            self.courses = related.many()?;
        }
        Ok(())
    }
}

/// Save `names` as courses and return them with identities.
pub fn saved_courses(db: &Database, names: &[&str]) -> Vec<Course> {
    let repo = db.repository::<Course>().unwrap();
    names
        .iter()
        .map(|name| {
            let mut course = Course::named(name);
            repo.save(&mut course).unwrap();
            course
        })
        .collect()
}

pub fn count_rows(db: &Database, table: &str) -> i64 {
    db.connection()
        .query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| row.get(0))
        .unwrap()
}
