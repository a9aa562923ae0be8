//! Condition Builder
//!
//! A condition is a flat sequence of predicate tokens. Rendering folds the
//! sequence left to right against a table name, inserting an implicit `AND`
//! between two adjacent tokens unless the left one opens a group or is a
//! connector (`AND`, `OR`, `NOT`), or the right one closes a group or is a
//! binary connector.
//!
//! ```
//! use relbox_core::condition::Condition;
//!
//! let cond = Condition::new()
//!     .equal_to("name", "Richard")
//!     .begin_group()
//!     .less_than("age", 20)
//!     .or()
//!     .is_null("age")
//!     .end_group();
//! assert_eq!(
//!     cond.build("Student").unwrap(),
//!     "Student.name = ? AND ( Student.age < ? OR Student.age IS NULL )"
//! );
//! assert_eq!(cond.arguments().len(), 2);
//! ```

use crate::errors::{RelboxError, Result};
use crate::value::Value;

/// Binary comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    Eq,
    Ne,
    Gt,
    Lt,
    Ge,
    Le,
}

impl Comparison {
    pub fn as_sql(self) -> &'static str {
        match self {
            Comparison::Eq => "=",
            Comparison::Ne => "!=",
            Comparison::Gt => ">",
            Comparison::Lt => "<",
            Comparison::Ge => ">=",
            Comparison::Le => "<=",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Predicate {
    Compare { column: String, op: Comparison },
    Range { column: String },
    Pattern { column: String },
    Membership { column: String, count: usize },
    NullTest { column: String, negated: bool },
    Not,
    GroupOpen,
    GroupClose,
    And,
    Or,
}

impl Predicate {
    /// Whether a token may not be preceded by an implicit `AND`.
    fn binds_left(&self) -> bool {
        matches!(self, Predicate::GroupClose | Predicate::And | Predicate::Or)
    }

    /// Whether a token may not be followed by an implicit `AND`.
    fn binds_right(&self) -> bool {
        matches!(
            self,
            Predicate::GroupOpen | Predicate::And | Predicate::Or | Predicate::Not
        )
    }

    fn render(&self, table: &str) -> String {
        match self {
            Predicate::Compare { column, op } => {
                format!("{table}.{column} {} ?", op.as_sql())
            }
            Predicate::Range { column } => format!("{table}.{column} BETWEEN ? AND ?"),
            Predicate::Pattern { column } => format!("{table}.{column} LIKE ?"),
            Predicate::Membership { column, count } => {
                let placeholders = vec!["?"; *count].join(", ");
                format!("{table}.{column} IN ({placeholders})")
            }
            Predicate::NullTest { column, negated } => {
                if *negated {
                    format!("{table}.{column} IS NOT NULL")
                } else {
                    format!("{table}.{column} IS NULL")
                }
            }
            Predicate::Not => "NOT".to_string(),
            Predicate::GroupOpen => "(".to_string(),
            Predicate::GroupClose => ")".to_string(),
            Predicate::And => "AND".to_string(),
            Predicate::Or => "OR".to_string(),
        }
    }
}

/// Composable `WHERE` condition with positional arguments.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Condition {
    tokens: Vec<Predicate>,
    args: Vec<Value>,
    depth: i32,
}

impl Condition {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn equal_to(self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.compare(column, Comparison::Eq, value)
    }

    pub fn not_equal_to(self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.compare(column, Comparison::Ne, value)
    }

    pub fn greater_than(self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.compare(column, Comparison::Gt, value)
    }

    pub fn less_than(self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.compare(column, Comparison::Lt, value)
    }

    pub fn greater_than_or_equal_to(
        self,
        column: impl Into<String>,
        value: impl Into<Value>,
    ) -> Self {
        self.compare(column, Comparison::Ge, value)
    }

    pub fn less_than_or_equal_to(self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.compare(column, Comparison::Le, value)
    }

    pub fn compare(
        mut self,
        column: impl Into<String>,
        op: Comparison,
        value: impl Into<Value>,
    ) -> Self {
        self.tokens.push(Predicate::Compare {
            column: column.into(),
            op,
        });
        self.args.push(value.into());
        self
    }

    pub fn between(
        mut self,
        column: impl Into<String>,
        start: impl Into<Value>,
        end: impl Into<Value>,
    ) -> Self {
        self.tokens.push(Predicate::Range {
            column: column.into(),
        });
        self.args.push(start.into());
        self.args.push(end.into());
        self
    }

    pub fn like(mut self, column: impl Into<String>, pattern: impl Into<String>) -> Self {
        self.tokens.push(Predicate::Pattern {
            column: column.into(),
        });
        self.args.push(Value::Text(pattern.into()));
        self
    }

    /// `LIKE %part%`
    pub fn contains(self, column: impl Into<String>, part: &str) -> Self {
        self.like(column, format!("%{part}%"))
    }

    /// `LIKE prefix%`
    pub fn starts_with(self, column: impl Into<String>, prefix: &str) -> Self {
        self.like(column, format!("{prefix}%"))
    }

    /// `LIKE %suffix`
    pub fn ends_with(self, column: impl Into<String>, suffix: &str) -> Self {
        self.like(column, format!("%{suffix}"))
    }

    pub fn is_in<I, V>(mut self, column: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let before = self.args.len();
        self.args.extend(values.into_iter().map(Into::into));
        self.tokens.push(Predicate::Membership {
            column: column.into(),
            count: self.args.len() - before,
        });
        self
    }

    pub fn is_null(mut self, column: impl Into<String>) -> Self {
        self.tokens.push(Predicate::NullTest {
            column: column.into(),
            negated: false,
        });
        self
    }

    pub fn is_not_null(mut self, column: impl Into<String>) -> Self {
        self.tokens.push(Predicate::NullTest {
            column: column.into(),
            negated: true,
        });
        self
    }

    pub fn not(mut self) -> Self {
        self.tokens.push(Predicate::Not);
        self
    }

    pub fn begin_group(mut self) -> Self {
        self.tokens.push(Predicate::GroupOpen);
        self.depth += 1;
        self
    }

    pub fn end_group(mut self) -> Self {
        self.tokens.push(Predicate::GroupClose);
        self.depth -= 1;
        self
    }

    pub fn and(mut self) -> Self {
        self.tokens.push(Predicate::And);
        self
    }

    pub fn or(mut self) -> Self {
        self.tokens.push(Predicate::Or);
        self
    }

    /// Render the condition against `table`.
    ///
    /// # Errors
    ///
    /// Returns [`RelboxError::UnbalancedGroup`] when group opens and closes
    /// do not pair up.
    pub fn build(&self, table: &str) -> Result<String> {
        if self.depth != 0 {
            return Err(RelboxError::UnbalancedGroup { open: self.depth });
        }

        let mut parts: Vec<String> = Vec::with_capacity(self.tokens.len() * 2);
        let mut previous: Option<&Predicate> = None;
        for token in &self.tokens {
            if let Some(prev) = previous {
                if !prev.binds_right() && !token.binds_left() {
                    parts.push("AND".to_string());
                }
            }
            parts.push(token.render(table));
            previous = Some(token);
        }
        Ok(parts.join(" "))
    }

    /// Arguments for the `?` placeholders of [`Condition::build`], in call
    /// order.
    pub fn arguments(&self) -> &[Value] {
        &self.args
    }

    /// Number of groups opened but not yet closed.
    pub fn open_groups(&self) -> i32 {
        self.depth
    }
}
