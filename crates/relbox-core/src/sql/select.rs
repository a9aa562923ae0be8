use crate::condition::Condition;
use crate::errors::Result;
use crate::model::schema::{EntitySchema, ID_COLUMN};
use crate::sql::{mapping_owner_column, mapping_table_name};
use crate::value::Value;

/// One `ORDER BY` term on a column of the owner table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderClause {
    pub column: String,
    pub descending: bool,
}

impl OrderClause {
    pub fn asc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            descending: false,
        }
    }

    pub fn desc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            descending: true,
        }
    }
}

/// Joined `SELECT` for an entity and all of its mapping tables.
///
/// Each mapping table is joined once, matching rows written for any of the
/// owner's fields that target it. Owners without relation rows still come
/// back, padded with nulls. The owner identity is always the last ordering
/// term so that rows of one owner are contiguous.
///
/// # Errors
///
/// Propagates [`crate::errors::RelboxError::UnbalancedGroup`] from the
/// condition.
pub fn query_sql(
    schema: &EntitySchema,
    condition: &Condition,
    order: &[OrderClause],
) -> Result<(String, Vec<Value>)> {
    let owner = schema.table();
    let mut sql = format!("SELECT * FROM {owner}");

    for target in schema.target_tables() {
        let mapping = mapping_table_name(owner, target);
        let membership: Vec<String> = schema
            .relations_to(target)
            .map(|r| {
                format!(
                    "{mapping}.{} = {owner}.{ID_COLUMN}",
                    mapping_owner_column(owner, &r.field)
                )
            })
            .collect();
        sql.push_str(&format!(
            " LEFT JOIN {mapping} ON ({})",
            membership.join(" OR ")
        ));
    }

    let where_clause = condition.build(owner)?;
    if !where_clause.is_empty() {
        sql.push_str(&format!(" WHERE ({where_clause})"));
    }

    let mut terms: Vec<String> = order
        .iter()
        .map(|o| {
            if o.descending {
                format!("{owner}.{} DESC", o.column)
            } else {
                format!("{owner}.{}", o.column)
            }
        })
        .collect();
    terms.push(format!("{owner}.{ID_COLUMN}"));
    sql.push_str(&format!(" ORDER BY {}", terms.join(", ")));

    Ok((sql, condition.arguments().to_vec()))
}
