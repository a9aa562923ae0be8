//! SQL Builder
//!
//! Pure functions from a schema (and optionally an instance or a condition)
//! to SQL text with `?` placeholders. Nothing here executes anything.
//!
//! Layout of the auxiliary mapping table between owner table `A` and target
//! table `B`:
//!
//! | column | meaning |
//! |---|---|
//! | `_A_<field>_id` | owner identity, set only on rows written for `field` |
//! | `_A_<field>_index` | position within `field`, `-1` for single objects |
//! | `_B_id` | target identity, never null |

mod ddl;
mod dml;
mod select;

pub use ddl::{create_mapping_tables_sql, create_table_sql, drop_table_sql};
pub use dml::{
    build_mapping_values, build_values, delete_all_sql, delete_by_id_sql, delete_mappings_sql,
    insert_sql, update_by_id_sql, ValueMap,
};
pub use select::{query_sql, OrderClause};

/// Position written for single-object relation rows.
pub const SINGLE_INDEX: i64 = -1;

/// `_A_B_mapping`
pub fn mapping_table_name(owner_table: &str, target_table: &str) -> String {
    format!("_{owner_table}_{target_table}_mapping")
}

/// `_A_field_id`
pub fn mapping_owner_column(owner_table: &str, field: &str) -> String {
    format!("_{owner_table}_{field}_id")
}

/// `_A_field_index`
pub fn mapping_index_column(owner_table: &str, field: &str) -> String {
    format!("_{owner_table}_{field}_index")
}

/// `_B_id`
pub fn mapping_target_column(target_table: &str) -> String {
    format!("_{target_table}_id")
}
