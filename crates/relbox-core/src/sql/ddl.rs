use crate::model::schema::EntitySchema;
use crate::sql::{
    mapping_index_column, mapping_owner_column, mapping_table_name, mapping_target_column,
};

/// `CREATE TABLE IF NOT EXISTS` for the class table.
pub fn create_table_sql(schema: &EntitySchema) -> String {
    let columns: Vec<String> = schema
        .columns()
        .iter()
        .map(|c| {
            let mut def = format!("{} {}", c.name, c.kind.sql_type());
            if c.not_null {
                def.push_str(" NOT NULL");
            }
            if c.unique {
                def.push_str(" UNIQUE");
            }
            if c.primary_key {
                def.push_str(" PRIMARY KEY");
            }
            if c.auto_increment {
                def.push_str(" AUTOINCREMENT");
            }
            def
        })
        .collect();

    format!(
        "CREATE TABLE IF NOT EXISTS {} ({})",
        schema.table(),
        columns.join(", ")
    )
}

/// One `CREATE TABLE IF NOT EXISTS` per distinct relation target table.
///
/// Every relation field pointing at the same target contributes its own
/// owner and index columns to the shared mapping table.
pub fn create_mapping_tables_sql(schema: &EntitySchema) -> Vec<String> {
    let owner = schema.table();
    schema
        .target_tables()
        .into_iter()
        .map(|target| {
            let mut columns: Vec<String> = Vec::new();
            for relation in schema.relations_to(target) {
                columns.push(format!(
                    "{} INTEGER",
                    mapping_owner_column(owner, &relation.field)
                ));
                columns.push(format!(
                    "{} INTEGER",
                    mapping_index_column(owner, &relation.field)
                ));
            }
            columns.push(format!("{} INTEGER NOT NULL", mapping_target_column(target)));
            format!(
                "CREATE TABLE IF NOT EXISTS {} ({})",
                mapping_table_name(owner, target),
                columns.join(", ")
            )
        })
        .collect()
}

pub fn drop_table_sql(table: &str) -> String {
    format!("DROP TABLE IF EXISTS {table}")
}
