//! Bulk load: a CSV-shaped file whose header names the target columns
//! and whose body rows are inserted one at a time through the same
//! `relational_insert` path `INSERT` statements use.

use std::fs::File;
use std::path::Path;

use crate::catalog::Catalog;
use crate::error::{EngineError, EngineResult};

fn load_error(path: &Path, reason: impl Into<String>) -> EngineError {
    EngineError::LoadError {
        path: path.display().to_string(),
        reason: reason.into(),
    }
}

/// Loads rows from `path` into the table named by the header line, which
/// must be `db.table.col1,db.table.col2,...` with every column belonging
/// to the same `db.table`. Fails closed: the file must open, the
/// qualifier must name the active database and an existing table, and
/// every row must have exactly the declared column count.
pub fn load_table(catalog: &mut Catalog, path: &Path) -> EngineResult<()> {
    let file = File::open(path).map_err(|e| load_error(path, e.to_string()))?;
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(file);

    let header = reader
        .headers()
        .map_err(|e| load_error(path, e.to_string()))?
        .clone();

    let qualified_table = qualified_table_from_header(path, &header)?;

    for record in reader.records() {
        let record = record.map_err(|e| load_error(path, e.to_string()))?;
        let mut row = Vec::with_capacity(record.len());
        for field in record.iter() {
            let value: i32 = atoi::atoi(field.trim().as_bytes())
                .ok_or_else(|| load_error(path, format!("not an integer: `{field}`")))?;
            row.push(value);
        }
        let table = catalog.lookup_table_mut(&qualified_table)?;
        if row.len() != table.declared_columns() {
            return Err(load_error(
                path,
                format!(
                    "row has {} values, expected {}",
                    row.len(),
                    table.declared_columns()
                ),
            ));
        }
        table
            .relational_insert(&row)
            .map_err(|e| load_error(path, e.to_string()))?;
    }
    Ok(())
}

/// Every header field is `db.table.col`; all must agree on `db.table`.
/// Returns that shared qualifier.
fn qualified_table_from_header(path: &Path, header: &csv::StringRecord) -> EngineResult<String> {
    let mut qualified_table = None;
    for field in header.iter() {
        let mut parts = field.splitn(3, '.');
        let db = parts
            .next()
            .ok_or_else(|| load_error(path, "missing database qualifier in header"))?;
        let table = parts
            .next()
            .ok_or_else(|| load_error(path, "missing table qualifier in header"))?;
        if parts.next().is_none() {
            return Err(load_error(path, format!("header field `{field}` has no column name")));
        }
        let this_qualifier = format!("{db}.{table}");
        match &qualified_table {
            None => qualified_table = Some(this_qualifier),
            Some(existing) if *existing == this_qualifier => {}
            Some(existing) => {
                return Err(load_error(
                    path,
                    format!("header names two tables: `{existing}` and `{this_qualifier}`"),
                ))
            }
        }
    }
    qualified_table.ok_or_else(|| load_error(path, "empty header"))
}
