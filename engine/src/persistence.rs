//! On-disk catalog layout: a small text metadata index plus one
//! file-mapped binary file per column.
//!
//! Mapping a file and immediately copying its contents into an owning
//! `Vec<i32>`, rather than holding the map open and operating on it
//! directly, keeps an in-memory column free to grow by doubling on the
//! very next insert. `memmap2` is used only transiently, inside this
//! module, at startup and shutdown; no map is ever held across an
//! operator boundary.

use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

use memmap2::{Mmap, MmapMut};

use crate::catalog::Catalog;
use crate::error::{EngineError, EngineResult};

const METADATA_FILE_NAME: &str = "metadata";

fn metadata_path(root: &Path) -> std::path::PathBuf {
    root.join(METADATA_FILE_NAME)
}

fn column_data_path(root: &Path, table: &str, column: &str) -> std::path::PathBuf {
    root.join(format!("{table}.{column}.data"))
}

/// Loads a persisted catalog from `root` into `catalog`, which must be
/// empty. If `root` does not exist, leaves the catalog empty and
/// succeeds: a fresh server with no prior shutdown has nothing to
/// rehydrate.
pub fn startup(catalog: &mut Catalog, root: &Path) -> EngineResult<()> {
    if !root.exists() {
        return Ok(());
    }

    let file = File::open(metadata_path(root))?;
    let mut lines = BufReader::new(file).lines();

    let header = lines
        .next()
        .ok_or_else(|| EngineError::Persistence(io_error("empty metadata file")))??;
    let (db_name, num_tables) = split_two(&header)?;
    let num_tables: usize = num_tables
        .parse()
        .map_err(|_| EngineError::Persistence(io_error("malformed table count")))?;

    catalog.create_db(db_name)?;

    for _ in 0..num_tables {
        let line = lines
            .next()
            .ok_or_else(|| EngineError::Persistence(io_error("truncated metadata file")))??;
        let mut parts = line.splitn(3, ',');
        let table_name = parts
            .next()
            .ok_or_else(|| EngineError::Persistence(io_error("malformed table line")))?;
        let num_columns: usize = parts
            .next()
            .ok_or_else(|| EngineError::Persistence(io_error("malformed table line")))?
            .parse()
            .map_err(|_| EngineError::Persistence(io_error("malformed column count")))?;
        let row_count: usize = parts
            .next()
            .ok_or_else(|| EngineError::Persistence(io_error("malformed table line")))?
            .parse()
            .map_err(|_| EngineError::Persistence(io_error("malformed row count")))?;

        catalog.create_table(db_name, table_name, num_columns)?;

        for _ in 0..num_columns {
            let column_name = lines
                .next()
                .ok_or_else(|| EngineError::Persistence(io_error("truncated metadata file")))??;
            let qualified_table = format!("{db_name}.{table_name}");
            catalog.create_column(&qualified_table, &column_name)?;

            let values = if row_count == 0 {
                Vec::new()
            } else {
                let path = column_data_path(root, table_name, &column_name);
                let data_file = File::open(&path)?;
                let mapping = unsafe { Mmap::map(&data_file)? };
                read_i32s(&mapping, row_count)
            };

            let qualified_column = format!("{qualified_table}.{column_name}");
            catalog.lookup_column_mut(&qualified_column)?.adopt(values);
        }

        let table = catalog.lookup_table_mut(&format!("{db_name}.{table_name}"))?;
        table.set_length_from_persistence(row_count);
    }

    Ok(())
}

/// Flushes the active database to `root`. A no-op (returning `Ok`) if no
/// database is active.
pub fn shutdown(catalog: &Catalog, root: &Path) -> EngineResult<()> {
    let Some(db) = catalog.active_db() else {
        return Ok(());
    };

    fs::create_dir_all(root)?;

    let mut metadata = String::new();
    metadata.push_str(&format!("{},{}\n", db.name(), db.tables().len()));
    for table in db.tables() {
        metadata.push_str(&format!(
            "{},{},{}\n",
            table.name(),
            table.declared_columns(),
            table.len()
        ));
        for column in table.columns() {
            metadata.push_str(&format!("{}\n", column.name()));
        }
    }
    let mut meta_file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(metadata_path(root))?;
    meta_file.write_all(metadata.as_bytes())?;

    for table in db.tables() {
        for column in table.columns() {
            let path = column_data_path(root, table.name(), column.name());
            let byte_len = (column.len() * 4) as u64;
            let data_file = OpenOptions::new()
                .read(true)
                .write(true)
                .create(true)
                .open(&path)?;
            data_file.set_len(byte_len)?;
            if byte_len > 0 {
                let mut mapping = unsafe { MmapMut::map_mut(&data_file)? };
                write_i32s(&mut mapping, column.as_slice());
                mapping.flush()?;
            }
        }
    }

    Ok(())
}

fn read_i32s(bytes: &[u8], count: usize) -> Vec<i32> {
    let mut values = Vec::with_capacity(count);
    for chunk in bytes[..count * 4].chunks_exact(4) {
        values.push(i32::from_ne_bytes(chunk.try_into().unwrap()));
    }
    values
}

fn write_i32s(bytes: &mut [u8], values: &[i32]) {
    for (chunk, &value) in bytes.chunks_exact_mut(4).zip(values) {
        chunk.copy_from_slice(&value.to_ne_bytes());
    }
}

fn split_two(line: &str) -> EngineResult<(&str, &str)> {
    let mut parts = line.splitn(2, ',');
    let a = parts
        .next()
        .ok_or_else(|| EngineError::Persistence(io_error("malformed metadata header")))?;
    let b = parts
        .next()
        .ok_or_else(|| EngineError::Persistence(io_error("malformed metadata header")))?;
    Ok((a, b.trim_end()))
}

fn io_error(message: &str) -> std::io::Error {
    std::io::Error::new(std::io::ErrorKind::InvalidData, message.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn startup_on_missing_root_leaves_catalog_empty() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("does-not-exist");
        let mut catalog = Catalog::new();
        startup(&mut catalog, &missing).unwrap();
        assert!(catalog.active_db().is_none());
    }

    #[test]
    fn shutdown_on_empty_catalog_is_a_no_op() {
        let dir = tempdir().unwrap();
        let catalog = Catalog::new();
        shutdown(&catalog, dir.path()).unwrap();
        assert!(!dir.path().join(METADATA_FILE_NAME).exists());
    }

    #[test]
    fn round_trips_a_populated_database() {
        let dir = tempdir().unwrap();

        let mut catalog = Catalog::new();
        catalog.create_db("d1").unwrap();
        catalog.create_table("d1", "t1", 2).unwrap();
        catalog.create_column("d1.t1", "a").unwrap();
        catalog.create_column("d1.t1", "b").unwrap();
        let table = catalog.lookup_table_mut("d1.t1").unwrap();
        table.relational_insert(&[10, 100]).unwrap();
        table.relational_insert(&[20, 200]).unwrap();
        table.relational_insert(&[30, 300]).unwrap();

        shutdown(&catalog, dir.path()).unwrap();

        let mut reloaded = Catalog::new();
        startup(&mut reloaded, dir.path()).unwrap();

        assert_eq!(reloaded.active_db_name(), Some("d1"));
        let table = reloaded.lookup_table("d1.t1").unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(
            reloaded.lookup_column("d1.t1.a").unwrap().as_slice(),
            &[10, 20, 30]
        );
        assert_eq!(
            reloaded.lookup_column("d1.t1.b").unwrap().as_slice(),
            &[100, 200, 300]
        );
    }

    #[test]
    fn round_trips_an_empty_column() {
        let dir = tempdir().unwrap();
        let mut catalog = Catalog::new();
        catalog.create_db("d1").unwrap();
        catalog.create_table("d1", "t1", 1).unwrap();
        catalog.create_column("d1.t1", "a").unwrap();

        shutdown(&catalog, dir.path()).unwrap();

        let mut reloaded = Catalog::new();
        startup(&mut reloaded, dir.path()).unwrap();
        assert_eq!(reloaded.lookup_table("d1.t1").unwrap().len(), 0);
    }
}
