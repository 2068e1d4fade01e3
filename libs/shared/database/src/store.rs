use std::fs;
use std::io::Read;
use std::path::PathBuf;

use tracing::{debug, info};

use shared_config::AppConfig;

use crate::error::StoreError;
use crate::table::{header_index, RecordView, TableKind, TableRow};

/// Whole-file CSV persistence for the three tables.
///
/// Every save rewrites the target file completely; there is no locking and
/// no coordination between tables, so the last writer wins.
#[derive(Debug, Clone)]
pub struct FlatFileStore {
    config: AppConfig,
}

impl FlatFileStore {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    pub fn path(&self, kind: TableKind) -> PathBuf {
        kind.path(&self.config)
    }

    /// Loads every row of `T`'s table. A missing file is an empty table.
    pub fn load<T: TableRow>(&self) -> Result<Vec<T>, StoreError> {
        let path = self.path(T::KIND);
        if !path.exists() {
            debug!("No {} file at {}, starting empty", T::KIND, path.display());
            return Ok(Vec::new());
        }

        let file = fs::File::open(&path).map_err(|source| StoreError::Io {
            path: path.clone(),
            source,
        })?;

        let rows = decode_rows::<T, _>(file).map_err(|source| StoreError::Malformed {
            path: path.clone(),
            source,
        })?;

        debug!("Loaded {} {} rows from {}", rows.len(), T::KIND, path.display());
        Ok(rows)
    }

    /// Replaces `T`'s table file with `rows`, header included.
    pub fn save<T: TableRow>(&self, rows: &[T]) -> Result<(), StoreError> {
        let path = self.path(T::KIND);
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|source| StoreError::Io {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        let write_err = |source| StoreError::Write {
            path: path.clone(),
            source,
        };

        let mut writer = csv::Writer::from_path(&path).map_err(write_err)?;
        writer.write_record(T::KIND.columns()).map_err(write_err)?;
        for row in rows {
            writer.write_record(row.to_record()).map_err(write_err)?;
        }
        writer.flush().map_err(|source| StoreError::Io {
            path: path.clone(),
            source,
        })?;

        debug!("Saved {} {} rows to {}", rows.len(), T::KIND, path.display());
        Ok(())
    }

    /// Replace-upload: decodes an uploaded CSV body into the canonical
    /// schema and overwrites the table. Returns the number of rows written.
    pub fn import<T: TableRow>(&self, body: &[u8]) -> Result<usize, StoreError> {
        let rows = decode_rows::<T, _>(body).map_err(|source| StoreError::InvalidUpload {
            table: T::KIND,
            source,
        })?;
        self.save(&rows)?;
        info!("Replaced {} table with {} uploaded rows", T::KIND, rows.len());
        Ok(rows.len())
    }

    /// Raw bytes of a table file, or `None` when it has never been written.
    pub fn export(&self, kind: TableKind) -> Result<Option<Vec<u8>>, StoreError> {
        let path = self.path(kind);
        if !path.exists() {
            return Ok(None);
        }
        fs::read(&path)
            .map(Some)
            .map_err(|source| StoreError::Io { path, source })
    }
}

pub fn decode_rows<T: TableRow, R: Read>(reader: R) -> Result<Vec<T>, csv::Error> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(reader);

    let index = header_index(reader.headers()?);
    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(T::from_record(&RecordView::new(&index, &record)));
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use chrono::NaiveDate;

    use crate::codec;

    #[derive(Debug, Clone, PartialEq)]
    struct Visit {
        doctor: String,
        date: Option<NaiveDate>,
        available: bool,
    }

    impl TableRow for Visit {
        const KIND: TableKind = TableKind::Schedules;

        fn from_record(record: &RecordView<'_>) -> Self {
            Self {
                doctor: record.text("doctor"),
                date: record.date("date"),
                available: record.flag("available"),
            }
        }

        fn to_record(&self) -> Vec<String> {
            vec![
                self.doctor.clone(),
                String::new(),
                codec::format_date(self.date),
                String::new(),
                String::new(),
                codec::format_bool(self.available),
            ]
        }
    }

    fn store_in(dir: &std::path::Path) -> FlatFileStore {
        let mut config = AppConfig::default();
        config.data_dir = dir.to_path_buf();
        FlatFileStore::new(&config)
    }

    #[test]
    fn test_missing_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(dir.path());
        let rows: Vec<Visit> = store.load().unwrap();
        assert!(rows.is_empty());
        assert!(store.export(TableKind::Schedules).unwrap().is_none());
    }

    #[test]
    fn test_save_then_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir.path().join("nested"));
        let rows = vec![
            Visit {
                doctor: "Dr. A, MD".to_string(),
                date: NaiveDate::from_ymd_opt(2024, 5, 1),
                available: true,
            },
            Visit {
                doctor: "Dr. B".to_string(),
                date: None,
                available: false,
            },
        ];

        store.save(&rows).unwrap();
        let loaded: Vec<Visit> = store.load().unwrap();
        assert_eq!(loaded, rows);

        let bytes = store.export(TableKind::Schedules).unwrap().unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.starts_with("doctor,location,date,slot_start,slot_end,available"));
    }

    #[test]
    fn test_malformed_cells_become_none() {
        let body = b"date,doctor,available\nnot-a-date,Dr. A,perhaps\n";
        let rows = decode_rows::<Visit, _>(&body[..]).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].date, None);
        assert!(!rows[0].available);
    }

    #[test]
    fn test_invalid_utf8_file_is_malformed() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(dir.path());
        std::fs::write(
            store.path(TableKind::Schedules),
            b"doctor,date\n\xff\xfe,2024-05-01\n",
        )
        .unwrap();

        let result: Result<Vec<Visit>, _> = store.load();
        assert_matches!(result, Err(StoreError::Malformed { .. }));
    }

    #[test]
    fn test_import_normalises_columns() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(dir.path());
        let written = store
            .import::<Visit>(b"available,doctor,date,notes\nTRUE,Dr. C,05/02/2024,x\n")
            .unwrap();
        assert_eq!(written, 1);

        let text = std::fs::read_to_string(store.path(TableKind::Schedules)).unwrap();
        assert!(text.contains("Dr. C,,2024-05-02,,,True"));
    }

    #[test]
    fn test_import_rejects_invalid_utf8() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(dir.path());
        let result = store.import::<Visit>(b"doctor\n\xff\n");
        assert_matches!(result, Err(StoreError::InvalidUpload { table: TableKind::Schedules, .. }));
    }
}
