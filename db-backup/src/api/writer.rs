//! Artifact writer: the JSON document plus per-resource CSV exports.

use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::api::document::BackupDocument;

/// Write the full document as pretty-printed JSON.
///
/// The destination directory is created if missing (idempotent). Any failure
/// here is a hard failure for the run.
pub async fn write_document(
    document: &BackupDocument,
    dir: &Path,
    prefix: &str,
    run_timestamp: &str,
) -> crate::Result<PathBuf> {
    tokio::fs::create_dir_all(dir).await?;

    let path = dir.join(format!("{}_{}.json", prefix, run_timestamp));
    let json = serde_json::to_string_pretty(document)?;
    tokio::fs::write(&path, &json).await?;

    tracing::info!(
        "Wrote {} ({:.2} KB)",
        path.display(),
        json.len() as f64 / 1024.0
    );
    Ok(path)
}

/// Write one CSV file per resource that has at least one record.
///
/// The header row is the field names of the first record, in original order;
/// every row repeats that column order. A failure on one resource is logged
/// and does not stop the others. Returns the per-resource row counts written.
pub async fn write_csv_exports(
    document: &BackupDocument,
    dir: &Path,
    run_timestamp: &str,
) -> crate::Result<Vec<(String, usize)>> {
    let csv_dir = dir.join(format!("csv_backup_{}", run_timestamp));
    tokio::fs::create_dir_all(&csv_dir).await?;

    let mut written = Vec::new();
    for (name, backup) in &document.resources {
        if backup.records.is_empty() {
            continue;
        }

        let path = csv_dir.join(format!("{}.csv", name));
        match write_resource_csv(&path, &backup.records).await {
            Ok(rows) => {
                tracing::info!("{}.csv: {} records", name, rows);
                written.push((name.clone(), rows));
            }
            Err(e) => {
                tracing::warn!("Failed to write {}.csv: {}", name, e);
            }
        }
    }

    Ok(written)
}

async fn write_resource_csv(path: &Path, records: &[Value]) -> crate::Result<usize> {
    let columns: Vec<String> = match records.first().and_then(|r| r.as_object()) {
        Some(first) => first.keys().cloned().collect(),
        None => {
            // Opaque rows are expected to be objects; anything else cannot
            // be laid out as columns
            return Err(crate::BackupError::CsvExport(format!(
                "{}: records are not objects",
                path.display()
            )));
        }
    };

    let file = tokio::fs::File::create(path).await?;
    let mut writer = csv_async::AsyncWriter::from_writer(file);

    writer.write_record(&columns).await?;
    for record in records {
        let row: Vec<String> = columns
            .iter()
            .map(|column| csv_field(record.get(column)))
            .collect();
        writer.write_record(&row).await?;
    }
    writer.flush().await?;

    Ok(records.len())
}

/// Flatten one JSON value into a CSV cell: strings raw, null empty,
/// anything else compact JSON.
fn csv_field(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::document::ResourceBackup;
    use serde_json::json;
    use tempfile::TempDir;

    fn sample_document() -> BackupDocument {
        let mut document = BackupDocument::new("https://db.example.com/rest/v1");
        document
            .schema
            .insert("users".to_string(), json!({"columns": ["a", "b"]}));
        document.resources.insert(
            "users".to_string(),
            ResourceBackup::success(
                "users",
                vec![json!({"a": 1, "b": 2}), json!({"a": 3, "b": 4})],
            ),
        );
        document.resources.insert(
            "orders".to_string(),
            ResourceBackup::success("orders", vec![]),
        );
        document
    }

    #[tokio::test]
    async fn test_document_round_trip() -> anyhow::Result<()> {
        let temp_dir = TempDir::new()?;
        let document = sample_document();

        let path = write_document(&document, temp_dir.path(), "db_backup", "2024-01-01_00-00-00")
            .await?;

        let content = tokio::fs::read_to_string(&path).await?;
        let restored: BackupDocument = serde_json::from_str(&content)?;
        assert_eq!(restored, document);

        Ok(())
    }

    #[tokio::test]
    async fn test_write_document_twice_is_safe() -> anyhow::Result<()> {
        let temp_dir = TempDir::new()?;
        let document = sample_document();

        let first = write_document(&document, temp_dir.path(), "db_backup", "2024-01-01_00-00-00")
            .await?;
        let second = write_document(&document, temp_dir.path(), "db_backup", "2024-01-01_00-00-01")
            .await?;

        // Directory creation is idempotent and earlier artifacts survive
        assert!(first.exists());
        assert!(second.exists());

        Ok(())
    }

    #[tokio::test]
    async fn test_csv_export_header_and_rows() -> anyhow::Result<()> {
        let temp_dir = TempDir::new()?;
        let document = sample_document();

        let written = write_csv_exports(&document, temp_dir.path(), "2024-01-01_00-00-00").await?;
        assert_eq!(written, vec![("users".to_string(), 2)]);

        let csv_path = temp_dir
            .path()
            .join("csv_backup_2024-01-01_00-00-00")
            .join("users.csv");
        let content = tokio::fs::read_to_string(&csv_path).await?;
        assert_eq!(content, "a,b\n1,2\n3,4\n");

        Ok(())
    }

    #[tokio::test]
    async fn test_empty_resource_produces_no_csv() -> anyhow::Result<()> {
        let temp_dir = TempDir::new()?;
        let document = sample_document();

        write_csv_exports(&document, temp_dir.path(), "2024-01-01_00-00-00").await?;

        let orders_path = temp_dir
            .path()
            .join("csv_backup_2024-01-01_00-00-00")
            .join("orders.csv");
        assert!(!orders_path.exists());

        Ok(())
    }

    #[tokio::test]
    async fn test_missing_fields_become_empty_cells() -> anyhow::Result<()> {
        let temp_dir = TempDir::new()?;
        let mut document = BackupDocument::new("https://db.example.com/rest/v1");
        document.resources.insert(
            "users".to_string(),
            ResourceBackup::success(
                "users",
                vec![json!({"a": 1, "b": "x"}), json!({"a": 2})],
            ),
        );

        write_csv_exports(&document, temp_dir.path(), "2024-01-01_00-00-00").await?;

        let csv_path = temp_dir
            .path()
            .join("csv_backup_2024-01-01_00-00-00")
            .join("users.csv");
        let content = tokio::fs::read_to_string(&csv_path).await?;
        assert_eq!(content, "a,b\n1,x\n2,\n");

        Ok(())
    }

    #[test]
    fn test_csv_field_rendering() {
        assert_eq!(csv_field(None), "");
        assert_eq!(csv_field(Some(&json!(null))), "");
        assert_eq!(csv_field(Some(&json!("plain"))), "plain");
        assert_eq!(csv_field(Some(&json!(42))), "42");
        assert_eq!(csv_field(Some(&json!(true))), "true");
        assert_eq!(csv_field(Some(&json!({"x": 1}))), "{\"x\":1}");
    }
}
