//! Sequential backup assembly across the configured resource list.

use crate::api::client::ApiClient;
use crate::api::document::BackupDocument;

/// Assembled document plus run statistics surfaced for reporting.
///
/// `total_records` is a side computation for the progress output; it is not
/// stored in the document itself.
pub struct AssembledBackup {
    pub document: BackupDocument,
    pub total_records: usize,
}

/// Probe schema, then fetch rows, for every resource in list order.
///
/// A probe or fetch failure for one resource is recorded in the document and
/// never aborts processing of the remaining resources.
pub async fn assemble(
    client: &ApiClient,
    endpoint: &str,
    resources: &[String],
) -> AssembledBackup {
    let mut document = BackupDocument::new(endpoint);

    tracing::info!("Probing schema for {} resources", resources.len());
    for name in resources {
        let entry = client.probe_schema(name).await;
        document.schema.insert(name.clone(), entry);
    }

    tracing::info!("Backing up data for {} resources", resources.len());
    let mut total_records = 0usize;
    for name in resources {
        let backup = client.fetch_resource(name).await;
        total_records += backup.record_count;
        document.resources.insert(name.clone(), backup);
    }

    AssembledBackup {
        document,
        total_records,
    }
}
