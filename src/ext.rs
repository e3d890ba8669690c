//! Convenience helpers on top of the generated APIs.

use crate::{apis::StatisticsApi, models::ExportAccept, request::CallOptions, Error, Result};
use bytes::Bytes;
use std::path::{Path, PathBuf};

/// Downloads a time series export fully into memory.
pub async fn export_timeseries_file_bytes(
    stats: &StatisticsApi,
    ns_id: &str,
    ts_id: &str,
    fileext: &str,
    accept: Option<ExportAccept>,
    options: Option<CallOptions>,
) -> Result<Bytes> {
    let response = stats
        .export_timeseries_file(ns_id, ts_id, fileext, accept, options)
        .await?;
    response.bytes().await.map_err(Error::from_transport)
}

/// Downloads a time series export and writes it to `path`.
///
/// Missing parent directories are created. Returns the written path.
pub async fn export_timeseries_file_to_path(
    stats: &StatisticsApi,
    ns_id: &str,
    ts_id: &str,
    fileext: &str,
    path: impl AsRef<Path>,
    accept: Option<ExportAccept>,
    options: Option<CallOptions>,
) -> Result<PathBuf> {
    let data = export_timeseries_file_bytes(stats, ns_id, ts_id, fileext, accept, options).await?;

    let path = path.as_ref().to_path_buf();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(&path, &data).await?;

    tracing::info!(path = %path.display(), bytes = data.len(), "Wrote time series export");
    Ok(path)
}
