//! The export phase of one build

use crate::assemble::assemble;
use crate::backend::ExportBackend;
use crate::options::ExportOptions;
use crate::output::{WrittenArtifacts, archive_folder, file_stem, write_artifacts};
use crate::request::plan_exports;
use crate::store::MarkerStore;
use crate::types::*;
use std::path::PathBuf;

/// What a successful export left on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportOutcome {
    pub build_id: String,
    pub page_count: usize,
    pub written: WrittenArtifacts,
    pub archive: Option<PathBuf>,
}

/// Fetch, merge and write the artifacts of a stored build, then consume its record.
///
/// `build_id` of `None` exports the latest build. Nothing is written and the
/// record stays in the store unless every request succeeded.
pub async fn export_build<B: ExportBackend>(
    backend: &B,
    store: &mut MarkerStore,
    options: &ExportOptions,
    build_id: Option<&str>,
) -> Result<ExportOutcome> {
    options.validate()?;

    let record = store.resolve(build_id)?.clone();
    let plan = plan_exports(options, &record.segments()?)?;
    log::info!(
        "Exporting build {} ({} pages)",
        record.build_id,
        plan.pages.len()
    );

    let stem = file_stem(&record.created_at, &record.client_name);
    let artifacts = assemble(backend, &plan, &stem).await?;

    let written = write_artifacts(&options.output_dir, &record.build_id, &artifacts).await?;
    let archive = if options.archive {
        Some(archive_folder(&written.folder).await?)
    } else {
        None
    };

    store.remove(&record.build_id).await?;
    Ok(ExportOutcome {
        build_id: record.build_id,
        page_count: artifacts.page_count,
        written,
        archive,
    })
}
