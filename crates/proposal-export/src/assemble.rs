use crate::backend::ExportBackend;
use crate::merge::{document_to_bytes, merge_pdfs};
use crate::request::ExportPlan;
use crate::types::*;
use futures_util::future::{try_join, try_join_all};

/// A named downloadable file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub name: String,
    pub bytes: Vec<u8>,
}

/// Result of a complete export run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssembledArtifacts {
    pub tabular: Artifact,
    pub merged: Artifact,
    pub page_count: usize,
}

/// Fetch every request of `plan` concurrently and merge the page ranges.
///
/// All requests are in flight at once. The first failure aborts the run and
/// nothing is returned; there are no retries. Page ranges are merged in plan
/// order whatever order the responses arrive in.
pub async fn assemble<B: ExportBackend>(
    backend: &B,
    plan: &ExportPlan,
    file_stem: &str,
) -> Result<AssembledArtifacts> {
    log::info!("Fetching {} export requests", plan.request_count());

    let tabular = backend.fetch(&plan.tabular);
    let pages = try_join_all(plan.pages.iter().map(|request| backend.fetch(request)));
    let (tabular_bytes, page_bytes) = try_join(tabular, pages).await?;

    let (merged_bytes, page_count) = tokio::task::spawn_blocking(move || {
        let merged = merge_pdfs(&page_bytes)?;
        let page_count = merged.get_pages().len();
        Ok::<_, ExportError>((document_to_bytes(merged)?, page_count))
    })
    .await??;

    Ok(AssembledArtifacts {
        tabular: Artifact {
            name: format!("{}.xlsx", file_stem),
            bytes: tabular_bytes,
        },
        merged: Artifact {
            name: format!("{}.pdf", file_stem),
            bytes: merged_bytes,
        },
        page_count,
    })
}
