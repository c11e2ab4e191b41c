//! Destination folders and artifact files

use crate::assemble::AssembledArtifacts;
use crate::types::*;
use chrono::{DateTime, Utc};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Timestamp layout used in folder and file names
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H-%M-%S";

pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}

/// Folder name for a build: `{timestamp}_{client}`
pub fn folder_name(timestamp: &str, client: &str) -> String {
    format!("{}_{}", timestamp, sanitize(client))
}

/// File name stem for a build's artifacts: `{client}_{timestamp}`
pub fn file_stem(timestamp: &str, client: &str) -> String {
    format!("{}_{}", sanitize(client), timestamp)
}

/// Keep a client name usable as a single path component
fn sanitize(name: &str) -> String {
    let cleaned: String = name
        .trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '-',
            c if c.is_control() => '-',
            c => c,
        })
        .collect();
    if cleaned.is_empty() {
        "client".to_string()
    } else {
        cleaned
    }
}

/// Paths of the files written for one build
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenArtifacts {
    pub folder: PathBuf,
    pub tabular: PathBuf,
    pub merged: PathBuf,
}

/// Write both artifacts into `root/folder`, creating the folder if needed
pub async fn write_artifacts(
    root: impl AsRef<Path>,
    folder: &str,
    artifacts: &AssembledArtifacts,
) -> Result<WrittenArtifacts> {
    let folder = root.as_ref().join(folder);
    if tokio::fs::try_exists(&folder).await? {
        log::debug!("Reusing folder {}", folder.display());
    } else {
        tokio::fs::create_dir_all(&folder).await?;
    }

    let tabular = folder.join(&artifacts.tabular.name);
    let merged = folder.join(&artifacts.merged.name);
    tokio::fs::write(&tabular, &artifacts.tabular.bytes).await?;
    tokio::fs::write(&merged, &artifacts.merged.bytes).await?;

    log::info!("Wrote {} and {}", tabular.display(), merged.display());
    Ok(WrittenArtifacts {
        folder,
        tabular,
        merged,
    })
}

/// Zip every file of `folder` into `{folder}.zip` next to it
pub async fn archive_folder(folder: impl AsRef<Path>) -> Result<PathBuf> {
    let folder = folder.as_ref().to_owned();
    let name = folder
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| ExportError::Config(format!("{} has no folder name", folder.display())))?;
    let archive = folder.with_file_name(format!("{}.zip", name));

    let target = archive.clone();
    tokio::task::spawn_blocking(move || {
        let mut files: Vec<PathBuf> = std::fs::read_dir(&folder)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.is_file())
            .collect();
        files.sort();

        let mut zip = zip::ZipWriter::new(std::fs::File::create(&target)?);
        for path in files {
            let entry = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            zip.start_file(entry, zip::write::SimpleFileOptions::default())?;
            zip.write_all(&std::fs::read(&path)?)?;
        }
        zip.finish()?;
        Ok::<_, ExportError>(())
    })
    .await??;

    log::info!("Archived into {}", archive.display());
    Ok(archive)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn names_follow_convention() {
        let at = Utc.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap();
        let ts = format_timestamp(at);
        assert_eq!(ts, "2024-03-09 14-05-07");
        assert_eq!(folder_name(&ts, "Acme"), "2024-03-09 14-05-07_Acme");
        assert_eq!(file_stem(&ts, "Acme"), "Acme_2024-03-09 14-05-07");
    }

    #[test]
    fn client_names_are_path_safe() {
        assert_eq!(folder_name("t", "A/B: C"), "t_A-B- C");
        assert_eq!(file_stem("t", "  "), "client_t");
    }
}
