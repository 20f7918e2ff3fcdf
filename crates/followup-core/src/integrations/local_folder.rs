//! Document source backed by a local directory.
//!
//! Useful for synced folders (Drive for desktop, Dropbox, a mounted share)
//! and for exercising the pipeline without network access.

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use chrono::{DateTime, Duration, Utc};

use super::traits::{Document, DocumentSource};
use crate::error::SourceError;

pub struct LocalFolderSource {
    root: PathBuf,
    include_subfolders: bool,
}

impl LocalFolderSource {
    pub fn new(root: impl Into<PathBuf>, include_subfolders: bool) -> Self {
        Self {
            root: root.into(),
            include_subfolders,
        }
    }

    fn collect(
        &self,
        dir: &Path,
        threshold: SystemTime,
        out: &mut Vec<Document>,
    ) -> Result<(), SourceError> {
        let io_err = |path: &Path| {
            let path = path.to_path_buf();
            move |source| SourceError::Io { path, source }
        };

        for entry in std::fs::read_dir(dir).map_err(io_err(dir))? {
            let entry = entry.map_err(io_err(dir))?;
            let path = entry.path();
            let file_name = entry.file_name().to_string_lossy().into_owned();
            if file_name.starts_with('.') {
                continue;
            }

            let metadata = match entry.metadata() {
                Ok(metadata) => metadata,
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "cannot stat; skipping");
                    continue;
                }
            };
            if metadata.is_dir() {
                if self.include_subfolders {
                    if let Err(e) = self.collect(&path, threshold, out) {
                        tracing::warn!(path = %path.display(), error = %e, "cannot read folder; skipping");
                    }
                }
                continue;
            }

            let Ok(modified) = metadata.modified() else {
                continue;
            };
            if modified < threshold {
                continue;
            }

            let bytes = match std::fs::read(&path) {
                Ok(bytes) => bytes,
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "cannot read file; skipping");
                    continue;
                }
            };
            let id = path
                .strip_prefix(&self.root)
                .unwrap_or(&path)
                .to_string_lossy()
                .replace('\\', "/");

            out.push(Document {
                id,
                name: file_name,
                mime_type: guess_mime_type(&path).to_string(),
                modified_time: DateTime::<Utc>::from(modified),
                content: String::from_utf8_lossy(&bytes).into_owned(),
            });
        }
        Ok(())
    }
}

fn guess_mime_type(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "md" | "markdown" => "text/markdown",
        "csv" => "text/csv",
        "json" => "application/json",
        "html" | "htm" => "text/html",
        "txt" | "text" | "log" => "text/plain",
        _ => "application/octet-stream",
    }
}

impl DocumentSource for LocalFolderSource {
    fn name(&self) -> &str {
        "local"
    }

    fn changed_documents(&self, lookback: Duration) -> Result<Vec<Document>, SourceError> {
        let threshold: SystemTime = (Utc::now() - lookback).into();
        let mut docs = Vec::new();
        self.collect(&self.root, threshold, &mut docs)?;
        docs.sort_by(|a, b| b.modified_time.cmp(&a.modified_time).then(a.id.cmp(&b.id)));
        tracing::info!(
            root = %self.root.display(),
            count = docs.len(),
            "scanned local folder"
        );
        Ok(docs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn lists_recent_files_recursively() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("notes.md"), "# Notes").unwrap();
        std::fs::create_dir(dir.path().join("sub")).unwrap();
        std::fs::write(dir.path().join("sub").join("plan.txt"), "plan").unwrap();
        std::fs::write(dir.path().join(".hidden"), "skip me").unwrap();

        let source = LocalFolderSource::new(dir.path(), true);
        let mut ids: Vec<_> = source
            .changed_documents(Duration::hours(1))
            .unwrap()
            .into_iter()
            .map(|d| d.id)
            .collect();
        ids.sort();
        assert_eq!(ids, vec!["notes.md", "sub/plan.txt"]);
    }

    #[test]
    fn subfolders_can_be_excluded() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("top.txt"), "top").unwrap();
        std::fs::create_dir(dir.path().join("sub")).unwrap();
        std::fs::write(dir.path().join("sub").join("deep.txt"), "deep").unwrap();

        let source = LocalFolderSource::new(dir.path(), false);
        let docs = source.changed_documents(Duration::hours(1)).unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].name, "top.txt");
        assert_eq!(docs[0].mime_type, "text/plain");
        assert_eq!(docs[0].content, "top");
    }

    #[test]
    fn negative_lookback_excludes_everything() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("a.txt"), "a").unwrap();
        let source = LocalFolderSource::new(dir.path(), true);
        // Threshold an hour in the future.
        let docs = source.changed_documents(Duration::hours(-1)).unwrap();
        assert!(docs.is_empty());
    }

    #[test]
    fn missing_root_is_an_io_error() {
        let source = LocalFolderSource::new("/definitely/not/here", true);
        let err = source.changed_documents(Duration::hours(1)).unwrap_err();
        assert!(matches!(err, SourceError::Io { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn unreadable_file_is_skipped_not_fatal() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("good.txt"), "good").unwrap();
        std::os::unix::fs::symlink(dir.path().join("gone.txt"), dir.path().join("broken.txt"))
            .unwrap();

        let source = LocalFolderSource::new(dir.path(), true);
        let docs = source.changed_documents(Duration::hours(1)).unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].id, "good.txt");
    }
}
