//! Google Drive document source (Drive API v3).
//!
//! Lists files modified since a threshold, optionally scoped to one folder
//! and its subfolders, then downloads or exports each one as text. The
//! access token is supplied by the caller; obtaining it is not handled here.

use chrono::{DateTime, Duration, Utc};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};

use super::traits::{Document, DocumentSource};
use crate::error::SourceError;

pub const DEFAULT_DRIVE_API: &str = "https://www.googleapis.com/drive/v3";

const FOLDER_MIME: &str = "application/vnd.google-apps.folder";
const WORKSPACE_MIME_PREFIX: &str = "application/vnd.google-apps.";
const PAGE_SIZE: u32 = 100;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FileList {
    #[serde(default)]
    files: Vec<DriveFile>,
    next_page_token: Option<String>,
}

/// A Drive folder as offered for selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DriveFolder {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DriveFile {
    id: String,
    name: String,
    #[serde(default)]
    mime_type: String,
    modified_time: Option<DateTime<Utc>>,
}

pub struct GoogleDriveSource {
    client: Client,
    base_url: String,
    access_token: String,
    folder_id: Option<String>,
    folder_name: Option<String>,
    include_subfolders: bool,
}

/// Quote a value for a Drive query string literal.
fn quote(value: &str) -> String {
    format!("'{}'", value.replace('\\', "\\\\").replace('\'', "\\'"))
}

impl GoogleDriveSource {
    pub fn new(
        base_url: impl Into<String>,
        access_token: impl Into<String>,
        folder_id: Option<String>,
        include_subfolders: bool,
    ) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            access_token: access_token.into(),
            folder_id,
            folder_name: None,
            include_subfolders,
        }
    }

    /// Scope to the folder with this name when no folder id is set.
    pub fn with_folder_name(mut self, folder_name: Option<String>) -> Self {
        self.folder_name = folder_name.filter(|n| !n.trim().is_empty());
        self
    }

    /// Every folder visible to the account, sorted by name.
    pub fn list_folders(&self) -> Result<Vec<DriveFolder>, SourceError> {
        let mut folders: Vec<_> = self
            .list(
                &format!("mimeType = '{FOLDER_MIME}' and trashed = false"),
                "nextPageToken, files(id, name)",
            )?
            .into_iter()
            .map(|f| DriveFolder { id: f.id, name: f.name })
            .collect();
        folders.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(folders)
    }

    /// Id of the first folder named exactly `name`.
    pub fn find_folder_id(&self, name: &str) -> Result<Option<String>, SourceError> {
        let matches = self.list(
            &format!(
                "name = {} and mimeType = '{FOLDER_MIME}' and trashed = false",
                quote(name)
            ),
            "nextPageToken, files(id, name)",
        )?;
        Ok(matches.into_iter().next().map(|f| f.id))
    }

    /// Folder id to scan: the configured id, else the id found by name.
    fn resolve_folder(&self) -> Result<Option<String>, SourceError> {
        if let Some(id) = &self.folder_id {
            return Ok(Some(id.clone()));
        }
        match &self.folder_name {
            Some(name) => match self.find_folder_id(name)? {
                Some(id) => {
                    tracing::info!(folder = %name, %id, "resolved Drive folder by name");
                    Ok(Some(id))
                }
                None => Err(SourceError::FolderNotFound(name.clone())),
            },
            None => Ok(None),
        }
    }

    fn get(&self, url: &str) -> Result<reqwest::blocking::Response, SourceError> {
        let response = self.client.get(url).bearer_auth(&self.access_token).send()?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(SourceError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    /// Run a `files.list` query, following page tokens.
    fn list(&self, query: &str, fields: &str) -> Result<Vec<DriveFile>, SourceError> {
        let mut files = Vec::new();
        let mut page_token: Option<String> = None;
        loop {
            let mut url = format!(
                "{}/files?q={}&pageSize={PAGE_SIZE}&fields={}&orderBy={}",
                self.base_url,
                urlencoding::encode(query),
                urlencoding::encode(fields),
                urlencoding::encode("modifiedTime desc"),
            );
            if let Some(ref token) = page_token {
                url.push_str("&pageToken=");
                url.push_str(&urlencoding::encode(token));
            }

            let page: FileList = self
                .get(&url)?
                .json()
                .map_err(|e| SourceError::InvalidResponse(e.to_string()))?;
            files.extend(page.files);

            match page.next_page_token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => break,
            }
        }
        Ok(files)
    }

    fn recent_files(
        &self,
        folder: Option<&str>,
        threshold: &str,
    ) -> Result<Vec<DriveFile>, SourceError> {
        let query = match folder {
            Some(id) => format!("'{id}' in parents and modifiedTime >= '{threshold}' and trashed = false"),
            None => format!("modifiedTime >= '{threshold}' and trashed = false"),
        };
        self.list(
            &query,
            "nextPageToken, files(id, name, mimeType, modifiedTime, size, parents)",
        )
    }

    fn recent_files_recursive(
        &self,
        folder: &str,
        threshold: &str,
    ) -> Result<Vec<DriveFile>, SourceError> {
        let mut files = self.recent_files(Some(folder), threshold)?;
        let subfolders = self.list(
            &format!("'{folder}' in parents and mimeType = '{FOLDER_MIME}' and trashed = false"),
            "nextPageToken, files(id, name)",
        )?;
        for sub in subfolders {
            files.extend(self.recent_files_recursive(&sub.id, threshold)?);
        }
        Ok(files)
    }

    /// Text content of a file, or `None` for Workspace kinds with no text
    /// export.
    fn download(&self, file: &DriveFile) -> Result<Option<String>, SourceError> {
        let url = if let Some(kind) = file.mime_type.strip_prefix(WORKSPACE_MIME_PREFIX) {
            let export = match kind {
                "document" | "presentation" => "text/plain",
                "spreadsheet" => "text/csv",
                _ => return Ok(None),
            };
            format!(
                "{}/files/{}/export?mimeType={}",
                self.base_url,
                urlencoding::encode(&file.id),
                urlencoding::encode(export)
            )
        } else {
            format!("{}/files/{}?alt=media", self.base_url, urlencoding::encode(&file.id))
        };

        let bytes = self.get(&url)?.bytes()?;
        Ok(Some(String::from_utf8_lossy(&bytes).into_owned()))
    }
}

impl DocumentSource for GoogleDriveSource {
    fn name(&self) -> &str {
        "google_drive"
    }

    fn changed_documents(&self, lookback: Duration) -> Result<Vec<Document>, SourceError> {
        let threshold = (Utc::now() - lookback)
            .format("%Y-%m-%dT%H:%M:%SZ")
            .to_string();

        let folder = self.resolve_folder()?;
        let files = match (&folder, self.include_subfolders) {
            (Some(folder), true) => self.recent_files_recursive(folder, &threshold)?,
            (Some(folder), false) => self.recent_files(Some(folder), &threshold)?,
            (None, _) => self.recent_files(None, &threshold)?,
        };
        tracing::info!(count = files.len(), folder = ?folder, "listed recent Drive files");

        let mut docs = Vec::with_capacity(files.len());
        for file in files.into_iter().filter(|f| f.mime_type != FOLDER_MIME) {
            let content = match self.download(&file) {
                Ok(Some(content)) => content,
                Ok(None) => {
                    tracing::debug!(name = %file.name, mime = %file.mime_type, "no text export; skipping");
                    continue;
                }
                Err(e) => {
                    tracing::warn!(name = %file.name, error = %e, "download failed; skipping");
                    continue;
                }
            };
            docs.push(Document {
                modified_time: file.modified_time.unwrap_or_else(Utc::now),
                id: file.id,
                name: file.name,
                mime_type: file.mime_type,
                content,
            });
        }
        Ok(docs)
    }
}
