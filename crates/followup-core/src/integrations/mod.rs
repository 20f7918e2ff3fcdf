pub mod dry_run;
pub mod google_calendar;
pub mod google_drive;
pub mod local_folder;
pub mod openai;
pub mod traits;

pub use dry_run::DryRunSink;
pub use google_calendar::GoogleCalendarSink;
pub use google_drive::{DriveFolder, GoogleDriveSource};
pub use local_folder::LocalFolderSource;
pub use openai::OpenAiAnalyzer;
pub use traits::{CalendarSink, Document, DocumentAnalysis, DocumentAnalyzer, DocumentSource};

/// Thin wrapper around the OS keyring for credential storage.
pub mod keyring_store {
    const SERVICE: &str = "followup";

    pub fn get(key: &str) -> Result<Option<String>, Box<dyn std::error::Error>> {
        let entry = keyring::Entry::new(SERVICE, key)?;
        match entry.get_password() {
            Ok(pw) => Ok(Some(pw)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub fn set(key: &str, value: &str) -> Result<(), Box<dyn std::error::Error>> {
        let entry = keyring::Entry::new(SERVICE, key)?;
        entry.set_password(value)?;
        Ok(())
    }

    pub fn delete(key: &str) -> Result<(), Box<dyn std::error::Error>> {
        let entry = keyring::Entry::new(SERVICE, key)?;
        match entry.delete_credential() {
            Ok(()) => Ok(()),
            Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Named secrets the collaborators need.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Credential {
    OpenAiApiKey,
    GoogleAccessToken,
}

impl Credential {
    pub fn keyring_key(&self) -> &'static str {
        match self {
            Credential::OpenAiApiKey => "openai_api_key",
            Credential::GoogleAccessToken => "google_access_token",
        }
    }

    pub fn env_var(&self) -> &'static str {
        match self {
            Credential::OpenAiApiKey => "OPENAI_API_KEY",
            Credential::GoogleAccessToken => "GOOGLE_ACCESS_TOKEN",
        }
    }

    /// Environment variable first, then the keyring. Empty values count as
    /// missing.
    pub fn resolve(&self) -> Option<String> {
        std::env::var(self.env_var())
            .ok()
            .filter(|v| !v.trim().is_empty())
            .or_else(|| {
                keyring_store::get(self.keyring_key())
                    .ok()
                    .flatten()
                    .filter(|v| !v.trim().is_empty())
            })
    }

    pub fn store(&self, value: &str) -> Result<(), Box<dyn std::error::Error>> {
        keyring_store::set(self.keyring_key(), value)
    }

    pub fn clear(&self) -> Result<(), Box<dyn std::error::Error>> {
        keyring_store::delete(self.keyring_key())
    }
}
