use clap::{Subcommand, ValueEnum};
use followup_core::Credential;

#[derive(Clone, Copy, ValueEnum)]
pub enum Service {
    /// OpenAI API key used by the analyzer
    Openai,
    /// Google access token used for Drive and Calendar
    Google,
}

impl Service {
    fn credential(self) -> Credential {
        match self {
            Service::Openai => Credential::OpenAiApiKey,
            Service::Google => Credential::GoogleAccessToken,
        }
    }

    fn label(self) -> &'static str {
        match self {
            Service::Openai => "OpenAI",
            Service::Google => "Google",
        }
    }
}

#[derive(Subcommand)]
pub enum AuthAction {
    /// Store a secret in the OS keyring
    Set {
        #[arg(value_enum)]
        service: Service,
        /// API key or access token
        secret: String,
    },
    /// Remove a stored secret
    Clear {
        #[arg(value_enum)]
        service: Service,
    },
    /// Show which credentials are available
    Status,
}

pub fn run(action: AuthAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        AuthAction::Set { service, secret } => {
            if secret.trim().is_empty() {
                return Err("secret must not be empty".into());
            }
            service.credential().store(secret.trim())?;
            println!("{} credential stored", service.label());
        }
        AuthAction::Clear { service } => {
            service.credential().clear()?;
            println!("{} credential removed", service.label());
        }
        AuthAction::Status => {
            for service in [Service::Openai, Service::Google] {
                let credential = service.credential();
                let state = if std::env::var(credential.env_var())
                    .map(|v| !v.trim().is_empty())
                    .unwrap_or(false)
                {
                    format!("set via {}", credential.env_var())
                } else if credential.resolve().is_some() {
                    "stored in keyring".to_string()
                } else {
                    "not configured".to_string()
                };
                println!("{}: {state}", service.label());
            }
        }
    }
    Ok(())
}
