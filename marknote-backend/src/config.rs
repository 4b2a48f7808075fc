use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable names - single source of truth
pub mod env_vars {
    pub const PORT: &str = "PORT";
    pub const BIND_ADDRESS: &str = "BIND_ADDRESS";
    pub const DATABASE_URL: &str = "DATABASE_URL";
    /// Root for uploaded files; documents live in `<MEDIA_DIR>/documents`
    pub const MEDIA_DIR: &str = "MEDIA_DIR";
    /// Base URL of a LanguageTool server (e.g. "http://127.0.0.1:8081")
    pub const LANGUAGETOOL_URL: &str = "LANGUAGETOOL_URL";
    pub const GRAMMAR_LANGUAGE: &str = "GRAMMAR_LANGUAGE";
    pub const GRAMMAR_TIMEOUT_SECS: &str = "GRAMMAR_TIMEOUT_SECS";
    pub const MAX_UPLOAD_MB: &str = "MAX_UPLOAD_MB";
}

/// Default values
pub mod defaults {
    pub const PORT: u16 = 8000;
    pub const BIND_ADDRESS: &str = "127.0.0.1";
    pub const DATABASE_URL: &str = "./.db/marknote.db";
    pub const MEDIA_DIR: &str = "./media";
    pub const DOCUMENTS_SUBDIR: &str = "documents";
    pub const LANGUAGETOOL_URL: &str = "http://127.0.0.1:8081";
    pub const GRAMMAR_LANGUAGE: &str = "en-US";
    pub const GRAMMAR_TIMEOUT_SECS: u64 = 30;
    pub const MAX_UPLOAD_MB: usize = 10;
}

#[derive(Clone, Debug)]
pub struct Config {
    pub port: u16,
    pub bind_address: String,
    pub database_url: String,
    pub media_dir: PathBuf,
    pub grammar: GrammarConfig,
    pub max_upload_bytes: usize,
}

/// Settings for the shared grammar checker
#[derive(Clone, Debug)]
pub struct GrammarConfig {
    pub languagetool_url: String,
    /// Locale passed on every check; fixed for the life of the process
    pub language: String,
    pub timeout: Duration,
}

impl Default for GrammarConfig {
    fn default() -> Self {
        Self {
            languagetool_url: defaults::LANGUAGETOOL_URL.to_string(),
            language: defaults::GRAMMAR_LANGUAGE.to_string(),
            timeout: Duration::from_secs(defaults::GRAMMAR_TIMEOUT_SECS),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let grammar = GrammarConfig {
            languagetool_url: env::var(env_vars::LANGUAGETOOL_URL)
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|_| defaults::LANGUAGETOOL_URL.to_string()),
            language: env::var(env_vars::GRAMMAR_LANGUAGE)
                .unwrap_or_else(|_| defaults::GRAMMAR_LANGUAGE.to_string()),
            timeout: Duration::from_secs(parse_or(
                env_vars::GRAMMAR_TIMEOUT_SECS,
                defaults::GRAMMAR_TIMEOUT_SECS,
            )),
        };

        Self {
            port: parse_or(env_vars::PORT, defaults::PORT),
            bind_address: env::var(env_vars::BIND_ADDRESS)
                .unwrap_or_else(|_| defaults::BIND_ADDRESS.to_string()),
            database_url: env::var(env_vars::DATABASE_URL)
                .unwrap_or_else(|_| defaults::DATABASE_URL.to_string()),
            media_dir: env::var(env_vars::MEDIA_DIR)
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(defaults::MEDIA_DIR)),
            grammar,
            max_upload_bytes: parse_or(env_vars::MAX_UPLOAD_MB, defaults::MAX_UPLOAD_MB)
                * 1024
                * 1024,
        }
    }

    /// Directory holding one blob file per uploaded note
    pub fn documents_dir(&self) -> PathBuf {
        documents_dir(&self.media_dir)
    }
}

pub fn documents_dir(media_dir: &Path) -> PathBuf {
    media_dir.join(defaults::DOCUMENTS_SUBDIR)
}

/// Read a numeric env var, falling back to the default when unset or malformed
fn parse_or<T>(name: &str, default: T) -> T
where
    T: std::str::FromStr + std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => match raw.trim().parse() {
            Ok(value) => value,
            Err(_) => {
                log::warn!("{} must be a valid number (got {:?}), using {}", name, raw, default);
                default
            }
        },
        Err(_) => default,
    }
}

/// Create the media and documents directories.
/// Called at startup before the server accepts requests.
pub fn initialize_media(config: &Config) -> std::io::Result<()> {
    let documents = config.documents_dir();
    std::fs::create_dir_all(&documents)?;
    log::info!("Documents directory: {:?}", documents);
    Ok(())
}
