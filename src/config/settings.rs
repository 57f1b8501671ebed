use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub preview: PreviewConfig,
    #[serde(default)]
    pub locale: LocaleConfig,
    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PreviewConfig {
    /// Directory rendered attachments are written to
    #[serde(default = "default_attachments_dir")]
    pub attachments_dir: PathBuf,
    /// Preview class ids to load (empty = every registered class)
    #[serde(default)]
    pub classes: Vec<String>,
    /// Run before-render hooks when rendering
    #[serde(default)]
    pub run_hooks: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LocaleConfig {
    #[serde(default = "default_locales")]
    pub available: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// Default filter when RUST_LOG is unset
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Emit JSON lines instead of human-readable output
    #[serde(default)]
    pub json: bool,
}

fn default_attachments_dir() -> PathBuf {
    PathBuf::from("tmp/email_preview_attachments")
}

fn default_locales() -> Vec<String> {
    vec!["en".to_string()]
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        // Load .env file if exists
        let _ = dotenvy::dotenv();

        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let builder = Config::builder()
            .set_default("preview.attachments_dir", "tmp/email_preview_attachments")?
            .set_default("preview.run_hooks", false)?
            .set_default("log.level", "info")?
            .set_default("log.json", false)?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // PREVIEW__ATTACHMENTS_DIR, PREVIEW__CLASSES, LOCALE__AVAILABLE, LOG__LEVEL, ...
            .add_source(
                Environment::default()
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("preview.classes")
                    .with_list_parse_key("locale.available"),
            );

        builder.build()?.try_deserialize()
    }
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            attachments_dir: default_attachments_dir(),
            classes: vec![],
            run_hooks: false,
        }
    }
}

impl Default for LocaleConfig {
    fn default() -> Self {
        Self {
            available: default_locales(),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}
