use config::{Config, ConfigError, Environment};
use serde::{Deserialize, Serialize};
use url::Url;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Settings {
    pub debug: bool,
    pub enable_swagger: bool,
    pub port: u16,
    pub cors_allow_origin: Option<String>,
    pub google_client_email: String,
    pub google_private_key: String,
    pub spreadsheet_id: String,
    pub lessons_range: String,
    pub reservations_range: String,
    pub sheets_api_base_url: Url,
    pub token_url: Url,
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();

        let config = Config::builder()
            // Load from environment variables with APP_ prefix, e.g. APP_SPREADSHEET_ID
            .add_source(
                Environment::with_prefix("APP")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .set_default("debug", false)?
            .set_default("enable_swagger", true)?
            .set_default("port", 8080)?
            .set_default("lessons_range", "レッスン管理!A2:O")?
            .set_default(
                "sheets_api_base_url",
                "https://sheets.googleapis.com/v4/spreadsheets",
            )?
            .set_default("token_url", "https://oauth2.googleapis.com/token")?
            .build()?;

        let mut settings: Settings = config.try_deserialize()?;
        settings.google_private_key = unescape_private_key(&settings.google_private_key);
        Ok(settings)
    }
}

/// Keys pasted into a single-line env var carry literal `\n` sequences.
pub fn unescape_private_key(raw: &str) -> String {
    raw.replace("\\n", "\n")
}
