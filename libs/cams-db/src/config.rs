use secrecy::SecretString;
use serde::Deserialize;

/// Connection settings for the document database.
#[derive(Debug, Clone, Deserialize)]
pub struct DocumentDbConfig {
    /// Full connection string, including credentials.
    pub connection_string: SecretString,
    #[serde(default = "default_database_name")]
    pub database_name: String,
    /// Application name reported to the server.
    #[serde(default)]
    pub app_name: Option<String>,
}

fn default_database_name() -> String {
    "cams".to_owned()
}
