#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::io::Write;

use cams::{CamsConfig, LogFormat};
use secrecy::ExposeSecret;

#[test]
fn loads_yaml_with_defaults() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        "document_db:\n  connection_string: mongodb://localhost:27017\nlogging:\n  format: json"
    )
    .unwrap();

    temp_env::with_vars_unset(
        ["CAMS_DOCUMENT_DB__DATABASE_NAME", "CAMS_LOGGING__LEVEL"],
        || {
            let config = CamsConfig::load(Some(file.path())).unwrap();
            assert_eq!(
                config.document_db.connection_string.expose_secret(),
                "mongodb://localhost:27017"
            );
            assert_eq!(config.document_db.database_name, "cams");
            assert_eq!(config.logging.format, LogFormat::Json);
            assert_eq!(config.logging.level, "info");
        },
    );
}

#[test]
fn environment_overrides_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        "document_db:\n  connection_string: mongodb://localhost:27017\n  database_name: from-file"
    )
    .unwrap();

    temp_env::with_vars(
        [
            ("CAMS_DOCUMENT_DB__DATABASE_NAME", Some("from-env")),
            ("CAMS_LOGGING__LEVEL", Some("debug")),
        ],
        || {
            let config = CamsConfig::load(Some(file.path())).unwrap();
            assert_eq!(config.document_db.database_name, "from-env");
            assert_eq!(config.logging.level, "debug");
            assert_eq!(config.logging.format, LogFormat::Text);
        },
    );
}

#[test]
fn missing_connection_string_is_an_error() {
    temp_env::with_var_unset("CAMS_DOCUMENT_DB__CONNECTION_STRING", || {
        assert!(CamsConfig::load(None).is_err());
    });
}
