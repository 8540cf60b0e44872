use crate::utils::error::Result;
use crate::utils::validation::{
    validate_non_empty_string, validate_path, validate_required_field, Validate,
};
use std::fmt;
use std::path::PathBuf;

pub const CLIENT_ID_VAR: &str = "WOW_AUCTION_CLIENT_ID";
pub const CLIENT_SECRET_VAR: &str = "WOW_AUCTION_CLIENT_SECRET";
pub const DB_PATH_VAR: &str = "WOW_AUCTION_DB_PATH";

/// Everything a pull needs from the process environment.
#[derive(Clone)]
pub struct AppConfig {
    pub client_id: String,
    pub client_secret: String,
    pub db_path: PathBuf,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds and validates the config from any key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let client_id = validate_required_field(CLIENT_ID_VAR, lookup(CLIENT_ID_VAR))?;
        let client_secret = validate_required_field(CLIENT_SECRET_VAR, lookup(CLIENT_SECRET_VAR))?;
        let db_path = validate_required_field(DB_PATH_VAR, lookup(DB_PATH_VAR))?;

        let config = Self {
            client_id,
            client_secret,
            db_path: PathBuf::from(db_path),
        };
        config.validate()?;
        Ok(config)
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string(CLIENT_ID_VAR, &self.client_id)?;
        validate_non_empty_string(CLIENT_SECRET_VAR, &self.client_secret)?;
        validate_path(DB_PATH_VAR, &self.db_path.to_string_lossy())?;
        Ok(())
    }
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("db_path", &self.db_path)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::EtlError;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_from_lookup_reads_all_three_values() {
        let config = AppConfig::from_lookup(lookup_from(&[
            (CLIENT_ID_VAR, "abc"),
            (CLIENT_SECRET_VAR, "s3cret"),
            (DB_PATH_VAR, "/var/lib/wow/auctions.db"),
        ]))
        .unwrap();

        assert_eq!(config.client_id, "abc");
        assert_eq!(config.client_secret, "s3cret");
        assert_eq!(config.db_path, PathBuf::from("/var/lib/wow/auctions.db"));
    }

    #[test]
    fn test_missing_value_fails_fast() {
        let err = AppConfig::from_lookup(lookup_from(&[
            (CLIENT_ID_VAR, "abc"),
            (DB_PATH_VAR, "auctions.db"),
        ]))
        .unwrap_err();

        assert!(matches!(
            err,
            EtlError::MissingConfigError { ref field } if field == CLIENT_SECRET_VAR
        ));
    }

    #[test]
    fn test_blank_value_is_invalid() {
        let err = AppConfig::from_lookup(lookup_from(&[
            (CLIENT_ID_VAR, "  "),
            (CLIENT_SECRET_VAR, "s3cret"),
            (DB_PATH_VAR, "auctions.db"),
        ]))
        .unwrap_err();

        assert!(matches!(err, EtlError::InvalidConfigValueError { .. }));
    }

    #[test]
    fn test_debug_redacts_secret() {
        let config = AppConfig::from_lookup(lookup_from(&[
            (CLIENT_ID_VAR, "abc"),
            (CLIENT_SECRET_VAR, "s3cret"),
            (DB_PATH_VAR, "auctions.db"),
        ]))
        .unwrap();

        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("s3cret"));
        assert!(rendered.contains("<redacted>"));
    }
}
