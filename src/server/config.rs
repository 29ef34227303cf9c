use chrono_tz::Tz;
use url::Url;

use crate::server::error::{config::ConfigError, AppError};

const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:3000";
const DEFAULT_RESEND_API_URL: &str = "https://api.resend.com";
const DEFAULT_MAIL_FROM: &str = "GARD 018 <info@gard018.com>";
const DEFAULT_MAIL_REPLY_TO: &str = "info@gard018.com";
const DEFAULT_CLUB_TIMEZONE: &str = "Europe/Belgrade";
/// Every day at 23:00 UTC, shortly after midnight in Belgrade.
const DEFAULT_EXPIRY_CRON: &str = "0 0 23 * * *";
const DEFAULT_EXPIRY_WARNING_DAYS: u32 = 3;

pub struct Config {
    pub database_url: String,
    pub bind_address: String,
    pub app_url: Url,
    pub session_secure: bool,

    pub cron_secret: String,
    pub expiry_cron: String,
    pub expiry_warning_days: u32,
    pub club_timezone: Tz,

    pub resend_api_key: String,
    pub resend_api_url: String,
    pub mail_from: String,
    pub mail_reply_to: String,
    pub founder_email: String,

    pub primary_admin_email: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    ///
    /// Empty values are treated as unset.
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let get = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());
        let require =
            |name: &str| get(name).ok_or_else(|| ConfigError::MissingEnvVar(name.to_string()));
        let or_default = |name: &str, default: &str| get(name).unwrap_or_else(|| default.into());

        let app_url = parse_var("APP_URL", &require("APP_URL")?, |v| Url::parse(v))?;
        let club_timezone = parse_var(
            "CLUB_TIMEZONE",
            &or_default("CLUB_TIMEZONE", DEFAULT_CLUB_TIMEZONE),
            |v| v.parse::<Tz>(),
        )?;
        let expiry_warning_days = match get("EXPIRY_WARNING_DAYS") {
            Some(value) => parse_var("EXPIRY_WARNING_DAYS", &value, |v| v.parse::<u32>())?,
            None => DEFAULT_EXPIRY_WARNING_DAYS,
        };
        let session_secure = match get("SESSION_SECURE") {
            Some(value) => parse_var("SESSION_SECURE", &value, |v| v.parse::<bool>())?,
            None => true,
        };

        Ok(Self {
            database_url: require("DATABASE_URL")?,
            bind_address: or_default("BIND_ADDRESS", DEFAULT_BIND_ADDRESS),
            app_url,
            session_secure,
            cron_secret: require("CRON_SECRET")?,
            expiry_cron: or_default("EXPIRY_CRON", DEFAULT_EXPIRY_CRON),
            expiry_warning_days,
            club_timezone,
            resend_api_key: require("RESEND_API_KEY")?,
            resend_api_url: or_default("RESEND_API_URL", DEFAULT_RESEND_API_URL),
            mail_from: or_default("MAIL_FROM", DEFAULT_MAIL_FROM),
            mail_reply_to: or_default("MAIL_REPLY_TO", DEFAULT_MAIL_REPLY_TO),
            founder_email: require("FOUNDER_EMAIL")?,
            primary_admin_email: get("PRIMARY_ADMIN_EMAIL").map(|email| email.to_lowercase()),
        })
    }
}

fn parse_var<T, E: std::fmt::Display>(
    name: &str,
    value: &str,
    parse: impl FnOnce(&str) -> Result<T, E>,
) -> Result<T, ConfigError> {
    parse(value).map_err(|e| ConfigError::InvalidEnvVar {
        name: name.to_string(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn required() -> HashMap<&'static str, &'static str> {
        HashMap::from([
            ("DATABASE_URL", "sqlite::memory:"),
            ("APP_URL", "https://gard018.com"),
            ("CRON_SECRET", "s3cret"),
            ("RESEND_API_KEY", "re_test"),
            ("FOUNDER_EMAIL", "owner@gard018.com"),
        ])
    }

    fn load(vars: &HashMap<&'static str, &'static str>) -> Result<Config, AppError> {
        Config::from_lookup(|name| vars.get(name).map(|v| v.to_string()))
    }

    #[test]
    fn applies_defaults_for_optional_variables() {
        let config = load(&required()).unwrap();

        assert_eq!(config.bind_address, DEFAULT_BIND_ADDRESS);
        assert_eq!(config.club_timezone, chrono_tz::Europe::Belgrade);
        assert_eq!(config.expiry_cron, DEFAULT_EXPIRY_CRON);
        assert_eq!(config.expiry_warning_days, 3);
        assert_eq!(config.mail_from, DEFAULT_MAIL_FROM);
        assert!(config.session_secure);
        assert!(config.primary_admin_email.is_none());
    }

    #[test]
    fn reports_the_missing_variable_by_name() {
        let mut vars = required();
        vars.remove("CRON_SECRET");

        let result = load(&vars);

        assert!(matches!(
            result,
            Err(AppError::ConfigErr(ConfigError::MissingEnvVar(name))) if name == "CRON_SECRET"
        ));
    }

    #[test]
    fn treats_blank_values_as_missing() {
        let mut vars = required();
        vars.insert("FOUNDER_EMAIL", "   ");

        assert!(matches!(
            load(&vars),
            Err(AppError::ConfigErr(ConfigError::MissingEnvVar(name))) if name == "FOUNDER_EMAIL"
        ));
    }

    #[test]
    fn rejects_unknown_timezone() {
        let mut vars = required();
        vars.insert("CLUB_TIMEZONE", "Europe/Atlantis");

        assert!(matches!(
            load(&vars),
            Err(AppError::ConfigErr(ConfigError::InvalidEnvVar { name, .. })) if name == "CLUB_TIMEZONE"
        ));
    }

    #[test]
    fn lowercases_primary_admin_email() {
        let mut vars = required();
        vars.insert("PRIMARY_ADMIN_EMAIL", "Owner@GARD018.com");

        let config = load(&vars).unwrap();

        assert_eq!(config.primary_admin_email.as_deref(), Some("owner@gard018.com"));
    }
}
