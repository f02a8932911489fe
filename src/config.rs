// Process configuration. Everything is read once at startup into an
// immutable `Config`; handlers receive it through the shared `AppState`.
use anyhow::Context;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_FRONTEND_DIST: &str = "../Frontend/dist";
pub const DEFAULT_STATIC_DIR: &str = "static";
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8000";
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 10;

/// Location and credential of the Firebase realtime database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FirebaseSettings {
    /// Base URL without a trailing slash.
    pub db_url: String,
    pub auth_token: String,
}

impl FirebaseSettings {
    /// REST endpoint of the root telemetry collection.
    pub fn collection_url(&self) -> String {
        format!("{}/data.json", self.db_url)
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    /// `None` means degraded mode: data endpoints answer with an error.
    pub firebase: Option<FirebaseSettings>,
    pub frontend_dist: PathBuf,
    pub static_dir: PathBuf,
    pub bind_addr: SocketAddr,
    pub fetch_timeout: Duration,
}

impl Config {
    /// Read configuration from the process environment. Call after
    /// `dotenv::dotenv()` so values from a `.env` file are visible.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup. Empty values
    /// count as unset.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let firebase = match (get("FIREBASE_DB_URL"), get("FIREBASE_AUTH_TOKEN")) {
            (Some(url), Some(token)) => Some(FirebaseSettings {
                db_url: url.trim().trim_end_matches('/').to_string(),
                auth_token: token,
            }),
            _ => None,
        };

        let bind_addr = get("BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .parse::<SocketAddr>()
            .context("BIND_ADDR must be a socket address such as 127.0.0.1:8000")?;

        let timeout_secs = match get("FIREBASE_TIMEOUT_SECS") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .context("FIREBASE_TIMEOUT_SECS must be a whole number of seconds")?,
            None => DEFAULT_FETCH_TIMEOUT_SECS,
        };

        Ok(Config {
            firebase,
            frontend_dist: get("FRONTEND_DIST_DIR")
                .unwrap_or_else(|| DEFAULT_FRONTEND_DIST.to_string())
                .into(),
            static_dir: get("STATIC_DIR")
                .unwrap_or_else(|| DEFAULT_STATIC_DIR.to_string())
                .into(),
            bind_addr,
            fetch_timeout: Duration::from_secs(timeout_secs),
        })
    }

    pub fn firebase_configured(&self) -> bool {
        self.firebase.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> anyhow::Result<Config> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_when_environment_is_empty() {
        let config = config_from(&[]).unwrap();
        assert!(config.firebase.is_none());
        assert!(!config.firebase_configured());
        assert_eq!(config.frontend_dist, PathBuf::from("../Frontend/dist"));
        assert_eq!(config.static_dir, PathBuf::from("static"));
        assert_eq!(config.bind_addr, "127.0.0.1:8000".parse().unwrap());
        assert_eq!(config.fetch_timeout, Duration::from_secs(10));
    }

    #[test]
    fn both_firebase_values_enable_data_endpoints() {
        let config = config_from(&[
            ("FIREBASE_DB_URL", "https://example.firebaseio.com/"),
            ("FIREBASE_AUTH_TOKEN", "secret"),
        ])
        .unwrap();
        let firebase = config.firebase.expect("firebase configured");
        assert_eq!(firebase.db_url, "https://example.firebaseio.com");
        assert_eq!(firebase.auth_token, "secret");
        assert_eq!(
            firebase.collection_url(),
            "https://example.firebaseio.com/data.json"
        );
    }

    #[test]
    fn one_missing_value_means_degraded_mode() {
        let url_only = config_from(&[("FIREBASE_DB_URL", "https://example.firebaseio.com")]).unwrap();
        assert!(url_only.firebase.is_none());

        let token_only = config_from(&[("FIREBASE_AUTH_TOKEN", "secret")]).unwrap();
        assert!(token_only.firebase.is_none());

        let empty_token = config_from(&[
            ("FIREBASE_DB_URL", "https://example.firebaseio.com"),
            ("FIREBASE_AUTH_TOKEN", ""),
        ])
        .unwrap();
        assert!(empty_token.firebase.is_none());
    }

    #[test]
    fn overrides_are_applied() {
        let config = config_from(&[
            ("FRONTEND_DIST_DIR", "/srv/dist"),
            ("STATIC_DIR", "/srv/static"),
            ("BIND_ADDR", "0.0.0.0:9000"),
            ("FIREBASE_TIMEOUT_SECS", "3"),
        ])
        .unwrap();
        assert_eq!(config.frontend_dist, PathBuf::from("/srv/dist"));
        assert_eq!(config.static_dir, PathBuf::from("/srv/static"));
        assert_eq!(config.bind_addr, "0.0.0.0:9000".parse().unwrap());
        assert_eq!(config.fetch_timeout, Duration::from_secs(3));
    }

    #[test]
    fn invalid_overrides_are_rejected() {
        assert!(config_from(&[("BIND_ADDR", "localhost")]).is_err());
        assert!(config_from(&[("FIREBASE_TIMEOUT_SECS", "ten")]).is_err());
    }
}
