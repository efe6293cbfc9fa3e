//! Key/value settings at deployment and per-user scope.
//!
//! [`SettingsStore`] is the read/write capability the reference engine and
//! TMDB client consume. [`MemorySettings`] is the default implementation:
//! seeded from the config file and, when given a path, written through to it
//! with [`crate::config::persist`].

use std::collections::HashMap;
use std::path::PathBuf;

use cineref_common::{Error, Result, UserId};
use parking_lot::RwLock;

use crate::config::{persist, Config};
use crate::APP_ID;

/// Deployment and user flag: `"1"` enables link previews.
pub const LINK_PREVIEW_ENABLED: &str = "link_preview_enabled";
/// User flag: `"1"` enables the catalog search providers.
pub const SEARCH_ENABLED: &str = "search_enabled";
/// Deployment TMDB v3 API key.
pub const API_KEY: &str = "api_key";
/// User TMDB v4 read access token; takes precedence over [`API_KEY`].
pub const TOKEN: &str = "token";
/// User response language (e.g. `"de-DE"`).
pub const LANGUAGE: &str = "language";

/// User settings the relay accepts.
pub const USER_KEYS: [&str; 4] = [TOKEN, LANGUAGE, LINK_PREVIEW_ENABLED, SEARCH_ENABLED];
/// Deployment settings the relay accepts.
pub const APP_KEYS: [&str; 2] = [API_KEY, LINK_PREVIEW_ENABLED];

/// Read/write access to namespaced settings.
///
/// Reads never fail: a missing value yields the caller's default. A read for
/// no user (`None`) always yields the default.
pub trait SettingsStore: Send + Sync {
    fn user_value(&self, user: Option<&UserId>, namespace: &str, key: &str, default: &str)
        -> String;

    fn app_value(&self, namespace: &str, key: &str, default: &str) -> String;

    fn set_user_value(&self, user: &UserId, namespace: &str, key: &str, value: &str)
        -> Result<()>;

    fn set_app_value(&self, namespace: &str, key: &str, value: &str) -> Result<()>;
}

type Key = (String, String);

/// In-memory settings store with optional write-through to the config file.
#[derive(Debug, Default)]
pub struct MemorySettings {
    app: RwLock<HashMap<Key, String>>,
    users: RwLock<HashMap<UserId, HashMap<Key, String>>>,
    /// Config file to persist writes to (None = memory only).
    config_path: Option<PathBuf>,
}

impl MemorySettings {
    /// Build a store seeded from the `[settings]` and `[users]` config tables.
    pub fn from_config(config: &Config, config_path: Option<PathBuf>) -> Self {
        let app = config
            .settings
            .iter()
            .map(|(k, v)| ((APP_ID.to_string(), k.clone()), v.clone()))
            .collect();

        let users = config
            .users
            .iter()
            .map(|(user, values)| {
                let values = values
                    .iter()
                    .map(|(k, v)| ((APP_ID.to_string(), k.clone()), v.clone()))
                    .collect();
                (UserId::new(user.as_str()), values)
            })
            .collect();

        Self {
            app: RwLock::new(app),
            users: RwLock::new(users),
            config_path,
        }
    }

    fn persist_user(&self, user: &UserId, namespace: &str, key: &str, value: &str) -> Result<()> {
        let Some(ref path) = self.config_path else {
            return Ok(());
        };
        if namespace != APP_ID {
            return Ok(());
        }
        persist::update_user_value(path, user.as_str(), key, value)
            .map_err(|e| Error::config(format!("{e:#}")))
    }

    fn persist_app(&self, namespace: &str, key: &str, value: &str) -> Result<()> {
        let Some(ref path) = self.config_path else {
            return Ok(());
        };
        if namespace != APP_ID {
            return Ok(());
        }
        persist::update_app_value(path, key, value).map_err(|e| Error::config(format!("{e:#}")))
    }
}

fn key(namespace: &str, key: &str) -> Key {
    (namespace.to_string(), key.to_string())
}

impl SettingsStore for MemorySettings {
    fn user_value(
        &self,
        user: Option<&UserId>,
        namespace: &str,
        k: &str,
        default: &str,
    ) -> String {
        let Some(user) = user else {
            return default.to_string();
        };
        self.users
            .read()
            .get(user)
            .and_then(|values| values.get(&key(namespace, k)))
            .cloned()
            .unwrap_or_else(|| default.to_string())
    }

    fn app_value(&self, namespace: &str, k: &str, default: &str) -> String {
        self.app
            .read()
            .get(&key(namespace, k))
            .cloned()
            .unwrap_or_else(|| default.to_string())
    }

    // Persist first: a value that failed to reach the file is never visible.
    fn set_user_value(&self, user: &UserId, namespace: &str, k: &str, value: &str) -> Result<()> {
        let mut users = self.users.write();
        self.persist_user(user, namespace, k, value)?;
        users
            .entry(user.clone())
            .or_default()
            .insert(key(namespace, k), value.to_string());
        Ok(())
    }

    fn set_app_value(&self, namespace: &str, k: &str, value: &str) -> Result<()> {
        let mut app = self.app.write();
        self.persist_app(namespace, k, value)?;
        app.insert(key(namespace, k), value.to_string());
        Ok(())
    }
}
