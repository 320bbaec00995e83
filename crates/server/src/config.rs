use std::{collections::HashMap, fs, path::Path};

use anyhow::Context;
use shared::endpoints::{ServiceEndpoints, DEFAULT_UPSTREAM_URL};

const SETTINGS_FILE: &str = "server.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub server_bind: String,
    pub upstream_url: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_bind: "127.0.0.1:3000".into(),
            upstream_url: DEFAULT_UPSTREAM_URL.into(),
        }
    }
}

impl Settings {
    pub fn endpoints(&self) -> anyhow::Result<ServiceEndpoints> {
        ServiceEndpoints::parse(&self.upstream_url)
            .with_context(|| format!("invalid upstream url '{}'", self.upstream_url))
    }
}

pub fn load_settings() -> Settings {
    load_settings_from(Path::new(SETTINGS_FILE), |name| std::env::var(name).ok())
}

/// `server.toml` first, then environment; later sources win.
///
/// `FASTAPI_URL` is the older name for the upstream address and may still
/// carry the full `/analyze` path.
pub(crate) fn load_settings_from(
    file: &Path,
    env: impl Fn(&str) -> Option<String>,
) -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string(file) {
        match toml::from_str::<HashMap<String, String>>(&raw) {
            Ok(file_cfg) => {
                if let Some(v) = file_cfg.get("bind_addr") {
                    settings.server_bind = v.clone();
                }
                if let Some(v) = file_cfg.get("upstream_url") {
                    settings.upstream_url = v.clone();
                }
            }
            Err(error) => {
                tracing::warn!(file = %file.display(), %error, "ignoring unreadable settings file");
            }
        }
    }

    if let Some(v) = env("SERVER_BIND") {
        settings.server_bind = v;
    }
    if let Some(v) = env("APP__BIND_ADDR") {
        settings.server_bind = v;
    }

    if let Some(v) = env("FASTAPI_URL") {
        settings.upstream_url = v;
    }
    if let Some(v) = env("APP__UPSTREAM_URL") {
        settings.upstream_url = v;
    }

    settings
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
