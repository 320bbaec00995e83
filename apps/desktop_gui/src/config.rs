use anyhow::Context;
use shared::endpoints::ServiceEndpoints;

pub const SERVICE_URL_ENV: &str = "DOC_ANALYZER_SERVICE_URL";
pub const DEFAULT_SERVICE_URL: &str = "http://127.0.0.1:3000/api";

#[derive(Debug, Clone)]
pub struct StartupConfig {
    pub service_url: String,
}

impl Default for StartupConfig {
    fn default() -> Self {
        Self {
            service_url: DEFAULT_SERVICE_URL.to_string(),
        }
    }
}

impl StartupConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(env: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(url) = env(SERVICE_URL_ENV).filter(|v| !v.trim().is_empty()) {
            config.service_url = url;
        }
        config
    }

    pub fn endpoints(&self) -> anyhow::Result<ServiceEndpoints> {
        ServiceEndpoints::parse(&self.service_url)
            .with_context(|| format!("invalid {SERVICE_URL_ENV} '{}'", self.service_url))
    }
}
