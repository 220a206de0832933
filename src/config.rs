use serde::Deserialize;
use tracing::warn;

fn default_server_port() -> u16 {
    3000
}

fn default_currency_symbol() -> String {
    "$".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub calculator: CalculatorConfig,
    /// Single configured currency symbol for every calculator view.
    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,
    /// Identity provider settings. Optional: when missing or incomplete the
    /// service runs with auth in a visible "not configured" state.
    #[serde(default)]
    pub provider: Option<ProviderConfig>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_server_port")]
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct CalculatorConfig {
    /// Legacy simulated network delay before an estimate is published, in
    /// milliseconds. 0 disables it.
    #[serde(default)]
    pub simulated_delay_ms: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ProviderConfig {
    /// Provider endpoint URL
    pub url: String,
    /// Provider public (anon) key
    pub anon_key: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            port: default_server_port(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server: ServerConfig::default(),
            calculator: CalculatorConfig::default(),
            currency_symbol: default_currency_symbol(),
            provider: None,
        }
    }
}

impl Config {
    /// Load `config.json`. A missing file degrades to defaults (no provider,
    /// port 3000); a present-but-invalid file is a real error.
    pub fn load(path: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!("{path} not found, using default configuration");
                return Ok(Config::default());
            }
            Err(e) => return Err(e.into()),
        };
        let config = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Both provider settings must be present for auth to operate.
    pub fn provider_configured(&self) -> bool {
        self.provider
            .as_ref()
            .is_some_and(|p| !p.url.trim().is_empty() && !p.anon_key.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_run_without_a_provider() {
        let config = Config::default();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.currency_symbol, "$");
        assert!(!config.provider_configured());
    }

    #[test]
    fn full_config_parses() {
        let config: Config = serde_json::from_str(
            r#"{
                "server": { "port": 8080 },
                "calculator": { "simulated_delay_ms": 2000 },
                "currency_symbol": "$",
                "provider": { "url": "https://example.supabase.co", "anon_key": "public-key" }
            }"#,
        )
        .unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.calculator.simulated_delay_ms, 2000);
        assert!(config.provider_configured());
    }

    #[test]
    fn blank_provider_settings_count_as_unconfigured() {
        let config: Config =
            serde_json::from_str(r#"{ "provider": { "url": "", "anon_key": "" } }"#).unwrap();
        assert!(!config.provider_configured());
    }
}
