use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use regex_lite::Regex;

/// Announce CTF first bloods from CTFd on Discord.
///
/// First bloods made before the bot starts are skipped unless --existing
/// is given. Webhook, CTFd URL and CTFd access token must be set, either
/// as flags or through WEBHOOK_URL, CTFD_URL and CTFD_ACCESS_TOKEN
/// (possibly in a .env file).
#[derive(Debug, Clone, Parser)]
#[command(name = "firstblood", version, about)]
pub struct Config {
    /// Discord webhook URL
    #[arg(long = "webhook", env = "WEBHOOK_URL", hide_env_values = true)]
    pub webhook_url: String,

    /// CTFd URL
    #[arg(long = "ctfd", env = "CTFD_URL")]
    pub ctfd_url: String,

    /// CTFd access token
    #[arg(long = "token", env = "CTFD_ACCESS_TOKEN", hide_env_values = true)]
    pub ctfd_token: String,

    /// Announce existing solves
    #[arg(long, env = "ANNOUNCE_EXISTING")]
    pub existing: bool,

    /// Refresh interval in seconds
    #[arg(long, env = "POLL_INTERVAL", default_value_t = 5)]
    pub interval: u64,

    /// Path of the SQLite database of announced solves
    #[arg(long = "db", env = "FIRSTBLOOD_DB_PATH", default_value = "solves.db")]
    pub db_path: String,
}

impl Config {
    /// Parse flags, falling back to the environment.
    ///
    /// Call `dotenvy::dotenv()` first so .env values count as environment.
    pub fn load() -> Self {
        let mut config = Self::parse();
        config.ctfd_url = config.ctfd_url.trim_end_matches('/').to_string();
        config
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.interval)
    }

    /// Check that every setting is well-formed. Reachability is checked
    /// separately by `preflight`.
    pub fn validate(&self) -> Result<()> {
        let webhook_re = Regex::new(r"^https?://(?:ptb\.|canary\.)?discord(?:app)?\.com/api/webhooks/")?;
        if !webhook_re.is_match(&self.webhook_url) {
            anyhow::bail!(
                "Invalid webhook URL: expected https://discord.com/api/webhooks/...\n\
                 Set --webhook or WEBHOOK_URL."
            );
        }

        let http_re = Regex::new(r"^https?://")?;
        if !http_re.is_match(&self.ctfd_url) {
            anyhow::bail!(
                "Invalid CTFd URL: {} (must start with http:// or https://)",
                self.ctfd_url
            );
        }

        if self.ctfd_token.trim().is_empty() {
            anyhow::bail!("CTFD_ACCESS_TOKEN is empty. Set --token or CTFD_ACCESS_TOKEN.");
        }

        if self
            .ctfd_token
            .chars()
            .any(|c| c.is_whitespace() || c.is_control())
        {
            anyhow::bail!(
                "CTFD_ACCESS_TOKEN contains whitespace or control characters.\n\
                 Check for a stray newline or quote in your .env file."
            );
        }

        if self.interval == 0 {
            anyhow::bail!("--interval must be at least 1 second");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> Config {
        Config::try_parse_from([
            "firstblood",
            "--webhook",
            "https://discord.com/api/webhooks/123/abc",
            "--ctfd",
            "https://ctf.example.com/",
            "--token",
            "ctfd_0123",
        ])
        .unwrap()
    }

    #[test]
    fn defaults() {
        let config = config();
        assert!(!config.existing);
        assert_eq!(config.interval, 5);
        assert_eq!(config.db_path, "solves.db");
        assert_eq!(config.poll_interval(), Duration::from_secs(5));
    }

    #[test]
    fn valid_config_passes() {
        config().validate().unwrap();
    }

    #[test]
    fn non_discord_webhook_is_rejected() {
        let mut config = config();
        config.webhook_url = "https://example.com/api/webhooks/123/abc".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn legacy_discordapp_domain_is_accepted() {
        let mut config = config();
        config.webhook_url = "https://discordapp.com/api/webhooks/123/abc".to_string();
        config.validate().unwrap();
    }

    #[test]
    fn ctfd_url_needs_scheme() {
        let mut config = config();
        config.ctfd_url = "ctf.example.com".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn token_with_newline_gets_config_error() {
        let mut config = config();
        config.ctfd_token = "ctfd_0123\n".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("CTFD_ACCESS_TOKEN"));
    }

    #[test]
    fn zero_interval_is_rejected() {
        let mut config = config();
        config.interval = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn existing_flag_parses() {
        let config = Config::try_parse_from([
            "firstblood",
            "--webhook",
            "https://discord.com/api/webhooks/1/x",
            "--ctfd",
            "http://localhost:8000",
            "--token",
            "t",
            "--existing",
            "--interval",
            "30",
        ])
        .unwrap();
        assert!(config.existing);
        assert_eq!(config.interval, 30);
    }
}
