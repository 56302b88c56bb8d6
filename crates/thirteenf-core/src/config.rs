use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use crate::retry::RetryPolicy;

/// Agent sent when neither the config nor the CLI names one.
pub const DEFAULT_USER_AGENT: &str = "thirteenf/0.1 (contact: you@example.com)";

/// Retry policy parameters (optional section in config.toml).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of attempts per request (including the first).
    pub max_attempts: u32,
    /// Linear backoff unit in seconds for timeouts and connection errors.
    pub base_delay_secs: f64,
    /// Linear pause unit in seconds after a 429/503.
    pub throttle_step_secs: f64,
    /// Maximum pause in seconds after a 429/503.
    pub throttle_ceiling_secs: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay_secs: 1.0,
            throttle_step_secs: 1.5,
            throttle_ceiling_secs: 10.0,
        }
    }
}

/// Seconds from config as a `Duration`. Negative and NaN become zero; values
/// too large to represent saturate instead of panicking.
pub fn duration_from_secs(secs: f64) -> Duration {
    if secs.is_nan() || secs <= 0.0 {
        return Duration::ZERO;
    }
    Duration::try_from_secs_f64(secs).unwrap_or(Duration::MAX)
}

impl From<&RetryConfig> for RetryPolicy {
    fn from(c: &RetryConfig) -> Self {
        RetryPolicy {
            max_attempts: c.max_attempts.max(1),
            base_delay: duration_from_secs(c.base_delay_secs),
            throttle_step: duration_from_secs(c.throttle_step_secs),
            throttle_ceiling: duration_from_secs(c.throttle_ceiling_secs),
        }
    }
}

/// Base URLs of the EDGAR hosts. Overridable so tests (and mirrors) can
/// point the pipeline elsewhere.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoints {
    /// Company search (`/cgi-bin/browse-edgar`).
    pub www_base: String,
    /// Submissions API (`/submissions/CIK##########.json`).
    pub data_base: String,
    /// Filing archive root (`<root>/<cik>/<accession>/...`).
    pub archives_base: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            www_base: "https://www.sec.gov".to_string(),
            data_base: "https://data.sec.gov".to_string(),
            archives_base: "https://sec.gov/Archives/edgar/data".to_string(),
        }
    }
}

impl Endpoints {
    /// All three hosts rooted at one base URL (e.g. a local test server).
    pub fn rooted_at(base: &str) -> Self {
        let base = base.trim_end_matches('/');
        Self {
            www_base: base.to_string(),
            data_base: base.to_string(),
            archives_base: format!("{base}/Archives/edgar/data"),
        }
    }
}

/// Global configuration loaded from `~/.config/thirteenf/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThirteenfConfig {
    /// `User-Agent` for every request; EDGAR asks for a name and contact.
    pub user_agent: String,
    /// Per-attempt timeout in seconds.
    pub request_timeout_secs: u64,
    /// Pause in seconds after every successful request.
    pub polite_delay_secs: f64,
    /// Optional retry policy; if missing, built-in defaults are used.
    #[serde(default)]
    pub retry: Option<RetryConfig>,
    /// Optional host overrides; if missing, the public EDGAR hosts are used.
    #[serde(default)]
    pub endpoints: Option<Endpoints>,
}

impl Default for ThirteenfConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            request_timeout_secs: 15,
            polite_delay_secs: 0.5,
            retry: None,
            endpoints: None,
        }
    }
}

impl ThirteenfConfig {
    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry
            .as_ref()
            .map(RetryPolicy::from)
            .unwrap_or_else(|| RetryPolicy::from(&RetryConfig::default()))
    }

    pub fn endpoints(&self) -> Endpoints {
        self.endpoints.clone().unwrap_or_default()
    }

    /// Every `*_secs` value must be a finite, non-negative duration.
    pub fn validate(&self) -> Result<()> {
        let mut fields = vec![("polite_delay_secs", self.polite_delay_secs)];
        if let Some(r) = &self.retry {
            fields.extend([
                ("retry.base_delay_secs", r.base_delay_secs),
                ("retry.throttle_step_secs", r.throttle_step_secs),
                ("retry.throttle_ceiling_secs", r.throttle_ceiling_secs),
            ]);
        }
        for (name, secs) in fields {
            Duration::try_from_secs_f64(secs)
                .map_err(|e| anyhow!("{name} = {secs} is not a usable duration: {e}"))?;
        }
        Ok(())
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("thirteenf")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<ThirteenfConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = ThirteenfConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: ThirteenfConfig = toml::from_str(&data)?;
    cfg.validate()
        .with_context(|| format!("invalid config {}", path.display()))?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_values() {
        let cfg = ThirteenfConfig::default();
        assert_eq!(cfg.user_agent, DEFAULT_USER_AGENT);
        assert_eq!(cfg.request_timeout_secs, 15);
        assert!((cfg.polite_delay_secs - 0.5).abs() < 1e-9);
        let p = cfg.retry_policy();
        assert_eq!(p.max_attempts, 3);
        assert_eq!(p.base_delay, Duration::from_secs(1));
        assert_eq!(p.throttle_ceiling, Duration::from_secs(10));
        assert_eq!(cfg.endpoints(), Endpoints::default());
    }

    #[test]
    fn config_toml_roundtrip() {
        let cfg = ThirteenfConfig::default();
        let toml = toml::to_string_pretty(&cfg).unwrap();
        let parsed: ThirteenfConfig = toml::from_str(&toml).unwrap();
        assert_eq!(parsed.user_agent, cfg.user_agent);
        assert_eq!(parsed.request_timeout_secs, cfg.request_timeout_secs);
        assert!(parsed.retry.is_none());
        assert!(parsed.endpoints.is_none());
    }

    #[test]
    fn config_toml_retry_and_endpoints() {
        let toml = r#"
            user_agent = "Acme Research ops@acme.test"
            request_timeout_secs = 30
            polite_delay_secs = 0.0

            [retry]
            max_attempts = 5
            base_delay_secs = 0.25
            throttle_step_secs = 2.0
            throttle_ceiling_secs = 8.0

            [endpoints]
            www_base = "http://127.0.0.1:8080"
            data_base = "http://127.0.0.1:8080"
            archives_base = "http://127.0.0.1:8080/Archives/edgar/data"
        "#;
        let cfg: ThirteenfConfig = toml::from_str(toml).unwrap();
        assert_eq!(cfg.user_agent, "Acme Research ops@acme.test");
        let p = cfg.retry_policy();
        assert_eq!(p.max_attempts, 5);
        assert_eq!(p.base_delay, Duration::from_millis(250));
        assert_eq!(p.throttle_step, Duration::from_secs(2));
        assert_eq!(p.throttle_ceiling, Duration::from_secs(8));
        assert_eq!(cfg.endpoints(), Endpoints::rooted_at("http://127.0.0.1:8080/"));
    }

    #[test]
    fn unrepresentable_delays_are_rejected() {
        for bad in ["inf", "1e30", "-1.0", "nan"] {
            let toml = format!(
                "user_agent = \"x\"\nrequest_timeout_secs = 5\npolite_delay_secs = {bad}\n"
            );
            let cfg: ThirteenfConfig = toml::from_str(&toml).unwrap();
            assert!(cfg.validate().is_err(), "{bad}");
        }
        let cfg = ThirteenfConfig {
            retry: Some(RetryConfig {
                throttle_ceiling_secs: f64::INFINITY,
                ..RetryConfig::default()
            }),
            ..ThirteenfConfig::default()
        };
        assert!(cfg.validate().is_err());
        assert!(ThirteenfConfig::default().validate().is_ok());
    }

    #[test]
    fn huge_delays_saturate_instead_of_panicking() {
        assert_eq!(duration_from_secs(f64::INFINITY), Duration::MAX);
        assert_eq!(duration_from_secs(1e30), Duration::MAX);
        assert_eq!(duration_from_secs(f64::NAN), Duration::ZERO);
        assert_eq!(duration_from_secs(-2.0), Duration::ZERO);
        assert_eq!(duration_from_secs(0.25), Duration::from_millis(250));
        let rc = RetryConfig {
            base_delay_secs: f64::INFINITY,
            ..RetryConfig::default()
        };
        assert_eq!(RetryPolicy::from(&rc).base_delay, Duration::MAX);
    }

    #[test]
    fn zero_attempts_still_tries_once() {
        let rc = RetryConfig {
            max_attempts: 0,
            ..RetryConfig::default()
        };
        assert_eq!(RetryPolicy::from(&rc).max_attempts, 1);
    }
}
