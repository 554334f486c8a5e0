// ============================================================================
// Configuration
// ============================================================================
// Tout vient de l'environnement (avec support d'un fichier .env) :
//
//   FASTFOREX_API_KEY          clé FastForex ; absente → Frankfurter partout
//   FASTFOREX_BASE_URL         https://api.fastforex.io
//   FRANKFURTER_BASE_URL       https://api.frankfurter.app
//   LAZYFX_LOG_DIR             ~/.local/share/lazyfx/logs (ou ./logs)
//   LAZYFX_KPI_PERIOD_SECS     60
//   LAZYFX_TREND_PERIOD_SECS   3600
//   LAZYFX_PAIRS_PERIOD_SECS   3600
//   LAZYFX_TABLE_PERIOD_SECS   60
//   LAZYFX_RATES_PERIOD_SECS   60
//
// CONCEPT RUST : Injection de la source des variables
// - from_env() lit le vrai environnement
// - from_lookup() prend une closure : les tests n'ont pas à modifier l'env
// ============================================================================

use std::env;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};

pub const DEFAULT_FASTFOREX_URL: &str = "https://api.fastforex.io";
pub const DEFAULT_FRANKFURTER_URL: &str = "https://api.frankfurter.app";

/// Périodes de rafraîchissement des widgets récurrents
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshPeriods {
    pub kpi: Duration,
    pub trend: Duration,
    pub pairs: Duration,
    pub table: Duration,
    pub rates: Duration,
}

impl Default for RefreshPeriods {
    fn default() -> Self {
        Self {
            kpi: Duration::from_secs(60),
            trend: Duration::from_secs(3600),
            pairs: Duration::from_secs(3600),
            table: Duration::from_secs(60),
            rates: Duration::from_secs(60),
        }
    }
}

/// Configuration de l'application
#[derive(Clone)]
pub struct Config {
    pub fastforex_api_key: Option<String>,
    pub fastforex_base_url: String,
    pub frankfurter_base_url: String,
    pub log_dir: PathBuf,
    pub periods: RefreshPeriods,
}

/// La clé API n'apparaît jamais dans les logs
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field(
                "fastforex_api_key",
                &self.fastforex_api_key.as_ref().map(|_| "<redacted>"),
            )
            .field("fastforex_base_url", &self.fastforex_base_url)
            .field("frankfurter_base_url", &self.frankfurter_base_url)
            .field("log_dir", &self.log_dir)
            .field("periods", &self.periods)
            .finish()
    }
}

impl Config {
    /// Charge .env (s'il existe) puis lit l'environnement
    pub fn from_env() -> Result<Self> {
        // Un .env absent n'est pas une erreur
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Construit la config à partir d'une fonction de lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let defaults = RefreshPeriods::default();
        let periods = RefreshPeriods {
            kpi: period(&non_empty, "LAZYFX_KPI_PERIOD_SECS", defaults.kpi)?,
            trend: period(&non_empty, "LAZYFX_TREND_PERIOD_SECS", defaults.trend)?,
            pairs: period(&non_empty, "LAZYFX_PAIRS_PERIOD_SECS", defaults.pairs)?,
            table: period(&non_empty, "LAZYFX_TABLE_PERIOD_SECS", defaults.table)?,
            rates: period(&non_empty, "LAZYFX_RATES_PERIOD_SECS", defaults.rates)?,
        };

        Ok(Self {
            fastforex_api_key: non_empty("FASTFOREX_API_KEY"),
            fastforex_base_url: non_empty("FASTFOREX_BASE_URL")
                .unwrap_or_else(|| DEFAULT_FASTFOREX_URL.to_string()),
            frankfurter_base_url: non_empty("FRANKFURTER_BASE_URL")
                .unwrap_or_else(|| DEFAULT_FRANKFURTER_URL.to_string()),
            log_dir: non_empty("LAZYFX_LOG_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(default_log_dir),
            periods,
        })
    }
}

/// Répertoire de logs par défaut
///
/// - Linux/WSL : ~/.local/share/lazyfx/logs
/// - macOS : ~/Library/Application Support/lazyfx/logs
/// - Windows : C:\Users\<user>\AppData\Local\lazyfx\logs
pub fn default_log_dir() -> PathBuf {
    dirs::data_local_dir()
        .map(|dir| dir.join("lazyfx").join("logs"))
        .unwrap_or_else(|| PathBuf::from("./logs"))
}

/// Lit une période en secondes ; zéro ou non numérique → erreur
fn period<F>(lookup: &F, key: &str, default: Duration) -> Result<Duration>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(key) else {
        return Ok(default);
    };

    let secs: u64 = raw
        .parse()
        .with_context(|| format!("{} doit être un nombre de secondes, reçu {:?}", key, raw))?;

    if secs == 0 {
        bail!("{} doit être strictement positif", key);
    }
    Ok(Duration::from_secs(secs))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.fastforex_api_key, None);
        assert_eq!(config.fastforex_base_url, DEFAULT_FASTFOREX_URL);
        assert_eq!(config.frankfurter_base_url, DEFAULT_FRANKFURTER_URL);
        assert_eq!(config.periods, RefreshPeriods::default());
        assert!(config.log_dir.ends_with("logs"));
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("FASTFOREX_API_KEY", "abc"),
            ("FRANKFURTER_BASE_URL", "http://127.0.0.1:9000"),
            ("LAZYFX_LOG_DIR", "/tmp/lazyfx"),
            ("LAZYFX_KPI_PERIOD_SECS", "15"),
        ])
        .unwrap();

        assert_eq!(config.fastforex_api_key.as_deref(), Some("abc"));
        assert_eq!(config.frankfurter_base_url, "http://127.0.0.1:9000");
        assert_eq!(config.log_dir, PathBuf::from("/tmp/lazyfx"));
        assert_eq!(config.periods.kpi, Duration::from_secs(15));
        assert_eq!(config.periods.trend, Duration::from_secs(3600));
    }

    #[test]
    fn test_blank_key_means_no_key() {
        let config = config_from(&[("FASTFOREX_API_KEY", "   ")]).unwrap();
        assert_eq!(config.fastforex_api_key, None);
    }

    #[test]
    fn test_invalid_periods_are_errors() {
        assert!(config_from(&[("LAZYFX_TABLE_PERIOD_SECS", "soon")]).is_err());
        assert!(config_from(&[("LAZYFX_RATES_PERIOD_SECS", "0")]).is_err());
        assert!(config_from(&[("LAZYFX_PAIRS_PERIOD_SECS", "-5")]).is_err());
    }

    #[test]
    fn test_debug_redacts_key() {
        let config = config_from(&[("FASTFOREX_API_KEY", "super-secret")]).unwrap();
        assert!(!format!("{:?}", config).contains("super-secret"));
    }
}
