use std::path::PathBuf;

pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_CASES_CSV_PATH: &str = "data/predicted_cases.csv";

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    /// Location of the case CSV. Read on every request, never written.
    pub cases_csv_path: PathBuf,
    /// Restricts CORS to one dashboard origin; permissive when unset.
    pub cors_origin: Option<String>,
    /// Per-IP request rate for the case endpoints; `None` disables limiting.
    pub rate_limit_per_second: Option<u64>,
    pub rate_limit_burst: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            cases_csv_path: PathBuf::from(DEFAULT_CASES_CSV_PATH),
            cors_origin: None,
            rate_limit_per_second: Some(10),
            rate_limit_burst: 20,
        }
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from any key lookup; `from_env` passes the process environment.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let config = Self {
            port: match lookup("PORT") {
                Some(port) => port
                    .trim()
                    .parse::<u16>()
                    .ok()
                    .filter(|p| *p != 0)
                    .ok_or_else(|| anyhow::anyhow!("PORT must be a valid number between 1-65535"))?,
                None => defaults.port,
            },
            cases_csv_path: match lookup("CASES_CSV_PATH") {
                Some(path) => {
                    if path.trim().is_empty() {
                        anyhow::bail!("CASES_CSV_PATH cannot be empty");
                    }
                    PathBuf::from(path.trim())
                }
                None => defaults.cases_csv_path,
            },
            cors_origin: lookup("CORS_ORIGIN")
                .filter(|s| !s.trim().is_empty())
                .map(|origin| {
                    if !origin.starts_with("http://") && !origin.starts_with("https://") {
                        anyhow::bail!("CORS_ORIGIN must start with http:// or https://");
                    }
                    Ok(origin)
                })
                .transpose()?,
            rate_limit_per_second: match lookup("RATE_LIMIT_PER_SECOND") {
                Some(rate) => {
                    let rate: u64 = rate.trim().parse().map_err(|_| {
                        anyhow::anyhow!("RATE_LIMIT_PER_SECOND must be a non-negative number")
                    })?;
                    (rate > 0).then_some(rate)
                }
                None => defaults.rate_limit_per_second,
            },
            rate_limit_burst: match lookup("RATE_LIMIT_BURST") {
                Some(burst) => burst
                    .trim()
                    .parse::<u32>()
                    .ok()
                    .filter(|b| *b > 0)
                    .ok_or_else(|| anyhow::anyhow!("RATE_LIMIT_BURST must be a positive number"))?,
                None => defaults.rate_limit_burst,
            },
        };

        tracing::info!("Configuration loaded successfully");
        tracing::debug!("Cases CSV path: {}", config.cases_csv_path.display());
        if let Some(ref origin) = config.cors_origin {
            tracing::info!("CORS restricted to origin: {}", origin);
        }
        match config.rate_limit_per_second {
            Some(rate) => tracing::debug!(
                "Rate limit: {} req/s per IP, burst {}",
                rate,
                config.rate_limit_burst
            ),
            None => tracing::debug!("Rate limiting disabled"),
        }
        tracing::debug!("Server Port: {}", config.port);

        Ok(config)
    }
}
