/// Default table name for the hosted REST store, the table the existing
/// hosted deployment writes to.
pub const DEFAULT_LOG_TABLE: &str = "natro_logs";

/// Errors raised while reading configuration at startup.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{var} must be a valid {expected}, got {value:?}")]
    Invalid {
        var: &'static str,
        expected: &'static str,
        value: String,
    },

    #[error("No log store configured: set DATABASE_URL, or SUPABASE_URL and SUPABASE_KEY")]
    MissingStore,
}

/// Which backend relay log rows are written to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreConfig {
    /// Direct Postgres connection through sqlx.
    Postgres {
        url: String,
        max_connections: u32,
    },
    /// Hosted PostgREST endpoint (e.g. Supabase) over HTTP.
    Rest {
        url: String,
        api_key: String,
        table: String,
    },
}

/// Server configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Whole-request timeout in seconds (default: `60`).
    pub request_timeout_secs: u64,
    /// Timeout for the outbound destination call in seconds (default: `30`).
    pub forward_timeout_secs: u64,
    /// Interval of the background retention sweep. `None` disables it.
    pub sweep_interval_secs: Option<u64>,
    /// Log store backend.
    pub store: StoreConfig,
}

impl ServerConfig {
    /// Load configuration from the process environment.
    ///
    /// | Env Var                    | Default          |
    /// |----------------------------|------------------|
    /// | `HOST`                     | `0.0.0.0`        |
    /// | `PORT`                     | `3000`           |
    /// | `REQUEST_TIMEOUT_SECS`     | `60`             |
    /// | `FORWARD_TIMEOUT_SECS`     | `30`             |
    /// | `LOG_SWEEP_INTERVAL_SECS`  | disabled         |
    /// | `DATABASE_URL`             | --               |
    /// | `DATABASE_MAX_CONNECTIONS` | `5`              |
    /// | `SUPABASE_URL`             | --               |
    /// | `SUPABASE_KEY`             | --               |
    /// | `LOG_TABLE`                | `natro_logs`     |
    ///
    /// `DATABASE_URL` takes precedence over the REST store settings.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Load configuration through an arbitrary variable lookup. Blank values
    /// count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());

        let host = get("HOST").unwrap_or_else(|| "0.0.0.0".into());
        let port = parse_or(get("PORT"), "PORT", "u16", 3000)?;
        let request_timeout_secs =
            parse_or(get("REQUEST_TIMEOUT_SECS"), "REQUEST_TIMEOUT_SECS", "u64", 60)?;
        let forward_timeout_secs =
            parse_or(get("FORWARD_TIMEOUT_SECS"), "FORWARD_TIMEOUT_SECS", "u64", 30)?;
        let sweep_interval_secs = parse_or(
            get("LOG_SWEEP_INTERVAL_SECS"),
            "LOG_SWEEP_INTERVAL_SECS",
            "u64",
            0u64,
        )?;

        let store = match (get("DATABASE_URL"), get("SUPABASE_URL"), get("SUPABASE_KEY")) {
            (Some(url), _, _) => StoreConfig::Postgres {
                url,
                max_connections: parse_or(
                    get("DATABASE_MAX_CONNECTIONS"),
                    "DATABASE_MAX_CONNECTIONS",
                    "u32",
                    5,
                )?,
            },
            (None, Some(url), Some(api_key)) => StoreConfig::Rest {
                url,
                api_key,
                table: get("LOG_TABLE").unwrap_or_else(|| DEFAULT_LOG_TABLE.into()),
            },
            _ => return Err(ConfigError::MissingStore),
        };

        Ok(Self {
            host,
            port,
            request_timeout_secs,
            forward_timeout_secs,
            sweep_interval_secs: (sweep_interval_secs > 0).then_some(sweep_interval_secs),
            store,
        })
    }
}

fn parse_or<T: std::str::FromStr>(
    value: Option<String>,
    var: &'static str,
    expected: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match value {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid {
            var,
            expected,
            value: raw,
        }),
    }
}
