use error_stack::{Report, ResultExt};
use std::str::FromStr;
use std::time::{Duration, Instant};
use tracing::info;

pub type ConfigResult<T> = Result<T, Report<InvalidConfigProperty>>;

#[derive(Debug, thiserror::Error)]
#[error("{0} has an invalid value")]
pub struct InvalidConfigProperty(&'static str);

const DATABASE_URL: &str = "DATABASE_URL";
const PEOPLE_DB_POOL_SIZE: &str = "PEOPLE_DB_POOL_SIZE";
const PEOPLE_PORT: &str = "PEOPLE_PORT";
const PEOPLE_METRICS: &str = "PEOPLE_METRICS";
const PEOPLE_LOOKUP_URL: &str = "PEOPLE_LOOKUP_URL";
const PEOPLE_LOOKUP_INTERVAL_SECS: &str = "PEOPLE_LOOKUP_INTERVAL_SECS";

const DEFAULT_PORT: u16 = 3001;
const DEFAULT_LOOKUP_URL: &str = "https://api.mocki.io/v1/b043df5a";
const DEFAULT_LOOKUP_INTERVAL: Duration = Duration::from_secs(5 * 60);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// PostgreSQL connection url. `None` keeps people in memory.
    pub database_url: Option<String>,
    pub db_pool_size: Option<usize>,
    pub port: u16,
    pub metrics: bool,
    pub lookup_url: String,
    /// Zero turns the scheduled lookup off.
    pub lookup_interval: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: None,
            db_pool_size: None,
            port: DEFAULT_PORT,
            metrics: true,
            lookup_url: DEFAULT_LOOKUP_URL.to_string(),
            lookup_interval: DEFAULT_LOOKUP_INTERVAL,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> ConfigResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads every property through `lookup`. Unset or blank properties fall
    /// back to their defaults.
    pub fn from_lookup<F>(lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&'static str) -> Option<String>,
    {
        let get = |key| lookup(key).filter(|v: &String| !v.trim().is_empty());
        let defaults = Self::default();

        Ok(Self {
            database_url: get(DATABASE_URL),
            db_pool_size: parse_opt(PEOPLE_DB_POOL_SIZE, get(PEOPLE_DB_POOL_SIZE))?,
            port: parse_opt(PEOPLE_PORT, get(PEOPLE_PORT))?.unwrap_or(defaults.port),
            metrics: parse_opt(PEOPLE_METRICS, get(PEOPLE_METRICS))?.unwrap_or(defaults.metrics),
            lookup_url: get(PEOPLE_LOOKUP_URL).unwrap_or_else(|| {
                info!("{PEOPLE_LOOKUP_URL} not specified, going with default");
                defaults.lookup_url
            }),
            lookup_interval: parse_opt(PEOPLE_LOOKUP_INTERVAL_SECS, get(PEOPLE_LOOKUP_INTERVAL_SECS))?
                .map(schedulable_interval)
                .transpose()?
                .unwrap_or(defaults.lookup_interval),
        })
    }
}

// the scheduler adds the interval to the current time
fn schedulable_interval(secs: u64) -> ConfigResult<Duration> {
    let interval = Duration::from_secs(secs);

    Instant::now()
        .checked_add(interval)
        .map(|_| interval)
        .ok_or(InvalidConfigProperty(PEOPLE_LOOKUP_INTERVAL_SECS))
        .attach_with(|| format!("{secs}s is too large to schedule"))
}

fn parse_opt<T>(key: &'static str, value: Option<String>) -> ConfigResult<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    value
        .map(|v| {
            v.trim()
                .parse::<T>()
                .change_context(InvalidConfigProperty(key))
                .attach_with(|| format!("could not parse '{v}'"))
        })
        .transpose()
}
