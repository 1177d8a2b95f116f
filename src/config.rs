use std::env;
use std::str::FromStr;

use anyhow::{bail, Context, Result};
use deadpool_postgres::{Config, Pool, PoolConfig, Runtime};
use tokio_postgres::NoTls;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Postgres,
    Memory,
}

impl FromStr for StoreBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "pg" => Ok(StoreBackend::Postgres),
            "memory" => Ok(StoreBackend::Memory),
            other => bail!("unknown STORE_BACKEND {:?}, expected postgres or memory", other),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub backend: StoreBackend,
    pub bind_address: String,
    pub session_secret: String,
    pub session_ttl_hours: i64,
    pub cookie_secure: bool,
    pub allowed_origins: Vec<String>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        let backend = env::var("STORE_BACKEND")
            .unwrap_or_else(|_| "postgres".into())
            .parse()?;

        let session_secret = env::var("SESSION_SECRET").context("SESSION_SECRET not set")?;
        if session_secret.len() < 16 {
            bail!("SESSION_SECRET must be at least 16 bytes");
        }

        let session_ttl_hours = parse_or("SESSION_TTL_HOURS", 24 * 14)?;
        let cookie_secure = parse_or("COOKIE_SECURE", false)?;

        let port: u16 = parse_or("PORT", 8080)?;

        let allowed_origins = env::var("ALLOWED_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:3000,http://127.0.0.1:3000".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        Ok(Self {
            backend,
            bind_address: format!("0.0.0.0:{}", port),
            session_secret,
            session_ttl_hours,
            cookie_secure,
            allowed_origins,
        })
    }
}

fn parse_or<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("invalid value for {}: {:?}", key, raw)),
        Err(_) => Ok(default),
    }
}

pub fn get_pg_pool() -> Result<Pool> {
    let mut cfg = Config::new();
    cfg.host = Some(env::var("PG_HOST").context("PG_HOST not set")?);
    cfg.user = Some(env::var("PG_USER").context("PG_USER not set")?);
    cfg.password = env::var("PG_PASS").ok();
    cfg.dbname = Some(env::var("PG_DB").context("PG_DB not set")?);
    cfg.port = Some(parse_or("PG_PORT", 5432)?);

    let mut pool_cfg = PoolConfig::default();
    pool_cfg.max_size = parse_or("PG_POOL_SIZE", 16)?;
    cfg.pool = Some(pool_cfg);

    cfg.create_pool(Some(Runtime::Tokio1), NoTls)
        .context("failed to create postgres pool")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_store_backend() {
        assert_eq!("postgres".parse::<StoreBackend>().unwrap(), StoreBackend::Postgres);
        assert_eq!(" Memory ".parse::<StoreBackend>().unwrap(), StoreBackend::Memory);
        assert!("sqlite".parse::<StoreBackend>().is_err());
    }
}
