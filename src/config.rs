use std::env;

use crate::engine::paginate::DEFAULT_PAGE_SIZE;

#[derive(Clone, Debug)]
pub struct Config {
    pub base_url: String,
    pub bind_addr: String,
    pub page_size: usize,
    pub upstream_timeout_secs: u64,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let base_url = env::var("BASE_URL")
            .map_err(|_| anyhow::anyhow!("BASE_URL not configured"))?
            .trim_end_matches('/')
            .to_string();
        if base_url.is_empty() {
            anyhow::bail!("BASE_URL not configured");
        }
        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:8080".to_string());
        let page_size = env::var("PAGE_SIZE")
            .ok()
            .and_then(|s| s.parse::<usize>().ok())
            .filter(|n| *n > 0)
            .unwrap_or(DEFAULT_PAGE_SIZE);
        let upstream_timeout_secs = env::var("UPSTREAM_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(30);

        Ok(Self {
            base_url,
            bind_addr,
            page_size,
            upstream_timeout_secs,
        })
    }
}
