use std::env;

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub bind_addr: String,
    pub reset_link_base: String,
    pub reset_ttl_hours: i64,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = env::var("DATABASE_URL")?;
        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:8080".to_string());
        let reset_link_base = env::var("RESET_LINK_BASE")
            .unwrap_or_else(|_| "http://localhost:3000/redefinir-senha".to_string());
        let reset_ttl_hours = env::var("RESET_TTL_HOURS")
            .ok()
            .and_then(|s| s.parse::<i64>().ok())
            .unwrap_or(1);

        Ok(Self {
            database_url,
            bind_addr,
            reset_link_base,
            reset_ttl_hours,
        })
    }
}
