/// Argon2 cost parameters used when hashing new passwords.
#[derive(Debug, Clone)]
pub struct HashingConfig {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub db_max_connections: u32,
    pub hashing: HashingConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")?;
        let hashing = HashingConfig {
            memory_kib: env_or("ARGON2_MEMORY_KIB", argon2::Params::DEFAULT_M_COST),
            iterations: env_or("ARGON2_ITERATIONS", argon2::Params::DEFAULT_T_COST),
            parallelism: env_or("ARGON2_PARALLELISM", argon2::Params::DEFAULT_P_COST),
        };
        Ok(Self {
            database_url,
            host: std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: env_or("APP_PORT", 8080),
            db_max_connections: env_or("DB_MAX_CONNECTIONS", 10),
            hashing,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}
