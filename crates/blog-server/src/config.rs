use anyhow::{Result, bail};

/// Placeholder JWT secrets that MUST NOT be used.
const PLACEHOLDER_SECRETS: &[&str] = &[
    "change-me-to-a-random-string",
    "dev-secret-change-me",
    "your_secret_key",
];

pub struct Config {
    pub jwt_secret: String,
    pub db_path: String,
    pub host: String,
    pub port: u16,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let jwt_secret = lookup("BLOG_JWT_SECRET").unwrap_or_default();
        if jwt_secret.is_empty() || PLACEHOLDER_SECRETS.contains(&jwt_secret.as_str()) {
            bail!("BLOG_JWT_SECRET is unset or still a placeholder");
        }

        let port = match lookup("BLOG_PORT") {
            Some(raw) => raw
                .parse()
                .map_err(|e| anyhow::anyhow!("BLOG_PORT '{}' is not a port: {}", raw, e))?,
            None => 8080,
        };

        Ok(Self {
            jwt_secret,
            db_path: lookup("BLOG_DB_PATH").unwrap_or_else(|| "blog.db".into()),
            host: lookup("BLOG_HOST").unwrap_or_else(|| "0.0.0.0".into()),
            port,
        })
    }
}
