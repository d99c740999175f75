use crate::application::post_service::FeedSettings;
use crate::domain::ranking::DEFAULT_TRENDING_LIMIT;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub jwt_secret: String,
    pub jwt_ttl_seconds: i64,
    pub cors_origins: Vec<String>,
    pub media_url: String,
    pub latest_posts: usize,
    pub trending_limit: i64,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let host = std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".into());
        let port = parse_var("PORT", 8080)?;
        let database_url = std::env::var("DATABASE_URL")
            .map_err(|_| anyhow::anyhow!("DATABASE_URL must be set"))?;
        let jwt_secret =
            std::env::var("JWT_SECRET").map_err(|_| anyhow::anyhow!("JWT_SECRET must be set"))?;
        let jwt_ttl_seconds = parse_var("JWT_TTL_SECONDS", 3600)?;
        let cors_origins = std::env::var("CORS_ORIGINS")
            .unwrap_or_default()
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        let media_url = std::env::var("MEDIA_URL").unwrap_or_else(|_| "/media/".into());
        let latest_posts = parse_var("LATEST_POSTS", 5)?;
        let trending_limit: i64 = parse_var("TRENDING_LIMIT", DEFAULT_TRENDING_LIMIT)?;
        if trending_limit < 0 {
            anyhow::bail!("invalid TRENDING_LIMIT: must be non-negative");
        }

        Ok(Self {
            host,
            port,
            database_url,
            jwt_secret,
            jwt_ttl_seconds,
            cors_origins,
            media_url,
            latest_posts,
            trending_limit,
        })
    }

    pub fn feed_settings(&self) -> FeedSettings {
        FeedSettings {
            latest_posts: self.latest_posts,
            trending_limit: self.trending_limit,
            media_url: self.media_url.clone(),
        }
    }
}

fn parse_var<T>(name: &str, default: T) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e| anyhow::anyhow!("invalid {}: {}", name, e)),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::parse_var;

    #[test]
    fn missing_variable_falls_back_to_default() {
        let value: u16 = parse_var("POLLS_SERVER_TEST_UNSET_VARIABLE", 8080).unwrap();
        assert_eq!(value, 8080);
    }
}
