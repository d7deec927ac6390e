pub struct Env {
    pub jwt_secret: String,
    pub jwt_audience: Option<String>,
    pub auth_url: String,
    pub database_url: String,
    pub redis_url: String,
    pub frontend_url: String,
    pub ip: String,
    pub port: u16,
    pub ai_api_url: Option<String>,
    pub ai_api_key: Option<String>,
    pub ai_model: String,
    pub dashboard_cache_ttl: u64,
    pub profile_cache_ttl: u64,
    pub max_upload_bytes: usize,
}

fn optional(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

impl Env {
    fn new() -> Self {
        let jwt_secret = std::env::var("SECRET_KEY")
            .expect("SECRET_KEY must be set in .env file or environment variable");
        let jwt_audience = optional("JWT_AUDIENCE");
        let auth_url =
            std::env::var("AUTH_URL").unwrap_or_else(|_| "http://localhost:54321".to_string());

        let database_url = std::env::var("DATABASE_URL")
            .expect("DATABASE_URL must be set in .env file or environment variable");
        let redis_url = std::env::var("REDIS_URL")
            .expect("REDIS_URL must be set in .env file or environment variable");

        let frontend_url =
            std::env::var("FRONTEND_URL").unwrap_or_else(|_| "http://localhost:5173".to_string());
        let ip = std::env::var("IP").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = std::env::var("PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse::<u16>()
            .expect("PORT must be a valid u16 integer");

        let ai_api_url = optional("AI_API_URL").map(|url| url.trim_end_matches('/').to_string());
        let ai_api_key = optional("AI_API_KEY");
        let ai_model = std::env::var("AI_MODEL").unwrap_or_else(|_| "gpt-4o-mini".to_string());

        let dashboard_cache_ttl = std::env::var("DASHBOARD_CACHE_TTL")
            .unwrap_or_else(|_| "60".to_string())
            .parse::<u64>()
            .expect("DASHBOARD_CACHE_TTL must be a valid u64 integer");
        let profile_cache_ttl = std::env::var("PROFILE_CACHE_TTL")
            .unwrap_or_else(|_| "3600".to_string())
            .parse::<u64>()
            .expect("PROFILE_CACHE_TTL must be a valid u64 integer");
        let max_upload_bytes = std::env::var("MAX_UPLOAD_BYTES")
            .unwrap_or_else(|_| (10 * 1024 * 1024).to_string())
            .parse::<usize>()
            .expect("MAX_UPLOAD_BYTES must be a valid usize integer");

        Env {
            jwt_secret,
            jwt_audience,
            auth_url,
            database_url,
            redis_url,
            frontend_url,
            ip,
            port,
            ai_api_url,
            ai_api_key,
            ai_model,
            dashboard_cache_ttl,
            profile_cache_ttl,
            max_upload_bytes,
        }
    }
}

impl Default for Env {
    fn default() -> Self {
        Self::new()
    }
}
