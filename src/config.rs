/// Runtime configuration. Every knob has a fixed default so the binary runs
/// with no environment at all; env vars only override.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub mongo_uri: String,
    pub mongo_db: String,
    pub uploads_dir: String,
    pub cors_origin: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            host: std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: std::env::var("APP_PORT")
                .ok()
                .and_then(|v| v.parse::<u16>().ok())
                .unwrap_or(4000),
            mongo_uri: std::env::var("MONGO_URI")
                .unwrap_or_else(|_| "mongodb://127.0.0.1:27017".into()),
            mongo_db: std::env::var("MONGO_DB").unwrap_or_else(|_| "blog".into()),
            uploads_dir: std::env::var("UPLOADS_DIR").unwrap_or_else(|_| "uploads".into()),
            cors_origin: std::env::var("CORS_ORIGIN")
                .unwrap_or_else(|_| "http://localhost:3000".into()),
        }
    }
}
