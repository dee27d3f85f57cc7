// src/config.rs

use dotenvy::dotenv;
use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    /// Token lifetime in seconds.
    pub jwt_expiration: u64,
    pub rust_log: String,
    /// Feed radius applied when the client does not send one, in km.
    pub default_radius_km: f64,
    /// Hard cap on the feed radius, in km.
    pub max_radius_km: f64,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://vecinet.db?mode=rwc".to_string());

        let jwt_secret = env::var("JWT_SECRET").expect("JWT_SECRET must be set");

        let jwt_expiration = env::var("JWT_EXPIRATION")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(60 * 60 * 24 * 7); // 7 days

        let rust_log = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        let default_radius_km = env::var("DEFAULT_RADIUS_KM")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(5.0);

        let max_radius_km = env::var("MAX_RADIUS_KM")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(20.0);

        Self {
            database_url,
            jwt_secret,
            jwt_expiration,
            rust_log,
            default_radius_km,
            max_radius_km,
        }
    }
}
