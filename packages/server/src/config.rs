use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    /// Expo access token for higher push rate limits; push delivery runs as a
    /// no-op stub when absent.
    pub expo_access_token: Option<String>,
    /// Override for the places-lookup endpoint (defaults to public Nominatim).
    pub places_base_url: String,
    /// Bounded timeout for the external places lookup.
    pub places_timeout_secs: u64,
    /// Default search radius for the emergency flow.
    pub emergency_radius_km: f64,
    pub allowed_origins: Vec<String>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Ok(Self {
            database_url: env::var("DATABASE_URL").context("DATABASE_URL must be set")?,
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .context("PORT must be a valid number")?,
            expo_access_token: env::var("EXPO_ACCESS_TOKEN").ok(),
            places_base_url: env::var("PLACES_BASE_URL")
                .unwrap_or_else(|_| "https://nominatim.openstreetmap.org".to_string()),
            places_timeout_secs: env::var("PLACES_TIMEOUT_SECS")
                .unwrap_or_else(|_| "5".to_string())
                .parse()
                .context("PLACES_TIMEOUT_SECS must be a valid number")?,
            emergency_radius_km: env::var("EMERGENCY_RADIUS_KM")
                .unwrap_or_else(|_| "50".to_string())
                .parse()
                .context("EMERGENCY_RADIUS_KM must be a valid number")?,
            allowed_origins: env::var("ALLOWED_ORIGINS")
                .unwrap_or_else(|_| "*".to_string())
                .split(',')
                .map(|s| s.trim().to_string())
                .collect(),
        })
    }
}
