//! Application configuration

use std::env;
use std::path::PathBuf;
use tracing::warn;

/// Main application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Postgres connection string; `None` keeps progress in memory
    pub database_url: Option<String>,
    pub host: String,
    pub port: u16,
    /// Points granted for any completed review, on top of accuracy
    pub base_points: i64,
    /// Minimum leaderboard size before ranking badges can unlock
    pub ranking_min_population: usize,
    pub leaderboard_limit: usize,
    /// JSON catalog (rubric, samples, badges); `None` uses the builtin one
    pub catalog_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: None,
            host: "0.0.0.0".to_string(),
            port: 3000,
            base_points: 50,
            ranking_min_population: 10,
            leaderboard_limit: 25,
            catalog_path: None,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from any key lookup; unset or unparsable values keep their defaults
    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let base_points = match parse_var::<i64>(&get, "BASE_POINTS") {
            Some(points) if points < 0 => {
                warn!(
                    "BASE_POINTS={} would take points away, using {}",
                    points, defaults.base_points
                );
                defaults.base_points
            }
            Some(points) => points,
            None => defaults.base_points,
        };

        Self {
            database_url: get("DATABASE_URL").filter(|u| !u.is_empty()),
            host: get("HOST").unwrap_or(defaults.host),
            port: parse_var(&get, "PORT").unwrap_or(defaults.port),
            base_points,
            ranking_min_population: parse_var(&get, "RANKING_MIN_POPULATION")
                .unwrap_or(defaults.ranking_min_population),
            leaderboard_limit: parse_var(&get, "LEADERBOARD_LIMIT")
                .unwrap_or(defaults.leaderboard_limit),
            catalog_path: get("CATALOG_PATH").map(PathBuf::from),
        }
    }
}

fn parse_var<T: std::str::FromStr>(get: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    get(key).and_then(|v| v.trim().parse().ok())
}
