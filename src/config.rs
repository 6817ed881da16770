use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use crate::error::ConfigError;

/// Logging configuration, loaded from `config/{env}.yaml`.
///
/// Kernel sizes are deliberately absent: see [`BenchConfig`].
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub log_level: String,
    pub log_dir: String,
    pub log_file: String,
    pub use_json: bool,
    /// `hourly`, `daily`, anything else means a single file
    pub rotation: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_dir: "./logs".to_string(),
            log_file: "cpu_microbench.log".to_string(),
            use_json: false,
            rotation: "never".to_string(),
        }
    }
}

impl AppConfig {
    /// Load `config/{env}.yaml`. A missing file yields `Ok(None)`.
    pub fn load(env: &str) -> Result<Option<Self>, ConfigError> {
        let config_path = format!("config/{}.yaml", env);
        let content = match fs::read_to_string(&config_path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(ConfigError::Io {
                    path: config_path,
                    source,
                });
            }
        };
        Self::from_yaml_str(&content)
            .map(Some)
            .map_err(|source| ConfigError::Parse {
                path: config_path,
                source,
            })
    }

    pub fn from_yaml_str(content: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(content)
    }
}

/// Fixed benchmark parameters. Built once at startup and passed to the harness.
#[derive(Debug, Clone, PartialEq)]
pub struct BenchConfig {
    pub sieve_limit: usize,
    pub matrix_size: usize,
    pub image_width: usize,
    pub image_height: usize,
    pub max_iterations: u32,
    pub image_path: PathBuf,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            sieve_limit: 100_000,
            matrix_size: 140,
            image_width: 400,
            image_height: 300,
            max_iterations: 256,
            image_path: PathBuf::from("mandelbrot_test.ppm"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bench_defaults() {
        let cfg = BenchConfig::default();
        assert_eq!(cfg.sieve_limit, 100_000);
        assert_eq!(cfg.matrix_size, 140);
        assert_eq!((cfg.image_width, cfg.image_height), (400, 300));
        assert_eq!(cfg.max_iterations, 256);
        assert_eq!(cfg.image_path, PathBuf::from("mandelbrot_test.ppm"));
    }

    #[test]
    fn test_app_config_deserialize() {
        let yaml = r#"
log_level: "debug"
log_dir: "./logs"
log_file: "bench.log"
use_json: true
rotation: "daily"
"#;
        let cfg = AppConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(cfg.log_level, "debug");
        assert_eq!(cfg.log_file, "bench.log");
        assert!(cfg.use_json);
        assert_eq!(cfg.rotation, "daily");
    }

    #[test]
    fn test_app_config_partial_uses_defaults() {
        let cfg = AppConfig::from_yaml_str("log_level: warn\n").unwrap();
        assert_eq!(cfg.log_level, "warn");
        assert_eq!(cfg.log_dir, AppConfig::default().log_dir);
        assert!(!cfg.use_json);
    }

    #[test]
    fn test_app_config_rejects_bad_types() {
        assert!(AppConfig::from_yaml_str("use_json: [1, 2]\n").is_err());
    }

    #[test]
    fn test_missing_env_file() {
        let loaded = AppConfig::load("definitely-not-an-env").unwrap();
        assert!(loaded.is_none());
    }
}
