use anyhow::{Context, Result};
use serde::Deserialize;
use std::{
    fs,
    net::{IpAddr, SocketAddr},
    path::{Path, PathBuf},
};

pub const DEFAULT_CONFIG_PATH: &str = "config/advisor.json";

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct AdvisorConfig {
    pub model_path: PathBuf,
    pub assets_dir: PathBuf,
    pub bind_addr: IpAddr,
    pub port: u16,
    /// `tracing_subscriber::EnvFilter` directive used when `RUST_LOG` is unset.
    pub log_filter: String,
}

impl Default for AdvisorConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from("models/svm_model.json"),
            assets_dir: PathBuf::from("assets"),
            bind_addr: IpAddr::from([0, 0, 0, 0]),
            port: 8080,
            log_filter: "diabetes_advisor=info,tower_http=info".to_string(),
        }
    }
}

impl AdvisorConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)
            .with_context(|| format!("failed to read config at {}", path.display()))?;
        serde_json::from_str(&data)
            .with_context(|| format!("invalid config JSON in {}", path.display()))
    }

    /// File named by `ADVISOR_CONFIG` (or the default path, when present),
    /// then environment overrides.
    pub fn from_env() -> Result<Self> {
        let explicit = std::env::var("ADVISOR_CONFIG").ok();
        let base = match explicit {
            Some(p) => Self::load(Path::new(&p))?,
            None if Path::new(DEFAULT_CONFIG_PATH).exists() => {
                Self::load(Path::new(DEFAULT_CONFIG_PATH))?
            }
            None => Self::default(),
        };
        base.with_overrides(|k| std::env::var(k).ok())
    }

    /// Applies `MODEL_PATH`, `ASSETS_DIR`, `BIND_ADDR`, `PORT` and `LOG_FILTER`
    /// as looked up through `var`.
    pub fn with_overrides(mut self, var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        if let Some(p) = var("MODEL_PATH") {
            self.model_path = PathBuf::from(p);
        }
        if let Some(p) = var("ASSETS_DIR") {
            self.assets_dir = PathBuf::from(p);
        }
        if let Some(a) = var("BIND_ADDR") {
            self.bind_addr = a
                .parse()
                .with_context(|| format!("BIND_ADDR {a:?} is not an IP address"))?;
        }
        if let Some(p) = var("PORT") {
            self.port = p
                .parse()
                .with_context(|| format!("PORT {p:?} is not a port number"))?;
        }
        if let Some(f) = var("LOG_FILTER") {
            self.log_filter = f;
        }
        Ok(self)
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_addr, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn defaults() {
        let cfg = AdvisorConfig::default();
        assert_eq!(cfg.model_path, PathBuf::from("models/svm_model.json"));
        assert_eq!(cfg.socket_addr().to_string(), "0.0.0.0:8080");
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("advisor.json");
        fs::write(&path, r#"{ "port": 9000, "assets_dir": "/srv/assets" }"#).unwrap();

        let cfg = AdvisorConfig::load(&path).unwrap();
        assert_eq!(cfg.port, 9000);
        assert_eq!(cfg.assets_dir, PathBuf::from("/srv/assets"));
        assert_eq!(cfg.model_path, AdvisorConfig::default().model_path);
    }

    #[test]
    fn env_overrides_win() {
        let env: HashMap<&str, &str> = [
            ("MODEL_PATH", "/models/other.json"),
            ("BIND_ADDR", "127.0.0.1"),
            ("PORT", "3000"),
        ]
        .into_iter()
        .collect();
        let cfg = AdvisorConfig::default()
            .with_overrides(|k| env.get(k).map(|v| v.to_string()))
            .unwrap();
        assert_eq!(cfg.model_path, PathBuf::from("/models/other.json"));
        assert_eq!(cfg.socket_addr().to_string(), "127.0.0.1:3000");
        assert_eq!(cfg.assets_dir, PathBuf::from("assets"));
    }

    #[test]
    fn bad_port_is_an_error() {
        let err = AdvisorConfig::default()
            .with_overrides(|k| (k == "PORT").then(|| "eighty".to_string()))
            .unwrap_err();
        assert!(err.to_string().contains("PORT"));
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(AdvisorConfig::load(Path::new("/nonexistent/advisor.json")).is_err());
    }
}
