use serde::Deserialize;

static CONFIG: OnceCell<Config> = OnceCell::const_new();

mod config_dir;
pub use config_dir::{find_config_file, read_config, read_config_from};

mod error;
pub use error::{ConfigError, ConfigResult};
use tokio::sync::OnceCell;

#[derive(Debug, Deserialize)]
pub struct Config {
    host: Host,
    app: App,
    #[serde(default)]
    gamification: Gamification,
}

#[derive(Debug, Deserialize)]
pub struct Host {
    bindto: String,
}

#[derive(Debug, Deserialize)]
pub struct App {
    jwt: String,
    database_uri: String,
    #[serde(default)]
    docs: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Gamification {
    points_per_level: i64,
    max_award: i64,
    leaderboard_size: i64,
}

impl Default for Gamification {
    fn default() -> Self {
        Self {
            points_per_level: 100,
            max_award: 1000,
            leaderboard_size: 10,
        }
    }
}

impl Config {
    #[tracing::instrument]
    pub async fn get_or_init(use_local: bool) -> &'static Config {
        CONFIG
            .get_or_init(|| async {
                let read_cfg = |use_local| -> ConfigResult<Self> {
                    let bytes = read_config(use_local)?;
                    Self::from_slice(&bytes)
                };

                match read_cfg(use_local) {
                    Ok(c) => c,
                    Err(e) => {
                        if !matches!(e, error::ConfigError::ConfigNotFound) {
                            crate::error::log_error(&e);
                        }
                        tracing::error!("Config not found.");
                        std::process::exit(1);
                    }
                }
            })
            .await
    }

    pub fn from_slice(bytes: &[u8]) -> ConfigResult<Self> {
        let config: Self = toml::from_slice(bytes)?;
        Ok(config)
    }

    #[inline]
    pub fn host(&self) -> &Host {
        &self.host
    }

    #[inline]
    pub fn app(&self) -> &App {
        &self.app
    }

    #[inline]
    pub fn gamification(&self) -> &Gamification {
        &self.gamification
    }
}

impl Host {
    #[inline]
    pub fn bindto(&self) -> &str {
        &self.bindto
    }
}

impl App {
    #[inline]
    pub fn jwt(&self) -> &str {
        &self.jwt
    }

    #[inline]
    pub fn database_uri(&self) -> &str {
        &self.database_uri
    }

    #[inline]
    pub fn docs(&self) -> bool {
        self.docs
    }
}

impl Gamification {
    #[inline]
    pub fn points_per_level(&self) -> i64 {
        self.points_per_level
    }

    #[inline]
    pub fn max_award(&self) -> i64 {
        self.max_award
    }

    #[inline]
    pub fn leaderboard_size(&self) -> i64 {
        self.leaderboard_size
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[tokio::test]
    async fn config_test() {
        let config = Config::get_or_init(true).await;
        assert_eq!(config.host().bindto(), "127.0.0.1:5000"); // defaults
    }

    #[test]
    fn gamification_defaults_test() {
        let config = Config::from_slice(
            br#"
            [host]
            bindto = "0.0.0.0:8080"

            [app]
            jwt = "secret"
            database_uri = "postgres://localhost/learnhub"
            "#,
        )
        .unwrap();

        assert!(!config.app().docs());
        assert_eq!(config.gamification().points_per_level(), 100);
        assert_eq!(config.gamification().max_award(), 1000);
        assert_eq!(config.gamification().leaderboard_size(), 10);
    }

    #[test]
    fn gamification_partial_override_test() {
        let config = Config::from_slice(
            br#"
            [host]
            bindto = "0.0.0.0:8080"

            [app]
            jwt = "secret"
            database_uri = "postgres://localhost/learnhub"
            docs = true

            [gamification]
            points_per_level = 250
            "#,
        )
        .unwrap();

        assert!(config.app().docs());
        assert_eq!(config.gamification().points_per_level(), 250);
        assert_eq!(config.gamification().max_award(), 1000);
    }

    #[test]
    fn missing_section_is_an_error() {
        let result = Config::from_slice(b"[host]\nbindto = \"127.0.0.1:1\"\n");
        assert!(matches!(result, Err(ConfigError::TomlDeError(_))));
    }
}
