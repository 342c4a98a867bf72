use std::time::Duration;

use config::{Config, ConfigError, Environment, File, builder::DefaultState};
use email_proof_application::{KeyLayout, StoreOptions, WriteMode, store::options::DEFAULT_CACHE_KEY};
use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;

use super::constants::{CONFIG_FILE, defaults, env};

#[derive(Debug, Clone, Deserialize)]
pub struct EmailProofSetting {
    pub store: StoreSetting,
    pub redis: RedisSetting,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoreSetting {
    pub validity_window_secs: u64,
    pub cache_key: String,
    pub key_layout: KeyLayout,
    pub write_mode: WriteMode,
    pub max_cas_attempts: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RedisSetting {
    pub host_name: String,
    #[serde(default)]
    pub password: Option<Secret<String>>,
}

impl EmailProofSetting {
    /// Loads `.env`, then layers defaults, the optional settings file and
    /// `EMAIL_PROOF__*` environment variables, later sources winning.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = Self::defaults()?
            .add_source(File::with_name(CONFIG_FILE).required(false))
            .add_source(
                Environment::with_prefix(env::ENV_PREFIX)
                    .prefix_separator(env::ENV_SEPARATOR)
                    .separator(env::ENV_SEPARATOR),
            )
            .build()?;

        Self::from_config(config)
    }

    pub fn defaults() -> Result<config::ConfigBuilder<DefaultState>, ConfigError> {
        Config::builder()
            .set_default("store.validity_window_secs", defaults::VALIDITY_WINDOW_SECS)?
            .set_default("store.cache_key", DEFAULT_CACHE_KEY)?
            .set_default("store.key_layout", defaults::KEY_LAYOUT)?
            .set_default("store.write_mode", defaults::WRITE_MODE)?
            .set_default("store.max_cas_attempts", defaults::MAX_CAS_ATTEMPTS)?
            .set_default("redis.host_name", defaults::REDIS_HOST_NAME)
    }

    pub fn from_config(config: Config) -> Result<Self, ConfigError> {
        config.try_deserialize()
    }
}

impl StoreSetting {
    pub fn to_options(&self) -> StoreOptions {
        StoreOptions::default()
            .with_validity_window(Duration::from_secs(self.validity_window_secs))
            .with_cache_key(self.cache_key.clone())
            .with_key_layout(self.key_layout)
            .with_write_mode(self.write_mode)
            .with_max_cas_attempts(self.max_cas_attempts)
    }
}

impl From<&StoreSetting> for StoreOptions {
    fn from(setting: &StoreSetting) -> Self {
        setting.to_options()
    }
}

impl RedisSetting {
    /// Connection URL; kept secret because it may carry the password.
    pub fn url(&self) -> Secret<String> {
        let url = match &self.password {
            Some(password) => format!(
                "redis://:{}@{}/",
                password.expose_secret(),
                self.host_name
            ),
            None => format!("redis://{}/", self.host_name),
        };
        Secret::new(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_canonical_store() {
        let config = EmailProofSetting::defaults().unwrap().build().unwrap();
        let setting = EmailProofSetting::from_config(config).unwrap();

        assert_eq!(setting.store.to_options(), StoreOptions::default());
        assert_eq!(setting.redis.host_name, "127.0.0.1");
        assert!(setting.redis.password.is_none());
    }

    #[test]
    fn test_overrides_select_layout_and_write_mode() {
        let config = EmailProofSetting::defaults()
            .unwrap()
            .set_override("store.key_layout", "per_email")
            .unwrap()
            .set_override("store.write_mode", "compare_and_swap")
            .unwrap()
            .set_override("store.validity_window_secs", 60)
            .unwrap()
            .build()
            .unwrap();
        let options = StoreOptions::from(&EmailProofSetting::from_config(config).unwrap().store);

        assert_eq!(options.key_layout, KeyLayout::PerEmail);
        assert_eq!(options.write_mode, WriteMode::CompareAndSwap);
        assert_eq!(options.validity_window, Duration::from_secs(60));
    }

    #[test]
    fn test_zero_validity_window_is_clamped() {
        let config = EmailProofSetting::defaults()
            .unwrap()
            .set_override("store.validity_window_secs", 0)
            .unwrap()
            .build()
            .unwrap();
        let options = EmailProofSetting::from_config(config).unwrap().store.to_options();

        assert_eq!(options.validity_window, Duration::from_secs(1));
    }

    #[test]
    fn test_unknown_layout_is_rejected() {
        let config = EmailProofSetting::defaults()
            .unwrap()
            .set_override("store.key_layout", "sharded")
            .unwrap()
            .build()
            .unwrap();
        assert!(EmailProofSetting::from_config(config).is_err());
    }

    #[test]
    fn test_redis_url_embeds_password() {
        let mut redis = RedisSetting {
            host_name: "cache:6379".to_string(),
            password: None,
        };
        assert_eq!(redis.url().expose_secret(), "redis://cache:6379/");

        redis.password = Some(Secret::new("hunter2".to_string()));
        assert_eq!(redis.url().expose_secret(), "redis://:hunter2@cache:6379/");
    }
}
