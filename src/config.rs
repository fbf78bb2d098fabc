use std::path::PathBuf;
use std::env;
use std::fs;
use std::io::{self, Read};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct Config {
    /// Emulated backend round-trip delay, slept before every analysis run.
    pub delay_ms: u64,
    pub env_name: String,
}

impl Default for Config {
    fn default() -> Self {
        let env_name = env::var("CPHASE_ENV").unwrap_or_else(|_| String::from("default"));
        let delay_ms = env::var("CPHASE_DELAY_MS")
            .ok()
            .and_then(|value| value.parse().ok())
            .unwrap_or(1000);

        Config { delay_ms, env_name }
    }
}

impl Config {
    pub fn load() -> Self {
        let config_path = Self::get_config_path();
        if !config_path.exists() {
            let config = Config::default();
            config.save().unwrap_or_default();
            return config;
        }

        match fs::File::open(&config_path) {
            Ok(mut file) => {
                let mut contents = String::new();
                file.read_to_string(&mut contents).unwrap_or_default();
                serde_json::from_str(&contents).unwrap_or_default()
            }
            Err(_) => Config::default(),
        }
    }

    pub fn save(&self) -> io::Result<()> {
        let config_path = Self::get_config_path();
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = serde_json::to_string_pretty(self)?;
        fs::write(&config_path, contents)
    }

    pub fn get_config_path() -> PathBuf {
        let env_name = env::var("CPHASE_ENV").unwrap_or_else(|_| String::from("default"));
        let base_dir = if cfg!(windows) {
            PathBuf::from(env::var("USERPROFILE").unwrap_or_else(|_| String::from(".")))
        } else {
            PathBuf::from(env::var("HOME").unwrap_or_else(|_| String::from(".")))
        };

        base_dir.join(".cphase").join(&env_name).join("config.json")
    }
}
