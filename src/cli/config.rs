//! CLI configuration files under ~/.config/planta/cli: the server to talk
//! to and the active session.

use std::fs;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServidorConfig {
    pub base_url: String,
    pub added_at: DateTime<Utc>,
}

impl Default for ServidorConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
            added_at: Utc::now(),
        }
    }
}

/// The session id the server bound to us at login, replayed as a cookie.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SesionGuardada {
    pub cookie_nombre: String,
    pub cookie_valor: String,
    pub usuario: Value,
    pub iniciada_en: DateTime<Utc>,
}

pub fn get_config_dir() -> anyhow::Result<PathBuf> {
    let config_dir = if let Ok(custom_dir) = std::env::var("PLANTA_CLI_CONFIG_DIR") {
        PathBuf::from(custom_dir)
    } else {
        let home = std::env::var("HOME")
            .map_err(|_| anyhow::anyhow!("HOME environment variable not set"))?;
        PathBuf::from(home).join(".config").join("planta").join("cli")
    };

    if !config_dir.exists() {
        fs::create_dir_all(&config_dir)?;
    }

    Ok(config_dir)
}

pub fn load_servidor_config() -> anyhow::Result<ServidorConfig> {
    let servidor_file = get_config_dir()?.join("servidor.json");

    if !servidor_file.exists() {
        return Ok(ServidorConfig::default());
    }

    let content = fs::read_to_string(servidor_file)?;
    let config: ServidorConfig = serde_json::from_str(&content)?;
    Ok(config)
}

pub fn save_servidor_config(config: &ServidorConfig) -> anyhow::Result<()> {
    // rejects not-a-url values before they reach disk
    url::Url::parse(&config.base_url)
        .map_err(|_| anyhow::anyhow!("URL de servidor invalida: {}", config.base_url))?;

    let servidor_file = get_config_dir()?.join("servidor.json");
    let content = serde_json::to_string_pretty(config)?;
    fs::write(servidor_file, content)?;
    Ok(())
}

pub fn load_sesion() -> anyhow::Result<Option<SesionGuardada>> {
    let sesion_file = get_config_dir()?.join("sesion.json");

    if !sesion_file.exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(sesion_file)?;
    let sesion: SesionGuardada = serde_json::from_str(&content)?;
    Ok(Some(sesion))
}

pub fn save_sesion(sesion: &SesionGuardada) -> anyhow::Result<()> {
    let sesion_file = get_config_dir()?.join("sesion.json");
    let content = serde_json::to_string_pretty(sesion)?;
    fs::write(sesion_file, content)?;
    Ok(())
}

pub fn borrar_sesion() -> anyhow::Result<()> {
    let sesion_file = get_config_dir()?.join("sesion.json");
    if sesion_file.exists() {
        fs::remove_file(sesion_file)?;
    }
    Ok(())
}
