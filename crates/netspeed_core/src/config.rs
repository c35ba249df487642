//! Configuração unificada via TOML.
//!
//! Um único `config.toml` ao lado do executável. Campos ausentes caem nos
//! valores padrão; arquivo ausente ou inválido cai na configuração padrão.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Configuração do loop de amostragem.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// Intervalo entre ticks em segundos
    pub interval_secs: f64,
    /// Espera de aquecimento após abrir um contador (segundos)
    pub warmup_secs: f64,
    /// Capacidade do channel para a camada de apresentação
    pub channel_capacity: usize,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            interval_secs: 1.0,
            warmup_secs: 1.0,
            channel_capacity: 64,
        }
    }
}

/// Configuração raiz do aplicativo.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub monitor: MonitorConfig,
}

impl AppConfig {
    /// Carrega configuração de um arquivo TOML.
    pub fn load(path: &Path) -> Self {
        if path.exists() {
            match std::fs::read_to_string(path) {
                Ok(content) => match toml::from_str::<AppConfig>(&content) {
                    Ok(config) => {
                        info!("Configuração carregada de {}", path.display());
                        return config;
                    }
                    Err(e) => {
                        warn!("Erro ao parsear {}: {}", path.display(), e);
                    }
                },
                Err(e) => {
                    warn!("Erro ao ler {}: {}", path.display(), e);
                }
            }
        }

        info!("Usando configuração padrão");
        AppConfig::default()
    }

    /// Salva configuração em arquivo TOML.
    pub fn save(&self, path: &Path) -> Result<(), String> {
        let content = toml::to_string_pretty(self).map_err(|e| e.to_string())?;
        std::fs::write(path, content).map_err(|e| e.to_string())?;
        info!("Configuração salva em {}", path.display());
        Ok(())
    }

    /// Retorna o caminho padrão do config.toml.
    pub fn default_path() -> PathBuf {
        let exe_dir = std::env::current_exe()
            .map(|p| p.parent().unwrap_or(Path::new(".")).to_path_buf())
            .unwrap_or_else(|_| PathBuf::from("."));
        exe_dir.join("config.toml")
    }

    /// Valida a configuração e retorna lista de erros.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.monitor.interval_secs < 0.1 || self.monitor.interval_secs > 60.0 {
            errors.push(format!(
                "Intervalo de amostragem inválido: {} (0.1–60.0)",
                self.monitor.interval_secs
            ));
        }
        if self.monitor.warmup_secs < 0.0 || self.monitor.warmup_secs > 10.0 {
            errors.push(format!(
                "Aquecimento inválido: {} (0.0–10.0)",
                self.monitor.warmup_secs
            ));
        }
        if self.monitor.channel_capacity == 0 {
            errors.push("Capacidade do channel não pode ser 0".into());
        }

        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = AppConfig::default();
        let errors = config.validate();
        assert!(errors.is_empty(), "Erros: {:?}", errors);
    }

    #[test]
    fn roundtrip_toml() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: AppConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(config.monitor.interval_secs, parsed.monitor.interval_secs);
        assert_eq!(config.monitor.channel_capacity, parsed.monitor.channel_capacity);
    }

    #[test]
    fn partial_toml_uses_defaults() {
        let partial = r#"
[monitor]
interval_secs = 2.5
"#;
        let config: AppConfig = toml::from_str(partial).unwrap();
        assert_eq!(config.monitor.interval_secs, 2.5);
        // Outros campos devem ter valor padrão
        assert_eq!(config.monitor.warmup_secs, 1.0);
        assert_eq!(config.monitor.channel_capacity, 64);
    }

    #[test]
    fn intervalo_fora_da_faixa_gera_erro() {
        let mut config = AppConfig::default();
        config.monitor.interval_secs = 0.0;
        assert!(!config.validate().is_empty());
    }
}
