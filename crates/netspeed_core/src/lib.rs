//! # NetSpeed Core
//!
//! Crate compartilhada que define os tipos de dados, a formatação de taxas
//! para exibição e a configuração TOML do monitor de throughput de rede.
//!
//! ## Módulos
//! - [`types`] – Structs do domínio (interfaces, amostras, status…)
//! - [`format`] – Escala de unidades e montagem do status formatado
//! - [`config`] – Configuração unificada via TOML

pub mod config;
pub mod format;
pub mod types;

// Re-exports convenientes
pub use config::{AppConfig, MonitorConfig};
pub use format::{format_rate, TOOLTIP_MAX_CHARS, UNAVAILABLE_TEXT};
pub use types::{FormattedStatus, InterfaceDescriptor, InterfaceKind, MatchKind, RateSample};
