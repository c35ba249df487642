//! Formatação de taxas para exibição.
//!
//! Escala binária (1024) sobre a sequência fixa `B/s → KB/s → MB/s → GB/s`,
//! sempre com uma casa decimal e ponto fixo (sem locale). A sequência para
//! na última unidade mesmo que o valor ainda exceda 1024.

use crate::types::{FormattedStatus, RateSample};

/// Unidades de taxa, da menor para a maior.
pub const UNITS: [&str; 4] = ["B/s", "KB/s", "MB/s", "GB/s"];

/// Texto exibido para as taxas enquanto não há binding ativo.
pub const UNAVAILABLE_TEXT: &str = "unavailable";

/// Limite de caracteres do tooltip.
pub const TOOLTIP_MAX_CHARS: usize = 63;

/// Formata uma taxa em bytes/s como texto legível.
///
/// Valores negativos são tratados como zero (leituras transitórias do
/// contador). Exemplos: `format_rate(1023.0)` → `"1023.0 B/s"`,
/// `format_rate(2048.0)` → `"2.0 KB/s"`.
pub fn format_rate(bytes_per_sec: f64) -> String {
    let mut value = bytes_per_sec.max(0.0);
    let mut unit = 0usize;

    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    format!("{:.1} {}", value, UNITS[unit])
}

/// Trunca o texto do tooltip em [`TOOLTIP_MAX_CHARS`] caracteres.
fn truncate_tooltip(text: String) -> String {
    if text.chars().count() <= TOOLTIP_MAX_CHARS {
        text
    } else {
        text.chars().take(TOOLTIP_MAX_CHARS).collect()
    }
}

impl FormattedStatus {
    /// Status saudável a partir de uma amostra e do nome do adaptador.
    pub fn healthy(sample: &RateSample, adapter: &str) -> Self {
        let down_text = format_rate(sample.down_bps);
        let up_text = format_rate(sample.up_bps);
        let tooltip = truncate_tooltip(format!("{adapter} ↓ {down_text} ↑ {up_text}"));

        Self {
            down_text,
            up_text,
            tooltip,
            healthy: true,
        }
    }

    /// Status degradado emitido enquanto não há interface monitorável.
    pub fn unavailable() -> Self {
        Self {
            down_text: UNAVAILABLE_TEXT.into(),
            up_text: UNAVAILABLE_TEXT.into(),
            tooltip: "No active network interface".into(),
            healthy: false,
        }
    }
}

// ──────────────────────────────────────────────
// Testes
// ──────────────────────────────────────────────
