//! Definição de tipos compartilhados do monitor de rede.
//!
//! Todos os tipos aqui são transitórios: um descritor vale por um ciclo de
//! seleção e uma amostra vale por exatamente um tick. Nada é retido entre
//! ticks além do binding ativo, que pertence ao sampler.

// ──────────────────────────────────────────────
// Interface
// ──────────────────────────────────────────────

/// Tipo de interface de rede, reduzido às categorias que a seleção aceita.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterfaceKind {
    Ethernet,
    Wireless,
    Other,
}

/// Descritor de uma interface de rede do host.
///
/// Re-enumerado a cada ciclo de seleção; nunca é cacheado além disso.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceDescriptor {
    /// Nome da interface (ex: "eth0", "Ethernet 2")
    pub name: String,
    /// Descrição amigável do adaptador, quando o SO expõe uma
    pub description: Option<String>,
    /// Estado operacional "up"
    pub up: bool,
    /// Tipo do adaptador
    pub kind: InterfaceKind,
}

impl InterfaceDescriptor {
    /// Interface candidata à seleção: up e do tipo Ethernet ou Wireless.
    pub fn qualifies(&self) -> bool {
        self.up && matches!(self.kind, InterfaceKind::Ethernet | InterfaceKind::Wireless)
    }

    /// Nome usado para casamento com instâncias de contador e no tooltip.
    pub fn display_name(&self) -> &str {
        self.description.as_deref().unwrap_or(&self.name)
    }
}

// ──────────────────────────────────────────────
// Amostra de taxa
// ──────────────────────────────────────────────

/// Taxas instantâneas de uma janela de amostragem, em bytes/s.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RateSample {
    /// Download (bytes/s)
    pub down_bps: f64,
    /// Upload (bytes/s)
    pub up_bps: f64,
}

impl RateSample {
    /// Constrói uma amostra com taxas negativas saturadas em zero.
    ///
    /// Leituras negativas acontecem transitoriamente quando o contador do SO
    /// é reiniciado no meio de uma janela.
    pub fn clamped(down_bps: f64, up_bps: f64) -> Self {
        Self {
            down_bps: down_bps.max(0.0),
            up_bps: up_bps.max(0.0),
        }
    }
}

// ──────────────────────────────────────────────
// Seleção
// ──────────────────────────────────────────────

/// Como o nome de instância do contador foi casado com a interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    /// Nomes iguais (ignorando caixa)
    Exact,
    /// Contenção de substring em qualquer direção (ignorando caixa)
    Substring,
    /// Nenhum casamento; primeira instância disponível (melhor esforço)
    Fallback,
}

// ──────────────────────────────────────────────
// Status formatado
// ──────────────────────────────────────────────

/// Status entregue à camada de apresentação a cada tick.
///
/// Único artefato que cruza a fronteira do sampler. A ausência de binding é
/// sempre um status explícito com `healthy = false`, nunca uma taxa zerada
/// disfarçada de tráfego real.
#[derive(Debug, Clone, PartialEq)]
pub struct FormattedStatus {
    /// Texto de download (ex: "2.0 KB/s")
    pub down_text: String,
    /// Texto de upload (ex: "512.0 B/s")
    pub up_text: String,
    /// Texto do tooltip, limitado a 63 caracteres
    pub tooltip: String,
    /// false enquanto não há binding ativo
    pub healthy: bool,
}

// ──────────────────────────────────────────────
// Testes
// ──────────────────────────────────────────────
