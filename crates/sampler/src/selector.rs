//! Política de seleção: interface ativa → instância de contador.
//!
//! A enumeração de interfaces e a nomenclatura das instâncias de contador
//! vêm de APIs diferentes do mesmo host e divergem em formatação. O
//! casamento é por contenção de substring nas duas direções, ignorando
//! caixa; sem casamento, cai na primeira instância disponível como melhor
//! esforço (pode monitorar o adaptador errado — aproximação aceita, visível
//! via [`MatchKind::Fallback`]).

use netspeed_core::types::{InterfaceDescriptor, MatchKind};
use tracing::{debug, warn};

use crate::counters::CounterCategory;
use crate::interfaces::InterfaceProvider;

/// Erros de seleção. Todos recuperáveis: o sampler tenta de novo a cada tick.
#[derive(Debug, thiserror::Error)]
pub enum SelectionError {
    #[error("nenhuma interface Ethernet/Wireless ativa")]
    NoActiveInterface,

    #[error("categoria de contadores de rede indisponível: {0}")]
    CounterCategoryUnavailable(String),

    #[error("nenhuma instância de contador disponível")]
    NoMatchingCounterInstance,
}

/// Resultado de uma seleção bem-sucedida.
#[derive(Debug, Clone)]
pub struct Selection {
    /// Interface escolhida (primeira candidata na ordem de enumeração)
    pub interface: InterfaceDescriptor,
    /// Nome da instância de contador resolvida
    pub instance: String,
    /// Qualidade do casamento interface ↔ instância
    pub match_kind: MatchKind,
}

/// Compara nomes de forma fuzzy: contenção em qualquer direção, sem caixa.
fn names_match(a: &str, b: &str) -> bool {
    if a.is_empty() || b.is_empty() {
        return false;
    }
    let a = a.to_lowercase();
    let b = b.to_lowercase();
    a.contains(&b) || b.contains(&a)
}

/// Seleciona a interface a monitorar e resolve sua instância de contador.
///
/// Primeira candidata vence; a ordem de enumeração é do SO e não é estável
/// entre execuções (não-determinismo aceito).
pub fn select(
    ifaces: &dyn InterfaceProvider,
    counters: &dyn CounterCategory,
) -> Result<Selection, SelectionError> {
    // 1. Primeira interface up do tipo aceito
    let interface = ifaces
        .enumerate()
        .into_iter()
        .find(InterfaceDescriptor::qualifies)
        .ok_or(SelectionError::NoActiveInterface)?;

    // 2. Instâncias expostas pela categoria de throughput
    let instances = counters
        .instance_names()
        .map_err(|e| SelectionError::CounterCategoryUnavailable(e.to_string()))?;
    if instances.is_empty() {
        return Err(SelectionError::NoMatchingCounterInstance);
    }

    // 3. Casamento pelo nome de exibição; fallback para a primeira instância
    let disp = interface.display_name();
    let (instance, match_kind) = instances
        .iter()
        .find_map(|inst| {
            if inst.eq_ignore_ascii_case(disp) {
                Some((inst.clone(), MatchKind::Exact))
            } else if names_match(inst, disp) {
                Some((inst.clone(), MatchKind::Substring))
            } else {
                None
            }
        })
        .unwrap_or_else(|| (instances[0].clone(), MatchKind::Fallback));

    match match_kind {
        MatchKind::Fallback => warn!(
            "Sem casamento para '{}'; monitorando '{instance}' (melhor esforço)",
            disp
        ),
        _ => debug!("'{}' casada com instância '{instance}' ({match_kind:?})", disp),
    }

    Ok(Selection {
        interface,
        instance,
        match_kind,
    })
}

// ──────────────────────────────────────────────
// Testes
// ──────────────────────────────────────────────
