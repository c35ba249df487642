//! Enumeração de interfaces de rede do host.
//!
//! A política de seleção só precisa de três fatos por interface: nome,
//! estado operacional e tipo de adaptador. O trait existe para que a
//! máquina de estados seja testável com doubles; a implementação de
//! produção usa `netdev`.

use netdev::interface::InterfaceType;
use netspeed_core::types::{InterfaceDescriptor, InterfaceKind};

/// Fonte de descritores de interface.
pub trait InterfaceProvider: Send {
    /// Enumera as interfaces atuais do host, na ordem do SO.
    fn enumerate(&self) -> Vec<InterfaceDescriptor>;

    /// Teste de vivacidade: existe alguma interface candidata agora?
    fn any_qualifying(&self) -> bool {
        self.enumerate().iter().any(InterfaceDescriptor::qualifies)
    }
}

/// Provider de produção via `netdev`.
pub struct NetdevProvider;

impl InterfaceProvider for NetdevProvider {
    fn enumerate(&self) -> Vec<InterfaceDescriptor> {
        netdev::get_interfaces()
            .into_iter()
            .map(|iface| {
                let up = iface.is_up();
                let kind = kind_of(iface.if_type);
                InterfaceDescriptor {
                    description: iface.friendly_name.or(iface.description),
                    name: iface.name,
                    up,
                    kind,
                }
            })
            .collect()
    }
}

/// Reduz o tipo do adaptador às categorias que a seleção conhece.
fn kind_of(if_type: InterfaceType) -> InterfaceKind {
    match if_type {
        InterfaceType::Ethernet | InterfaceType::GigabitEthernet => InterfaceKind::Ethernet,
        InterfaceType::Wireless80211 => InterfaceKind::Wireless,
        _ => InterfaceKind::Other,
    }
}

// ──────────────────────────────────────────────
// Testes
// ──────────────────────────────────────────────
