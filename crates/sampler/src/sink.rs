//! Entrega de status à camada de apresentação.

use crossbeam_channel::{bounded, Receiver, Sender};
use netspeed_core::types::FormattedStatus;
use tracing::debug;

/// Consumidor de status, chamado uma vez por tick que produz emissão.
///
/// Implementado pela camada de apresentação; o sampler não sabe o que
/// acontece do outro lado.
pub trait StatusSink: Send {
    fn publish(&self, status: FormattedStatus);
}

/// Sink sobre um channel limitado para a thread de apresentação.
pub struct ChannelSink {
    tx: Sender<FormattedStatus>,
}

impl ChannelSink {
    /// Cria o sink e o receiver que a apresentação consome.
    pub fn new(capacity: usize) -> (Self, Receiver<FormattedStatus>) {
        let (tx, rx) = bounded(capacity);
        (Self { tx }, rx)
    }
}

impl StatusSink for ChannelSink {
    fn publish(&self, status: FormattedStatus) {
        // Non-blocking: se a apresentação está lenta, descarta o status
        if self.tx.try_send(status).is_err() {
            debug!("Channel cheio, descartando status");
        }
    }
}

// ──────────────────────────────────────────────
// Testes
// ──────────────────────────────────────────────
