//! Contadores de throughput por interface via `sysinfo`.
//!
//! A categoria de contadores do SO é tratada como uma capability opaca:
//! dado um nome de instância, devolve a taxa atual por segundo ou falha se
//! a instância ficou velha ou sumiu. Os traits permitem substituir o
//! backend por doubles nos testes.

use std::time::{Duration, Instant};

use netspeed_core::types::RateSample;
use sysinfo::Networks;
use tracing::debug;

/// Erros do subsistema de contadores.
#[derive(Debug, thiserror::Error)]
pub enum CounterError {
    #[error("categoria de contadores de rede indisponível: {0}")]
    CategoryUnavailable(String),

    #[error("instância de contador desapareceu: {0}")]
    InstanceGone(String),

    #[error("falha na leitura do contador: {0}")]
    ReadFailure(String),
}

/// Contador aberto para uma instância; produz amostras de janela.
pub trait CounterSource: Send {
    /// Lê a taxa da janela desde a última leitura, saturada em ≥ 0.
    fn sample(&mut self) -> Result<RateSample, CounterError>;

    /// Libera os handles do SO; idempotente.
    fn close(&mut self);
}

/// Categoria de contadores: enumeração de instâncias e abertura.
pub trait CounterCategory: Send {
    /// Nomes de instância expostos pela categoria de throughput de rede.
    fn instance_names(&self) -> Result<Vec<String>, CounterError>;

    /// Abre um contador para a instância, já aquecido.
    fn open(&self, instance: &str) -> Result<Box<dyn CounterSource>, CounterError>;
}

/// Taxa de uma janela: delta de bytes dividido pelo tempo decorrido.
fn window_rate(delta_bytes: u64, elapsed: Duration) -> f64 {
    let secs = elapsed.as_secs_f64();
    if secs > 0.0 {
        delta_bytes as f64 / secs
    } else {
        0.0
    }
}

// ──────────────────────────────────────────────
// Implementação de produção (sysinfo)
// ──────────────────────────────────────────────

/// Categoria de produção sobre `sysinfo::Networks`.
pub struct SysinfoCategory {
    warmup: Duration,
}

impl SysinfoCategory {
    pub fn new(warmup: Duration) -> Self {
        Self { warmup }
    }
}

impl CounterCategory for SysinfoCategory {
    fn instance_names(&self) -> Result<Vec<String>, CounterError> {
        let networks = Networks::new_with_refreshed_list();
        Ok(networks.iter().map(|(name, _)| name.clone()).collect())
    }

    fn open(&self, instance: &str) -> Result<Box<dyn CounterSource>, CounterError> {
        let mut networks = Networks::new_with_refreshed_list();
        if !networks.iter().any(|(name, _)| name.as_str() == instance) {
            return Err(CounterError::InstanceGone(instance.to_string()));
        }

        // A primeira janela de um contador recém-criado não tem média
        // confiável; espera o aquecimento e descarta uma leitura.
        std::thread::sleep(self.warmup);
        networks.refresh(true);
        debug!("Contador aberto para '{instance}' (janela de aquecimento descartada)");

        Ok(Box::new(SysinfoSource {
            networks,
            instance: instance.to_string(),
            last_read: Instant::now(),
            closed: false,
        }))
    }
}

/// Contador de produção: uma instância dentro da lista do `sysinfo`.
struct SysinfoSource {
    networks: Networks,
    instance: String,
    last_read: Instant,
    closed: bool,
}

impl CounterSource for SysinfoSource {
    fn sample(&mut self) -> Result<RateSample, CounterError> {
        if self.closed {
            return Err(CounterError::ReadFailure("contador já fechado".into()));
        }

        self.networks.refresh(true);
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_read);
        self.last_read = now;

        let data = self
            .networks
            .iter()
            .find(|(name, _)| name.as_str() == self.instance)
            .map(|(_, data)| data)
            .ok_or_else(|| CounterError::InstanceGone(self.instance.clone()))?;

        // received()/transmitted() retornam o delta desde o refresh anterior
        Ok(RateSample::clamped(
            window_rate(data.received(), elapsed),
            window_rate(data.transmitted(), elapsed),
        ))
    }

    fn close(&mut self) {
        if !self.closed {
            self.closed = true;
            debug!("Contador de '{}' fechado", self.instance);
        }
    }
}

// ──────────────────────────────────────────────
// Testes
// ──────────────────────────────────────────────
