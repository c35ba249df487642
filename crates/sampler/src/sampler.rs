//! Máquina de estados de amostragem e o loop que a dirige.
//!
//! Dois estados: sem binding (degradado) e com binding (amostrando). O
//! binding — interface selecionada + contador aberto — é criado numa
//! seleção bem-sucedida e destruído em qualquer falha; ele é o único
//! recurso compartilhado e só a própria máquina o muta. Uma única thread
//! executa os ticks em série, então ticks nunca se sobrepõem.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use netspeed_core::types::FormattedStatus;
use tracing::{debug, info, warn};

use crate::counters::{CounterCategory, CounterSource};
use crate::interfaces::InterfaceProvider;
use crate::selector::{self, Selection};
use crate::sink::StatusSink;

/// Pareamento de uma seleção com o contador aberto para ela.
struct Binding {
    selection: Selection,
    source: Box<dyn CounterSource>,
}

/// Máquina de estados síncrona; um [`tick`](Engine::tick) por intervalo.
pub struct Engine {
    ifaces: Box<dyn InterfaceProvider>,
    counters: Box<dyn CounterCategory>,
    sink: Box<dyn StatusSink>,
    binding: Option<Binding>,
}

impl Engine {
    pub fn new(
        ifaces: Box<dyn InterfaceProvider>,
        counters: Box<dyn CounterCategory>,
        sink: Box<dyn StatusSink>,
    ) -> Self {
        Self {
            ifaces,
            counters,
            sink,
            binding: None,
        }
    }

    /// true enquanto há um binding ativo.
    pub fn is_bound(&self) -> bool {
        self.binding.is_some()
    }

    /// Executa um tick da máquina de estados.
    pub fn tick(&mut self) {
        if self.binding.is_none() {
            // Sem binding: tenta selecionar e abrir. O tick da transição
            // não emite amostra — a primeira janela foi descartada no
            // aquecimento e reportá-la mostraria tráfego zero falso.
            if !self.try_bind() {
                self.sink.publish(FormattedStatus::unavailable());
            }
            return;
        }

        // Vivacidade independente do handle: pega cabo desconectado antes
        // que a leitura devolvesse um valor velho ou errado.
        if !self.ifaces.any_qualifying() {
            info!("Nenhuma interface candidata ativa; desfazendo binding");
            self.unbind();
            self.sink.publish(FormattedStatus::unavailable());
            return;
        }

        let Some(binding) = self.binding.as_mut() else {
            return;
        };
        match binding.source.sample() {
            Ok(sample) => {
                let adapter = binding.selection.interface.display_name();
                self.sink.publish(FormattedStatus::healthy(&sample, adapter));
            }
            Err(e) => {
                // Falha que a vivacidade não enxerga (ex: registro de
                // contadores reiniciado). Religa imediatamente, sem
                // esperar o próximo tick.
                warn!("Falha na leitura do contador: {e}");
                self.unbind();
                if !self.try_bind() {
                    self.sink.publish(FormattedStatus::unavailable());
                }
            }
        }
    }

    /// Seleciona e abre um contador. Falhas são esperadas e viram log.
    fn try_bind(&mut self) -> bool {
        let selection = match selector::select(self.ifaces.as_ref(), self.counters.as_ref()) {
            Ok(selection) => selection,
            Err(e) => {
                debug!("Seleção falhou: {e}");
                return false;
            }
        };

        match self.counters.open(&selection.instance) {
            Ok(source) => {
                info!(
                    "Monitorando '{}' via instância '{}' ({:?})",
                    selection.interface.display_name(),
                    selection.instance,
                    selection.match_kind
                );
                self.binding = Some(Binding { selection, source });
                true
            }
            Err(e) => {
                warn!("Falha ao abrir contador '{}': {e}", selection.instance);
                false
            }
        }
    }

    fn unbind(&mut self) {
        if let Some(mut binding) = self.binding.take() {
            binding.source.close();
        }
    }

    /// Fecha qualquer binding aberto; idempotente.
    pub fn shutdown(&mut self) {
        self.unbind();
    }
}

// ──────────────────────────────────────────────
// Loop de amostragem
// ──────────────────────────────────────────────

/// Dono da thread de amostragem: um timer lógico, `start`/`stop` explícitos.
pub struct Sampler {
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl Sampler {
    /// Inicia o loop em uma thread dedicada.
    pub fn start(mut engine: Engine, interval: Duration) -> Self {
        let stop = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&stop);

        let handle = std::thread::Builder::new()
            .name("net-sampler".into())
            .spawn(move || {
                while !flag.load(Ordering::Relaxed) {
                    let cycle_start = Instant::now();
                    engine.tick();

                    // Dorme pelo tempo restante do intervalo
                    let elapsed = cycle_start.elapsed();
                    if elapsed < interval && !flag.load(Ordering::Relaxed) {
                        std::thread::sleep(interval - elapsed);
                    }
                }
                engine.shutdown();
            })
            .expect("Falha ao criar thread de amostragem");

        Self {
            stop,
            handle: Some(handle),
        }
    }

    /// Para o timer e fecha o binding; chamadas repetidas são no-op.
    pub fn stop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for Sampler {
    fn drop(&mut self) {
        self.stop();
    }
}

// ──────────────────────────────────────────────
// Testes
// ──────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::sync::atomic::AtomicUsize;

    use crate::counters::CounterError;
    use netspeed_core::format::UNAVAILABLE_TEXT;
    use netspeed_core::types::{InterfaceDescriptor, InterfaceKind, RateSample};

    /// Estado compartilhado entre os doubles e o teste.
    #[derive(Clone)]
    struct Harness {
        iface_up: Arc<AtomicBool>,
        fail_open: Arc<AtomicBool>,
        fail_sample: Arc<AtomicBool>,
        rates: Arc<Mutex<(f64, f64)>>,
        opens: Arc<AtomicUsize>,
        closes: Arc<AtomicUsize>,
        statuses: Arc<Mutex<Vec<FormattedStatus>>>,
    }

    impl Harness {
        fn new() -> Self {
            Self {
                iface_up: Arc::new(AtomicBool::new(true)),
                fail_open: Arc::new(AtomicBool::new(false)),
                fail_sample: Arc::new(AtomicBool::new(false)),
                rates: Arc::new(Mutex::new((0.0, 0.0))),
                opens: Arc::new(AtomicUsize::new(0)),
                closes: Arc::new(AtomicUsize::new(0)),
                statuses: Arc::new(Mutex::new(Vec::new())),
            }
        }

        fn engine(&self) -> Engine {
            Engine::new(
                Box::new(FakeIfaces(self.clone())),
                Box::new(FakeCategory(self.clone())),
                Box::new(CollectSink(self.clone())),
            )
        }

        fn set_rates(&self, down: f64, up: f64) {
            *self.rates.lock().unwrap() = (down, up);
        }

        fn statuses(&self) -> Vec<FormattedStatus> {
            self.statuses.lock().unwrap().clone()
        }

        fn opens(&self) -> usize {
            self.opens.load(Ordering::Relaxed)
        }

        fn closes(&self) -> usize {
            self.closes.load(Ordering::Relaxed)
        }
    }

    struct FakeIfaces(Harness);

    impl InterfaceProvider for FakeIfaces {
        fn enumerate(&self) -> Vec<InterfaceDescriptor> {
            if self.0.iface_up.load(Ordering::Relaxed) {
                vec![InterfaceDescriptor {
                    name: "eth0".into(),
                    description: Some("Intel(R) Ethernet Controller".into()),
                    up: true,
                    kind: InterfaceKind::Ethernet,
                }]
            } else {
                Vec::new()
            }
        }
    }

    struct FakeCategory(Harness);

    impl CounterCategory for FakeCategory {
        fn instance_names(&self) -> Result<Vec<String>, CounterError> {
            // Casa com a descrição da interface por substring
            Ok(vec!["intel(r) ethernet controller #1".into()])
        }

        fn open(&self, _instance: &str) -> Result<Box<dyn CounterSource>, CounterError> {
            if self.0.fail_open.load(Ordering::Relaxed) {
                return Err(CounterError::CategoryUnavailable("fora do ar".into()));
            }
            self.0.opens.fetch_add(1, Ordering::Relaxed);
            Ok(Box::new(FakeSource {
                harness: self.0.clone(),
                closed: false,
            }))
        }
    }

    struct FakeSource {
        harness: Harness,
        closed: bool,
    }

    impl CounterSource for FakeSource {
        fn sample(&mut self) -> Result<RateSample, CounterError> {
            if self.harness.fail_sample.load(Ordering::Relaxed) {
                return Err(CounterError::ReadFailure("janela perdida".into()));
            }
            let (down, up) = *self.harness.rates.lock().unwrap();
            Ok(RateSample::clamped(down, up))
        }

        fn close(&mut self) {
            if !self.closed {
                self.closed = true;
                self.harness.closes.fetch_add(1, Ordering::Relaxed);
            }
        }
    }

    struct CollectSink(Harness);

    impl StatusSink for CollectSink {
        fn publish(&self, status: FormattedStatus) {
            self.0.statuses.lock().unwrap().push(status);
        }
    }

    #[test]
    fn bind_no_primeiro_tick_nao_emite_amostra() {
        let h = Harness::new();
        let mut engine = h.engine();

        engine.tick();

        assert!(engine.is_bound());
        assert!(h.statuses().is_empty());
    }

    #[test]
    fn segundo_tick_emite_status_saudavel() {
        let h = Harness::new();
        h.set_rates(2048.0, 512.0);
        let mut engine = h.engine();

        engine.tick(); // transição para BOUND
        engine.tick(); // primeira amostra real

        let statuses = h.statuses();
        assert_eq!(statuses.len(), 1);
        assert_eq!(statuses[0].down_text, "2.0 KB/s");
        assert_eq!(statuses[0].up_text, "512.0 B/s");
        assert!(statuses[0].healthy);
    }

    #[test]
    fn falha_de_selecao_emite_indisponivel_e_recupera_sozinha() {
        let h = Harness::new();
        h.iface_up.store(false, Ordering::Relaxed);
        let mut engine = h.engine();

        engine.tick();
        engine.tick();
        assert!(!engine.is_bound());
        let statuses = h.statuses();
        assert_eq!(statuses.len(), 2);
        assert!(statuses.iter().all(|s| !s.healthy));
        assert_eq!(statuses[0].down_text, UNAVAILABLE_TEXT);

        // Interface volta: o próximo tick religa sem intervenção
        h.iface_up.store(true, Ordering::Relaxed);
        h.set_rates(1024.0, 1024.0);
        engine.tick(); // religa, sem emissão
        assert!(engine.is_bound());
        engine.tick(); // volta a emitir saudável
        let statuses = h.statuses();
        assert_eq!(statuses.len(), 3);
        assert!(statuses[2].healthy);
    }

    #[test]
    fn queda_de_interface_detectada_pela_vivacidade_no_mesmo_tick() {
        let h = Harness::new();
        let mut engine = h.engine();

        engine.tick();
        assert!(engine.is_bound());

        h.iface_up.store(false, Ordering::Relaxed);
        engine.tick();

        assert!(!engine.is_bound());
        let statuses = h.statuses();
        assert_eq!(statuses.len(), 1);
        assert!(!statuses[0].healthy);
        // A queda foi vista pela vivacidade, não por erro de leitura
        assert_eq!(h.opens(), 1);
        assert_eq!(h.closes(), 1);
    }

    #[test]
    fn falha_de_leitura_religa_no_mesmo_tick() {
        let h = Harness::new();
        let mut engine = h.engine();

        engine.tick(); // BOUND
        h.fail_sample.store(true, Ordering::Relaxed);
        engine.tick(); // leitura falha → religa imediatamente

        assert!(engine.is_bound());
        assert_eq!(h.opens(), 2);
        assert_eq!(h.closes(), 1);
        assert!(h.statuses().is_empty());

        h.fail_sample.store(false, Ordering::Relaxed);
        h.set_rates(4096.0, 0.0);
        engine.tick();
        let statuses = h.statuses();
        assert_eq!(statuses.len(), 1);
        assert_eq!(statuses[0].down_text, "4.0 KB/s");
    }

    #[test]
    fn religamento_falho_emite_indisponivel() {
        let h = Harness::new();
        let mut engine = h.engine();

        engine.tick(); // BOUND
        h.fail_sample.store(true, Ordering::Relaxed);
        h.fail_open.store(true, Ordering::Relaxed);
        engine.tick(); // leitura falha, religamento também

        assert!(!engine.is_bound());
        let statuses = h.statuses();
        assert_eq!(statuses.len(), 1);
        assert!(!statuses[0].healthy);
        assert_eq!(h.opens(), h.closes());
    }

    #[test]
    fn shutdown_fecha_o_binding_e_e_idempotente() {
        let h = Harness::new();
        let mut engine = h.engine();

        engine.tick();
        assert!(engine.is_bound());

        engine.shutdown();
        engine.shutdown();

        assert!(!engine.is_bound());
        assert_eq!(h.opens(), 1);
        assert_eq!(h.closes(), 1);
    }

    #[test]
    fn stop_duas_vezes_e_handles_balanceados() {
        let h = Harness::new();
        h.set_rates(1024.0, 256.0);
        let mut sampler = Sampler::start(h.engine(), Duration::from_millis(5));

        std::thread::sleep(Duration::from_millis(60));
        sampler.stop();
        sampler.stop(); // no-op

        assert_eq!(h.opens(), h.closes());
        assert!(!h.statuses().is_empty());
        assert!(h.statuses().iter().all(|s| s.healthy));
    }
}
