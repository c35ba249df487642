//! # NetSpeed Sampler
//!
//! Seleciona a interface de rede ativa, amostra os contadores de bytes a
//! cada intervalo fixo e publica o status formatado para a camada de
//! apresentação — aqui, o console; num desktop, o tray/janela que consome
//! o mesmo channel.
//!
//! ## Uso
//! ```bash
//! netspeed_sampler              # intervalo e aquecimento do config.toml
//! RUST_LOG=debug netspeed_sampler
//! ```

mod counters;
mod interfaces;
mod sampler;
mod selector;
mod sink;

use std::time::Duration;

use crossbeam_channel::{bounded, select};
use netspeed_core::config::AppConfig;
use tracing::{error, info, warn};

use counters::SysinfoCategory;
use interfaces::NetdevProvider;
use sampler::{Engine, Sampler};
use sink::ChannelSink;

fn main() {
    // ── Logging ──
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    // ── Carregar config ──
    let config_path = AppConfig::default_path();
    let config = AppConfig::load(&config_path);

    // Salva config padrão se não existir
    if !config_path.exists() {
        if let Err(e) = config.save(&config_path) {
            warn!("Não foi possível salvar config padrão: {e}");
        }
    }

    for err in config.validate() {
        warn!("Config: {err}");
    }

    let monitor_cfg = &config.monitor;
    let interval = Duration::from_secs_f64(monitor_cfg.interval_secs);
    let warmup = Duration::from_secs_f64(monitor_cfg.warmup_secs);

    let ifaces = NetdevProvider;
    let category = SysinfoCategory::new(warmup);

    // A primeira seleção é fatal se falhar; daqui em diante toda falha se
    // auto-recupera no tick seguinte.
    match selector::select(&ifaces, &category) {
        Ok(selection) => info!(
            "✓ Interface selecionada: {} (instância '{}', casamento {:?})",
            selection.interface.display_name(),
            selection.instance,
            selection.match_kind
        ),
        Err(e) => {
            error!("Falha na inicialização: {e}");
            std::process::exit(1);
        }
    }

    // ── Banner ──
    println!();
    println!("══════════════════════════════════════════════");
    println!("   ⚡ NETSPEED SAMPLER – ATIVO (Rust)");
    println!("══════════════════════════════════════════════");
    println!("  Intervalo:   {:.1}s", monitor_cfg.interval_secs);
    println!("  Aquecimento: {:.1}s", monitor_cfg.warmup_secs);
    println!("══════════════════════════════════════════════");
    println!();

    let (status_sink, status_rx) = ChannelSink::new(monitor_cfg.channel_capacity);
    let engine = Engine::new(Box::new(ifaces), Box::new(category), Box::new(status_sink));
    let mut net_sampler = Sampler::start(engine, interval);

    // ── Ctrl-C ──
    let (ctrl_tx, ctrl_rx) = bounded::<()>(1);
    ctrlc::set_handler(move || {
        let _ = ctrl_tx.try_send(());
    })
    .expect("Falha ao instalar handler de Ctrl-C");

    // ── Apresentação (console) ──
    loop {
        select! {
            recv(status_rx) -> msg => match msg {
                Ok(status) if status.healthy => {
                    info!("↓ {}  ↑ {}  | {}", status.down_text, status.up_text, status.tooltip);
                }
                Ok(_) => warn!("Rede indisponível; aguardando interface ativa"),
                Err(_) => break,
            },
            recv(ctrl_rx) -> _ => {
                info!("Encerrando...");
                break;
            }
        }
    }

    net_sampler.stop();
    info!("Sampler finalizado");
}
