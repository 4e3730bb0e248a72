use std::sync::Arc;
use std::sync::atomic::Ordering;

use anyhow::{Context, Result};
use arc_swap::ArcSwap;
use clap::Parser;
use sc_app::cli::Cli;
use sc_app::detector::LandmarkPassthrough;
use sc_app::worker::InferencePool;
use sc_app::{hotreload, replay, server};
use sc_core::config::GaitConfig;
use sc_core::traits::PoseDetector;

fn main() -> Result<()> {
    // 1. Parser CLI
    let cli = Cli::parse();

    // 2. Initialiser le logging
    env_logger::Builder::new()
        .filter_level(cli.log_level.parse().unwrap_or(log::LevelFilter::Warn))
        .init();

    // 3. Charger la config
    let mut config = resolve_config(&cli)?;

    // 3b. Appliquer les overrides CLI
    if let Some(ref listen) = cli.listen {
        config.server.listen_addr.clone_from(listen);
    }
    if let Some(workers) = cli.workers {
        config.server.workers = workers.max(1);
    }

    // Analyse hors ligne
    if cli.is_offline() {
        log::info!("Analyse hors ligne de {} enregistrement(s)", cli.replay.len());
        return replay::run(&cli.replay, cli.sample, &config, &LandmarkPassthrough);
    }

    let server_config = config.server.clone();
    let config = Arc::new(ArcSwap::from_pointee(config));

    // 4. Lancer le hot-reload config (thread interne notify)
    let _watcher = if cli.config.exists() {
        Some(hotreload::spawn_config_watcher(&cli.config, &config)?)
    } else {
        None
    };

    // 5. Démarrer le pool d'inférence
    let pool = InferencePool::new(
        Arc::new(LandmarkPassthrough),
        server_config.workers,
        server_config.queue_depth,
    )?;
    let detector: Arc<dyn PoseDetector> = Arc::new(pool);

    // 6. Ouvrir le listener
    let server = server::Server::bind(&server_config.listen_addr, config, detector)?;

    // 7. Ctrl-C → arrêt propre
    let shutdown = server.shutdown_handle();
    ctrlc::set_handler(move || {
        log::info!("Ctrl-C reçu, arrêt en cours...");
        shutdown.store(true, Ordering::SeqCst);
    })
    .context("installation du handler Ctrl-C")?;

    // 8. Boucle d'acceptation
    server.run()
}

/// Resolve config: a missing file falls back to defaults.
fn resolve_config(cli: &Cli) -> Result<GaitConfig> {
    if cli.config.exists() {
        sc_core::config::load_config(&cli.config)
    } else {
        log::warn!(
            "Config introuvable : {}. Utilisation des défauts.",
            cli.config.display()
        );
        Ok(GaitConfig::default())
    }
}
