use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rayon::prelude::*;
use serde::Serialize;

use sc_core::config::{CadenceMode, GaitConfig};
use sc_core::metrics::{CadenceEstimate, GaitMetrics};
use sc_core::traits::PoseDetector;
use sc_session::protocol::{Response, dispatch};
use sc_session::session::GaitSession;
use sc_signal::cadence::CadenceEstimator;
use sc_signal::channel::ChannelPipeline;
use sc_signal::measurement::{Channel, FrameMeasurements};
use sc_signal::sample::{SAMPLE_STRIDE, SAMPLE_SWING};

/// Résultat de l'analyse hors ligne d'un canal.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ChannelReport {
    pub samples: usize,
    pub peaks: Vec<usize>,
    pub trailing_cadence: CadenceEstimate,
    pub all_gaps_cadence: CadenceEstimate,
}

/// Rapport pour un enregistrement complet.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ReplayReport {
    pub source: String,
    pub frames: u64,
    /// Lines answered with an error (malformed or undecodable).
    pub rejected: u64,
    pub stride: ChannelReport,
    pub swing: ChannelReport,
    pub final_metrics: GaitMetrics,
}

/// Entrée du mode hors ligne : analyse `--sample` et chaque `--replay`.
///
/// Files are analysed in parallel; reports are printed in argument order.
///
/// # Errors
/// Returns an error if any recording could not be read.
pub fn run(
    paths: &[PathBuf],
    sample: bool,
    config: &GaitConfig,
    detector: &dyn PoseDetector,
) -> Result<()> {
    let mut reports = Vec::new();
    if sample {
        reports.push(Ok(replay_sample(config)));
    }
    reports.extend(replay_all(paths, config, detector));

    let mut failures = 0usize;
    for report in reports {
        match report {
            Ok(report) => println!("{}", serde_json::to_string_pretty(&report)?),
            Err(e) => {
                failures += 1;
                log::error!("{e:#}");
            }
        }
    }
    if failures > 0 {
        anyhow::bail!("{failures} enregistrement(s) illisible(s)");
    }
    Ok(())
}

/// Replays several recordings in parallel, each in its own session.
pub fn replay_all(
    paths: &[PathBuf],
    config: &GaitConfig,
    detector: &dyn PoseDetector,
) -> Vec<Result<ReplayReport>> {
    paths
        .par_iter()
        .enumerate()
        .map(|(i, path)| replay_file(path, i as u64 + 1, config, detector))
        .collect()
}

/// Feeds every line of a JSON-lines recording through a fresh session.
///
/// # Errors
/// Returns an error if the file cannot be opened or read.
pub fn replay_file(
    path: &Path,
    id: u64,
    config: &GaitConfig,
    detector: &dyn PoseDetector,
) -> Result<ReplayReport> {
    let file = File::open(path).with_context(|| format!("ouverture de {}", path.display()))?;
    let mut session = GaitSession::new(id, config);
    let mut rejected = 0u64;
    let mut last = GaitMetrics::default();

    for (n, line) in BufReader::new(file).lines().enumerate() {
        let line = line.with_context(|| format!("{}:{}", path.display(), n + 1))?;
        if line.trim().is_empty() {
            continue;
        }
        match dispatch(&mut session, &line, |frame| detector.detect(frame)) {
            Response::Success { gait_metrics, .. } => last = gait_metrics,
            Response::Error { message } => {
                rejected += 1;
                log::debug!("{}:{} rejetée : {message}", path.display(), n + 1);
            }
            Response::Received { .. } => {}
        }
    }

    log::info!(
        "{} : {} frames, {rejected} rejetées",
        path.display(),
        session.frame_count()
    );
    Ok(report(path.display().to_string(), &session, config, rejected, last))
}

/// Analyses the embedded sample walk.
#[must_use]
pub fn replay_sample(config: &GaitConfig) -> ReplayReport {
    let mut session = GaitSession::new(0, config);
    let mut last = GaitMetrics::default();
    let mut rejected = 0u64;
    for (&stride, &swing) in SAMPLE_STRIDE.iter().zip(&SAMPLE_SWING) {
        let m = FrameMeasurements {
            stride: Some(stride),
            swing: Some(swing),
        };
        match session.process_measurements(m, false) {
            Ok(metrics) => last = metrics,
            Err(_) => rejected += 1,
        }
    }
    report("sample".to_string(), &session, config, rejected, last)
}

fn report(
    source: String,
    session: &GaitSession,
    config: &GaitConfig,
    rejected: u64,
    final_metrics: GaitMetrics,
) -> ReplayReport {
    ReplayReport {
        source,
        frames: session.frame_count(),
        rejected,
        stride: channel_report(session, Channel::Stride, config),
        swing: channel_report(session, Channel::Swing, config),
        final_metrics,
    }
}

/// Batch analysis of one channel's full history, with both cadence rules.
fn channel_report(session: &GaitSession, channel: Channel, config: &GaitConfig) -> ChannelReport {
    let values = session.state(channel).series().values();
    let analysis = ChannelPipeline::from_config(&config.signal)
        .analyze(values)
        .unwrap_or_default();
    let window = config.signal.cadence_window;
    ChannelReport {
        samples: values.len(),
        peaks: analysis.peak_indices(),
        trailing_cadence: CadenceEstimator::new(window, CadenceMode::Trailing)
            .estimate(&analysis.peaks),
        all_gaps_cadence: CadenceEstimator::new(window, CadenceMode::AllGaps)
            .estimate(&analysis.peaks),
    }
}
