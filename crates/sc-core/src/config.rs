use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Configuration complète du moteur, hot-rechargeable.
///
/// Sérialisable en TOML. Chaque champ a une valeur par défaut saine.
/// Sessions take a snapshot at connect time; a reload only affects
/// sessions opened afterwards.
///
/// # Example
/// ```
/// use sc_core::config::GaitConfig;
/// let config = GaitConfig::default();
/// assert_eq!(config.signal.smoothing_window, 10);
/// assert_eq!(config.session.history_len, 50);
/// ```
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct GaitConfig {
    pub signal: SignalConfig,
    pub landmarks: LandmarkConfig,
    pub session: SessionConfig,
    pub server: ServerConfig,
}

/// How consecutive peak gaps are reduced to a cadence.
///
/// # Example
/// ```
/// use sc_core::config::CadenceMode;
/// assert!(matches!(CadenceMode::default(), CadenceMode::Trailing));
/// ```
#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub enum CadenceMode {
    /// Mean of the most recent `cadence_window` gaps.
    #[default]
    Trailing,
    /// Mean of every gap in the history.
    AllGaps,
}

/// Smoothing, peak detection and cadence parameters.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct SignalConfig {
    /// Moving-average width in samples.
    pub smoothing_window: usize,
    /// Minimum spacing between accepted peaks, in samples.
    pub min_peak_distance: usize,
    /// Minimum peak prominence, in measurement units.
    pub min_prominence: f64,
    /// Minimum smoothed peak height. None = no height filter.
    pub min_height: Option<f64>,
    /// Number of trailing gaps averaged by `CadenceMode::Trailing`.
    pub cadence_window: usize,
    pub cadence_mode: CadenceMode,
    /// Samples retained per channel. None = whole session (reference parity).
    pub max_history: Option<usize>,
}

impl Default for SignalConfig {
    fn default() -> Self {
        Self {
            smoothing_window: 10,
            min_peak_distance: 10,
            min_prominence: 10.0,
            min_height: None,
            cadence_window: 3,
            cadence_mode: CadenceMode::Trailing,
            max_history: None,
        }
    }
}

/// Landmark acceptance rules.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct LandmarkConfig {
    /// Landmarks below this visibility count as absent. None = accept all.
    pub min_visibility: Option<f64>,
}

/// Per-session reporting parameters.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct SessionConfig {
    /// Maximum paired samples in the history payload.
    pub history_len: usize,
    /// Attach the history payload every N processed frames. 0 = on request only.
    pub history_every: u64,
    /// Raw samples covered by the gait summary.
    pub summary_window: usize,
    /// Samples required on both channels before a summary is reported.
    pub summary_min_samples: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            history_len: 50,
            history_every: 10,
            summary_window: 20,
            summary_min_samples: 10,
        }
    }
}

/// Listener and inference pool settings.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct ServerConfig {
    pub listen_addr: String,
    /// Inference worker threads.
    pub workers: usize,
    /// Frames allowed to wait for a free worker.
    pub queue_depth: usize,
    /// Largest accepted request line, in bytes.
    pub max_line_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: "127.0.0.1:8000".to_string(),
            workers: 2,
            queue_depth: 8,
            max_line_bytes: 8 * 1024 * 1024,
        }
    }
}

impl GaitConfig {
    /// Clamp all numeric fields to their valid ranges.
    /// Called after TOML deserialization to prevent out-of-range values.
    pub fn clamp_all(&mut self) {
        let s = &mut self.signal;
        s.smoothing_window = s.smoothing_window.clamp(1, 1024);
        s.min_peak_distance = s.min_peak_distance.min(100_000);
        if !s.min_prominence.is_finite() || s.min_prominence < 0.0 {
            s.min_prominence = 0.0;
        }
        s.min_height = s.min_height.filter(|h| h.is_finite());
        s.cadence_window = s.cadence_window.max(1);
        // A cap below the smoothing window leaves nothing to detect.
        s.max_history = s.max_history.map(|m| m.max(s.smoothing_window * 2));

        self.landmarks.min_visibility = self
            .landmarks
            .min_visibility
            .filter(|v| v.is_finite())
            .map(|v| v.clamp(0.0, 1.0));

        self.session.history_len = self.session.history_len.min(10_000);
        self.session.summary_window = self.session.summary_window.max(1);
        self.session.summary_min_samples = self
            .session
            .summary_min_samples
            .clamp(1, self.session.summary_window);

        self.server.workers = self.server.workers.clamp(1, 64);
        self.server.queue_depth = self.server.queue_depth.max(1);
        self.server.max_line_bytes = self.server.max_line_bytes.max(1024);
    }
}

/// Structure TOML intermédiaire pour désérialisation avec valeurs optionnelles.
#[derive(Deserialize)]
struct ConfigFile {
    signal: Option<SignalSection>,
    landmarks: Option<LandmarkSection>,
    session: Option<SessionSection>,
    server: Option<ServerSection>,
}

/// Signal section of the TOML config, all fields optional for partial override.
#[derive(Deserialize)]
struct SignalSection {
    smoothing_window: Option<usize>,
    min_peak_distance: Option<usize>,
    min_prominence: Option<f64>,
    min_height: Option<f64>,
    cadence_window: Option<usize>,
    cadence_mode: Option<CadenceMode>,
    max_history: Option<usize>,
}

#[derive(Deserialize)]
struct LandmarkSection {
    min_visibility: Option<f64>,
}

#[derive(Deserialize)]
struct SessionSection {
    history_len: Option<usize>,
    history_every: Option<u64>,
    summary_window: Option<usize>,
    summary_min_samples: Option<usize>,
}

#[derive(Deserialize)]
struct ServerSection {
    listen_addr: Option<String>,
    workers: Option<usize>,
    queue_depth: Option<usize>,
    max_line_bytes: Option<usize>,
}

/// Charge un fichier TOML et fusionne avec les valeurs par défaut.
///
/// # Errors
/// Returns an error if the file cannot be read or parsed.
///
/// # Example
/// ```no_run
/// use sc_core::config::load_config;
/// use std::path::Path;
/// let config = load_config(Path::new("config/default.toml")).unwrap();
/// ```
pub fn load_config(path: &Path) -> Result<GaitConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read {}", path.display()))?;
    parse_config(&content).with_context(|| format!("TOML parse error in {}", path.display()))
}

/// Parse une config TOML depuis une chaîne.
///
/// # Errors
/// Returns an error if the TOML is malformed or a field has the wrong type.
pub fn parse_config(content: &str) -> Result<GaitConfig> {
    let file: ConfigFile = toml::from_str(content)?;
    let mut config = GaitConfig::default();

    if let Some(s) = file.signal {
        let c = &mut config.signal;
        if let Some(v) = s.smoothing_window {
            c.smoothing_window = v;
        }
        if let Some(v) = s.min_peak_distance {
            c.min_peak_distance = v;
        }
        if let Some(v) = s.min_prominence {
            c.min_prominence = v;
        }
        if s.min_height.is_some() {
            c.min_height = s.min_height;
        }
        if let Some(v) = s.cadence_window {
            c.cadence_window = v;
        }
        if let Some(v) = s.cadence_mode {
            c.cadence_mode = v;
        }
        // 0 in the file means "unbounded".
        if let Some(v) = s.max_history {
            c.max_history = (v > 0).then_some(v);
        }
    }

    if let Some(l) = file.landmarks
        && l.min_visibility.is_some()
    {
        config.landmarks.min_visibility = l.min_visibility;
    }

    if let Some(s) = file.session {
        let c = &mut config.session;
        if let Some(v) = s.history_len {
            c.history_len = v;
        }
        if let Some(v) = s.history_every {
            c.history_every = v;
        }
        if let Some(v) = s.summary_window {
            c.summary_window = v;
        }
        if let Some(v) = s.summary_min_samples {
            c.summary_min_samples = v;
        }
    }

    if let Some(s) = file.server {
        let c = &mut config.server;
        if let Some(v) = s.listen_addr {
            c.listen_addr = v;
        }
        if let Some(v) = s.workers {
            c.workers = v;
        }
        if let Some(v) = s.queue_depth {
            c.queue_depth = v;
        }
        if let Some(v) = s.max_line_bytes {
            c.max_line_bytes = v;
        }
    }

    config.clamp_all();
    log::debug!("config parsed: {config:?}");
    Ok(config)
}
