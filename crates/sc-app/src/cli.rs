use std::path::PathBuf;

use clap::Parser;

/// stridecast: streaming gait cadence from pose keypoints.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Fichier de configuration TOML. Défaut : config/default.toml.
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: PathBuf,

    /// Adresse d'écoute, remplace `server.listen_addr`.
    #[arg(long)]
    pub listen: Option<String>,

    /// Nombre de workers d'inférence, remplace `server.workers`.
    #[arg(long)]
    pub workers: Option<usize>,

    /// Analyse hors ligne d'enregistrements JSON-lines (une trame par ligne).
    #[arg(long, num_args = 1..)]
    pub replay: Vec<PathBuf>,

    /// Analyse l'enregistrement d'exemple embarqué.
    #[arg(long, default_value_t = false)]
    pub sample: bool,

    /// Niveau de log : error, warn, info, debug, trace.
    #[arg(long, default_value = "warn")]
    pub log_level: String,
}

impl Cli {
    /// `true` when the binary should analyse files instead of serving.
    #[must_use]
    pub fn is_offline(&self) -> bool {
        self.sample || !self.replay.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_serve() {
        let cli = Cli::parse_from(["stridecast"]);
        assert!(!cli.is_offline());
        assert_eq!(cli.log_level, "warn");
        assert_eq!(cli.config, PathBuf::from("config/default.toml"));
    }

    #[test]
    fn replay_takes_several_files() {
        let cli = Cli::parse_from(["stridecast", "--replay", "a.jsonl", "b.jsonl", "--workers", "4"]);
        assert_eq!(cli.replay.len(), 2);
        assert_eq!(cli.workers, Some(4));
        assert!(cli.is_offline());
    }
}
