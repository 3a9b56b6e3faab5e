use std::path::PathBuf;

use clap::{ArgAction, Parser, ValueEnum};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Renders a CSV quick-report dashboard headlessly and prints every region.
#[derive(Parser, Debug)]
#[command(name = "csvqr-dash", version, about, long_about = None)]
pub struct Args {
    /// Report page with the embedded run/profile/dag JSON blocks
    #[arg(long, conflicts_with_all = ["run", "profile", "dag"])]
    pub report: Option<PathBuf>,

    /// Run metrics document (run.json)
    #[arg(long)]
    pub run: Option<PathBuf>,

    /// Column profile document (profile.json)
    #[arg(long)]
    pub profile: Option<PathBuf>,

    /// Stage graph document (dag.json)
    #[arg(long)]
    pub dag: Option<PathBuf>,

    /// TOML config with [timing], [layout], [regions] and [blocks]
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Laid-out width of every region; 0 simulates a page that has not settled
    #[arg(long, default_value_t = 960.0)]
    pub width: f64,

    /// Run as if the chart engine never loads
    #[arg(long)]
    pub no_engine: bool,

    /// The chart engine becomes available after this many virtual milliseconds
    #[arg(long, value_name = "MS", conflicts_with = "no_engine")]
    pub engine_delay_ms: Option<u64>,

    /// Number of simulated viewport resizes after boot
    #[arg(long, value_name = "N", default_value_t = 0)]
    pub resize: u32,

    /// Write each rendered chart spec as <region>.vl.json into this directory
    #[arg(long, value_name = "DIR")]
    pub out_dir: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Also write logs to this file
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// More log output (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Args {
    pub fn level(&self) -> log::LevelFilter {
        match self.verbose {
            0 => log::LevelFilter::Info,
            1 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let args = Args::try_parse_from(["csvqr-dash", "--report", "r.html"]).unwrap();
        assert_eq!(args.width, 960.0);
        assert_eq!(args.format, OutputFormat::Text);
        assert_eq!(args.resize, 0);
        assert_eq!(args.level(), log::LevelFilter::Info);
    }

    #[test]
    fn report_conflicts_with_documents() {
        assert!(Args::try_parse_from(["csvqr-dash", "--report", "r.html", "--run", "a.json"]).is_err());
    }

    #[test]
    fn no_engine_conflicts_with_delay() {
        assert!(
            Args::try_parse_from(["csvqr-dash", "--no-engine", "--engine-delay-ms", "100"]).is_err()
        );
    }

    #[test]
    fn verbosity_counts() {
        let args = Args::try_parse_from(["csvqr-dash", "-vv", "--format", "json"]).unwrap();
        assert_eq!(args.level(), log::LevelFilter::Trace);
        assert_eq!(args.format, OutputFormat::Json);
    }
}
