use std::path::PathBuf;

use anyhow::Result;
use clap::{ArgAction, Parser, ValueHint};

use crate::config::Config;

/// Plot eNB and UE locations from ns-3 topology label files.
///
/// With no arguments, reads `enbs.txt` and `ues.txt` from the working
/// directory and writes `topo.png`.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// JSON config file; flags given here override it
    #[arg(short, long, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// eNB location file
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub enbs: Option<PathBuf>,

    /// UE location file
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub ues: Option<PathBuf>,

    /// ns-3 building script to draw under the nodes
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub buildings: Option<PathBuf>,

    /// Output PNG
    #[arg(short, long, value_hint = ValueHint::FilePath)]
    pub output: Option<PathBuf>,

    /// Output resolution
    #[arg(long)]
    pub dpi: Option<f64>,

    /// 1-based field holding the x,y coordinate
    #[arg(long)]
    pub field: Option<usize>,

    /// Also write <stem>_tem.txt and <stem>_loc.txt next to each input
    /// (off by default; the awk/sed script always wrote them)
    #[arg(long, action = ArgAction::SetTrue)]
    pub keep_intermediates: bool,

    /// Label every marker with its cell id / IMSI
    #[arg(long, action = ArgAction::SetTrue)]
    pub annotate: bool,

    /// TrueType font for tick labels and annotations
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub font: Option<PathBuf>,

    /// Draw without grid lines
    #[arg(long, action = ArgAction::SetTrue)]
    pub no_grid: bool,

    /// Keep the full canvas instead of cropping to the drawn content
    #[arg(long, action = ArgAction::SetTrue)]
    pub no_tight: bool,
}

impl Cli {
    /// Resolve the effective configuration: defaults, then the config file,
    /// then flags.
    pub fn into_config(self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::load(path)?,
            None => Config::default(),
        };

        if let Some(p) = self.enbs {
            config.enbs = p;
        }
        if let Some(p) = self.ues {
            config.ues = p;
        }
        if let Some(p) = self.buildings {
            config.buildings = Some(p);
        }
        if let Some(p) = self.output {
            config.output = p;
        }
        if let Some(dpi) = self.dpi {
            config.plot.dpi = dpi;
        }
        if let Some(field) = self.field {
            config.field = field;
        }
        if let Some(font) = self.font {
            config.plot.font = Some(font);
        }
        config.keep_intermediates |= self.keep_intermediates;
        config.plot.annotate |= self.annotate;
        if self.no_grid {
            config.plot.grid = false;
        }
        if self.no_tight {
            config.plot.tight = false;
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_arguments_reproduce_defaults() {
        let cli = Cli::try_parse_from(["topo-plot"]).unwrap();
        assert_eq!(cli.into_config().unwrap(), Config::default());
    }

    #[test]
    fn flags_override_defaults() {
        let cli = Cli::try_parse_from([
            "topo-plot",
            "--enbs",
            "a.txt",
            "--ues",
            "b.txt",
            "-o",
            "out.png",
            "--dpi",
            "150",
            "--field",
            "4",
            "--no-grid",
            "--annotate",
        ])
        .unwrap();
        let c = cli.into_config().unwrap();
        assert_eq!(c.enbs, PathBuf::from("a.txt"));
        assert_eq!(c.ues, PathBuf::from("b.txt"));
        assert_eq!(c.output, PathBuf::from("out.png"));
        assert_eq!(c.plot.dpi, 150.0);
        assert_eq!(c.field, 4);
        assert!(!c.plot.grid);
        assert!(c.plot.tight);
        assert!(c.plot.annotate);
    }

    #[test]
    fn flags_override_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cfg.json");
        std::fs::write(&path, r#"{ "output": "from_file.png", "plot": { "dpi": 72 } }"#).unwrap();

        let cli = Cli::try_parse_from([
            "topo-plot",
            "--config",
            path.to_str().unwrap(),
            "--dpi",
            "300",
        ])
        .unwrap();
        let c = cli.into_config().unwrap();
        assert_eq!(c.output, PathBuf::from("from_file.png"));
        assert_eq!(c.plot.dpi, 300.0);
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn intermediates_help_states_the_changed_default() {
        use clap::CommandFactory;
        let cmd = Cli::command();
        let arg = cmd
            .get_arguments()
            .find(|a| a.get_id() == "keep_intermediates")
            .unwrap();
        let help = arg.get_help().unwrap().to_string();
        assert!(help.contains("off by default"), "{help}");
        assert!(help.contains("always wrote them"), "{help}");
    }
}
