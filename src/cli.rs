use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};

use crate::color::Rgb;
use crate::config::WorkflowConfig;
use crate::error::Result;

/// Airport layer wrangling: shapefile to latitude-band CSV layer.
#[derive(Debug, Parser)]
#[command(name = "rusty-latband", version, about)]
pub struct Cli {
    /// More log output (-v info, -vv debug, -vvv trace). RUST_LOG wins.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the export / filter / reload workflow.
    Run(RunArgs),
    /// Open the map viewer.
    View(ViewArgs),
}

#[derive(Debug, Args)]
pub struct RunArgs {
    #[command(flatten)]
    pub workflow: WorkflowArgs,

    /// Project file holding the layers between runs.
    #[arg(long)]
    pub project: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct ViewArgs {
    #[command(flatten)]
    pub workflow: WorkflowArgs,

    /// Project file to display.
    #[arg(long)]
    pub project: Option<PathBuf>,
}

/// Config file plus the overrides both subcommands accept.
#[derive(Debug, Default, Args)]
pub struct WorkflowArgs {
    /// TOML workflow config.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Source point shapefile.
    #[arg(long)]
    pub shapefile: Option<PathBuf>,

    /// Directory for the exported text files.
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    #[arg(long, allow_negative_numbers = true)]
    pub min_lat: Option<f64>,

    #[arg(long, allow_negative_numbers = true)]
    pub max_lat: Option<f64>,

    /// Name of the filtered layer.
    #[arg(long)]
    pub layer_name: Option<String>,

    /// Marker colour of the source layer (#rrggbb or r,g,b).
    #[arg(long)]
    pub source_color: Option<Rgb>,

    /// Marker colour of the filtered layer (#rrggbb or r,g,b).
    #[arg(long)]
    pub filtered_color: Option<Rgb>,
}

impl WorkflowArgs {
    /// Config file (or defaults) with command-line overrides applied.
    pub fn resolve(&self) -> Result<WorkflowConfig> {
        let mut config = match &self.config {
            Some(path) => WorkflowConfig::load(path)?,
            None => WorkflowConfig::default(),
        };
        if let Some(shp) = &self.shapefile {
            config.source.shapefile = Some(shp.clone());
        }
        if let Some(dir) = &self.output_dir {
            config.output.directory = Some(dir.clone());
        }
        if let Some(min) = self.min_lat {
            config.filter.min = min;
        }
        if let Some(max) = self.max_lat {
            config.filter.max = max;
        }
        if let Some(name) = &self.layer_name {
            config.layer.name = name.clone();
        }
        if let Some(color) = self.source_color {
            config.style.source_color = color;
        }
        if let Some(color) = self.filtered_color {
            config.style.filtered_color = color;
        }
        Ok(config)
    }
}

/// Default `env_logger` filter for a `-v` count.
pub fn log_filter(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_run_with_overrides() {
        let cli = Cli::try_parse_from([
            "rusty-latband",
            "-vv",
            "run",
            "--shapefile",
            "/d/a.shp",
            "--min-lat",
            "-5",
            "--max-lat",
            "5",
            "--project",
            "p.json",
            "--filtered-color",
            "#0000ff",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        let Command::Run(args) = cli.command else {
            panic!("expected run");
        };
        assert_eq!(args.project, Some(PathBuf::from("p.json")));
        let config = args.workflow.resolve().unwrap();
        assert_eq!(config.filter.min, -5.0);
        assert_eq!(config.filter.max, 5.0);
        assert_eq!(config.source.shapefile, Some(PathBuf::from("/d/a.shp")));
        assert_eq!(config.style.filtered_color, Rgb::from_rgb(0, 0, 255));
        assert_eq!(config.style.source_color, crate::color::CORAL);
    }

    #[test]
    fn bad_colour_is_rejected_by_parser() {
        let res = Cli::try_parse_from(["rusty-latband", "run", "--source-color", "orange"]);
        assert!(res.is_err());
    }

    #[test]
    fn verbosity_maps_to_levels() {
        assert_eq!(log_filter(0), "warn");
        assert_eq!(log_filter(1), "info");
        assert_eq!(log_filter(9), "trace");
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
