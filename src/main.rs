use std::process::ExitCode;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use eframe::egui;

use rusty_latband::app::LatbandApp;
use rusty_latband::cli::{log_filter, Cli, Command, RunArgs, ViewArgs};
use rusty_latband::session::Project;
use rusty_latband::state::AppState;
use rusty_latband::workflow;

fn main() -> ExitCode {
    let cli = Cli::parse();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_filter(cli.verbose)))
        .init();

    let result = match cli.command {
        Command::Run(args) => run(args),
        Command::View(args) => view(args),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e:#}");
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn open_project(path: Option<&std::path::Path>) -> Result<Project> {
    match path {
        Some(p) => Project::open(p).with_context(|| format!("opening project {}", p.display())),
        None => Ok(Project::new()),
    }
}

fn run(args: RunArgs) -> Result<()> {
    let config = args.workflow.resolve().context("loading workflow config")?;
    let mut project = open_project(args.project.as_deref())?;

    let report = workflow::run(&mut project, &config).context("running workflow")?;
    for notice in &report.notices {
        println!("{notice}");
    }
    println!(
        "{}: {} feature(s) exported, {} in [{}, {}], layer '{}'",
        report.source_layer,
        report.exported_rows,
        report.filtered_rows,
        config.filter.min,
        config.filter.max,
        report.filtered_layer
    );

    if project.path().is_some() {
        project.save().context("saving project")?;
    }
    Ok(())
}

fn view(args: ViewArgs) -> Result<()> {
    let config = args.workflow.resolve().context("loading workflow config")?;
    let project = open_project(args.project.as_deref())?;
    let state = AppState::new(project, config);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Rusty Latband – Layer Viewer",
        options,
        Box::new(|_cc| Ok(Box::new(LatbandApp::new(state)))),
    )
    .map_err(|e| anyhow!("viewer failed: {e}"))
}
