//! dockhand - replay panel scenarios and check panel definitions

use std::path::Path;

use anyhow::{bail, Context, Result};
use clap::Parser;

use dockhand::cli::{CliArgs, Command};
use dockhand::config::DockhandConfig;
use dockhand::host::ScreenSize;
use dockhand::panel::compute_window_placement;
use dockhand::scenario::{Scenario, ScenarioRunner};

fn main() -> Result<()> {
    dockhand::tracing::init();

    let args = CliArgs::parse();
    match args.command {
        Command::Run {
            scenario,
            config,
            json,
        } => run(&scenario, config.as_deref(), json),
        Command::Check {
            config,
            columns,
            lines,
        } => check(config.as_deref(), ScreenSize::new(columns, lines, 1)),
    }
}

fn load_config(path: Option<&Path>) -> Result<DockhandConfig> {
    match path {
        Some(path) => DockhandConfig::load_from(path)
            .with_context(|| format!("loading panels from {}", path.display())),
        None => Ok(DockhandConfig::load()),
    }
}

fn run(path: &Path, config: Option<&Path>, json: bool) -> Result<()> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading scenario {}", path.display()))?;
    let scenario =
        Scenario::parse(&text).with_context(|| format!("parsing scenario {}", path.display()))?;

    let config = match config {
        None if !scenario.panels.is_empty() => scenario.inline_config(),
        other => load_config(other)?,
    };
    tracing::info!(
        panels = config.panels.len(),
        steps = scenario.steps.len(),
        "running scenario {}",
        path.display()
    );

    let mut runner = ScenarioRunner::new(&config, scenario.screen);
    let outcome = runner.run(&scenario.steps);

    let dump = runner.dump();
    if json {
        println!("{}", dump.to_json());
    } else {
        println!("{}", dump.summary());
    }

    if let Err((index, e)) = outcome {
        bail!("step {} ({:?}) failed: {}", index + 1, scenario.steps[index], e);
    }
    Ok(())
}

fn check(config: Option<&Path>, screen: ScreenSize) -> Result<()> {
    let config = load_config(config)?;
    let mut failures = 0;

    for panel in &config.panels {
        for zoomed in [false, true] {
            match compute_window_placement(panel, panel.size, screen, zoomed) {
                Ok(placement) if !zoomed => {
                    println!("{:<16} ok  {:?}", panel.name, placement);
                }
                Ok(_) => {}
                Err(e) => {
                    failures += 1;
                    println!("{:<16} ERR {}", panel.name, e);
                    break;
                }
            }
        }
    }

    if failures > 0 {
        bail!("{} panel(s) have configuration errors", failures);
    }
    Ok(())
}
