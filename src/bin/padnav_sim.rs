//! padnav simulator
//!
//! Replays navigation commands against a YAML tree fixture and prints the
//! focus trail.
//!
//! # Usage
//!
//! ```bash
//! padnav-sim --tree demos/settings_tree.yaml --rules demos/settings_rules.yaml \
//!     right right activate down back shortcut:X
//! ```

use anyhow::{bail, Context, Result};
use clap::Parser;
use colored::Colorize;
use padnav::memtree::{MemoryTree, TreeFixture};
use padnav::telemetry::init_tracing;
use padnav::{
    ClassificationTable, Direction, Effects, Engine, EngineConfig, NavCommand, RuleSet,
};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "padnav-sim")]
#[command(version)]
#[command(about = "Replay D-pad commands against a tree fixture")]
struct Cli {
    /// Tree fixture (YAML)
    #[arg(long, short)]
    tree: PathBuf,

    /// Classification rules (YAML)
    #[arg(long, short)]
    rules: Option<PathBuf>,

    /// Engine configuration (YAML)
    #[arg(long, short, env = "PADNAV_CONFIG")]
    config: Option<PathBuf>,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, default_value = "warn")]
    log: String,

    /// Commands: up, down, left, right, activate, back, shortcut:<KEY>
    commands: Vec<String>,
}

fn parse_command(text: &str) -> Result<NavCommand> {
    let command = match text.to_ascii_lowercase().as_str() {
        "up" => NavCommand::Move(Direction::Up),
        "down" => NavCommand::Move(Direction::Down),
        "left" => NavCommand::Move(Direction::Left),
        "right" => NavCommand::Move(Direction::Right),
        "activate" | "a" => NavCommand::Activate,
        "back" | "b" => NavCommand::ExitScope,
        other => match other.strip_prefix("shortcut:") {
            Some(_) => NavCommand::Shortcut(text["shortcut:".len()..].to_string()),
            None => bail!("unknown command '{text}'"),
        },
    };
    Ok(command)
}

fn describe<T: padnav::ElementTree>(engine: &Engine<T>) -> String {
    match engine.focused_node() {
        Some(node) => format!("{} ({})", node.identity(), node.path()),
        None => "-".to_string(),
    }
}

fn run(cli: Cli) -> Result<()> {
    let fixture_text = std::fs::read_to_string(&cli.tree)
        .with_context(|| format!("reading tree fixture {}", cli.tree.display()))?;
    let fixture = TreeFixture::from_yaml_str(&fixture_text).context("parsing tree fixture")?;

    let table = match &cli.rules {
        Some(path) => ClassificationTable::new(RuleSet::load(path)?),
        None => ClassificationTable::default(),
    };
    let config = match &cli.config {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    };
    let commands = cli
        .commands
        .iter()
        .map(|text| parse_command(text))
        .collect::<Result<Vec<_>>>()?;

    let (tree, roots) = MemoryTree::from_fixture(&fixture);
    let mut engine = Engine::new(tree, table, config);
    for root in roots {
        engine.register_root(root, None);
    }
    engine.run_pending();
    println!(
        "{} {} nodes tracked",
        "sync".cyan(),
        engine.all_nodes().count()
    );

    for (step, command) in commands.into_iter().enumerate() {
        let label = format!("{command:?}");
        let effects = engine.execute(command);
        if effects.contains(Effects::SYNC_REQUESTED) {
            engine.run_pending();
        }
        let status = if effects.is_empty() {
            "noop".yellow()
        } else {
            "ok".green()
        };
        println!(
            "{:>3} {:<24} {:<5} focus={} depth={}{}",
            step + 1,
            label,
            status,
            describe(&engine),
            engine.stack().depth(),
            engine
                .current_page()
                .map(|page| format!(" page={page}"))
                .unwrap_or_default()
        );
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(&cli.log);
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{} {err:#}", "error:".red().bold());
            ExitCode::FAILURE
        }
    }
}
