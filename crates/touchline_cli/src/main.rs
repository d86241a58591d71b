//! Touchline CLI
//!
//! Terminal front-end for the capture core: a turbo shorthand REPL over a
//! match file, plus one-shot parse and roster checks.

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use touchline_core::turbo;
use touchline_core::{Match, PeriodClockManager};

#[derive(Parser)]
#[command(name = "touchline")]
#[command(about = "Log soccer match events with turbo shorthand", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Read turbo commands from stdin and print the events they produce
    Turbo {
        /// Match JSON file (teams, rosters, status, clock)
        #[arg(long)]
        match_file: PathBuf,

        /// Print events as pretty JSON instead of one line each
        #[arg(long, default_value = "false")]
        pretty: bool,
    },

    /// Parse a single turbo command and show the breakdown
    Parse {
        /// Shorthand command, e.g. "h10p1>7"
        command: String,
    },

    /// Validate the rosters in a match file
    Check {
        /// Match JSON file
        #[arg(long)]
        match_file: PathBuf,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Turbo { match_file, pretty } => run_turbo(&match_file, pretty),
        Commands::Parse { command } => {
            let result = turbo::parse(&command);
            println!("{}", result.describe());
            println!("{}", serde_json::to_string_pretty(&result)?);
            Ok(())
        }
        Commands::Check { match_file } => {
            let m = load_match(&match_file)?;
            m.home.validate().with_context(|| format!("home roster ({})", m.home.name))?;
            m.away.validate().with_context(|| format!("away roster ({})", m.away.name))?;
            println!(
                "ok: {} vs {} ({} + {} players)",
                m.home.name,
                m.away.name,
                m.home.players.len(),
                m.away.players.len()
            );
            Ok(())
        }
    }
}

fn load_match(path: &Path) -> Result<Match> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading match file {}", path.display()))?;
    let m: Match = serde_json::from_str(&raw)
        .with_context(|| format!("parsing match file {}", path.display()))?;
    Ok(m)
}

fn run_turbo(match_file: &Path, pretty: bool) -> Result<()> {
    let m = load_match(match_file)?;
    let mut clock = PeriodClockManager::new();
    clock.reconstruct(&m);

    log::info!(
        "loaded {} vs {}, phase {:?}, clock {}",
        m.home.name,
        m.away.name,
        clock.phase(),
        touchline_core::clock_display(m.total_seconds.unwrap_or(0))
    );
    if !clock.entry_allowed() {
        log::warn!("match is not in a live phase, events will still print locally");
    }

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    for line in stdin.lock().lines() {
        let line = line?;
        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        if input == "q" || input == "quit" {
            break;
        }

        let result = turbo::parse(input);
        match turbo::resolve(&result, &m) {
            Ok(resolved) => {
                if resolved.needs_team_prefix {
                    eprintln!(
                        "ambiguous: #{} plays for both teams, prefix with h or a",
                        resolved.player.jersey
                    );
                    continue;
                }
                if resolved.recipient_needs_team_prefix {
                    eprintln!("ambiguous recipient: prefix the target jersey with h or a");
                    continue;
                }
                match resolved.to_event(&clock.stamp(&m)) {
                    Some(event) => {
                        let json = if pretty {
                            serde_json::to_string_pretty(&event)?
                        } else {
                            serde_json::to_string(&event)?
                        };
                        writeln!(stdout, "{}", json)?;
                    }
                    None => eprintln!("incomplete: {}", result.describe()),
                }
            }
            Err(err) => eprintln!("error: {}", err),
        }
    }
    Ok(())
}
