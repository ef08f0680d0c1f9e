//! Match CLI
//!
//! Runs headless AI-vs-AI matches and prints the result.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use match_core::api::{tick_budget, MatchResponse, SCHEMA_VERSION};
use match_core::engine::{Collaborators, ControlMode, MatchConfig, MatchEngine, PlayerInput};
use match_core::TeamSheet;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Skill rating of the built-in 4-4-2 sides
const DEFAULT_SKILL: f32 = 60.0;

#[derive(Parser)]
#[command(name = "match_cli")]
#[command(about = "Run headless football matches", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Simulate one autopilot match from kickoff to the final whistle
    Simulate {
        /// Seed for reproducible matches (wall clock when omitted)
        #[arg(long)]
        seed: Option<u64>,

        /// Match configuration JSON file
        #[arg(long)]
        config: Option<PathBuf>,

        /// Home team sheet JSON file (built-in 4-4-2 when omitted)
        #[arg(long)]
        home: Option<PathBuf>,

        /// Away team sheet JSON file (built-in 4-4-2 when omitted)
        #[arg(long)]
        away: Option<PathBuf>,

        /// Real seconds mapped onto 90 simulated minutes
        #[arg(long)]
        real_seconds: Option<f32>,

        /// Emit a snapshot every N ticks (0 disables)
        #[arg(long, default_value_t = 0)]
        snapshot_every: u64,

        /// Print JSON instead of a text summary
        #[arg(long, default_value = "false")]
        json: bool,
    },

    /// Print the default match configuration as JSON
    DefaultConfig,
}

fn load_sheet(path: Option<&Path>, fallback: &str) -> Result<TeamSheet> {
    match path {
        Some(path) => {
            TeamSheet::load(path).with_context(|| format!("failed to load team sheet {}", path.display()))
        }
        None => Ok(TeamSheet::four_four_two(fallback, DEFAULT_SKILL)),
    }
}

fn load_config(path: Option<&Path>, seed: Option<u64>, real_seconds: Option<f32>) -> Result<MatchConfig> {
    let mut config = match path {
        Some(path) => {
            MatchConfig::load(path).with_context(|| format!("failed to load config {}", path.display()))?
        }
        None => MatchConfig::default(),
    };
    if seed.is_some() {
        config.seed = seed;
    }
    if let Some(real_seconds) = real_seconds {
        config.real_seconds_per_match = real_seconds;
    }
    config.validate().context("invalid match configuration")?;
    Ok(config)
}

fn simulate(
    config: MatchConfig,
    home: TeamSheet,
    away: TeamSheet,
    snapshot_every: u64,
    json: bool,
) -> Result<()> {
    let budget = tick_budget(&config);
    let seed = config.seed;
    let mut engine = MatchEngine::new(&home, &away, config, ControlMode::Autopilot, Collaborators::silent())
        .context("failed to set up match")?;

    while !engine.is_finished() && engine.ticks() < budget {
        engine.tick(PlayerInput::idle());
        if snapshot_every > 0 && engine.ticks() % snapshot_every == 0 {
            let snapshot = engine.snapshot();
            if json {
                println!("{}", snapshot.to_json()?);
            } else {
                tracing::info!(
                    tick = snapshot.tick,
                    state = ?snapshot.state,
                    "{:02}:{:02} {}-{}",
                    snapshot.clock.minute,
                    snapshot.clock.second,
                    snapshot.score.home,
                    snapshot.score.away
                );
            }
        }
    }

    let Some(outcome) = engine.outcome().cloned() else {
        bail!("match did not finish within {} ticks", budget);
    };
    let response = MatchResponse {
        schema_version: SCHEMA_VERSION,
        seed,
        outcome,
        goals: engine.goals().to_vec(),
        ticks: engine.ticks(),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&response)?);
        return Ok(());
    }

    println!(
        "{} {} - {} {}",
        response.outcome.home_team,
        response.outcome.home_goals,
        response.outcome.away_goals,
        response.outcome.away_team
    );
    for goal in &response.goals {
        let scorer = goal
            .scorer
            .and_then(|id| engine.player(id))
            .map(|p| p.name.as_str())
            .unwrap_or("unknown");
        println!(
            "  {:02}:{:02} {:?} {}{}",
            goal.clock.minute,
            goal.clock.second,
            goal.side,
            scorer,
            if goal.own_goal { " (own goal)" } else { "" }
        );
    }
    tracing::info!(ticks = response.ticks, "simulation finished");
    Ok(())
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Simulate { seed, config, home, away, real_seconds, snapshot_every, json } => {
            let config = load_config(config.as_deref(), seed, real_seconds)?;
            let home = load_sheet(home.as_deref(), "Home")?;
            let away = load_sheet(away.as_deref(), "Away")?;
            tracing::info!(home = %home.name, away = %away.name, seed = ?config.seed, "starting match");
            simulate(config, home, away, snapshot_every, json)?;
        }
        Commands::DefaultConfig => {
            println!("{}", serde_json::to_string_pretty(&MatchConfig::default())?);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_simulate() {
        let cli = Cli::try_parse_from([
            "match_cli",
            "simulate",
            "--seed",
            "7",
            "--real-seconds",
            "30",
            "--snapshot-every",
            "60",
            "--json",
        ])
        .unwrap();
        match cli.command {
            Commands::Simulate { seed, real_seconds, snapshot_every, json, .. } => {
                assert_eq!(seed, Some(7));
                assert_eq!(real_seconds, Some(30.0));
                assert_eq!(snapshot_every, 60);
                assert!(json);
            }
            Commands::DefaultConfig => panic!("wrong subcommand"),
        }
    }

    #[test]
    fn test_config_overrides_apply() {
        let config = load_config(None, Some(3), Some(45.0)).unwrap();
        assert_eq!(config.seed, Some(3));
        assert_eq!(config.real_seconds_per_match, 45.0);
        assert!(load_config(None, None, Some(-1.0)).is_err());
    }

    #[test]
    fn test_missing_sheet_reports_path() {
        let err = load_sheet(Some(Path::new("/nonexistent/home.json")), "Home").unwrap_err();
        assert!(err.to_string().contains("/nonexistent/home.json"));
    }
}
