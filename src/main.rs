use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use squad_forge::api::state::AppState;
use squad_forge::config::AppConfig;
use squad_forge::leaderboard::StatsStore;
use squad_forge::models::{Formation, Player, Team};
use squad_forge::schedule::{build_bracket, round_robin, TournamentMode};
use squad_forge::simulate::{run_bracket, simulate_match};
use squad_forge::split::{build_teams, partition_fitness};
use squad_forge::team_label;

#[derive(Parser)]
#[command(name = "squad-forge")]
#[command(about = "Balanced football team builder with match simulation")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = "./config.toml")]
    config: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the API server
    Serve {
        /// Bind address (overrides config)
        #[arg(long)]
        host: Option<String>,

        /// Port number (overrides config)
        #[arg(long)]
        port: Option<u16>,
    },

    /// Split a roster file into balanced teams
    Split {
        /// Path to a JSON file holding an array of players
        #[arg(long)]
        input: PathBuf,

        /// Number of teams
        #[arg(long, default_value = "2")]
        teams: usize,

        /// Formation preset, "D-M-F" string (forces the strict builder)
        #[arg(long)]
        formation: Option<String>,
    },

    /// Split a roster and simulate a full tournament
    Simulate {
        /// Path to a JSON file holding an array of players
        #[arg(long)]
        input: PathBuf,

        /// Number of teams
        #[arg(long, default_value = "2")]
        teams: usize,

        /// Tournament mode: "round-robin" or "knockout"
        #[arg(long, default_value = "round-robin")]
        mode: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));

    if cli.json_logs {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    tracing::info!("Starting squad-forge v{}", env!("CARGO_PKG_VERSION"));

    let config = load_config(&cli.config)?;

    match cli.command {
        Commands::Serve { host, port } => {
            let host = host.unwrap_or_else(|| config.server.host.clone());
            let port = port.unwrap_or(config.server.port);

            let state = AppState::new(config.engine.clone());
            let app = squad_forge::api::build_router(state)
                .layer(squad_forge::api::cors_layer(&config.server.cors_origin));

            let addr = format!("{}:{}", host, port);
            let listener = tokio::net::TcpListener::bind(&addr)
                .await
                .with_context(|| format!("failed to bind {addr}"))?;
            tracing::info!("API: http://{}", addr);
            axum::serve(listener, app).await?;
        }
        Commands::Split {
            input,
            teams,
            formation,
        } => {
            anyhow::ensure!(teams >= 1, "--teams must be at least 1");
            let players = read_roster(&input)?;
            let formation = formation
                .as_deref()
                .map(Formation::parse)
                .transpose()
                .context("invalid --formation")?;

            let mut rng = rand::thread_rng();
            let split = build_teams(
                &players,
                teams,
                formation.as_ref(),
                config.engine.trials,
                &mut rng,
            );

            println!("=== Teams (fitness {:.3}) ===\n", partition_fitness(&split));
            for (index, team) in split.iter().enumerate() {
                print_team(index, team);
            }
        }
        Commands::Simulate { input, teams, mode } => {
            anyhow::ensure!(teams >= 2, "--teams must be at least 2");
            let players = read_roster(&input)?;
            let mode = match mode.as_str() {
                "round-robin" => TournamentMode::RoundRobin,
                "knockout" => TournamentMode::Knockout,
                other => anyhow::bail!("unknown mode: {other} (use round-robin or knockout)"),
            };

            let mut rng = rand::thread_rng();
            let split = build_teams(&players, teams, None, config.engine.trials, &mut rng);
            let mut stats = StatsStore::new();

            println!("=== Teams ===\n");
            for (index, team) in split.iter().enumerate() {
                print_team(index, team);
            }

            match mode {
                TournamentMode::RoundRobin => {
                    println!("=== Results ===\n");
                    for fixture in round_robin(split.len()) {
                        let home = &split[fixture.team_a];
                        let away = &split[fixture.team_b];
                        let result = simulate_match(
                            &home.label(fixture.team_a),
                            home,
                            &away.label(fixture.team_b),
                            away,
                            &mut rng,
                        );
                        stats.record_match(&result, home, away, &mut rng);
                        println!(
                            "  {} {} - {} {}",
                            result.home, result.score.home, result.score.away, result.away
                        );
                    }
                }
                TournamentMode::Knockout => {
                    let mut bracket = build_bracket(split.len(), &mut rng);
                    let records = run_bracket(&split, &mut bracket, &mut stats, &mut rng)
                        .context("tournament simulation failed")?;

                    println!("=== Results ===\n");
                    for record in &records {
                        println!(
                            "  Round {}: {} {} - {} {}",
                            record.round + 1,
                            record.result.home,
                            record.result.score.home,
                            record.result.score.away,
                            record.result.away,
                        );
                    }
                    if let Some(champion) = bracket.champion() {
                        println!("\nChampion: {}", team_label(champion));
                    }
                }
            }

            let snapshot = stats.snapshot();
            println!("\n=== Top Scorers ===");
            for entry in &snapshot.top_scorers {
                println!(
                    "  {} — {} goals in {} appearances",
                    entry.name, entry.goals, entry.appearances
                );
            }
        }
    }

    Ok(())
}

/// Load configuration, falling back to defaults when no file exists.
fn load_config(path: &Path) -> Result<AppConfig> {
    if path.exists() {
        let config = AppConfig::from_file(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?;
        tracing::info!("Loaded config from {}", path.display());
        Ok(config)
    } else {
        tracing::debug!("No config file at {}, using defaults", path.display());
        Ok(AppConfig::default())
    }
}

fn read_roster(path: &Path) -> Result<Vec<Player>> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read roster from {}", path.display()))?;
    let players: Vec<Player> =
        serde_json::from_str(&contents).context("roster must be a JSON array of players")?;
    Ok(players)
}

fn print_team(index: usize, team: &Team) {
    println!(
        "{} ({} players, strength {:.0}):",
        team.label(index),
        team.size(),
        team.total_score()
    );
    for player in &team.players {
        let captain = if player.captain { " (C)" } else { "" };
        println!(
            "  {} — {} {}{}",
            player.name, player.level, player.position, captain
        );
    }
    println!();
}
