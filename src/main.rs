use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};
use clap::Parser;
use dominoes_search::config::{GameConfig, DEFAULT_HAND_SIZE, DEFAULT_MAX_SUIT};
use dominoes_search::game::Game;
use dominoes_search::montecarlo::{DeterminizationConfig, MonteCarlo};
use dominoes_search::search::{generate_tree_stats, run_alpha_beta, run_minimax};
use dominoes_search::state::GameState;
use indicatif::{ProgressBar, ProgressStyle};
use rand::rngs::StdRng;
use rand::SeedableRng;

#[derive(Debug, Parser)]
#[command(name = "dominoes-search", about = "Minimax, alpha-beta and determinized play for two-player dominoes")]
struct Args {
    /// Tiles dealt to each player
    #[arg(long, default_value_t = DEFAULT_HAND_SIZE)]
    hand_size: usize,

    /// Highest suit in the set (6 for double-six)
    #[arg(long, default_value_t = DEFAULT_MAX_SUIT)]
    max_suit: u8,

    /// Number of games to deal and solve
    #[arg(long, default_value_t = 1)]
    games: usize,

    /// Worlds sampled per determinized ply
    #[arg(long, default_value_t = 100)]
    samples: usize,

    /// Seed for deals and sampling (entropy when omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Give max the hand at this lexicographic index instead of a random one
    #[arg(long)]
    hand_index: Option<u128>,

    /// Worker threads for sampling (rayon default when omitted)
    #[arg(long)]
    threads: Option<usize>,

    /// Skip the unpruned minimax run
    #[arg(long)]
    skip_minimax: bool,

    /// Print the alpha-beta principal line
    #[arg(long)]
    record_path: bool,

    /// Skip the full tree walk
    #[arg(long)]
    skip_tree_stats: bool,

    /// Only print the summary line; show a progress bar instead
    #[arg(long)]
    quiet: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = GameConfig::new(args.hand_size, args.max_suit).context("invalid game shape")?;
    let settings = DeterminizationConfig { samples: args.samples, threads: args.threads };
    let engine = MonteCarlo::new(&config, settings).context("invalid sampling settings")?;
    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    if !args.quiet {
        println!("{}", config);
    }

    let pb = if args.quiet && args.games > 1 {
        let pb = ProgressBar::new(args.games as u64);
        pb.set_style(
            ProgressStyle::with_template("{bar:40} {pos}/{len} games | {elapsed_precise} | {msg}")
                .context("progress template")?,
        );
        Some(pb)
    } else {
        None
    };

    let start = Instant::now();
    let mut score_sum: i64 = 0;
    for game_number in 1..=args.games {
        let game_start = Instant::now();
        let game = match args.hand_index {
            Some(index) => Game::with_max_hand_index(&config, index, &mut rng),
            None => Game::random_deal(&config, &mut rng),
        };
        let root = GameState::initial(&game);

        if !args.quiet {
            println!("=== Game {} ===", game_number);
            println!("{}", root);
        }

        let tree_nodes = if args.skip_tree_stats {
            None
        } else {
            let stats = generate_tree_stats(&config, &root);
            if !args.quiet {
                println!("Game Tree Stats:\n{}", stats);
            }
            Some(stats.total_nodes())
        };

        let minimax_value = if args.skip_minimax {
            None
        } else {
            let full = run_minimax(&config, &root);
            if let Some(walked) = tree_nodes {
                if full.nodes_visited != walked {
                    bail!("game {}: minimax visited {} nodes but the tree has {}", game_number, full.nodes_visited, walked);
                }
            }
            if !args.quiet {
                println!("Minimax:\n{}", full);
            }
            Some(full.value)
        };

        let pruned = run_alpha_beta(&config, &root, args.record_path)
            .with_context(|| format!("alpha-beta failed in game {}", game_number))?;
        if let Some(value) = minimax_value {
            if pruned.value != value {
                bail!("game {}: alpha-beta value {} disagrees with minimax value {}", game_number, pruned.value, value);
            }
        }
        if !args.quiet {
            println!("Alpha-Beta:\n{}", pruned);
        }

        let play = engine
            .play(&game, &root, &mut rng)
            .with_context(|| format!("determinized play failed in game {}", game_number))?;
        let score = play.final_score().unwrap_or_default();
        score_sum += i64::from(score);
        if !args.quiet {
            println!("Monte Carlo Determinization:");
            for ply in &play.plies {
                println!("  {}", ply);
            }
            println!("{}", play);
            println!("Game {} took {}", game_number, fmt_duration(game_start.elapsed()));
        }
        if let Some(pb) = &pb {
            pb.set_message(format!("last score: {}", score));
            pb.inc(1);
        }
    }
    if let Some(pb) = pb {
        pb.finish_and_clear();
    }

    println!(
        "Games: {} | mean determinized score: {:.2} | total time: {}",
        args.games,
        score_sum as f64 / args.games.max(1) as f64,
        fmt_duration(start.elapsed())
    );
    Ok(())
}

fn fmt_duration(d: Duration) -> String {
    let secs = d.as_secs_f64();
    if secs >= 60.0 {
        format!("{}m {:.1}s", (secs / 60.0).floor() as u64, secs % 60.0)
    } else {
        format!("{:.3}s", secs)
    }
}
