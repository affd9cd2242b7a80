//! dominoes-search: exact and sampled search for two-player dominoes
//!
//! This crate provides:
//! - The tile set and derived search constants (`tile`, `config`)
//! - Deals with per-player pools of tiles the opponent might hold (`game`)
//! - Positions, move generation and terminal scoring (`state`) on an arena tree (`tree`)
//! - Full-information minimax and alpha-beta (`search`)
//! - Monte Carlo determinization for play against a hidden hand (`montecarlo`)
//!
//! Quick start:
//! ```
//! use dominoes_search::config::GameConfig;
//! use dominoes_search::game::Game;
//! use dominoes_search::search::cross_check;
//! use dominoes_search::state::GameState;
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! // Deterministic deal with a seeded RNG
//! let cfg = GameConfig::new(3, 4).unwrap();
//! let game = Game::random_deal(&cfg, &mut StdRng::seed_from_u64(42));
//! let root = GameState::initial(&game);
//!
//! let (minimax, alpha_beta) = cross_check(&cfg, &root).unwrap();
//! assert_eq!(minimax.value, alpha_beta.value);
//! assert!(minimax.value.abs() <= cfg.total_points());
//! ```
//!
pub mod combinations;
pub mod config;
pub mod game;
pub mod montecarlo;
pub mod search;
pub mod state;
pub mod tile;
pub mod tree;
