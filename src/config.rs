use std::fmt;

use crate::tile::{Suit, Tile};

/// Tiles per hand in the standard two-player game.
pub const DEFAULT_HAND_SIZE: usize = 7;
/// Highest suit of the standard double-six set.
pub const DEFAULT_MAX_SUIT: Suit = 6;
pub const NUMBER_OF_PLAYERS: usize = 2;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("hand size {0} is too small (need at least 2 tiles per hand)")]
    HandTooSmall(usize),
    #[error("max suit {max_suit} gives {tile_count} tiles, not enough for two hands of {hand_size}")]
    NotEnoughTiles { hand_size: usize, max_suit: Suit, tile_count: usize },
}

/// Static description of one game variant and its derived search constants.
///
/// - `tiles`: every unordered pair `(a, b)` with `a <= b <= max_suit`.
/// - `pos_inf` / `neg_inf`: bounds strictly outside any reachable score.
/// - `max_depth`: ply budget for exact search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameConfig {
    hand_size: usize,
    max_suit: Suit,
    tiles: Vec<Tile>,
    total_points: i32,
    max_depth: usize,
}

impl GameConfig {
    /// Build a configuration, rejecting degenerate shapes up front.
    ///
    /// ```
    /// use dominoes_search::config::GameConfig;
    /// let cfg = GameConfig::new(7, 6).unwrap();
    /// assert_eq!(cfg.tile_count(), 28);
    /// assert_eq!(cfg.total_points(), 168);
    /// assert_eq!(cfg.pos_inf(), 169);
    /// assert_eq!(cfg.max_depth(), 24);
    /// assert!(GameConfig::new(3, 1).is_err());
    /// ```
    pub fn new(hand_size: usize, max_suit: Suit) -> Result<Self, ConfigError> {
        if hand_size < 2 {
            return Err(ConfigError::HandTooSmall(hand_size));
        }
        let tile_count = (max_suit as usize + 1) * (max_suit as usize + 2) / 2;
        if NUMBER_OF_PLAYERS * hand_size > tile_count {
            return Err(ConfigError::NotEnoughTiles { hand_size, max_suit, tile_count });
        }

        let mut tiles = Vec::with_capacity(tile_count);
        let mut total_points = 0;
        for a in 0..=max_suit {
            for b in a..=max_suit {
                let tile = Tile::new(a, b);
                debug_assert_eq!(Tile::from_pairing_value(tile.pairing_value()), tile);
                total_points += tile.total();
                tiles.push(tile);
            }
        }
        let max_depth = hand_size + 2 * (hand_size - 1) + (hand_size - 2);

        Ok(Self { hand_size, max_suit, tiles, total_points, max_depth })
    }

    #[inline]
    pub fn hand_size(&self) -> usize { self.hand_size }

    #[inline]
    pub fn max_suit(&self) -> Suit { self.max_suit }

    /// The tile universe in lexicographic `(a, b)` order.
    #[inline]
    pub fn tiles(&self) -> &[Tile] { &self.tiles }

    #[inline]
    pub fn tile_count(&self) -> usize { self.tiles.len() }

    /// Sum of pip totals over the whole set.
    #[inline]
    pub fn total_points(&self) -> i32 { self.total_points }

    /// Upper sentinel: exceeds every achievable score.
    #[inline]
    pub fn pos_inf(&self) -> i32 { self.total_points + 1 }

    #[inline]
    pub fn neg_inf(&self) -> i32 { -self.pos_inf() }

    #[inline]
    pub fn max_depth(&self) -> usize { self.max_depth }

    /// Tiles on the layout when the first hand runs out.
    #[inline]
    pub fn max_played_tiles(&self) -> usize { NUMBER_OF_PLAYERS * self.hand_size - 1 }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new(DEFAULT_HAND_SIZE, DEFAULT_MAX_SUIT).expect("double-six defaults are valid")
    }
}

impl fmt::Display for GameConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Hand Size: {}", self.hand_size)?;
        writeln!(f, "Max Suit: {}", self.max_suit)?;
        writeln!(f, "Tiles: {}", self.tile_count())?;
        writeln!(f, "Total Points: {}", self.total_points)?;
        writeln!(f, "Infinity: {}", self.pos_inf())?;
        writeln!(f, "Max Depth: {}", self.max_depth)
    }
}
