use rand::seq::SliceRandom;
use rand::Rng;

use crate::combinations::{n_choose_k, nth_combination};
use crate::config::GameConfig;
use crate::state::Player;
use crate::tile::Tile;

/// One concrete deal plus the public knowledge each side has about the other.
///
/// `possible_max_tiles` is the set max could still be holding as far as min
/// can tell (everything except min's own hand), and vice versa. Both pools
/// shrink during determinized play as tiles are played or passes reveal
/// missing suits.
#[derive(Debug, Clone)]
pub struct Game<'c> {
    pub config: &'c GameConfig,
    pub max_hand: Vec<Tile>,
    pub min_hand: Vec<Tile>,
    pub possible_max_tiles: Vec<Tile>,
    pub possible_min_tiles: Vec<Tile>,
}

impl<'c> Game<'c> {
    /// Shuffle the universe and deal two hands from the front of it.
    ///
    /// ```
    /// use dominoes_search::config::GameConfig;
    /// use dominoes_search::game::Game;
    /// use rand::{rngs::StdRng, SeedableRng};
    /// let cfg = GameConfig::default();
    /// let mut rng = StdRng::seed_from_u64(42);
    /// let game = Game::random_deal(&cfg, &mut rng);
    /// assert_eq!(game.max_hand.len(), 7);
    /// assert_eq!(game.possible_min_tiles.len(), 21);
    /// ```
    pub fn random_deal<R: Rng + ?Sized>(config: &'c GameConfig, rng: &mut R) -> Self {
        let mut shuffled = config.tiles().to_vec();
        shuffled.shuffle(rng);
        let hand_size = config.hand_size();
        let max_hand = shuffled[..hand_size].to_vec();
        let min_hand = shuffled[hand_size..2 * hand_size].to_vec();
        Self::with_pools(config, max_hand, min_hand, &shuffled)
    }

    /// Give max the `hand_index`-th hand in lexicographic combination order of
    /// the universe, then deal min from a shuffle of the rest.
    ///
    /// `hand_index` is clamped into `[0, C(tiles, hand_size) - 1]`.
    pub fn with_max_hand_index<R: Rng + ?Sized>(config: &'c GameConfig, hand_index: u128, rng: &mut R) -> Self {
        let n = config.tile_count();
        let k = config.hand_size();
        let last = n_choose_k(n, k).map(|c| c.saturating_sub(1)).unwrap_or(u128::MAX);
        let picked = nth_combination(n, k, hand_index.min(last));

        let universe = config.tiles();
        let max_hand: Vec<Tile> = picked.iter().map(|&i| universe[i]).collect();
        let mut rest: Vec<Tile> = universe
            .iter()
            .enumerate()
            .filter(|(i, _)| picked.binary_search(i).is_err())
            .map(|(_, &t)| t)
            .collect();
        rest.shuffle(rng);
        let min_hand = rest[..k].to_vec();

        let mut order = max_hand.clone();
        order.extend_from_slice(&rest);
        Self::with_pools(config, max_hand, min_hand, &order)
    }

    /// Deterministic deal from explicit hands (pools derived as for a random deal).
    pub fn from_hands(config: &'c GameConfig, max_hand: Vec<Tile>, min_hand: Vec<Tile>) -> Self {
        let order = config.tiles().to_vec();
        Self::with_pools(config, max_hand, min_hand, &order)
    }

    fn with_pools(config: &'c GameConfig, max_hand: Vec<Tile>, min_hand: Vec<Tile>, order: &[Tile]) -> Self {
        let possible_max_tiles = order.iter().copied().filter(|t| !min_hand.contains(t)).collect();
        let possible_min_tiles = order.iter().copied().filter(|t| !max_hand.contains(t)).collect();
        Self { config, max_hand, min_hand, possible_max_tiles, possible_min_tiles }
    }

    /// Tiles `player` might hold, as seen by their opponent.
    #[inline]
    pub fn possible_tiles(&self, player: Player) -> &[Tile] {
        match player {
            Player::Max => &self.possible_max_tiles,
            Player::Min => &self.possible_min_tiles,
        }
    }

    #[inline]
    pub fn possible_tiles_mut(&mut self, player: Player) -> &mut Vec<Tile> {
        match player {
            Player::Max => &mut self.possible_max_tiles,
            Player::Min => &mut self.possible_min_tiles,
        }
    }

    /// `player` laid `tile`; it is public now. Returns whether it was pooled.
    pub fn record_play(&mut self, player: Player, tile: Tile) -> bool {
        let pool = self.possible_tiles_mut(player);
        match pool.iter().position(|&t| t == tile) {
            Some(i) => {
                pool.remove(i);
                true
            }
            None => false,
        }
    }

    /// `player` passed with `ends` open, so holds no tile carrying either suit.
    pub fn record_pass(&mut self, player: Player, ends: (u8, u8)) {
        self.possible_tiles_mut(player)
            .retain(|t| !t.has_suit(ends.0) && !t.has_suit(ends.1));
    }
}
