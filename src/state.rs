use std::fmt;

use crate::config::GameConfig;
use crate::game::Game;
use crate::tile::{format_tiles, pip_total, smallest_tile, Suit, Tile};

/// Side to move. Max moves first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Player {
    Max,
    Min,
}

impl Player {
    #[inline]
    pub fn opponent(self) -> Player {
        match self {
            Player::Max => Player::Min,
            Player::Min => Player::Max,
        }
    }

    /// Worst value for this player, used to seed an unresolved node.
    #[inline]
    pub fn sentinel(self, config: &GameConfig) -> i32 {
        match self {
            Player::Max => config.neg_inf(),
            Player::Min => config.pos_inf(),
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Player::Max => write!(f, "Max Player"),
            Player::Min => write!(f, "Min Player"),
        }
    }
}

/// Which open end of the layout a tile attaches to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum End {
    First,
    Second,
}

/// A single ply. The opening play always uses [`End::First`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Move {
    Play { tile: Tile, end: End },
    Pass,
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Move::Play { tile, end: End::First } => write!(f, "play {} on first end", tile),
            Move::Play { tile, end: End::Second } => write!(f, "play {} on second end", tile),
            Move::Pass => write!(f, "pass"),
        }
    }
}

/// Result of scoring a state.
///
/// Keeps "not finished" apart from every real score, so an extreme real value
/// can never be mistaken for a non-terminal position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Evaluation {
    Terminal(i32),
    Unresolved,
}

impl Evaluation {
    #[inline]
    pub fn is_terminal(self) -> bool { matches!(self, Evaluation::Terminal(_)) }

    /// Numeric leaf value; an unresolved state counts as `fallback`.
    #[inline]
    pub fn value_or(self, fallback: i32) -> i32 {
        match self {
            Evaluation::Terminal(v) => v,
            Evaluation::Unresolved => fallback,
        }
    }
}

/// A position in the search tree.
///
/// Topology (parent/children) lives in [`crate::tree::GameTree`]; this struct
/// is the per-node payload and is what path snapshots hold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    pub max_hand: Vec<Tile>,
    pub min_hand: Vec<Tile>,
    pub played_tiles: Vec<Tile>,
    pub turn: Player,
    /// Open suits at both ends of the chain; `None` before the first play.
    pub layout_ends: Option<(Suit, Suit)>,
    pub depth: usize,
    /// Best value found so far, or the mover's sentinel while unresolved.
    pub evaluation: i32,
    pub previous_player_passed: bool,
    pub jammed: bool,
    /// Move that produced this state from its parent.
    pub last_move: Option<Move>,
}

impl GameState {
    /// Root state of a deal: both hands known, max to move.
    ///
    /// ```
    /// use dominoes_search::config::GameConfig;
    /// use dominoes_search::game::Game;
    /// use dominoes_search::state::{GameState, Player};
    /// use rand::{rngs::StdRng, SeedableRng};
    /// let cfg = GameConfig::default();
    /// let game = Game::random_deal(&cfg, &mut StdRng::seed_from_u64(5));
    /// let root = GameState::initial(&game);
    /// assert_eq!(root.turn, Player::Max);
    /// assert_eq!(root.evaluation, cfg.neg_inf());
    /// assert_eq!(root.legal_moves().len(), 7);
    /// ```
    pub fn initial(game: &Game<'_>) -> Self {
        Self {
            max_hand: game.max_hand.clone(),
            min_hand: game.min_hand.clone(),
            played_tiles: Vec::new(),
            turn: Player::Max,
            layout_ends: None,
            depth: 0,
            evaluation: Player::Max.sentinel(game.config),
            previous_player_passed: false,
            jammed: false,
            last_move: None,
        }
    }

    #[inline]
    pub fn is_max_player(&self) -> bool { self.turn == Player::Max }

    #[inline]
    pub fn hand(&self, player: Player) -> &[Tile] {
        match player {
            Player::Max => &self.max_hand,
            Player::Min => &self.min_hand,
        }
    }

    #[inline]
    pub fn hand_mut(&mut self, player: Player) -> &mut Vec<Tile> {
        match player {
            Player::Max => &mut self.max_hand,
            Player::Min => &mut self.min_hand,
        }
    }

    /// All moves for the side to move, in canonical child order.
    ///
    /// Empty layout: one move per tile. Otherwise, per tile in hand order, a
    /// move for each open end it matches; when both ends show the same suit a
    /// matching tile yields a single move. No legal play yields `[Pass]`.
    pub fn legal_moves(&self) -> Vec<Move> {
        let hand = self.hand(self.turn);
        let mut moves = Vec::with_capacity(hand.len() * 2);
        match self.layout_ends {
            None => {
                moves.extend(hand.iter().map(|&tile| Move::Play { tile, end: End::First }));
            }
            Some((first, second)) => {
                for &tile in hand {
                    if first == second {
                        if tile.has_suit(first) {
                            moves.push(Move::Play { tile, end: End::First });
                        }
                    } else {
                        if tile.has_suit(first) {
                            moves.push(Move::Play { tile, end: End::First });
                        }
                        if tile.has_suit(second) {
                            moves.push(Move::Play { tile, end: End::Second });
                        }
                    }
                }
            }
        }
        if moves.is_empty() {
            moves.push(Move::Pass);
        }
        moves
    }

    /// The child reached by `mv`: turn flips, depth grows by one and the
    /// evaluation resets to the new mover's sentinel.
    ///
    /// A pass right after a pass marks the child jammed.
    pub fn apply(&self, mv: Move, config: &GameConfig) -> GameState {
        let mut child = GameState {
            max_hand: self.max_hand.clone(),
            min_hand: self.min_hand.clone(),
            played_tiles: self.played_tiles.clone(),
            turn: self.turn.opponent(),
            layout_ends: self.layout_ends,
            depth: self.depth + 1,
            evaluation: self.turn.opponent().sentinel(config),
            previous_player_passed: false,
            jammed: false,
            last_move: Some(mv),
        };
        match mv {
            Move::Pass => {
                child.previous_player_passed = true;
                child.jammed = self.previous_player_passed;
            }
            Move::Play { tile, end } => {
                child.played_tiles.push(tile);
                child.layout_ends = Some(attach(self.layout_ends, tile, end));
                let hand = child.hand_mut(self.turn);
                let held = hand.iter().position(|&t| t == tile);
                debug_assert!(held.is_some(), "{} played {} without holding it", self.turn, tile);
                if let Some(i) = held {
                    hand.remove(i);
                }
                debug_assert!(child.played_tiles.len() <= config.max_played_tiles());
            }
        }
        child
    }

    /// Score this state from max's point of view.
    ///
    /// - A player out of tiles wins the other hand's pips (positive when max
    ///   went out, negative when min did).
    /// - A jammed game goes to the lighter hand, then the lighter smallest
    ///   tile, then the smaller suit on that tile; anything left over counts
    ///   for min. A win on the smaller suit is worth only min's smallest tile.
    pub fn evaluate(&self) -> Evaluation {
        let max_left = self.max_hand.len();
        let min_left = self.min_hand.len();
        if max_left == 0 && min_left > 0 {
            return Evaluation::Terminal(pip_total(&self.min_hand));
        }
        if min_left == 0 && max_left > 0 {
            return Evaluation::Terminal(-pip_total(&self.max_hand));
        }
        if self.jammed {
            return Evaluation::Terminal(self.jam_score());
        }
        Evaluation::Unresolved
    }

    #[inline]
    pub fn is_terminal(&self) -> bool { self.evaluate().is_terminal() }

    fn jam_score(&self) -> i32 {
        let max_total = pip_total(&self.max_hand);
        let min_total = pip_total(&self.min_hand);
        let max_wins = min_total;
        let min_wins = -max_total;

        if max_total != min_total {
            return if max_total < min_total { max_wins } else { min_wins };
        }

        let (Some(max_small), Some(min_small)) = (smallest_tile(&self.max_hand), smallest_tile(&self.min_hand)) else {
            return min_wins;
        };
        if max_small.total() != min_small.total() {
            return if max_small.total() < min_small.total() { max_wins } else { min_wins };
        }
        if max_small.smaller_suit() < min_small.smaller_suit() {
            return min_small.total();
        }
        min_wins
    }
}

/// New layout ends after laying `tile` against `end`.
fn attach(ends: Option<(Suit, Suit)>, tile: Tile, end: End) -> (Suit, Suit) {
    match ends {
        None => (tile.a, tile.b),
        Some((first, second)) => match end {
            End::First => (tile.other_end(first).unwrap_or(first), second),
            End::Second => (first, tile.other_end(second).unwrap_or(second)),
        },
    }
}

impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Depth: {}", self.depth)?;
        writeln!(f, "Player Turn: {}", self.turn)?;
        writeln!(f, "Max Hand: {}", format_tiles(&self.max_hand))?;
        writeln!(f, "Min Hand: {}", format_tiles(&self.min_hand))?;
        writeln!(f, "Played Tiles: {}", format_tiles(&self.played_tiles))?;
        match self.layout_ends {
            Some((a, b)) => writeln!(f, "Layout Ends: {}, {}", a, b)?,
            None => writeln!(f, "Layout Ends: -")?,
        }
        writeln!(f, "Previous Player Passed: {}", self.previous_player_passed)?;
        writeln!(f, "Jammed: {}", self.jammed)?;
        writeln!(f, "Minimax Score: {}", self.evaluation)
    }
}
