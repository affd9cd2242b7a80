use std::fmt;

/// Suit (pip) value on one half of a tile.
pub type Suit = u8;

/// A single domino: an unordered pair of suits.
///
/// The configuration's universe stores tiles with `a <= b`; everything else
/// holds copies of those values, so equality is structural.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Tile {
    pub a: Suit,
    pub b: Suit,
}

impl Tile {
    /// Construct a tile from its two suits (order preserved).
    #[inline]
    pub const fn new(a: Suit, b: Suit) -> Self { Tile { a, b } }

    /// Pip total of the tile, `a + b`.
    ///
    /// ```
    /// use dominoes_search::tile::Tile;
    /// assert_eq!(Tile::new(2, 5).total(), 7);
    /// ```
    #[inline]
    pub fn total(self) -> i32 { self.a as i32 + self.b as i32 }

    /// The smaller of the two suits.
    #[inline]
    pub fn smaller_suit(self) -> Suit { self.a.min(self.b) }

    #[inline]
    pub fn has_suit(self, suit: Suit) -> bool { self.a == suit || self.b == suit }

    /// The suit left exposed after attaching this tile to `suit`.
    ///
    /// Returns `None` when the tile does not carry `suit` at all.
    #[inline]
    pub fn other_end(self, suit: Suit) -> Option<Suit> {
        if self.a == suit {
            Some(self.b)
        } else if self.b == suit {
            Some(self.a)
        } else {
            None
        }
    }

    /// Cantor pairing of `(a, b)`.
    ///
    /// ```
    /// use dominoes_search::tile::Tile;
    /// let t = Tile::new(3, 4);
    /// assert_eq!(Tile::from_pairing_value(t.pairing_value()), t);
    /// ```
    #[inline]
    pub fn pairing_value(self) -> u32 {
        let (x, y) = (self.a as u32, self.b as u32);
        ((x + y) * (x + y + 1)) / 2 + y
    }

    /// Inverse of [`Self::pairing_value`].
    pub fn from_pairing_value(z: u32) -> Self {
        // float estimate of the diagonal, nudged until exact
        let mut w = (((8.0 * z as f64 + 1.0).sqrt() - 1.0) / 2.0).floor() as u32;
        while (w + 1) * (w + 2) / 2 <= z { w += 1; }
        while w * (w + 1) / 2 > z { w -= 1; }
        let t = (w * w + w) / 2;
        let y = z - t;
        let x = w - y;
        Tile { a: x as Suit, b: y as Suit }
    }
}

impl fmt::Debug for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tile({}, {})", self.a, self.b)
    }
}

impl fmt::Display for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.a, self.b)
    }
}

/// Sum of pip totals over a set of tiles.
pub fn pip_total(tiles: &[Tile]) -> i32 { tiles.iter().map(|t| t.total()).sum() }

/// Lowest-value tile of a hand; the first one seen wins ties.
pub fn smallest_tile(tiles: &[Tile]) -> Option<Tile> {
    let mut best: Option<Tile> = None;
    for &t in tiles {
        match best {
            Some(b) if t.total() >= b.total() => {}
            _ => best = Some(t),
        }
    }
    best
}

/// Render a hand as space-separated tiles.
pub(crate) fn format_tiles(tiles: &[Tile]) -> String {
    tiles.iter().map(|t| t.to_string()).collect::<Vec<_>>().join(" ")
}
