// src/bag.rs
use std::collections::BTreeSet;

use rand::prelude::*;
use rand_xorshift::XorShiftRng;

use crate::tile::Tile;

/// Number of wildcards in the standard inventory
pub const STANDARD_WILDCARDS: usize = 2;

// (face, extra glyphs the tile may stand for, points, copies)
const STANDARD_INVENTORY: [(&str, &str, u32, usize); 46] = [
    ("あ", "ぁ", 1, 4),
    ("い", "ぃ", 1, 5),
    ("う", "ぅゔ", 1, 4),
    ("え", "ぇ", 2, 2),
    ("お", "ぉ", 1, 3),
    ("か", "が", 1, 4),
    ("き", "ぎ", 2, 3),
    ("く", "ぐ", 2, 3),
    ("け", "げ", 3, 2),
    ("こ", "ご", 2, 3),
    ("さ", "ざ", 2, 2),
    ("し", "じ", 1, 4),
    ("す", "ず", 2, 3),
    ("せ", "ぜ", 3, 2),
    ("そ", "ぞ", 3, 2),
    ("た", "だ", 1, 3),
    ("ち", "ぢ", 3, 2),
    ("つ", "っづ", 2, 3),
    ("て", "で", 2, 3),
    ("と", "ど", 1, 3),
    ("な", "", 2, 2),
    ("に", "", 2, 2),
    ("ぬ", "", 5, 1),
    ("ね", "", 4, 1),
    ("の", "", 1, 3),
    ("は", "ばぱ", 2, 2),
    ("ひ", "びぴ", 4, 1),
    ("ふ", "ぶぷ", 3, 1),
    ("へ", "べぺ", 4, 1),
    ("ほ", "ぼぽ", 4, 1),
    ("ま", "", 3, 1),
    ("み", "", 3, 1),
    ("む", "", 5, 1),
    ("め", "", 5, 1),
    ("も", "", 3, 1),
    ("や", "ゃ", 3, 1),
    ("ゆ", "ゅ", 4, 1),
    ("よ", "ょ", 3, 1),
    ("ら", "", 3, 1),
    ("り", "", 2, 2),
    ("る", "", 2, 2),
    ("れ", "", 3, 1),
    ("ろ", "", 5, 1),
    ("わ", "", 4, 1),
    ("を", "", 5, 1),
    ("ん", "", 1, 2),
];

/// Every glyph a tile of the standard inventory can represent
pub fn standard_alphabet() -> BTreeSet<char> {
    STANDARD_INVENTORY
        .iter()
        .flat_map(|(face, variants, _, _)| face.chars().chain(variants.chars()))
        .collect()
}

/// The full standard tile set, wildcards included, in a fixed order
pub fn standard_tiles() -> Vec<Tile> {
    let alphabet = standard_alphabet();
    STANDARD_INVENTORY
        .iter()
        .flat_map(|&(face, variants, points, copies)| {
            std::iter::repeat_with(move || Tile::plain(face, variants, points)).take(copies)
        })
        .chain(std::iter::repeat_with(|| Tile::wildcard(&alphabet)).take(STANDARD_WILDCARDS))
        .collect()
}

/// The undrawn reserve. Drained by draws and never refilled.
#[derive(Debug, Clone)]
pub struct TileBag {
    tiles: Vec<Tile>,
    rng: XorShiftRng,
}

impl TileBag {
    /// A bag holding `tiles`, shuffled deterministically from `seed` when one is given
    pub fn new(tiles: Vec<Tile>, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => XorShiftRng::seed_from_u64(seed),
            None => XorShiftRng::from_entropy(),
        };
        Self { tiles, rng }
    }

    pub fn standard(seed: Option<u64>) -> Self {
        Self::new(standard_tiles(), seed)
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Shuffle, then hand out up to `count` tiles from the front.
    ///
    /// Returns fewer than `count` once the bag runs low.
    pub fn draw(&mut self, count: usize) -> Vec<Tile> {
        self.tiles.shuffle(&mut self.rng);
        let count = count.min(self.tiles.len());
        self.tiles.drain(..count).collect()
    }
}
