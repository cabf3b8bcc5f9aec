use super::{row_to_y, Entity, Position, TILE_WIDTH};
use crate::engine::{Assets, Point, Renderer};
use rand::Rng;

// Respawn buckets. These are tuned to lane placement: gems never land on the
// water row, the goal-adjacent grass row, or the player's starting row, and
// never in the outermost columns.
const GEM_COLS: std::ops::Range<u8> = 1..6;
const GEM_ROWS: std::ops::Range<u8> = 2..7;
const GEM_KINDS: std::ops::Range<u8> = 1..4;

// A pickup registers when the player's center is within half a tile.
const PICKUP_SPAN: f32 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GemKind {
    Blue,
    Green,
    Orange,
}

impl GemKind {
    fn from_index(index: u8) -> Self {
        match index {
            1 => GemKind::Blue,
            2 => GemKind::Green,
            _ => GemKind::Orange,
        }
    }

    pub fn score(&self) -> u32 {
        match self {
            GemKind::Blue => 500,
            GemKind::Green => 250,
            GemKind::Orange => 100,
        }
    }

    pub fn sprite_path(&self) -> &'static str {
        match self {
            GemKind::Blue => "images/gem-blue.png",
            GemKind::Green => "images/gem-green.png",
            GemKind::Orange => "images/gem-orange.png",
        }
    }
}

/// The single collectible on the board. Collecting it replaces it with a
/// fresh random draw, so exactly one gem exists at any time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Gem {
    pub col: u8,
    pub row: u8,
    pub kind: GemKind,
}

impl Gem {
    pub fn random(rng: &mut impl Rng) -> Self {
        Gem {
            col: rng.gen_range(GEM_COLS),
            row: rng.gen_range(GEM_ROWS),
            kind: GemKind::from_index(rng.gen_range(GEM_KINDS)),
        }
    }

    pub fn x(&self) -> f32 {
        self.col as f32 * TILE_WIDTH
    }

    pub fn score(&self) -> u32 {
        self.kind.score()
    }

    pub fn collides_with(&self, position: Position) -> bool {
        self.row == position.row && (self.x() - position.x).abs() < PICKUP_SPAN
    }
}

impl Entity for Gem {
    // Gems sit still between pickups; the default no-op update stands.

    fn draw(&self, renderer: &Renderer, assets: &Assets) {
        renderer.draw_image(
            assets.get(self.kind.sprite_path()),
            &Point {
                x: self.x(),
                y: row_to_y(self.row),
            },
        );
    }
}
