use super::{row_to_y, Entity, Position, CANVAS_WIDTH, TILE_WIDTH};
use crate::engine::{Assets, Point, Renderer};
use rand::Rng;

const SPRITE_PATH: &str = "images/enemy-bug.png";

// Pixels per second. Every bug rolls its own speed so lanes stay uneven.
const MIN_SPEED: f32 = 100.0;
const MAX_SPEED: f32 = 400.0;

// How close (in pixels) an enemy's center must be to the player's center,
// on the same row, to count as a hit. Narrower than a tile so brushing the
// edge of a lane is survivable.
const COLLISION_SPAN: f32 = 70.0;

/// A bug crossing one lane. Spawns just outside the visible area and is
/// replaced (never reused) once it has crossed to the far side.
#[derive(Debug, Clone, PartialEq)]
pub struct Enemy {
    pub row: u8,
    /// Travels right-to-left when set.
    pub reversed: bool,
    pub x: f32,
    pub speed: f32,
}

impl Enemy {
    pub fn spawn(row: u8, reversed: bool, rng: &mut impl Rng) -> Self {
        Enemy {
            row,
            reversed,
            x: if reversed { CANVAS_WIDTH } else { -TILE_WIDTH },
            speed: rng.gen_range(MIN_SPEED..MAX_SPEED),
        }
    }

    /// Still within the band of the canvas where it can be drawn. Off-screen
    /// enemies are retired and replaced by the world update.
    pub fn is_available(&self) -> bool {
        self.x >= -TILE_WIDTH && self.x <= CANVAS_WIDTH
    }

    pub fn collides_with(&self, position: Position) -> bool {
        self.row == position.row && (self.x - position.x).abs() < COLLISION_SPAN
    }
}

impl Entity for Enemy {
    fn update(&mut self, dt: f32) {
        if self.reversed {
            self.x -= self.speed * dt;
        } else {
            self.x += self.speed * dt;
        }
    }

    fn draw(&self, renderer: &Renderer, assets: &Assets) {
        let position = Point {
            x: self.x,
            y: row_to_y(self.row),
        };
        let image = assets.get(SPRITE_PATH);
        if self.reversed {
            renderer.draw_image_flipped(image, &position);
        } else {
            renderer.draw_image(image, &position);
        }
    }
}
