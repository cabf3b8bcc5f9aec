use super::{row_to_y, Entity, Position, NUM_COLS, NUM_ROWS, TILE_WIDTH};
use crate::engine::{Assets, Point, Renderer};

// Fraction of the remaining distance covered per second while gliding
// toward the target column.
const GLIDE_RATE: f32 = 12.0;
const GLIDE_SNAP: f32 = 0.5;

const START_COL: u8 = 2;
const START_ROW: u8 = NUM_ROWS - 1;

#[derive(Debug, Clone, Copy)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// Selectable player sprite. Purely cosmetic; survives resets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Skin {
    Boy,
    CatGirl,
    HornGirl,
    PinkGirl,
    Princess,
}

impl Skin {
    pub fn sprite_path(&self) -> &'static str {
        match self {
            Skin::Boy => "images/char-boy.png",
            Skin::CatGirl => "images/char-cat-girl.png",
            Skin::HornGirl => "images/char-horn-girl.png",
            Skin::PinkGirl => "images/char-pink-girl.png",
            Skin::Princess => "images/char-princess-girl.png",
        }
    }

    pub fn next(&self) -> Skin {
        match self {
            Skin::Boy => Skin::CatGirl,
            Skin::CatGirl => Skin::HornGirl,
            Skin::HornGirl => Skin::PinkGirl,
            Skin::PinkGirl => Skin::Princess,
            Skin::Princess => Skin::Boy,
        }
    }
}

/// The crossing character. Lives on the grid (col, row); the drawn x glides
/// toward the current column so steps read as movement instead of teleports.
/// Row changes snap immediately, which keeps lane collisions honest.
#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    pub col: u8,
    pub row: u8,
    pub skin: Skin,
    pub x: f32,
}

impl Player {
    pub fn new(skin: Skin) -> Self {
        Player::at(START_COL, START_ROW, skin)
    }

    pub fn at(col: u8, row: u8, skin: Skin) -> Self {
        Player {
            col,
            row,
            skin,
            x: col as f32 * TILE_WIDTH,
        }
    }

    pub fn position(&self) -> Position {
        Position {
            x: self.x,
            row: self.row,
        }
    }

    /// One tile in the given direction, clamped to the grid.
    pub fn step(&mut self, direction: Direction) {
        match direction {
            Direction::Up => self.row = self.row.saturating_sub(1),
            Direction::Down => self.row = (self.row + 1).min(NUM_ROWS - 1),
            Direction::Left => self.col = self.col.saturating_sub(1),
            Direction::Right => self.col = (self.col + 1).min(NUM_COLS - 1),
        }
    }

    /// Top row is the goal bank.
    pub fn reached_goal(&self) -> bool {
        self.row == 0
    }
}

impl Entity for Player {
    fn update(&mut self, dt: f32) {
        let target = self.col as f32 * TILE_WIDTH;
        let delta = target - self.x;
        if delta.abs() <= GLIDE_SNAP {
            self.x = target;
        } else {
            self.x += delta * (GLIDE_RATE * dt).min(1.0);
        }
    }

    fn draw(&self, renderer: &Renderer, assets: &Assets) {
        renderer.draw_image(
            assets.get(self.skin.sprite_path()),
            &Point {
                x: self.x,
                y: row_to_y(self.row),
            },
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn steps_are_clamped_to_the_grid() {
        let mut player = Player::at(0, 0, Skin::Boy);
        player.step(Direction::Up);
        player.step(Direction::Left);
        assert_eq!((player.col, player.row), (0, 0));

        let mut player = Player::at(NUM_COLS - 1, NUM_ROWS - 1, Skin::Boy);
        player.step(Direction::Down);
        player.step(Direction::Right);
        assert_eq!((player.col, player.row), (NUM_COLS - 1, NUM_ROWS - 1));
    }

    #[test]
    fn glides_toward_the_target_column() {
        let mut player = Player::new(Skin::Boy);
        let origin = player.x;
        player.step(Direction::Right);
        assert_relative_eq!(player.x, origin); // step itself does not move x

        player.update(0.016);
        assert!(player.x > origin);
        assert!(player.x < (player.col as f32) * TILE_WIDTH);

        // a full second of gliding saturates onto the target tile
        player.update(1.0);
        player.update(1.0);
        assert_relative_eq!(player.x, player.col as f32 * TILE_WIDTH);
    }

    #[test]
    fn goal_is_the_top_row() {
        let mut player = Player::at(3, 1, Skin::Princess);
        assert!(!player.reached_goal());
        player.step(Direction::Up);
        assert!(player.reached_goal());
    }
}
