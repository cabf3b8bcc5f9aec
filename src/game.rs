use crate::browser;
use crate::engine::input::FrameInput;
use crate::engine::{Assets, Game, Point, Rect, Renderer, Size, TextStyle};
use crate::entity::{
    Direction, Entity, Skin, CANVAS_HEIGHT, CANVAS_WIDTH, NUM_COLS, TILE_HEIGHT, TILE_WIDTH,
};
use crate::world::{Levels, World};
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use futures::join;
use rand::rngs::ThreadRng;

const LEVELS_PATH: &str = "levels.json";

const ASSET_PATHS: &[&str] = &[
    "images/water-block.png",
    "images/grass-block.png",
    "images/stone-block.png",
    "images/enemy-bug.png",
    "images/char-boy.png",
    "images/char-cat-girl.png",
    "images/char-horn-girl.png",
    "images/char-pink-girl.png",
    "images/char-princess-girl.png",
    "images/gem-blue.png",
    "images/gem-green.png",
    "images/gem-orange.png",
];

// Background art per grid row: water bank on top, grass to cross onto,
// stone lanes at the bottom half.
const ROW_IMAGES: [&str; 8] = [
    "images/water-block.png",
    "images/grass-block.png",
    "images/grass-block.png",
    "images/grass-block.png",
    "images/stone-block.png",
    "images/stone-block.png",
    "images/stone-block.png",
    "images/stone-block.png",
];

const SCORE_BAR_HEIGHT: f32 = 50.0;
const SCORE_FONT: &str = "bold 36px Impact";
const WIN_FONT: &str = "bold 128px Impact";

pub enum GemCrossing {
    /// Waiting on images and the level table.
    Loading,
    /// Running session with every asset in hand.
    Loaded(Crossing),
}

pub struct Crossing {
    world: World,
    assets: Assets,
    rng: ThreadRng,
}

impl GemCrossing {
    pub fn new() -> Self {
        GemCrossing::Loading
    }

    async fn load_levels() -> Result<Levels> {
        browser::fetch_json::<Levels>(LEVELS_PATH)
            .await
            .with_context(|| format!("Failed to load level table from : {}", LEVELS_PATH))
    }
}

impl Default for GemCrossing {
    fn default() -> Self {
        GemCrossing::new()
    }
}

#[async_trait(?Send)]
impl Game for GemCrossing {
    async fn initialize(&self) -> Result<Box<dyn Game>> {
        match self {
            GemCrossing::Loading => {
                // Images and config are independent, so fetch them together;
                // total wait is whichever arrives last.
                let (levels_result, assets_result) =
                    join!(Self::load_levels(), Assets::load(ASSET_PATHS));
                let assets = assets_result.context("Failed to preload image assets")?;
                // A missing level table is survivable, a missing sprite is not.
                let levels = levels_result.unwrap_or_else(|err| {
                    log!(
                        "Could not fetch {} ({:#?}), falling back to the built-in level table",
                        LEVELS_PATH,
                        err
                    );
                    Levels::default_set()
                });
                let mut rng = rand::thread_rng();
                let world = World::new(levels, Skin::Boy, &mut rng);
                Ok(Box::new(GemCrossing::Loaded(Crossing {
                    world,
                    assets,
                    rng,
                })))
            }
            GemCrossing::Loaded(_) => Err(anyhow!("Game is already initialized")),
        }
    }

    fn update(&mut self, dt: f32, input: &FrameInput) {
        if let GemCrossing::Loaded(crossing) = self {
            crossing.handle_input(input);
            crossing.world.update(dt, &mut crossing.rng);
        }
    }

    fn draw(&self, renderer: &Renderer) {
        if let GemCrossing::Loaded(crossing) = self {
            crossing.draw(renderer);
        }
    }
}

impl Crossing {
    /// Session controls live here, outside the per-frame simulation:
    /// digit keys pick a level, R restarts, C cycles the character skin,
    /// arrows step the player (locked out once the goal bank is reached).
    fn handle_input(&mut self, input: &FrameInput) {
        for level in 0..self.world.level_count() {
            if input.is_pressed(&format!("Digit{}", level + 1)) {
                self.world.change_level(level, &mut self.rng);
            }
        }
        if input.is_pressed("KeyR") {
            self.world.reset(&mut self.rng);
        }
        if input.is_pressed("KeyC") {
            self.world.player.skin = self.world.player.skin.next();
        }

        if self.world.winning {
            return;
        }
        if input.is_pressed("ArrowUp") {
            self.world.player.step(Direction::Up);
        }
        if input.is_pressed("ArrowDown") {
            self.world.player.step(Direction::Down);
        }
        if input.is_pressed("ArrowLeft") {
            self.world.player.step(Direction::Left);
        }
        if input.is_pressed("ArrowRight") {
            self.world.player.step(Direction::Right);
        }
    }

    fn draw(&self, renderer: &Renderer) {
        renderer.clear(&Rect {
            position: Point { x: 0.0, y: 0.0 },
            size: Size {
                width: CANVAS_WIDTH,
                height: CANVAS_HEIGHT,
            },
        });
        // Draw order matters : tiles -> score bar -> entities -> overlay
        self.draw_tiles(renderer);
        self.draw_score_bar(renderer);
        for entity in self.world.entities() {
            entity.draw(renderer, &self.assets);
        }
        if self.world.winning {
            self.draw_win_message(renderer);
        }
    }

    fn draw_tiles(&self, renderer: &Renderer) {
        for (row, image) in ROW_IMAGES.iter().enumerate() {
            for col in 0..NUM_COLS {
                renderer.draw_image(
                    self.assets.get(image),
                    &Point {
                        x: col as f32 * TILE_WIDTH,
                        y: row as f32 * TILE_HEIGHT,
                    },
                );
            }
        }
    }

    fn draw_score_bar(&self, renderer: &Renderer) {
        renderer.fill_rect(
            &Rect {
                position: Point { x: 0.0, y: 0.0 },
                size: Size {
                    width: CANVAS_WIDTH,
                    height: SCORE_BAR_HEIGHT,
                },
            },
            "#FFF",
        );
        renderer.draw_text(
            &format!("SCORE: {}", self.world.score),
            &Point { x: 0.0, y: 0.0 },
            &TextStyle {
                font: SCORE_FONT,
                align: "left",
                baseline: "top",
                fill: "#000",
                stroke: None,
            },
        );
        renderer.draw_text(
            &format!("HIGH SCORE: {}", self.world.high_score),
            &Point {
                x: CANVAS_WIDTH,
                y: 0.0,
            },
            &TextStyle {
                font: SCORE_FONT,
                align: "right",
                baseline: "top",
                fill: "#000",
                stroke: None,
            },
        );
    }

    fn draw_win_message(&self, renderer: &Renderer) {
        renderer.draw_text(
            "YOU WIN!!!",
            &Point {
                x: CANVAS_WIDTH / 2.0,
                y: CANVAS_HEIGHT / 2.0,
            },
            &TextStyle {
                font: WIN_FONT,
                align: "center",
                baseline: "middle",
                fill: "#FFF",
                stroke: Some("gold"),
            },
        );
    }
}
