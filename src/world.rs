use crate::entity::{Enemy, Entity, Gem, Player, Skin, NUM_ROWS};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::iter;

// Enemies may spawn on any lane between the water row and the starting row.
const ENEMY_SPAWN_ROWS: std::ops::Range<u8> = 1..NUM_ROWS - 1;

/// Per-level tuning: how crowded the lanes are and whether they run both ways.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct LevelConfig {
    pub enemy_count: usize,
    pub enemy_two_direction: bool,
}

/// The static level table. Normally fetched from `levels.json`; the built-in
/// set doubles as the fetch fallback and the test fixture.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Levels {
    levels: Vec<LevelConfig>,
}

impl Levels {
    pub fn new(levels: Vec<LevelConfig>) -> Self {
        assert!(!levels.is_empty(), "at least one level is required");
        Levels { levels }
    }

    pub fn default_set() -> Self {
        Levels::new(vec![
            LevelConfig {
                enemy_count: 3,
                enemy_two_direction: false,
            },
            LevelConfig {
                enemy_count: 4,
                enemy_two_direction: true,
            },
            LevelConfig {
                enemy_count: 6,
                enemy_two_direction: true,
            },
        ])
    }

    pub fn get(&self, level: usize) -> &LevelConfig {
        &self.levels[level.min(self.levels.len() - 1)]
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }
}

/// One game session: every piece of state the loop mutates frame to frame.
/// The loop shell owns exactly one of these and threads it through
/// `update`/`draw`, so nothing lives in globals and tests can drive frames
/// with a fixed `dt` and a seeded RNG.
#[derive(Debug, Clone)]
pub struct World {
    levels: Levels,
    pub level: usize,
    pub enemies: Vec<Enemy>,
    pub player: Player,
    pub gem: Gem,
    pub score: u32,
    pub high_score: u32,
    pub winning: bool,
    /// Alternates the direction of successive spawns on two-direction levels.
    /// Deliberately survives resets and level changes.
    lane_toggle: bool,
}

impl World {
    pub fn new(levels: Levels, skin: Skin, rng: &mut impl Rng) -> Self {
        World {
            levels,
            level: 0,
            enemies: Vec::new(),
            player: Player::new(skin),
            gem: Gem::random(rng),
            score: 0,
            high_score: 0,
            winning: false,
            lane_toggle: false,
        }
    }

    /// Full soft reset: fresh enemies, gem, player and a zeroed score. The
    /// level, skin and high score carry over.
    pub fn reset(&mut self, rng: &mut impl Rng) {
        self.enemies = Vec::new();
        self.winning = false;
        self.score = 0;
        self.gem = Gem::random(rng);
        self.player = Player::new(self.player.skin);
    }

    pub fn change_level(&mut self, level: usize, rng: &mut impl Rng) {
        if level < self.levels.len() {
            self.level = level;
            self.reset(rng);
        }
    }

    pub fn level_count(&self) -> usize {
        self.levels.len()
    }

    pub fn config(&self) -> &LevelConfig {
        self.levels.get(self.level)
    }

    /// Advance the session by one frame. Order matters:
    /// win check, spawn, advance + collide + partition, recycle,
    /// collision reset, gem pickup, player glide.
    pub fn update(&mut self, dt: f32, rng: &mut impl Rng) {
        // A win freezes the frame: nothing else moves or respawns until an
        // external reset or level change.
        if self.player.reached_goal() {
            self.win();
            return;
        }

        let LevelConfig {
            enemy_count,
            enemy_two_direction,
        } = *self.config();

        // Top up the lanes one enemy per frame until the level cap is met.
        if self.enemies.len() < enemy_count {
            if enemy_two_direction {
                self.lane_toggle = !self.lane_toggle;
            }
            let row = rng.gen_range(ENEMY_SPAWN_ROWS);
            self.enemies.push(Enemy::spawn(row, self.lane_toggle, rng));
        }

        // Advance every enemy, noting hits against the player without
        // breaking early, and split off the ones that left the screen.
        let position = self.player.position();
        let mut collided = false;
        let mut kept = Vec::with_capacity(self.enemies.len());
        let mut expired = Vec::new();
        for mut enemy in self.enemies.drain(..) {
            enemy.update(dt);
            if enemy.collides_with(position) {
                collided = true;
            }
            if enemy.is_available() {
                kept.push(enemy);
            } else {
                expired.push(enemy);
            }
        }
        self.enemies = kept;

        // Each expired enemy is replaced on its own row. Two-direction levels
        // send the replacement back the other way; one-way levels keep the
        // expired enemy's direction.
        for stale in expired {
            let reversed = if enemy_two_direction {
                !stale.reversed
            } else {
                stale.reversed
            };
            self.enemies.push(Enemy::spawn(stale.row, reversed, rng));
        }

        // Getting hit costs the run, not the session: same level, fresh board.
        if collided {
            self.reset(rng);
        }

        // Cash in the gem and immediately roll its replacement.
        if self.gem.collides_with(self.player.position()) {
            self.score += self.gem.score();
            self.gem = Gem::random(rng);
        }

        self.player.update(dt);
    }

    fn win(&mut self) {
        self.winning = true;
        self.high_score = self.high_score.max(self.score);
    }

    /// Everything on the board, in draw order: enemies below the gem, the
    /// player on top.
    pub fn entities(&self) -> impl Iterator<Item = &dyn Entity> + '_ {
        self.enemies
            .iter()
            .map(|enemy| enemy as &dyn Entity)
            .chain(iter::once(&self.gem as &dyn Entity))
            .chain(iter::once(&self.player as &dyn Entity))
    }
}
