use approx::assert_relative_eq;
use gem_crossing::entity::{Enemy, Player, Skin, CANVAS_WIDTH, TILE_WIDTH};
use gem_crossing::world::{LevelConfig, Levels, World};
use rand::rngs::StdRng;
use rand::SeedableRng;

const DT: f32 = 0.016;

fn rng() -> StdRng {
    StdRng::seed_from_u64(0xC0FFEE)
}

fn world_with(configs: Vec<LevelConfig>, rng: &mut StdRng) -> World {
    World::new(Levels::new(configs), Skin::Boy, rng)
}

fn stationary_enemy(row: u8, x: f32) -> Enemy {
    Enemy {
        row,
        reversed: false,
        x,
        speed: 0.0,
    }
}

#[test]
fn spawns_one_enemy_per_frame_with_alternating_directions() {
    let mut rng = rng();
    let mut world = world_with(
        vec![LevelConfig {
            enemy_count: 3,
            enemy_two_direction: true,
        }],
        &mut rng,
    );

    for expected in 1..=3 {
        world.update(DT, &mut rng);
        assert_eq!(world.enemies.len(), expected);
    }
    let directions: Vec<bool> = world.enemies.iter().map(|e| e.reversed).collect();
    assert_eq!(directions, vec![true, false, true]);

    // at the cap, another frame adds nothing
    world.update(DT, &mut rng);
    assert_eq!(world.enemies.len(), 3);
}

#[test]
fn enemy_count_never_exceeds_the_level_cap() {
    let mut rng = rng();
    let mut world = world_with(
        vec![LevelConfig {
            enemy_count: 2,
            enemy_two_direction: false,
        }],
        &mut rng,
    );

    // long enough for every enemy to cross the screen and recycle
    for _ in 0..600 {
        world.update(0.05, &mut rng);
        assert!(world.enemies.len() <= 2);
        for enemy in &world.enemies {
            assert!((1..7).contains(&enemy.row));
        }
    }
}

#[test]
fn winning_freezes_the_frame_and_takes_the_high_score() {
    let mut rng = rng();
    let mut world = world_with(
        vec![LevelConfig {
            enemy_count: 3,
            enemy_two_direction: false,
        }],
        &mut rng,
    );
    for _ in 0..3 {
        world.update(DT, &mut rng);
    }
    world.score = 700;
    world.player.row = 0;

    let enemies_before = world.enemies.clone();
    let gem_before = world.gem.clone();
    world.update(DT, &mut rng);

    assert!(world.winning);
    assert_eq!(world.high_score, 700);
    assert_eq!(world.score, 700);
    assert_eq!(world.enemies, enemies_before);
    assert_eq!(world.gem, gem_before);

    // further frames change nothing while the win stands
    world.update(DT, &mut rng);
    assert!(world.winning);
    assert_eq!(world.enemies, enemies_before);
    assert_eq!(world.score, 700);
}

#[test]
fn high_score_never_decreases() {
    let mut rng = rng();
    let mut world = world_with(
        vec![LevelConfig {
            enemy_count: 0,
            enemy_two_direction: false,
        }],
        &mut rng,
    );
    world.high_score = 1000;
    world.score = 400;
    world.player.row = 0;
    world.update(DT, &mut rng);

    assert!(world.winning);
    assert_eq!(world.high_score, 1000);
}

#[test]
fn a_collision_soft_resets_the_current_level() {
    let mut rng = rng();
    let mut world = world_with(
        vec![
            LevelConfig {
                enemy_count: 3,
                enemy_two_direction: false,
            },
            LevelConfig {
                enemy_count: 3,
                enemy_two_direction: true,
            },
        ],
        &mut rng,
    );
    world.change_level(1, &mut rng);
    world.score = 300;

    // park several enemies right on the player, among innocent ones
    let player = world.player.position();
    world.enemies = vec![
        stationary_enemy(1, 0.0),
        stationary_enemy(player.row, player.x),
        stationary_enemy(player.row, player.x + 10.0),
    ];
    world.update(DT, &mut rng);

    assert!(world.enemies.is_empty());
    assert_eq!(world.score, 0);
    assert!(!world.winning);
    assert_eq!(world.player, Player::new(Skin::Boy));
    // the level itself survives a death
    assert_eq!(world.level, 1);
    assert!((1..6).contains(&world.gem.col));
    assert!((2..7).contains(&world.gem.row));
}

#[test]
fn gem_pickup_scores_and_respawns_the_gem() {
    let mut rng = rng();
    let mut world = world_with(
        vec![LevelConfig {
            enemy_count: 1,
            enemy_two_direction: false,
        }],
        &mut rng,
    );
    let gem = world.gem.clone();
    world.player = Player::at(gem.col, gem.row, Skin::Boy);

    world.update(0.001, &mut rng);

    assert_eq!(world.score, gem.score());
    assert!((1..6).contains(&world.gem.col));
    assert!((2..7).contains(&world.gem.row));
}

#[test]
fn offscreen_enemies_recycle_on_their_row() {
    let mut rng = rng();

    // one-way level: the replacement keeps the expired enemy's direction
    let mut world = world_with(
        vec![LevelConfig {
            enemy_count: 1,
            enemy_two_direction: false,
        }],
        &mut rng,
    );
    world.enemies = vec![Enemy {
        row: 3,
        reversed: false,
        x: CANVAS_WIDTH + 100.0,
        speed: 50.0,
    }];
    world.update(DT, &mut rng);
    assert_eq!(world.enemies.len(), 1);
    assert_eq!(world.enemies[0].row, 3);
    assert!(!world.enemies[0].reversed);
    assert_relative_eq!(world.enemies[0].x, -TILE_WIDTH);

    // two-way level: the replacement comes back the other way
    let mut world = world_with(
        vec![LevelConfig {
            enemy_count: 1,
            enemy_two_direction: true,
        }],
        &mut rng,
    );
    world.enemies = vec![Enemy {
        row: 5,
        reversed: false,
        x: CANVAS_WIDTH + 100.0,
        speed: 50.0,
    }];
    world.update(DT, &mut rng);
    assert_eq!(world.enemies.len(), 1);
    assert_eq!(world.enemies[0].row, 5);
    assert!(world.enemies[0].reversed);
    assert_relative_eq!(world.enemies[0].x, CANVAS_WIDTH);
}

#[test]
fn reset_is_idempotent() {
    let mut rng = rng();
    let mut world = world_with(
        vec![LevelConfig {
            enemy_count: 4,
            enemy_two_direction: true,
        }],
        &mut rng,
    );
    for _ in 0..20 {
        world.update(DT, &mut rng);
    }
    world.score = 250;

    world.reset(&mut rng);
    world.reset(&mut rng);

    assert!(world.enemies.is_empty());
    assert_eq!(world.score, 0);
    assert!(!world.winning);
    assert_eq!(world.player, Player::new(Skin::Boy));
    assert!((1..6).contains(&world.gem.col));
    assert!((2..7).contains(&world.gem.row));
}

#[test]
fn the_direction_toggle_survives_a_reset() {
    let mut rng = rng();
    let mut world = world_with(
        vec![LevelConfig {
            enemy_count: 3,
            enemy_two_direction: true,
        }],
        &mut rng,
    );
    world.update(DT, &mut rng);
    assert!(world.enemies[0].reversed);

    world.reset(&mut rng);
    world.update(DT, &mut rng);
    // the toggle picked up where it left off instead of restarting
    assert!(!world.enemies[0].reversed);
}

#[test]
fn enemy_displacement_scales_with_dt() {
    let mut rng = rng();
    let mut world = world_with(
        vec![LevelConfig {
            enemy_count: 0,
            enemy_two_direction: false,
        }],
        &mut rng,
    );
    world.enemies = vec![Enemy {
        row: 2,
        reversed: false,
        x: 100.0,
        speed: 200.0,
    }];
    world.update(0.5, &mut rng);
    assert_relative_eq!(world.enemies[0].x, 200.0);

    world.enemies = vec![Enemy {
        row: 2,
        reversed: true,
        x: 300.0,
        speed: 200.0,
    }];
    world.update(0.25, &mut rng);
    assert_relative_eq!(world.enemies[0].x, 250.0);
}
