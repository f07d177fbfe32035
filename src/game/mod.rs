//! The main game module for the Breakout level.
//!
//! This module contains all the gameplay logic including:
//! - Arena coordinates and walls
//! - Brick grid, paddle and ball entities
//! - Ball collisions and paddle deflection
//! - Lives and level reset rules
//! - Particle and fade effects

pub mod arena;
mod ball;
mod brick;
mod collision;
mod debug;
mod paddle;
mod particles;
pub mod session;
mod tween;

use bevy::prelude::*;

use crate::{AppSystems, screens::Screen};
use arena::{ARENA_HEIGHT, ARENA_WIDTH};

pub(super) fn plugin(app: &mut App) {
    configure_level_sets(app);

    app.add_plugins((
        ball::plugin,
        brick::plugin,
        collision::plugin,
        debug::plugin,
        paddle::plugin,
        particles::plugin,
        session::plugin,
        tween::plugin,
    ));
}

/// Rate of the fixed simulation step.
const LEVEL_STEP_HZ: f64 = 60.0;

fn configure_level_sets(app: &mut App) {
    // Input is sampled every frame, the simulation steps at a fixed rate.
    app.insert_resource(Time::<Fixed>::from_hz(LEVEL_STEP_HZ));

    app.configure_sets(Update, LevelSystems::Input.in_set(AppSystems::RecordInput));
    app.configure_sets(
        FixedUpdate,
        (
            LevelSystems::Steer,
            LevelSystems::Movement,
            LevelSystems::Collision,
            LevelSystems::Rules,
            LevelSystems::Reset,
        )
            .chain(),
    );
    app.configure_sets(Update, LevelSystems::Effects.in_set(AppSystems::Update));
}

/// Ordering of the level systems.
///
/// `Input` and `Effects` run in `Update`, the rest in `FixedUpdate` in the
/// order listed.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LevelSystems {
    Input,
    Steer,
    Movement,
    Collision,
    Rules,
    Reset,
    Effects,
}

/// System to spawn the level backdrop when entering gameplay.
/// Called from `screens/gameplay.rs` on `OnEnter(Screen::Gameplay)`.
pub fn spawn_level(mut commands: Commands) {
    commands.spawn((
        Name::new("Arena"),
        Sprite {
            color: Color::srgb(0.05, 0.06, 0.12),
            custom_size: Some(Vec2::new(ARENA_WIDTH, ARENA_HEIGHT)),
            ..default()
        },
        Transform::from_xyz(0.0, 0.0, -10.0),
        DespawnOnExit(Screen::Gameplay),
    ));

    info!("Level spawned - breakout ready!");
}
