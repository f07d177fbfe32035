//! Debug visualization for collision shapes.
//!
//! Toggle with the 'D' key during gameplay.
//! Shows:
//! - Arena walls, with the open floor in red
//! - Ball, paddle and brick hitboxes
//! - Ball velocity

use bevy::{color::palettes::css, input::common_conditions::input_just_pressed, prelude::*};

use super::{
    arena::{ARENA_HEIGHT, ARENA_WIDTH, BOTTOM_EDGE, LEFT_WALL, RIGHT_WALL, TOP_WALL},
    ball::{BALL_RADIUS, Ball, Velocity},
    brick::{BRICK_SIZE, Brick, Broken},
    paddle::{PADDLE_SIZE, Paddle},
};
use crate::screens::Screen;

pub(super) fn plugin(app: &mut App) {
    app.init_resource::<DebugHitboxesVisible>();

    // Toggle debug with 'D' key
    app.add_systems(
        Update,
        toggle_debug.run_if(in_state(Screen::Gameplay).and(input_just_pressed(KeyCode::KeyD))),
    );

    // Draw hitboxes when visible
    app.add_systems(
        Update,
        (draw_walls, draw_hitboxes).run_if(in_state(Screen::Gameplay).and(debug_visible)),
    );
}

/// Resource to track if debug visualization is visible.
#[derive(Resource, Default)]
pub struct DebugHitboxesVisible(pub bool);

fn debug_visible(debug: Res<DebugHitboxesVisible>) -> bool {
    debug.0
}

fn toggle_debug(mut debug: ResMut<DebugHitboxesVisible>) {
    debug.0 = !debug.0;
    let state = if debug.0 { "ON" } else { "OFF" };
    info!("Debug hitboxes: {}", state);
}

/// Draw the arena bounds.
fn draw_walls(mut gizmos: Gizmos) {
    let wall_color = css::ORANGE.with_alpha(0.8);

    gizmos.line_2d(
        Vec2::new(LEFT_WALL, BOTTOM_EDGE),
        Vec2::new(LEFT_WALL, TOP_WALL),
        wall_color,
    );
    gizmos.line_2d(
        Vec2::new(RIGHT_WALL, BOTTOM_EDGE),
        Vec2::new(RIGHT_WALL, TOP_WALL),
        wall_color,
    );
    gizmos.line_2d(
        Vec2::new(LEFT_WALL, TOP_WALL),
        Vec2::new(RIGHT_WALL, TOP_WALL),
        wall_color,
    );

    // Open floor
    gizmos.line_2d(
        Vec2::new(LEFT_WALL, BOTTOM_EDGE),
        Vec2::new(RIGHT_WALL, BOTTOM_EDGE),
        css::RED.with_alpha(0.6),
    );

    gizmos.rect_2d(
        Isometry2d::IDENTITY,
        Vec2::new(ARENA_WIDTH, ARENA_HEIGHT),
        css::WHITE.with_alpha(0.1),
    );
}

/// Draw the shapes used for collision.
fn draw_hitboxes(
    mut gizmos: Gizmos,
    ball_query: Query<(&Transform, &Velocity), With<Ball>>,
    paddle_query: Query<&Transform, With<Paddle>>,
    brick_query: Query<(&Transform, Has<Broken>), With<Brick>>,
) {
    for (transform, velocity) in &ball_query {
        let center = transform.translation.truncate();
        gizmos.circle_2d(Isometry2d::from_translation(center), BALL_RADIUS, css::AQUA);
        gizmos.arrow_2d(center, center + velocity.0 * 0.25, css::AQUA.with_alpha(0.6));
    }

    for transform in &paddle_query {
        gizmos.rect_2d(
            Isometry2d::from_translation(transform.translation.truncate()),
            PADDLE_SIZE,
            css::LIMEGREEN,
        );
    }

    for (transform, broken) in &brick_query {
        let color = if broken {
            css::GRAY.with_alpha(0.3)
        } else {
            css::GOLD.with_alpha(0.5)
        };
        gizmos.rect_2d(
            Isometry2d::from_translation(transform.translation.truncate()),
            BRICK_SIZE,
            color,
        );
    }
}
