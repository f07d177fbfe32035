//! The ball.
//!
//! The ball starts parked above the paddle and follows it until launched.
//! Once in flight it moves at constant velocity and bounces off the side
//! and top walls. The bottom is open: a ball that drops out costs a life.

use bevy::prelude::*;

use super::{
    LevelSystems,
    arena::{BOTTOM_EDGE, LEFT_WALL, RIGHT_WALL, TOP_WALL, to_world},
    paddle::{Paddle, PlayerInput},
    particles::{EmitterConfig, ParticleTrail},
    session::{BallLost, BallReset},
};
use crate::{PausableSystems, config::GameConfig, screens::Screen};

pub(super) fn plugin(app: &mut App) {
    app.register_type::<Ball>();
    app.register_type::<Velocity>();
    app.register_type::<OnPaddle>();

    app.add_systems(OnEnter(Screen::Gameplay), spawn_ball);

    app.add_systems(
        FixedUpdate,
        launch_ball
            .in_set(LevelSystems::Steer)
            .in_set(PausableSystems)
            .run_if(in_state(Screen::Gameplay)),
    );
    app.add_systems(
        FixedUpdate,
        (move_ball, bounce_ball_off_walls, detect_ball_lost)
            .chain()
            .in_set(LevelSystems::Movement)
            .in_set(PausableSystems)
            .run_if(in_state(Screen::Gameplay)),
    );
    app.add_systems(
        FixedUpdate,
        reset_ball
            .in_set(LevelSystems::Reset)
            .in_set(PausableSystems)
            .run_if(in_state(Screen::Gameplay)),
    );
}

/// Radius of the ball in pixels.
pub const BALL_RADIUS: f32 = 11.0;

/// Screen-space y where the ball waits before launch.
const BALL_START_Y: f32 = 600.0;

/// Marker component for the ball.
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct Ball;

/// Linear velocity in world units per second.
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct Velocity(pub Vec2);

/// The ball is parked on the paddle waiting to be launched.
#[derive(Component, Debug, Clone, Default, Reflect)]
#[reflect(Component)]
pub struct OnPaddle;

/// World position of a parked ball above a paddle at `paddle_x`.
pub fn parked_position(paddle_x: f32) -> Vec2 {
    Vec2::new(paddle_x, to_world(0.0, BALL_START_Y).y)
}

/// Reflect the ball off the side and top walls.
///
/// Returns the corrected position and velocity. The bottom edge is left
/// open.
pub fn bounce_off_walls(position: Vec2, velocity: Vec2, radius: f32) -> (Vec2, Vec2) {
    let mut position = position;
    let mut velocity = velocity;

    if position.x - radius < LEFT_WALL {
        position.x = LEFT_WALL + radius;
        velocity.x = velocity.x.abs();
    }

    if position.x + radius > RIGHT_WALL {
        position.x = RIGHT_WALL - radius;
        velocity.x = -velocity.x.abs();
    }

    if position.y + radius > TOP_WALL {
        position.y = TOP_WALL - radius;
        velocity.y = -velocity.y.abs();
    }

    (position, velocity)
}

fn spawn_ball(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<ColorMaterial>>,
    config: Res<GameConfig>,
) {
    let position = parked_position(0.0);

    let mut ball = commands.spawn((
        Name::new("Ball"),
        Ball,
        OnPaddle,
        Velocity::default(),
        Mesh2d(meshes.add(Circle::new(BALL_RADIUS))),
        MeshMaterial2d(materials.add(ColorMaterial::from_color(Color::srgb(0.95, 0.95, 1.0)))),
        Transform::from_translation(position.extend(5.0)),
        DespawnOnExit(Screen::Gameplay),
    ));

    if config.ball_trail {
        ball.insert(ParticleTrail::new(EmitterConfig::ball_trail()));
    }
}

/// Launch the ball with Space while it sits on the paddle.
fn launch_ball(
    mut commands: Commands,
    input: Res<PlayerInput>,
    config: Res<GameConfig>,
    mut ball_query: Query<(Entity, &mut Velocity), (With<Ball>, With<OnPaddle>)>,
) {
    if !input.launch {
        return;
    }

    let Ok((entity, mut velocity)) = ball_query.single_mut() else {
        return;
    };

    velocity.0 = config.launch_velocity_world();
    commands.entity(entity).remove::<OnPaddle>();

    info!("Ball launched with velocity {:?}", velocity.0);
}

fn move_ball(
    time: Res<Time>,
    mut query: Query<(&mut Transform, &Velocity), (With<Ball>, Without<OnPaddle>)>,
) {
    for (mut transform, velocity) in &mut query {
        transform.translation += velocity.0.extend(0.0) * time.delta_secs();
    }
}

fn bounce_ball_off_walls(
    mut query: Query<(&mut Transform, &mut Velocity), (With<Ball>, Without<OnPaddle>)>,
) {
    for (mut transform, mut velocity) in &mut query {
        let (position, new_velocity) =
            bounce_off_walls(transform.translation.truncate(), velocity.0, BALL_RADIUS);
        transform.translation = position.extend(transform.translation.z);
        velocity.0 = new_velocity;
    }
}

/// Report a ball that has fallen past the bottom edge.
fn detect_ball_lost(
    query: Query<&Transform, (With<Ball>, Without<OnPaddle>)>,
    mut lost_events: MessageWriter<BallLost>,
) {
    for transform in &query {
        if transform.translation.y < BOTTOM_EDGE {
            info!("Ball lost at x={}", transform.translation.x);
            lost_events.write(BallLost);
        }
    }
}

/// Park the ball back on the paddle.
fn reset_ball(
    mut commands: Commands,
    mut reset_events: MessageReader<BallReset>,
    mut ball_query: Query<(Entity, &mut Transform, &mut Velocity), (With<Ball>, Without<Paddle>)>,
    paddle_query: Query<&Transform, With<Paddle>>,
) {
    if reset_events.read().count() == 0 {
        return;
    }

    let Ok((entity, mut transform, mut velocity)) = ball_query.single_mut() else {
        return;
    };
    let paddle_x = paddle_query
        .single()
        .map(|paddle| paddle.translation.x)
        .unwrap_or(0.0);

    velocity.0 = Vec2::ZERO;
    transform.translation = parked_position(paddle_x).extend(transform.translation.z);
    commands.entity(entity).insert(OnPaddle);

    debug!("Ball reset onto paddle at x={}", paddle_x);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parked_position_follows_paddle() {
        let position = parked_position(-120.0);
        assert_eq!(position, Vec2::new(-120.0, -216.0));
    }

    #[test]
    fn test_left_wall_bounce() {
        let (position, velocity) =
            bounce_off_walls(Vec2::new(LEFT_WALL + 2.0, 0.0), Vec2::new(-100.0, 50.0), 11.0);
        assert_eq!(position.x, LEFT_WALL + 11.0);
        assert_eq!(velocity, Vec2::new(100.0, 50.0));
    }

    #[test]
    fn test_right_wall_bounce() {
        let (position, velocity) =
            bounce_off_walls(Vec2::new(RIGHT_WALL, 0.0), Vec2::new(100.0, 50.0), 11.0);
        assert_eq!(position.x, RIGHT_WALL - 11.0);
        assert_eq!(velocity, Vec2::new(-100.0, 50.0));
    }

    #[test]
    fn test_top_wall_bounce() {
        let (position, velocity) =
            bounce_off_walls(Vec2::new(0.0, TOP_WALL - 5.0), Vec2::new(-75.0, 300.0), 11.0);
        assert_eq!(position.y, TOP_WALL - 11.0);
        assert_eq!(velocity, Vec2::new(-75.0, -300.0));
    }

    #[test]
    fn test_floor_is_open() {
        let start = Vec2::new(0.0, BOTTOM_EDGE - 50.0);
        let (position, velocity) = bounce_off_walls(start, Vec2::new(0.0, -300.0), 11.0);
        assert_eq!(position, start);
        assert_eq!(velocity, Vec2::new(0.0, -300.0));
    }

    #[test]
    fn test_inside_arena_untouched() {
        let (position, velocity) = bounce_off_walls(Vec2::ZERO, Vec2::new(30.0, 40.0), 11.0);
        assert_eq!(position, Vec2::ZERO);
        assert_eq!(velocity, Vec2::new(30.0, 40.0));
    }
}
