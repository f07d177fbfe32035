//! The player's paddle, steered with the arrow keys.

use bevy::prelude::*;

use super::{
    LevelSystems,
    arena::{to_world, to_world_x},
    ball::{Ball, OnPaddle},
};
use crate::{PausableSystems, config::GameConfig, screens::Screen};

pub(super) fn plugin(app: &mut App) {
    app.register_type::<Paddle>();
    app.init_resource::<PlayerInput>();

    app.add_systems(OnEnter(Screen::Gameplay), spawn_paddle);

    app.add_systems(
        Update,
        record_player_input
            .in_set(LevelSystems::Input)
            .in_set(PausableSystems)
            .run_if(in_state(Screen::Gameplay)),
    );
    app.add_systems(
        FixedUpdate,
        move_paddle
            .in_set(LevelSystems::Steer)
            .in_set(PausableSystems)
            .run_if(in_state(Screen::Gameplay)),
    );
}

/// Size of the paddle in pixels.
pub const PADDLE_SIZE: Vec2 = Vec2::new(104.0, 24.0);

/// Screen-space y of the paddle.
const PADDLE_Y: f32 = 700.0;

/// Screen-space x limits of the paddle centre (half a paddle from each edge).
const PADDLE_MIN_X: f32 = 52.0;
const PADDLE_MAX_X: f32 = 972.0;

/// Marker component for the paddle.
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct Paddle;

/// Horizontal steering read from the keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Steer {
    Left,
    Right,
}

impl Steer {
    /// Left wins when both arrows are held.
    pub fn from_input(input: &ButtonInput<KeyCode>) -> Option<Self> {
        if input.pressed(KeyCode::ArrowLeft) {
            Some(Steer::Left)
        } else if input.pressed(KeyCode::ArrowRight) {
            Some(Steer::Right)
        } else {
            None
        }
    }
}

/// Keyboard state sampled every frame and consumed by the fixed-step systems.
#[derive(Resource, Debug, Clone, Default, PartialEq, Eq)]
pub struct PlayerInput {
    pub steer: Option<Steer>,
    pub launch: bool,
}

/// Next paddle x after moving `distance` pixels in `steer` direction.
pub fn step_paddle(x: f32, steer: Steer, distance: f32) -> f32 {
    let x = match steer {
        Steer::Left => x - distance,
        Steer::Right => x + distance,
    };
    x.clamp(to_world_x(PADDLE_MIN_X), to_world_x(PADDLE_MAX_X))
}

fn spawn_paddle(mut commands: Commands) {
    commands.spawn((
        Name::new("Paddle"),
        Paddle,
        Sprite {
            color: Color::srgb(0.85, 0.85, 0.9),
            custom_size: Some(PADDLE_SIZE),
            ..default()
        },
        Transform::from_translation(to_world(512.0, PADDLE_Y).extend(1.0)),
        DespawnOnExit(Screen::Gameplay),
    ));
}

fn record_player_input(
    keyboard_input: Res<ButtonInput<KeyCode>>,
    mut input: ResMut<PlayerInput>,
) {
    input.steer = Steer::from_input(&keyboard_input);
    input.launch = keyboard_input.pressed(KeyCode::Space);
}

/// Move the paddle, carrying a parked ball along with it.
fn move_paddle(
    time: Res<Time>,
    input: Res<PlayerInput>,
    config: Res<GameConfig>,
    mut paddle_query: Query<&mut Transform, With<Paddle>>,
    mut ball_query: Query<&mut Transform, (With<Ball>, With<OnPaddle>, Without<Paddle>)>,
) {
    let Some(steer) = input.steer else {
        return;
    };
    let Ok(mut paddle) = paddle_query.single_mut() else {
        return;
    };

    let distance = config.paddle_speed * time.delta_secs();
    paddle.translation.x = step_paddle(paddle.translation.x, steer, distance);

    for mut ball in &mut ball_query {
        ball.translation.x = paddle.translation.x;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_moves_by_distance() {
        assert_eq!(step_paddle(0.0, Steer::Left, 10.0), -10.0);
        assert_eq!(step_paddle(0.0, Steer::Right, 10.0), 10.0);
    }

    #[test]
    fn test_step_clamps_to_walls() {
        assert_eq!(step_paddle(-455.0, Steer::Left, 10.0), -460.0);
        assert_eq!(step_paddle(455.0, Steer::Right, 10.0), 460.0);
        assert_eq!(step_paddle(460.0, Steer::Right, 10.0), 460.0);
    }

    #[test]
    fn test_left_wins_over_right() {
        let mut input = ButtonInput::<KeyCode>::default();
        input.press(KeyCode::ArrowRight);
        input.press(KeyCode::ArrowLeft);
        assert_eq!(Steer::from_input(&input), Some(Steer::Left));
    }

    #[test]
    fn test_no_arrows_no_steer() {
        let mut input = ButtonInput::<KeyCode>::default();
        input.press(KeyCode::Space);
        assert_eq!(Steer::from_input(&input), None);
    }
}
