//! Ball collisions against bricks and the paddle.
//!
//! Contacts are circle-vs-box. The ball is pushed out of the box it touched
//! and the velocity component heading into the box is reversed.

use bevy::{
    math::{
        bounding::{Aabb2d, BoundingCircle, IntersectsVolume},
        curve::EaseFunction,
    },
    prelude::*,
};
use rand::Rng;

use super::{
    LevelSystems,
    ball::{BALL_RADIUS, Ball, OnPaddle, Velocity},
    brick::{BRICK_SIZE, Brick, BrickColor, Broken},
    paddle::{PADDLE_SIZE, Paddle},
    session::LevelCleared,
    tween::FadeOut,
};
use crate::{PausableSystems, config::GameConfig, screens::Screen};

pub(super) fn plugin(app: &mut App) {
    app.add_message::<BrickHit>();

    app.add_systems(
        FixedUpdate,
        (ball_brick_collision, ball_paddle_collision)
            .chain()
            .in_set(LevelSystems::Collision)
            .in_set(PausableSystems)
            .run_if(in_state(Screen::Gameplay)),
    );
}

/// How long a hit brick takes to fade out.
const BRICK_FADE_SECONDS: f32 = 0.15;

/// Message sent when the ball breaks a brick.
#[derive(Message, Debug, Clone)]
pub struct BrickHit {
    pub position: Vec2,
    pub color: BrickColor,
}

/// Which face of the box the ball touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
    Top,
    Bottom,
}

/// Result of a ball touching a box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    pub side: Side,
    /// Ball centre moved just outside the box.
    pub position: Vec2,
    /// Ball velocity after the bounce.
    pub velocity: Vec2,
}

/// Test a ball against a box and work out the bounce.
pub fn resolve_contact(
    center: Vec2,
    radius: f32,
    velocity: Vec2,
    box_center: Vec2,
    half_size: Vec2,
) -> Option<Contact> {
    let bounds = Aabb2d::new(box_center, half_size);
    if !BoundingCircle::new(center, radius).intersects(&bounds) {
        return None;
    }

    let offset = center - bounds.closest_point(center);
    let side = if offset == Vec2::ZERO {
        // Centre is inside the box: leave along the shallowest axis.
        let local = center - box_center;
        let depth = half_size - local.abs();
        if depth.x < depth.y {
            if local.x < 0.0 { Side::Left } else { Side::Right }
        } else if local.y > 0.0 {
            Side::Top
        } else {
            Side::Bottom
        }
    } else if offset.x.abs() > offset.y.abs() {
        if offset.x < 0.0 { Side::Left } else { Side::Right }
    } else if offset.y > 0.0 {
        Side::Top
    } else {
        Side::Bottom
    };

    let mut position = center;
    let mut velocity = velocity;
    match side {
        Side::Left => {
            position.x = box_center.x - half_size.x - radius;
            velocity.x = -velocity.x.abs();
        }
        Side::Right => {
            position.x = box_center.x + half_size.x + radius;
            velocity.x = velocity.x.abs();
        }
        Side::Top => {
            position.y = box_center.y + half_size.y + radius;
            velocity.y = velocity.y.abs();
        }
        Side::Bottom => {
            position.y = box_center.y - half_size.y - radius;
            velocity.y = -velocity.y.abs();
        }
    }

    Some(Contact {
        side,
        position,
        velocity,
    })
}

/// Horizontal velocity after the ball comes off the paddle.
///
/// The further from the centre the ball lands, the harder it is sent to
/// that side. A dead-centre hit gets a small random push to the right so
/// the ball never bounces straight up and down.
pub fn paddle_deflection(ball_x: f32, paddle_x: f32, factor: f32, rng: &mut impl Rng) -> f32 {
    if ball_x < paddle_x {
        -factor * (paddle_x - ball_x)
    } else if ball_x > paddle_x {
        factor * (ball_x - paddle_x)
    } else {
        2.0 + rng.random::<f32>() * 8.0
    }
}

/// Break every brick the ball touches this step.
fn ball_brick_collision(
    mut commands: Commands,
    mut ball_query: Query<(&mut Transform, &mut Velocity), (With<Ball>, Without<OnPaddle>)>,
    brick_query: Query<(Entity, &Transform, &Brick), (Without<Ball>, Without<Broken>)>,
    mut hit_events: MessageWriter<BrickHit>,
    mut cleared_events: MessageWriter<LevelCleared>,
) {
    let Ok((mut ball_transform, mut velocity)) = ball_query.single_mut() else {
        return;
    };

    let mut active = brick_query.iter().count();
    if active == 0 {
        return;
    }

    for (entity, brick_transform, brick) in &brick_query {
        let brick_pos = brick_transform.translation.truncate();
        let Some(contact) = resolve_contact(
            ball_transform.translation.truncate(),
            BALL_RADIUS,
            velocity.0,
            brick_pos,
            BRICK_SIZE / 2.0,
        ) else {
            continue;
        };

        ball_transform.translation = contact.position.extend(ball_transform.translation.z);
        velocity.0 = contact.velocity;

        commands.entity(entity).insert((
            Broken,
            FadeOut::new(BRICK_FADE_SECONDS, EaseFunction::SineInOut),
        ));
        hit_events.write(BrickHit {
            position: brick_pos,
            color: brick.color,
        });
        active -= 1;

        debug!("Brick {:?} hit on {:?}, {} left", brick.color, contact.side, active);
    }

    if active == 0 {
        info!("All bricks destroyed!");
        cleared_events.write(LevelCleared);
    }
}

/// Bounce the ball off the paddle and steer it by where it landed.
fn ball_paddle_collision(
    config: Res<GameConfig>,
    mut ball_query: Query<
        (&mut Transform, &mut Velocity),
        (With<Ball>, Without<OnPaddle>, Without<Paddle>),
    >,
    paddle_query: Query<&Transform, With<Paddle>>,
) {
    let Ok((mut ball_transform, mut velocity)) = ball_query.single_mut() else {
        return;
    };
    let Ok(paddle_transform) = paddle_query.single() else {
        return;
    };

    let paddle_pos = paddle_transform.translation.truncate();
    let Some(contact) = resolve_contact(
        ball_transform.translation.truncate(),
        BALL_RADIUS,
        velocity.0,
        paddle_pos,
        PADDLE_SIZE / 2.0,
    ) else {
        return;
    };

    ball_transform.translation = contact.position.extend(ball_transform.translation.z);
    velocity.0 = contact.velocity;
    velocity.0.x = paddle_deflection(
        contact.position.x,
        paddle_pos.x,
        config.deflection_factor,
        &mut rand::rng(),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    const HALF: Vec2 = Vec2::new(32.0, 16.0);

    #[test]
    fn test_no_contact_when_apart() {
        let contact = resolve_contact(Vec2::new(0.0, 100.0), 11.0, Vec2::NEG_Y, Vec2::ZERO, HALF);
        assert!(contact.is_none());
    }

    #[test]
    fn test_hit_from_below_reflects_up_velocity() {
        let contact = resolve_contact(
            Vec2::new(0.0, -20.0),
            11.0,
            Vec2::new(-75.0, 300.0),
            Vec2::ZERO,
            HALF,
        )
        .unwrap();
        assert_eq!(contact.side, Side::Bottom);
        assert_eq!(contact.velocity, Vec2::new(-75.0, -300.0));
        assert_eq!(contact.position.y, -16.0 - 11.0);
    }

    #[test]
    fn test_hit_from_side_reflects_x() {
        let contact = resolve_contact(
            Vec2::new(40.0, 0.0),
            11.0,
            Vec2::new(-200.0, 50.0),
            Vec2::ZERO,
            HALF,
        )
        .unwrap();
        assert_eq!(contact.side, Side::Right);
        assert_eq!(contact.velocity, Vec2::new(200.0, 50.0));
        assert_eq!(contact.position.x, 32.0 + 11.0);
    }

    #[test]
    fn test_moving_away_keeps_direction() {
        // Already heading down and out of the bottom face.
        let contact = resolve_contact(
            Vec2::new(0.0, -20.0),
            11.0,
            Vec2::new(0.0, -300.0),
            Vec2::ZERO,
            HALF,
        )
        .unwrap();
        assert_eq!(contact.velocity, Vec2::new(0.0, -300.0));
    }

    #[test]
    fn test_center_inside_box_exits_shallowest_side() {
        let contact =
            resolve_contact(Vec2::new(5.0, 14.0), 11.0, Vec2::NEG_Y, Vec2::ZERO, HALF).unwrap();
        assert_eq!(contact.side, Side::Top);
        assert_eq!(contact.velocity, Vec2::Y);
    }

    #[test]
    fn test_deflection_left_of_center() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(paddle_deflection(90.0, 100.0, 10.0, &mut rng), -100.0);
    }

    #[test]
    fn test_deflection_right_of_center() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(paddle_deflection(125.0, 100.0, 10.0, &mut rng), 250.0);
    }

    #[test]
    fn test_deflection_dead_center_is_small_push_right() {
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..50 {
            let vx = paddle_deflection(100.0, 100.0, 10.0, &mut rng);
            assert!((2.0..10.0).contains(&vx));
        }
    }
}
