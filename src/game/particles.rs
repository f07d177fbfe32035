//! Particle effects - brick explosions and the ball trail.
//!
//! Each effect is described by an [`EmitterConfig`]. Bursts spawn a batch
//! of particles at once; trails emit continuously from the entity they are
//! attached to.

use std::f32::consts::TAU;
use std::ops::Range;

use bevy::prelude::*;
use rand::Rng;

use super::{LevelSystems, brick::BrickColor, collision::BrickHit};
use crate::{PausableSystems, screens::Screen};

pub(super) fn plugin(app: &mut App) {
    app.add_systems(
        Update,
        (burst_on_brick_hit, emit_trails, update_particles)
            .chain()
            .in_set(LevelSystems::Effects)
            .in_set(PausableSystems)
            .run_if(in_state(Screen::Gameplay)),
    );
}

/// Particles spawned per brick explosion.
pub const BRICK_BURST_COUNT: usize = 12;

/// Explosion particles are drawn above everything else in the level.
const BURST_DEPTH: f32 = 100.0;

/// Trail particles sit just behind the ball.
const TRAIL_DEPTH: f32 = 4.0;

/// How a group of particles looks and moves.
#[derive(Debug, Clone, PartialEq)]
pub struct EmitterConfig {
    /// Particle lifetime in seconds.
    pub lifespan: f32,
    /// Side of an unscaled particle sprite in pixels.
    pub base_size: f32,
    /// Initial speed range in pixels per second.
    pub speed: Range<f32>,
    /// Scale at birth and death.
    pub scale: (f32, f32),
    /// Alpha at birth and death.
    pub alpha: (f32, f32),
    /// Vertical acceleration in world space (negative pulls down).
    pub gravity_y: f32,
    pub tint: Color,
}

impl EmitterConfig {
    /// Explosion for a brick of the given color.
    pub fn brick_burst(color: BrickColor) -> Self {
        Self {
            lifespan: 0.8,
            base_size: 22.0,
            speed: 150.0..250.0,
            scale: (0.4, 0.0),
            alpha: (1.0, 0.0),
            gravity_y: -300.0,
            tint: color.tint(),
        }
    }

    /// Faint trail left behind the ball.
    pub fn ball_trail() -> Self {
        Self {
            lifespan: 1.0,
            base_size: 22.0,
            speed: 20.0..20.0,
            scale: (0.4, 0.0),
            alpha: (0.3, 0.0),
            gravity_y: 0.0,
            tint: Color::WHITE,
        }
    }

    /// Pick a random initial velocity.
    pub fn random_velocity(&self, rng: &mut impl Rng) -> Vec2 {
        let speed = if self.speed.is_empty() {
            self.speed.start
        } else {
            rng.random_range(self.speed.clone())
        };
        let angle = rng.random_range(0.0..TAU);
        Vec2::from_angle(angle) * speed
    }
}

/// A single live particle.
#[derive(Component, Debug, Clone)]
pub struct Particle {
    pub lifetime: Timer,
    pub velocity: Vec2,
    pub gravity_y: f32,
    pub scale: (f32, f32),
    pub alpha: (f32, f32),
}

impl Particle {
    fn new(config: &EmitterConfig, velocity: Vec2) -> Self {
        Self {
            lifetime: Timer::from_seconds(config.lifespan, TimerMode::Once),
            velocity,
            gravity_y: config.gravity_y,
            scale: config.scale,
            alpha: config.alpha,
        }
    }

    /// Current scale, interpolated over the lifetime.
    pub fn current_scale(&self) -> f32 {
        lerp(self.scale, self.lifetime.fraction())
    }

    /// Current alpha, interpolated over the lifetime.
    pub fn current_alpha(&self) -> f32 {
        lerp(self.alpha, self.lifetime.fraction())
    }

    /// Advance the particle by `dt` seconds and return its displacement.
    pub fn step(&mut self, dt: f32) -> Vec2 {
        self.velocity.y += self.gravity_y * dt;
        self.velocity * dt
    }
}

fn lerp((start, end): (f32, f32), t: f32) -> f32 {
    start + (end - start) * t
}

/// Continuously emits particles from the entity's position.
#[derive(Component, Debug, Clone)]
pub struct ParticleTrail {
    pub config: EmitterConfig,
    pub interval: Timer,
}

impl ParticleTrail {
    pub fn new(config: EmitterConfig) -> Self {
        Self {
            config,
            // One particle per frame at 60 fps.
            interval: Timer::from_seconds(1.0 / 60.0, TimerMode::Repeating),
        }
    }
}

/// Spawn `count` particles at `position`.
pub fn emit_burst(
    commands: &mut Commands,
    rng: &mut impl Rng,
    config: &EmitterConfig,
    position: Vec3,
    count: usize,
) {
    for _ in 0..count {
        let velocity = config.random_velocity(rng);
        spawn_particle(commands, config, velocity, position);
    }
}

fn spawn_particle(commands: &mut Commands, config: &EmitterConfig, velocity: Vec2, position: Vec3) {
    commands.spawn((
        Name::new("Particle"),
        Particle::new(config, velocity),
        Sprite {
            color: config.tint.with_alpha(config.alpha.0),
            custom_size: Some(Vec2::splat(config.base_size)),
            ..default()
        },
        Transform::from_translation(position).with_scale(Vec3::splat(config.scale.0)),
        DespawnOnExit(Screen::Gameplay),
    ));
}

/// Explode a brick into particles of its color.
fn burst_on_brick_hit(mut commands: Commands, mut hit_events: MessageReader<BrickHit>) {
    let mut rng = rand::rng();

    for event in hit_events.read() {
        let config = EmitterConfig::brick_burst(event.color);
        emit_burst(
            &mut commands,
            &mut rng,
            &config,
            event.position.extend(BURST_DEPTH),
            BRICK_BURST_COUNT,
        );
    }
}

fn emit_trails(
    mut commands: Commands,
    time: Res<Time>,
    mut query: Query<(&Transform, &mut ParticleTrail)>,
) {
    let mut rng = rand::rng();

    for (transform, mut trail) in &mut query {
        trail.interval.tick(time.delta());
        let position = transform.translation.truncate().extend(TRAIL_DEPTH);
        for _ in 0..trail.interval.times_finished_this_tick() {
            let velocity = trail.config.random_velocity(&mut rng);
            spawn_particle(&mut commands, &trail.config, velocity, position);
        }
    }
}

fn update_particles(
    mut commands: Commands,
    time: Res<Time>,
    mut query: Query<(Entity, &mut Particle, &mut Sprite, &mut Transform)>,
) {
    let dt = time.delta_secs();

    for (entity, mut particle, mut sprite, mut transform) in &mut query {
        particle.lifetime.tick(time.delta());
        if particle.lifetime.is_finished() {
            commands.entity(entity).despawn();
            continue;
        }

        transform.translation += particle.step(dt).extend(0.0);
        transform.scale = Vec3::splat(particle.current_scale());
        sprite.color.set_alpha(particle.current_alpha());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::time::Duration;

    #[test]
    fn test_burst_speed_within_range() {
        let mut rng = StdRng::seed_from_u64(7);
        let config = EmitterConfig::brick_burst(BrickColor::Red);
        for _ in 0..100 {
            let speed = config.random_velocity(&mut rng).length();
            assert!((150.0 - 1e-3..250.0 + 1e-3).contains(&speed));
        }
    }

    #[test]
    fn test_trail_has_fixed_speed() {
        let mut rng = StdRng::seed_from_u64(7);
        let config = EmitterConfig::ball_trail();
        let speed = config.random_velocity(&mut rng).length();
        assert!((speed - 20.0).abs() < 1e-3);
    }

    #[test]
    fn test_particle_fades_and_shrinks() {
        let config = EmitterConfig::brick_burst(BrickColor::Blue);
        let mut particle = Particle::new(&config, Vec2::ZERO);
        assert_eq!(particle.current_scale(), 0.4);
        assert_eq!(particle.current_alpha(), 1.0);

        particle.lifetime.tick(Duration::from_millis(400));
        assert!((particle.current_scale() - 0.2).abs() < 1e-5);
        assert!((particle.current_alpha() - 0.5).abs() < 1e-5);
    }

    #[test]
    fn test_gravity_pulls_down() {
        let config = EmitterConfig::brick_burst(BrickColor::Green);
        let mut particle = Particle::new(&config, Vec2::new(100.0, 0.0));
        let moved = particle.step(0.1);
        assert!(particle.velocity.y < 0.0);
        assert!(moved.y < 0.0);
        assert_eq!(particle.velocity.x, 100.0);
    }

    #[test]
    fn test_burst_uses_brick_tint() {
        let config = EmitterConfig::brick_burst(BrickColor::Silver);
        assert_eq!(config.tint, BrickColor::Silver.tint());
    }
}
