//! Alpha tweens for sprites.

use bevy::{
    math::curve::{Curve, EaseFunction},
    prelude::*,
};

use super::LevelSystems;
use crate::{PausableSystems, screens::Screen};

pub(super) fn plugin(app: &mut App) {
    app.add_systems(
        Update,
        animate_fade_out
            .in_set(LevelSystems::Effects)
            .in_set(PausableSystems)
            .run_if(in_state(Screen::Gameplay)),
    );
}

/// Fades a sprite's alpha to zero, then hides the entity.
#[derive(Component, Debug, Clone)]
pub struct FadeOut {
    pub timer: Timer,
    pub ease: EaseFunction,
    pub start_alpha: f32,
}

impl FadeOut {
    pub fn new(seconds: f32, ease: EaseFunction) -> Self {
        Self {
            timer: Timer::from_seconds(seconds, TimerMode::Once),
            ease,
            start_alpha: 1.0,
        }
    }

    /// Alpha at the current point of the tween.
    pub fn alpha(&self) -> f32 {
        let eased = self.ease.sample_clamped(self.timer.fraction());
        self.start_alpha * (1.0 - eased)
    }
}

fn animate_fade_out(
    mut commands: Commands,
    time: Res<Time>,
    mut query: Query<(Entity, &mut FadeOut, &mut Sprite, &mut Visibility)>,
) {
    for (entity, mut fade, mut sprite, mut visibility) in &mut query {
        fade.timer.tick(time.delta());
        sprite.color.set_alpha(fade.alpha());

        if fade.timer.is_finished() {
            *visibility = Visibility::Hidden;
            commands.entity(entity).remove::<FadeOut>();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_fade_starts_opaque_and_ends_clear() {
        let mut fade = FadeOut::new(0.15, EaseFunction::SineInOut);
        assert_eq!(fade.alpha(), 1.0);

        fade.timer.tick(Duration::from_millis(200));
        assert!(fade.alpha().abs() < 1e-6);
        assert!(fade.timer.is_finished());
    }

    #[test]
    fn test_sine_in_out_is_half_at_midpoint() {
        let mut fade = FadeOut::new(0.2, EaseFunction::SineInOut);
        fade.timer.tick(Duration::from_millis(100));
        assert!((fade.alpha() - 0.5).abs() < 1e-4);
    }

    #[test]
    fn test_fade_is_monotonic() {
        let mut fade = FadeOut::new(0.15, EaseFunction::SineInOut);
        let mut last = fade.alpha();
        for _ in 0..15 {
            fade.timer.tick(Duration::from_millis(10));
            let alpha = fade.alpha();
            assert!(alpha <= last);
            last = alpha;
        }
    }
}
