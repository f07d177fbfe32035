//! Lives and the level state machine.
//!
//! Clearing the level awards a life and starts the grid over. Dropping the
//! ball costs a life; losing the last one ends the game.

use bevy::prelude::*;

use super::LevelSystems;
use crate::{PausableSystems, config::GameConfig, screens::Screen};

pub(super) fn plugin(app: &mut App) {
    app.init_resource::<GameSession>();
    app.register_type::<GameSession>();
    app.add_message::<LevelCleared>();
    app.add_message::<BallLost>();
    app.add_message::<BallReset>();

    app.add_systems(
        OnEnter(Screen::Gameplay),
        (start_session, spawn_lives_text).chain(),
    );

    app.add_systems(
        FixedUpdate,
        (apply_level_cleared, apply_ball_lost)
            .chain()
            .in_set(LevelSystems::Rules)
            .in_set(PausableSystems)
            .run_if(in_state(Screen::Gameplay)),
    );
    app.add_systems(
        Update,
        update_lives_text
            .in_set(LevelSystems::Effects)
            .in_set(PausableSystems)
            .run_if(in_state(Screen::Gameplay).and(resource_changed::<GameSession>)),
    );
}

/// Message sent when the last active brick is broken.
#[derive(Message, Debug, Clone)]
pub struct LevelCleared;

/// Message sent when the ball falls out of the bottom of the arena.
#[derive(Message, Debug, Clone)]
pub struct BallLost;

/// Message asking for the ball to be parked back on the paddle.
#[derive(Message, Debug, Clone)]
pub struct BallReset;

/// What happens after a life is lost.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifeOutcome {
    /// Lives remain; serve again.
    ResetBall,
    /// No lives left.
    GameOver,
}

/// Resource tracking the current game.
#[derive(Resource, Debug, Default, Clone, PartialEq, Eq, Reflect)]
#[reflect(Resource)]
pub struct GameSession {
    pub lives: u32,
    pub levels_cleared: u32,
}

impl GameSession {
    pub fn new(lives: u32) -> Self {
        Self {
            lives,
            levels_cleared: 0,
        }
    }

    /// Award the bonus life for clearing the grid.
    pub fn clear_level(&mut self) {
        self.lives += 1;
        self.levels_cleared += 1;
    }

    /// Take a life away.
    pub fn lose_life(&mut self) -> LifeOutcome {
        self.lives = self.lives.saturating_sub(1);
        if self.lives == 0 {
            LifeOutcome::GameOver
        } else {
            LifeOutcome::ResetBall
        }
    }

    /// Text shown in the lives counter.
    pub fn lives_label(&self) -> String {
        format!("Lives: {}", self.lives)
    }
}

/// Marker for the lives counter text.
#[derive(Component, Debug, Reflect)]
#[reflect(Component)]
struct LivesText;

/// Reset lives whenever gameplay starts, including restarts.
fn start_session(mut session: ResMut<GameSession>, config: Res<GameConfig>) {
    *session = GameSession::new(config.starting_lives);
    info!("New game with {} lives", session.lives);
}

fn spawn_lives_text(mut commands: Commands, session: Res<GameSession>) {
    commands.spawn((
        Name::new("Lives Text"),
        LivesText,
        Text::new(session.lives_label()),
        TextFont::from_font_size(32.0),
        TextColor(Color::WHITE),
        TextShadow {
            offset: Vec2::splat(3.0),
            color: Color::BLACK,
        },
        Node {
            position_type: PositionType::Absolute,
            left: Val::Px(16.0),
            top: Val::Px(16.0),
            ..default()
        },
        DespawnOnExit(Screen::Gameplay),
    ));
}

fn apply_level_cleared(
    mut session: ResMut<GameSession>,
    mut cleared_events: MessageReader<LevelCleared>,
    mut reset_events: MessageWriter<BallReset>,
) {
    for _ in cleared_events.read() {
        session.clear_level();
        reset_events.write(BallReset);
        info!(
            "Level cleared! Extra life awarded, lives: {} (levels cleared: {})",
            session.lives, session.levels_cleared
        );
    }
}

fn apply_ball_lost(
    mut session: ResMut<GameSession>,
    mut lost_events: MessageReader<BallLost>,
    mut reset_events: MessageWriter<BallReset>,
    mut next_screen: ResMut<NextState<Screen>>,
) {
    for _ in lost_events.read() {
        match session.lose_life() {
            LifeOutcome::ResetBall => {
                info!("Life lost, {} remaining", session.lives);
                reset_events.write(BallReset);
            }
            LifeOutcome::GameOver => {
                info!(
                    "GAME OVER! Levels cleared: {}",
                    session.levels_cleared
                );
                next_screen.set(Screen::GameOver);
                return;
            }
        }
    }
}

fn update_lives_text(
    session: Res<GameSession>,
    mut label: Single<&mut Text, With<LivesText>>,
) {
    label.0 = session.lives_label();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session() {
        let session = GameSession::new(3);
        assert_eq!(session.lives, 3);
        assert_eq!(session.levels_cleared, 0);
        assert_eq!(session.lives_label(), "Lives: 3");
    }

    #[test]
    fn test_clear_level_awards_life() {
        let mut session = GameSession::new(3);
        session.clear_level();
        assert_eq!(session.lives, 4);
        assert_eq!(session.levels_cleared, 1);
    }

    #[test]
    fn test_losing_lives_until_game_over() {
        let mut session = GameSession::new(3);
        assert_eq!(session.lose_life(), LifeOutcome::ResetBall);
        assert_eq!(session.lose_life(), LifeOutcome::ResetBall);
        assert_eq!(session.lose_life(), LifeOutcome::GameOver);
        assert_eq!(session.lives, 0);
    }

    #[test]
    fn test_zero_lives_stays_game_over() {
        let mut session = GameSession::new(0);
        assert_eq!(session.lose_life(), LifeOutcome::GameOver);
        assert_eq!(session.lives, 0);
    }

    #[test]
    fn test_bonus_life_extends_game() {
        let mut session = GameSession::new(1);
        session.clear_level();
        assert_eq!(session.lose_life(), LifeOutcome::ResetBall);
        assert_eq!(session.lose_life(), LifeOutcome::GameOver);
    }
}
