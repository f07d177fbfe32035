//! The game over menu.

use bevy::{input::common_conditions::input_just_pressed, prelude::*};

use crate::{game::session::GameSession, menus::Menu, screens::Screen, theme::widget};

pub(super) fn plugin(app: &mut App) {
    app.add_systems(OnEnter(Menu::GameOver), spawn_gameover_menu);
    app.add_systems(
        Update,
        play_again_on_key.run_if(in_state(Menu::GameOver).and(input_just_pressed(KeyCode::Enter))),
    );
}

fn spawn_gameover_menu(mut commands: Commands, session: Res<GameSession>) {
    commands.spawn((
        widget::ui_root("Game Over Menu"),
        GlobalZIndex(2),
        DespawnOnExit(Menu::GameOver),
        children![
            widget::header("Game Over"),
            widget::label(format!("Levels cleared: {}", session.levels_cleared)),
            widget::button("Play again", play_again),
            widget::button("Quit to title", quit_to_title),
        ],
    ));
}

fn play_again(_: On<Pointer<Click>>, mut next_screen: ResMut<NextState<Screen>>) {
    next_screen.set(Screen::Gameplay);
}

fn play_again_on_key(mut next_screen: ResMut<NextState<Screen>>) {
    next_screen.set(Screen::Gameplay);
}

fn quit_to_title(_: On<Pointer<Click>>, mut next_screen: ResMut<NextState<Screen>>) {
    next_screen.set(Screen::Title);
}
