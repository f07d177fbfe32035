//! Bricks - the destructible targets.
//!
//! Bricks sit in a fixed 10x6 grid, one color per row. A hit brick is
//! marked [`Broken`] straight away so it stops colliding, then fades out.
//! Clearing the level brings every brick back where it was.

use bevy::prelude::*;

use super::{
    LevelSystems,
    arena::to_world,
    session::LevelCleared,
    tween::FadeOut,
};
use crate::{PausableSystems, screens::Screen};

pub(super) fn plugin(app: &mut App) {
    app.register_type::<Brick>();
    app.register_type::<BrickColor>();
    app.register_type::<Broken>();

    app.add_systems(OnEnter(Screen::Gameplay), spawn_bricks);

    app.add_systems(
        FixedUpdate,
        reset_bricks_on_level_clear
            .in_set(LevelSystems::Reset)
            .in_set(PausableSystems)
            .run_if(in_state(Screen::Gameplay)),
    );
}

/// Number of brick columns.
pub const GRID_COLUMNS: usize = 10;

/// Number of brick rows.
pub const GRID_ROWS: usize = 6;

/// Size of one grid cell (and one brick) in pixels.
pub const BRICK_SIZE: Vec2 = Vec2::new(64.0, 32.0);

/// Screen-space top-left corner of the grid.
const GRID_ORIGIN: Vec2 = Vec2::new(192.0, 100.0);

/// The brick colors, one per row from the top.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect)]
pub enum BrickColor {
    Blue,
    Red,
    Green,
    Yellow,
    Silver,
    Purple,
}

impl BrickColor {
    /// All colors in row order.
    pub const ALL: [BrickColor; GRID_ROWS] = [
        BrickColor::Blue,
        BrickColor::Red,
        BrickColor::Green,
        BrickColor::Yellow,
        BrickColor::Silver,
        BrickColor::Purple,
    ];

    /// Color of the brick sprite.
    pub fn to_color(self) -> Color {
        match self {
            BrickColor::Blue => Color::srgb(0.25, 0.35, 0.95),
            BrickColor::Red => Color::srgb(0.9, 0.2, 0.2),
            BrickColor::Green => Color::srgb(0.2, 0.8, 0.3),
            BrickColor::Yellow => Color::srgb(0.95, 0.85, 0.2),
            BrickColor::Silver => Color::srgb(0.7, 0.7, 0.75),
            BrickColor::Purple => Color::srgb(0.7, 0.3, 0.8),
        }
    }

    /// Tint used for the explosion particles.
    pub fn tint(self) -> Color {
        match self {
            BrickColor::Blue => Color::srgb_u8(0x44, 0x44, 0xff),
            BrickColor::Red => Color::srgb_u8(0xff, 0x44, 0x44),
            BrickColor::Green => Color::srgb_u8(0x44, 0xff, 0x44),
            BrickColor::Yellow => Color::srgb_u8(0xff, 0xff, 0x44),
            BrickColor::Silver => Color::srgb_u8(0xcc, 0xcc, 0xcc),
            BrickColor::Purple => Color::srgb_u8(0xff, 0x44, 0xff),
        }
    }

    /// Color for a grid row.
    pub fn for_row(row: usize) -> Self {
        Self::ALL[row % GRID_ROWS]
    }
}

/// A brick in the grid.
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct Brick {
    pub color: BrickColor,
}

/// Marks a brick that has been hit and no longer takes part in the level.
#[derive(Component, Debug, Default, Reflect)]
#[reflect(Component)]
pub struct Broken;

/// World position of the centre of a grid cell.
pub fn cell_center(column: usize, row: usize) -> Vec2 {
    let x = GRID_ORIGIN.x + column as f32 * BRICK_SIZE.x + BRICK_SIZE.x / 2.0;
    let y = GRID_ORIGIN.y + row as f32 * BRICK_SIZE.y + BRICK_SIZE.y / 2.0;
    to_world(x, y)
}

/// Every brick of a fresh level, row by row.
pub fn level_layout() -> impl Iterator<Item = (BrickColor, Vec2)> {
    (0..GRID_ROWS).flat_map(|row| {
        (0..GRID_COLUMNS).map(move |column| (BrickColor::for_row(row), cell_center(column, row)))
    })
}

/// Spawn the full brick grid.
fn spawn_bricks(mut commands: Commands) {
    for (color, position) in level_layout() {
        commands.spawn((
            Name::new(format!("Brick {:?}", color)),
            Brick { color },
            Sprite {
                color: color.to_color(),
                // Leave a thin gap between neighbours.
                custom_size: Some(BRICK_SIZE - Vec2::splat(2.0)),
                ..default()
            },
            Transform::from_translation(position.extend(0.0)),
            DespawnOnExit(Screen::Gameplay),
        ));
    }

    info!("Spawned {} bricks", GRID_COLUMNS * GRID_ROWS);
}

/// Bring every broken brick back when the level is cleared.
fn reset_bricks_on_level_clear(
    mut commands: Commands,
    mut cleared_events: MessageReader<LevelCleared>,
    mut brick_query: Query<(Entity, &Brick, &mut Sprite, &mut Visibility)>,
) {
    if cleared_events.read().count() == 0 {
        return;
    }

    for (entity, brick, mut sprite, mut visibility) in &mut brick_query {
        commands.entity(entity).remove::<(Broken, FadeOut)>();
        sprite.color = brick.color.to_color();
        *visibility = Visibility::Inherited;
    }

    info!("Level reset, all bricks restored");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_size() {
        assert_eq!(level_layout().count(), 60);
    }

    #[test]
    fn test_ten_bricks_per_color() {
        for color in BrickColor::ALL {
            let count = level_layout().filter(|(c, _)| *c == color).count();
            assert_eq!(count, GRID_COLUMNS);
        }
    }

    #[test]
    fn test_rows_in_color_order() {
        let colors: Vec<BrickColor> = level_layout()
            .step_by(GRID_COLUMNS)
            .map(|(color, _)| color)
            .collect();
        assert_eq!(colors, BrickColor::ALL.to_vec());
    }

    #[test]
    fn test_grid_is_centered() {
        let left = cell_center(0, 0);
        let right = cell_center(GRID_COLUMNS - 1, 0);
        assert_eq!(left.x, -right.x);
        // First cell spans screen x 192..256, y 100..132.
        assert_eq!(left, to_world(224.0, 116.0));
    }

    #[test]
    fn test_rows_go_downwards() {
        assert!(cell_center(0, 1).y < cell_center(0, 0).y);
        assert_eq!(cell_center(0, 0).y - cell_center(0, 1).y, BRICK_SIZE.y);
    }
}
