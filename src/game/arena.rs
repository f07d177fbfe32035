//! The play area.
//!
//! The level is laid out in screen space: a 1024x768 rectangle with the
//! origin at the top-left corner and y pointing down. The world is
//! centre-origin with y pointing up, so all authored positions go through
//! [`to_world`].

use bevy::prelude::*;

/// Width of the play area in pixels.
pub const ARENA_WIDTH: f32 = 1024.0;

/// Height of the play area in pixels.
pub const ARENA_HEIGHT: f32 = 768.0;

/// World x of the left wall.
pub const LEFT_WALL: f32 = -ARENA_WIDTH / 2.0;

/// World x of the right wall.
pub const RIGHT_WALL: f32 = ARENA_WIDTH / 2.0;

/// World y of the top wall.
pub const TOP_WALL: f32 = ARENA_HEIGHT / 2.0;

/// World y of the open bottom edge.
pub const BOTTOM_EDGE: f32 = -ARENA_HEIGHT / 2.0;

/// Convert a screen-space position to a world position.
pub fn to_world(x: f32, y: f32) -> Vec2 {
    Vec2::new(x - ARENA_WIDTH / 2.0, ARENA_HEIGHT / 2.0 - y)
}

/// Convert a screen-space x to a world x.
pub fn to_world_x(x: f32) -> f32 {
    x - ARENA_WIDTH / 2.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_corners_map_to_walls() {
        assert_eq!(to_world(0.0, 0.0), Vec2::new(LEFT_WALL, TOP_WALL));
        assert_eq!(
            to_world(ARENA_WIDTH, ARENA_HEIGHT),
            Vec2::new(RIGHT_WALL, BOTTOM_EDGE)
        );
    }

    #[test]
    fn test_centre_maps_to_origin() {
        assert_eq!(to_world(512.0, 384.0), Vec2::ZERO);
    }

    #[test]
    fn test_paddle_start_position() {
        assert_eq!(to_world(512.0, 700.0), Vec2::new(0.0, -316.0));
    }
}
