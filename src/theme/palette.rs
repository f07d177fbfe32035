use bevy::prelude::*;

/// #ddd369
pub const TITLE_TEXT: Color = Color::srgb(0.867, 0.827, 0.412);

/// #f0f0f5
pub const HEADER_TEXT: Color = Color::srgb(0.94, 0.94, 0.96);

/// #a0a4b8
pub const LABEL_TEXT: Color = Color::srgb(0.627, 0.643, 0.722);

/// #fcfbcc
pub const BUTTON_TEXT: Color = Color::srgb(0.988, 0.984, 0.800);
/// #4666bf
pub const BUTTON_BACKGROUND: Color = Color::srgb(0.275, 0.400, 0.750);
/// #6299d1
pub const BUTTON_HOVERED_BACKGROUND: Color = Color::srgb(0.384, 0.600, 0.820);
/// #3d4999
pub const BUTTON_PRESSED_BACKGROUND: Color = Color::srgb(0.239, 0.286, 0.600);
