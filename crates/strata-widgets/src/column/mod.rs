//! Interactive column canvas
//!
//! Paints the editor's scene and turns pointer input into [`ColumnEvent`]s
//! in canvas coordinates. The application forwards them to the editor as
//! pointer commands.

mod canvas;
mod view;

pub use canvas::{ColumnCanvas, ColumnInteraction};
pub use view::column_view;

use std::time::Duration;

/// Two presses closer than this count as a double click
pub const DOUBLE_CLICK_INTERVAL: Duration = Duration::from_millis(400);

/// Maximum pointer travel between the two presses of a double click
pub const DOUBLE_CLICK_SLOP: f32 = 4.0;

/// Pointer input on the column, in canvas coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColumnEvent {
    Pressed { x: f32, y: f32 },
    Dragged { x: f32, y: f32 },
    Released,
    DoubleClicked { x: f32, y: f32 },
}

impl ColumnEvent {
    /// The matching editor command
    pub fn into_command(self) -> strata_core::Command {
        use strata_core::Command;
        match self {
            Self::Pressed { x, y } => Command::PointerDown { x, y },
            Self::Dragged { x, y } => Command::PointerMove { x, y },
            Self::Released => Command::PointerUp,
            Self::DoubleClicked { x, y } => Command::DoubleClick { x, y },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_core::Command;

    #[test]
    fn test_events_map_to_pointer_commands() {
        assert_eq!(
            ColumnEvent::Pressed { x: 1.0, y: 2.0 }.into_command(),
            Command::PointerDown { x: 1.0, y: 2.0 }
        );
        assert_eq!(ColumnEvent::Released.into_command(), Command::PointerUp);
        assert_eq!(
            ColumnEvent::DoubleClicked { x: 3.0, y: 4.0 }.into_command(),
            Command::DoubleClick { x: 3.0, y: 4.0 }
        );
    }
}
