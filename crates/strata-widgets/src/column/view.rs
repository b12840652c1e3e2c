//! View function for the column canvas

use iced::widget::Canvas;
use iced::{Element, Length};
use strata_core::Editor;

use super::canvas::ColumnCanvas;
use super::ColumnEvent;

/// Create the interactive column element
///
/// The canvas is sized to the current layout (the height grows in
/// expanded mode); wrap it in a scrollable when embedding.
///
/// # Example
///
/// ```ignore
/// let column = column_view(&self.editor, Message::Column);
/// ```
pub fn column_view<'a, Message>(
    editor: &'a Editor,
    on_event: impl Fn(ColumnEvent) -> Message + 'a,
) -> Element<'a, Message>
where
    Message: Clone + 'a,
{
    let scene = editor.scene();
    Canvas::new(ColumnCanvas {
        scene,
        config: editor.config(),
        on_event,
    })
    .width(Length::Fixed(scene.width))
    .height(Length::Fixed(scene.height))
    .into()
}
