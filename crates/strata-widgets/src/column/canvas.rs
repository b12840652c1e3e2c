//! Canvas Program for the column
//!
//! Drawing is a straight walk over the scene's primitives; all layout and
//! styling decisions were already made by the core scene builder.

use std::time::Instant;

use iced::alignment::{Horizontal, Vertical};
use iced::widget::canvas::{self, Event, Frame, Geometry, LineDash, Path, Program, Stroke, Text};
use iced::{mouse, Point, Rectangle, Size, Theme};
use strata_core::interaction::{hit_test, DragHandle};
use strata_core::scene::{self, Anchor, Node};
use strata_core::{LayoutConfig, Scene};

use super::{ColumnEvent, DOUBLE_CLICK_INTERVAL, DOUBLE_CLICK_SLOP};
use crate::theme::{to_color, with_alpha, CANVAS_BACKGROUND};

/// Canvas state for pointer tracking
#[derive(Debug, Clone, Copy, Default)]
pub struct ColumnInteraction {
    /// A press landed on a band and the button is still down
    pub is_dragging: bool,
    /// Time and position of the last press, for double-click detection
    pub last_press: Option<(Instant, Point)>,
}

impl ColumnInteraction {
    /// Register a left press at `position`
    ///
    /// A second press inside the double-click window and slop becomes a
    /// double click and ends any drag. Otherwise a drag starts when the press
    /// lands on an interactive band.
    pub fn press(&mut self, scene: &Scene, position: Point, now: Instant) -> ColumnEvent {
        let is_double = self.last_press.is_some_and(|(at, p)| {
            now.duration_since(at) <= DOUBLE_CLICK_INTERVAL && p.distance(position) <= DOUBLE_CLICK_SLOP
        });
        if is_double {
            self.last_press = None;
            self.is_dragging = false;
            return ColumnEvent::DoubleClicked {
                x: position.x,
                y: position.y,
            };
        }

        self.last_press = Some((now, position));
        self.is_dragging = hit_test(scene, position.x, position.y).is_some();
        ColumnEvent::Pressed {
            x: position.x,
            y: position.y,
        }
    }

    /// Pointer motion in canvas coordinates, reported only while dragging
    ///
    /// Positions outside the canvas are passed on; the engine clamps.
    pub fn moved(&self, position: Point) -> Option<ColumnEvent> {
        self.is_dragging.then_some(ColumnEvent::Dragged {
            x: position.x,
            y: position.y,
        })
    }

    pub fn release(&mut self) -> Option<ColumnEvent> {
        std::mem::take(&mut self.is_dragging).then_some(ColumnEvent::Released)
    }

    /// Cursor for a pointer at `position` (canvas coordinates)
    pub fn cursor(&self, scene: &Scene, position: Option<Point>) -> mouse::Interaction {
        if self.is_dragging {
            return mouse::Interaction::Grabbing;
        }
        let Some(position) = position else {
            return mouse::Interaction::default();
        };
        match hit_test(scene, position.x, position.y) {
            Some(hit) if hit.handle == DragHandle::Body => mouse::Interaction::Grab,
            Some(_) => mouse::Interaction::ResizingHorizontally,
            None => mouse::Interaction::default(),
        }
    }
}

/// Canvas program drawing a scene and reporting pointer input
pub struct ColumnCanvas<'a, F> {
    pub scene: &'a Scene,
    pub config: &'a LayoutConfig,
    pub on_event: F,
}

impl<'a, Message, F> Program<Message> for ColumnCanvas<'a, F>
where
    Message: Clone,
    F: Fn(ColumnEvent) -> Message,
{
    type State = ColumnInteraction;

    fn update(
        &self,
        interaction: &mut Self::State,
        event: &Event,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> Option<canvas::Action<Message>> {
        let event = match event {
            Event::Mouse(mouse::Event::ButtonPressed(mouse::Button::Left)) => {
                let position = cursor.position_in(bounds)?;
                Some(interaction.press(self.scene, position, Instant::now()))
            }
            Event::Mouse(mouse::Event::CursorMoved { position }) => {
                interaction.moved(Point::new(position.x - bounds.x, position.y - bounds.y))
            }
            Event::Mouse(mouse::Event::ButtonReleased(mouse::Button::Left)) => interaction.release(),
            _ => None,
        }?;
        Some(canvas::Action::publish((self.on_event)(event)))
    }

    fn mouse_interaction(
        &self,
        interaction: &Self::State,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> mouse::Interaction {
        interaction.cursor(self.scene, cursor.position_in(bounds))
    }

    fn draw(
        &self,
        _interaction: &Self::State,
        renderer: &iced::Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<Geometry> {
        let mut frame = Frame::new(renderer, bounds.size());
        frame.fill_rectangle(Point::ORIGIN, bounds.size(), CANVAS_BACKGROUND);

        for node in self.scene.nodes(self.config) {
            draw_node(&mut frame, &node);
        }

        vec![frame.into_geometry()]
    }
}

fn draw_node(frame: &mut Frame, node: &Node) {
    match node {
        Node::Rect {
            x,
            y,
            width,
            height,
            fill,
            opacity,
            stroke,
        } => {
            frame.fill_rectangle(
                Point::new(*x, *y),
                Size::new(*width, *height),
                with_alpha(*fill, *opacity),
            );
            if let Some(stroke) = stroke {
                let outline = Path::rectangle(Point::new(*x, *y), Size::new(*width, *height));
                draw_stroke(frame, &outline, stroke);
            }
        }
        Node::Line { from, to, stroke } => {
            let line = Path::line(Point::new(from.0, from.1), Point::new(to.0, to.1));
            draw_stroke(frame, &line, stroke);
        }
        Node::Text {
            x,
            y,
            content,
            size,
            color,
            opacity,
            anchor,
        } => {
            let align_x = match anchor {
                Anchor::Start => Horizontal::Left,
                Anchor::Middle => Horizontal::Center,
                Anchor::End => Horizontal::Right,
            };
            frame.fill_text(Text {
                content: content.clone(),
                position: Point::new(*x, *y),
                size: (*size).into(),
                color: with_alpha(*color, *opacity),
                align_x: align_x.into(),
                align_y: Vertical::Center.into(),
                ..Text::default()
            });
        }
    }
}

fn draw_stroke(frame: &mut Frame, path: &Path, stroke: &scene::Stroke) {
    let base = Stroke::default()
        .with_color(to_color(stroke.color))
        .with_width(stroke.width);
    match stroke.dash {
        Some(segments) => frame.stroke(
            path,
            Stroke {
                line_dash: LineDash {
                    segments: &segments,
                    offset: 0,
                },
                ..base
            },
        ),
        None => frame.stroke(path, base),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use strata_core::{BandRecord, Dataset, Editor};

    fn editor() -> Editor {
        let bands = vec![BandRecord::new("F1", "G1", 0.2, 0.6)];
        Editor::with_dataset(LayoutConfig::default(), Dataset::new(bands, Vec::new()))
    }

    fn body(editor: &Editor) -> Point {
        let (x, y) = editor.scene().bands()[0].geometry.center();
        Point::new(x, y)
    }

    #[test]
    fn test_second_press_in_place_is_double_click() {
        let editor = editor();
        let at = body(&editor);
        let t0 = Instant::now();
        let mut interaction = ColumnInteraction::default();

        assert_eq!(
            interaction.press(editor.scene(), at, t0),
            ColumnEvent::Pressed { x: at.x, y: at.y }
        );
        assert!(interaction.is_dragging);

        let again = Point::new(at.x + 1.0, at.y);
        assert_eq!(
            interaction.press(editor.scene(), again, t0 + Duration::from_millis(100)),
            ColumnEvent::DoubleClicked { x: again.x, y: again.y }
        );
        assert!(!interaction.is_dragging);
        assert!(interaction.last_press.is_none());
    }

    #[test]
    fn test_slow_or_distant_press_is_single() {
        let editor = editor();
        let at = body(&editor);
        let t0 = Instant::now();
        let mut interaction = ColumnInteraction::default();
        interaction.press(editor.scene(), at, t0);

        let late = t0 + DOUBLE_CLICK_INTERVAL + Duration::from_millis(1);
        assert!(matches!(
            interaction.press(editor.scene(), at, late),
            ColumnEvent::Pressed { .. }
        ));

        let far = Point::new(at.x + DOUBLE_CLICK_SLOP * 2.0, at.y);
        assert!(matches!(
            interaction.press(editor.scene(), far, late + Duration::from_millis(50)),
            ColumnEvent::Pressed { .. }
        ));
    }

    #[test]
    fn test_drag_only_after_press_on_band() {
        let editor = editor();
        let geometry = editor.scene().bands()[0].geometry;
        let mut interaction = ColumnInteraction::default();

        let outside = Point::new(geometry.x - 20.0, geometry.center().1);
        interaction.press(editor.scene(), outside, Instant::now());
        assert!(!interaction.is_dragging);
        assert_eq!(interaction.moved(Point::new(5.0, 5.0)), None);
        assert_eq!(interaction.release(), None);

        interaction.press(editor.scene(), body(&editor), Instant::now() + Duration::from_secs(1));
        assert_eq!(
            interaction.moved(Point::new(-10.0, 5.0)),
            Some(ColumnEvent::Dragged { x: -10.0, y: 5.0 })
        );
        assert_eq!(interaction.release(), Some(ColumnEvent::Released));
        assert!(!interaction.is_dragging);
    }

    #[test]
    fn test_cursor_follows_hit() {
        let editor = editor();
        let geometry = editor.scene().bands()[0].geometry;
        let (_, cy) = geometry.center();
        let (l0, l1) = geometry.left_handle();
        let mut interaction = ColumnInteraction::default();

        assert_eq!(
            interaction.cursor(editor.scene(), Some(body(&editor))),
            mouse::Interaction::Grab
        );
        assert_eq!(
            interaction.cursor(editor.scene(), Some(Point::new((l0 + l1) / 2.0, cy))),
            mouse::Interaction::ResizingHorizontally
        );
        assert_eq!(
            interaction.cursor(editor.scene(), Some(Point::new(geometry.x - 20.0, cy))),
            mouse::Interaction::default()
        );
        assert_eq!(interaction.cursor(editor.scene(), None), mouse::Interaction::default());

        interaction.press(editor.scene(), body(&editor), Instant::now());
        assert_eq!(interaction.cursor(editor.scene(), None), mouse::Interaction::Grabbing);
    }
}
