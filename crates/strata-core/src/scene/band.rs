//! Per-band visual state: geometry, classification and emphasis

use super::{Anchor, Node, Stroke};
use crate::classify::{classify, Classification};
use crate::color::SEPARATOR;
use crate::config::BandStyleConfig;
use crate::model::{BandId, BandRecord, Depth};
use crate::scale::LinearScale;

/// Pixel geometry of one band rectangle and its two edge handles
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandGeometry {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub handle_width: f32,
}

impl BandGeometry {
    /// Place a band interval on its row
    ///
    /// Values that do not parse fall back to the domain ends and everything
    /// is clamped to `[0, 1]` for display. Intervals narrower than
    /// `min_width` pixels are widened around their midpoint.
    pub fn compute(
        top: &Depth,
        bottom: &Depth,
        x: &LinearScale,
        row_top: f32,
        row_height: f32,
        min_width: f32,
        handle_width: f32,
    ) -> Self {
        let top = top.as_f64().unwrap_or(0.0).clamp(0.0, 1.0);
        let bottom = bottom.as_f64().unwrap_or(1.0).clamp(0.0, 1.0);
        let (lo, hi) = (top.min(bottom), top.max(bottom));

        let mut left = x.map(lo);
        let mut width = x.span(hi - lo);
        if width < min_width {
            left = x.map((lo + hi) / 2.0) - min_width / 2.0;
            width = min_width;
        }

        Self {
            x: left,
            y: row_top,
            width,
            height: row_height,
            handle_width,
        }
    }

    /// Horizontal extent of the left (top) handle, just outside the body
    pub fn left_handle(&self) -> (f32, f32) {
        (self.x - self.handle_width, self.x)
    }

    /// Horizontal extent of the right (bottom) handle, just outside the body
    pub fn right_handle(&self) -> (f32, f32) {
        let right = self.x + self.width;
        (right, right + self.handle_width)
    }

    pub fn center(&self) -> (f32, f32) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn contains_y(&self, y: f32) -> bool {
        y >= self.y && y <= self.y + self.height
    }
}

/// Legend-driven emphasis applied on top of the baseline style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Emphasis {
    #[default]
    Baseline,
    /// Matches the highlighted formation
    Highlighted,
    /// Another formation is highlighted
    Dimmed,
    /// Another formation is shown exclusively
    Hidden,
    /// Matches the exclusively shown formation
    Exclusive,
}

/// Everything needed to draw and hit-test one band
#[derive(Debug, Clone, PartialEq)]
pub struct BandVisual {
    pub id: BandId,
    pub formation: String,
    pub group: String,
    /// Owning row belongs to a new group
    pub is_new: bool,
    pub row_top: f32,
    pub row_height: f32,
    pub geometry: BandGeometry,
    pub class: Classification,
    pub label: String,
    pub emphasis: Emphasis,
    /// Drag outline is shown
    pub dragging: bool,
}

impl BandVisual {
    pub fn new(
        record: &BandRecord,
        row_top: f32,
        row_height: f32,
        is_new: bool,
        x: &LinearScale,
        style: &BandStyleConfig,
    ) -> Self {
        Self {
            id: record.id,
            formation: record.formation_name.clone(),
            group: record.group_name.clone(),
            is_new,
            row_top,
            row_height,
            geometry: BandGeometry::compute(
                &record.top,
                &record.bottom,
                x,
                row_top,
                row_height,
                style.min_visual_width,
                style.handle_width,
            ),
            class: classify(record),
            label: record.label(),
            emphasis: Emphasis::Baseline,
            dragging: false,
        }
    }

    /// Recompute geometry, label and colours from the record
    pub fn sync(&mut self, record: &BandRecord, x: &LinearScale, style: &BandStyleConfig) {
        self.formation = record.formation_name.clone();
        self.geometry = BandGeometry::compute(
            &record.top,
            &record.bottom,
            x,
            self.row_top,
            self.row_height,
            style.min_visual_width,
            style.handle_width,
        );
        self.class = classify(record);
        self.label = record.label();
    }

    /// Hidden bands ignore pointer input
    pub fn is_interactive(&self) -> bool {
        self.emphasis != Emphasis::Hidden
    }

    pub fn opacity(&self, style: &BandStyleConfig) -> f32 {
        match self.emphasis {
            Emphasis::Hidden => style.hidden_opacity,
            Emphasis::Exclusive => 1.0,
            _ if self.class.abnormal => 1.0,
            Emphasis::Highlighted => style.highlight_opacity,
            Emphasis::Dimmed => style.dimmed_opacity,
            Emphasis::Baseline if self.is_new => style.new_group_opacity,
            Emphasis::Baseline => style.established_opacity,
        }
    }

    pub fn stroke(&self, style: &BandStyleConfig) -> Option<Stroke> {
        if self.dragging {
            return Some(Stroke::solid(SEPARATOR, style.drag_stroke_width));
        }
        match self.emphasis {
            Emphasis::Highlighted => Some(Stroke::solid(SEPARATOR, style.highlight_stroke_width)),
            Emphasis::Dimmed | Emphasis::Hidden => None,
            Emphasis::Baseline | Emphasis::Exclusive => (self.is_new && !self.class.abnormal)
                .then(|| Stroke::solid(self.class.fill, style.new_group_stroke_width)),
        }
    }

    /// Primitives for this band: the rectangle, then its label
    pub fn nodes(&self, style: &BandStyleConfig) -> Vec<Node> {
        let g = &self.geometry;
        let mut nodes = vec![Node::Rect {
            x: g.x,
            y: g.y,
            width: g.width,
            height: g.height,
            fill: self.class.fill,
            opacity: self.opacity(style),
            stroke: self.stroke(style),
        }];

        if self.emphasis != Emphasis::Hidden {
            let text_opacity = match self.emphasis {
                Emphasis::Dimmed if !self.class.abnormal => style.dimmed_opacity,
                _ => 1.0,
            };
            let (cx, cy) = g.center();
            nodes.push(Node::Text {
                x: cx,
                y: cy,
                content: self.label.clone(),
                size: style.label_size,
                color: self.class.text,
                opacity: text_opacity,
                anchor: Anchor::Middle,
            });
        }
        nodes
    }
}
