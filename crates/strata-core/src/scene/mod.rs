//! Retained scene graph for the column
//!
//! [`Scene::build`] turns a [`Layout`] and the record store into drawing
//! primitives. Decorations (new-group background and marker, row strips,
//! group labels, separators, depth axis) are plain [`Node`]s; every band
//! keeps a [`BandVisual`] so drags and legend passes can restyle it without
//! a rebuild.
//!
//! Draw order (back to front):
//!
//! ```text
//! new-group background ─> row strips ─> separators ─> marker ─> axis
//!   ─> group labels ─> bands (rect + label)
//! ```

mod band;
pub mod svg;

pub use band::{BandGeometry, BandVisual, Emphasis};

use crate::color::{
    Rgb, AXIS, GROUP_LABEL, NEW_GROUP_BACKGROUND, NEW_GROUP_MARKER, ROW_STRIP, SEPARATOR,
};
use crate::config::LayoutConfig;
use crate::layout::Layout;
use crate::model::{BandId, BandRecord};
use crate::store::RecordStore;

/// Dash pattern of group separators
pub const SEPARATOR_DASH: [f32; 2] = [6.0, 4.0];
/// Number of intervals on the depth axis
pub const AXIS_TICKS: usize = 10;

/// Horizontal text anchor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    Start,
    Middle,
    End,
}

/// Outline style
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub color: Rgb,
    pub width: f32,
    pub dash: Option<[f32; 2]>,
}

impl Stroke {
    pub fn solid(color: Rgb, width: f32) -> Self {
        Self {
            color,
            width,
            dash: None,
        }
    }

    pub fn dashed(color: Rgb, width: f32, dash: [f32; 2]) -> Self {
        Self {
            color,
            width,
            dash: Some(dash),
        }
    }
}

/// A drawing primitive
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Rect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        fill: Rgb,
        opacity: f32,
        stroke: Option<Stroke>,
    },
    Line {
        from: (f32, f32),
        to: (f32, f32),
        stroke: Stroke,
    },
    Text {
        x: f32,
        y: f32,
        content: String,
        size: f32,
        color: Rgb,
        opacity: f32,
        anchor: Anchor,
    },
}

/// What a decoration node represents
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    NewGroupBackground,
    NewGroupMarker,
    RowStrip,
    GroupLabel,
    Separator,
    Axis,
}

/// A non-band node tagged with its role
#[derive(Debug, Clone, PartialEq)]
pub struct Decoration {
    pub role: Role,
    pub node: Node,
}

/// Full scene for one render pass
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Scene {
    pub width: f32,
    pub height: f32,
    decorations: Vec<Decoration>,
    bands: Vec<BandVisual>,
}

impl Scene {
    /// Clear-and-rebuild from the current layout and store
    pub fn build(layout: &Layout, store: &RecordStore, config: &LayoutConfig) -> Self {
        let mut scene = Self {
            width: layout.width,
            height: layout.height,
            decorations: Vec::new(),
            bands: Vec::new(),
        };
        if layout.rows.is_empty() {
            return scene;
        }

        let (plot_left, plot_right) = layout.x.range();
        let bandwidth = layout.y.bandwidth();

        if let Some(row) = layout.new_group_row {
            if let Some(top) = layout.y.gap_above(row) {
                scene.push(
                    Role::NewGroupBackground,
                    Node::Rect {
                        x: 0.0,
                        y: top,
                        width: plot_right,
                        height: (layout.plot_bottom() - top).max(0.0),
                        fill: NEW_GROUP_BACKGROUND,
                        opacity: config.bands.new_group_background_opacity,
                        stroke: None,
                    },
                );
            }
        }

        for row in &layout.rows {
            let Some(top) = layout.y.position(row.index) else {
                continue;
            };
            if !row.is_empty() {
                scene.push(
                    Role::RowStrip,
                    Node::Rect {
                        x: plot_left,
                        y: top,
                        width: plot_right - plot_left,
                        height: bandwidth,
                        fill: ROW_STRIP,
                        opacity: 1.0,
                        stroke: None,
                    },
                );
            }
            if row.separator_above() {
                if let Some(y) = layout.y.gap_above(row.index) {
                    scene.push(
                        Role::Separator,
                        Node::Line {
                            from: (0.0, y),
                            to: (plot_right, y),
                            stroke: Stroke::dashed(SEPARATOR, 2.0, SEPARATOR_DASH),
                        },
                    );
                }
            }
        }

        if let Some(y) = layout.new_group_row.and_then(|r| layout.y.gap_above(r)) {
            scene.push(
                Role::NewGroupMarker,
                Node::Line {
                    from: (0.0, y),
                    to: (plot_right, y),
                    stroke: Stroke::solid(NEW_GROUP_MARKER, 2.0),
                },
            );
        }

        scene.push_axis(layout);

        for row in layout.rows.iter().filter(|r| r.shows_label()) {
            let Some(top) = layout.y.position(row.index) else {
                continue;
            };
            scene.push(
                Role::GroupLabel,
                Node::Text {
                    x: plot_left - 10.0,
                    y: top + bandwidth / 2.0,
                    content: row.group.clone(),
                    size: config.bands.group_label_size,
                    color: GROUP_LABEL,
                    opacity: 1.0,
                    anchor: Anchor::End,
                },
            );
        }

        for row in &layout.rows {
            let Some(top) = layout.y.position(row.index) else {
                continue;
            };
            for id in &row.members {
                if let Some(record) = store.band(*id) {
                    scene.bands.push(BandVisual::new(
                        record,
                        top,
                        bandwidth,
                        row.is_new,
                        &layout.x,
                        &config.bands,
                    ));
                }
            }
        }

        log::debug!(
            "build: {} decorations, {} bands",
            scene.decorations.len(),
            scene.bands.len()
        );
        scene
    }

    fn push(&mut self, role: Role, node: Node) {
        self.decorations.push(Decoration { role, node });
    }

    fn push_axis(&mut self, layout: &Layout) {
        let (left, right) = layout.x.range();
        let y = layout.plot_bottom();
        self.push(
            Role::Axis,
            Node::Line {
                from: (left, y),
                to: (right, y),
                stroke: Stroke::solid(AXIS, 1.0),
            },
        );
        for i in 0..=AXIS_TICKS {
            let value = i as f64 / AXIS_TICKS as f64;
            let x = layout.x.map(value);
            self.push(
                Role::Axis,
                Node::Line {
                    from: (x, y),
                    to: (x, y + 5.0),
                    stroke: Stroke::solid(AXIS, 1.0),
                },
            );
            self.push(
                Role::Axis,
                Node::Text {
                    x,
                    y: y + 16.0,
                    content: format!("{:.1}", value),
                    size: 10.0,
                    color: AXIS,
                    opacity: 1.0,
                    anchor: Anchor::Middle,
                },
            );
        }
    }

    pub fn decorations(&self) -> &[Decoration] {
        &self.decorations
    }

    /// Decorations with a given role
    #[cfg(test)]
    pub(crate) fn with_role(&self, role: Role) -> impl Iterator<Item = &Node> {
        self.decorations
            .iter()
            .filter(move |d| d.role == role)
            .map(|d| &d.node)
    }

    pub fn bands(&self) -> &[BandVisual] {
        &self.bands
    }

    pub fn bands_mut(&mut self) -> &mut [BandVisual] {
        &mut self.bands
    }

    pub fn band(&self, id: BandId) -> Option<&BandVisual> {
        self.bands.iter().find(|b| b.id == id)
    }

    pub fn band_mut(&mut self, id: BandId) -> Option<&mut BandVisual> {
        self.bands.iter_mut().find(|b| b.id == id)
    }

    /// Re-sync one band's geometry, label and colours from its record
    ///
    /// Returns false if the band is not part of this scene.
    pub fn refresh_band(
        &mut self,
        record: &BandRecord,
        layout: &Layout,
        config: &LayoutConfig,
    ) -> bool {
        match self.band_mut(record.id) {
            Some(visual) => {
                visual.sync(record, &layout.x, &config.bands);
                true
            }
            None => false,
        }
    }

    /// Standalone SVG document of this scene
    pub fn to_svg(&self, config: &LayoutConfig) -> String {
        svg::to_svg(self, config)
    }

    /// Flatten to primitives in draw order
    pub fn nodes(&self, config: &LayoutConfig) -> Vec<Node> {
        let mut nodes: Vec<Node> = self.decorations.iter().map(|d| d.node.clone()).collect();
        for band in &self.bands {
            nodes.extend(band.nodes(&config.bands));
        }
        nodes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::LayoutMode;
    use crate::model::GroupRecord;

    fn store(reference: &[&str]) -> RecordStore {
        RecordStore::from_parts(
            vec![
                BandRecord::new("F1", "G1", 0.0, 0.3),
                BandRecord::new("F2", "G1", 0.3, 1.0),
                BandRecord::new("F1", "G3", 0.1, 0.2),
            ],
            vec![
                GroupRecord::new("G1", 1),
                GroupRecord::new("G3", 2),
                GroupRecord::new("G2", 3),
            ],
            reference.iter().map(|s| s.to_string()).collect(),
        )
    }

    fn build(store: &RecordStore, mode: LayoutMode) -> (Layout, Scene) {
        let config = LayoutConfig::default();
        let layout = Layout::compute(store, mode, &config.canvas);
        let scene = Scene::build(&layout, store, &config);
        (layout, scene)
    }

    #[test]
    fn test_single_new_group_marker_at_first_new_row() {
        let store = store(&["G1", "G2"]);
        let (layout, scene) = build(&store, LayoutMode::Collapsed);

        let markers: Vec<_> = scene.with_role(Role::NewGroupMarker).collect();
        assert_eq!(markers.len(), 1);
        let expected = layout.y.gap_above(1);
        match markers[0] {
            Node::Line { from, .. } => assert_eq!(Some(from.1), expected),
            other => panic!("unexpected marker node {other:?}"),
        }
        assert_eq!(scene.with_role(Role::NewGroupBackground).count(), 1);
    }

    #[test]
    fn test_no_marker_without_reference_order() {
        let store = store(&[]);
        let (_, scene) = build(&store, LayoutMode::Collapsed);
        assert_eq!(scene.with_role(Role::NewGroupMarker).count(), 0);
        assert_eq!(scene.with_role(Role::NewGroupBackground).count(), 0);
    }

    #[test]
    fn test_labels_strips_and_separators() {
        let store = store(&[]);
        let (_, scene) = build(&store, LayoutMode::Expanded);

        // G1 splits into two rows, G3 one, G2 is empty
        assert_eq!(scene.with_role(Role::GroupLabel).count(), 3);
        assert_eq!(scene.with_role(Role::RowStrip).count(), 3);
        assert_eq!(scene.with_role(Role::Separator).count(), 2);
        assert_eq!(scene.bands().len(), 3);
    }

    #[test]
    fn test_new_group_bands_styled_translucent() {
        let store = store(&["G1", "G2"]);
        let (_, scene) = build(&store, LayoutMode::Collapsed);
        let style = LayoutConfig::default().bands;
        let g3 = scene.bands().iter().find(|b| b.group == "G3").unwrap();
        assert!(g3.is_new);
        assert_eq!(g3.opacity(&style), style.new_group_opacity);
        let g1 = scene.bands().iter().find(|b| b.group == "G1").unwrap();
        assert_eq!(g1.opacity(&style), style.established_opacity);
    }

    #[test]
    fn test_empty_layout_gives_empty_scene() {
        let store = RecordStore::new();
        let (_, scene) = build(&store, LayoutMode::Collapsed);
        assert!(scene.decorations().is_empty());
        assert!(scene.bands().is_empty());
    }

    #[test]
    fn test_refresh_band_updates_label() {
        let mut store = store(&[]);
        let (layout, mut scene) = build(&store, LayoutMode::Collapsed);
        let id = store.bands()[0].id;
        assert!(store.write_back(id, 0.25, 0.5));
        let record = store.band(id).unwrap().clone();
        assert!(scene.refresh_band(&record, &layout, &LayoutConfig::default()));
        assert_eq!(scene.band(id).unwrap().label, "F1 (0.25, 0.50)");
    }
}
