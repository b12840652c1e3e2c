//! Row layout engine
//!
//! Turns the record store into an ordered list of rows plus the x (depth)
//! and y (row) scales.
//!
//! ## Modes
//!
//! - **Collapsed**: one row per group, canonical order first, then groups
//!   only seen on bands (first-seen order). Fixed canvas height.
//! - **Expanded**: groups with two or more distinct formations get one row
//!   per formation (first-seen order within the group); other groups keep
//!   a single row. Height grows with the row count, never below the
//!   collapsed height.
//!
//! ```text
//!  G1 ┆ ███ F1 ███                     <- first row of G1: label + separator
//!     ┆            ███████ F2 ███████  <- same group, no label
//! ┄┄┄┄┼┄┄┄┄┄┄┄┄┄┄┄┄┄┄┄┄┄┄┄┄┄┄┄┄┄┄┄┄┄┄┄  <- bold dashed separator
//!  G2 ┆                                <- empty group: label only
//! ```
//!
//! Layout is a pure function of the store, the mode and the canvas config;
//! calling it twice on unchanged input yields identical rows and scales.

use std::collections::HashSet;

use crate::config::CanvasConfig;
use crate::model::BandId;
use crate::scale::{BandScale, LinearScale};
use crate::store::RecordStore;

/// Row layout mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LayoutMode {
    /// One row per group
    #[default]
    Collapsed,
    /// One row per distinct formation within multi-formation groups
    Expanded,
}

impl LayoutMode {
    pub fn from_expanded(expanded: bool) -> Self {
        if expanded {
            Self::Expanded
        } else {
            Self::Collapsed
        }
    }

    pub fn is_expanded(self) -> bool {
        self == Self::Expanded
    }

    pub fn toggled(self) -> Self {
        Self::from_expanded(!self.is_expanded())
    }
}

/// One laid-out row
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    /// Position in the row domain
    pub index: usize,
    /// Owning group name
    pub group: String,
    /// Formation carried by this row when a group is split (expanded mode)
    pub formation: Option<String>,
    /// Bands drawn on this row, in store order
    pub members: Vec<BandId>,
    /// First row of its group (carries the label and the separator)
    pub first_of_group: bool,
    /// Group is new relative to the reference order, or unknown
    pub is_new: bool,
    /// Group appears in the canonical order
    pub listed: bool,
}

impl Row {
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Group label is drawn once per group
    pub fn shows_label(&self) -> bool {
        self.first_of_group
    }

    /// Bold separator above every group start except the very first row
    pub fn separator_above(&self) -> bool {
        self.first_of_group && self.index > 0
    }
}

/// Result of a layout pass
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    pub mode: LayoutMode,
    pub rows: Vec<Row>,
    /// Depth `[0, 1]` onto the plot's horizontal extent
    pub x: LinearScale,
    /// Row index onto the plot's vertical extent
    pub y: BandScale,
    pub width: f32,
    pub height: f32,
    /// First row whose group is new (drives the single new-group marker)
    pub new_group_row: Option<usize>,
    plot_top: f32,
    plot_bottom: f32,
}

impl Layout {
    /// Compute rows and scales for the current store contents
    pub fn compute(store: &RecordStore, mode: LayoutMode, canvas: &CanvasConfig) -> Self {
        let mut rows = Vec::new();
        for (group, listed) in row_domain(store) {
            let is_new = store.is_new_group(group) || !listed;
            match mode {
                LayoutMode::Collapsed => push_collapsed(&mut rows, store, group, listed, is_new),
                LayoutMode::Expanded => push_expanded(&mut rows, store, group, listed, is_new),
            }
        }

        let height = match mode {
            LayoutMode::Collapsed => canvas.collapsed_height,
            LayoutMode::Expanded => {
                let needed = canvas.margin_top
                    + canvas.margin_bottom
                    + rows.len() as f32 * canvas.expanded_row_height;
                needed.max(canvas.collapsed_height)
            }
        };
        let plot_top = canvas.margin_top;
        let plot_bottom = height - canvas.margin_bottom;

        let x = LinearScale::unit(canvas.plot_left(), canvas.plot_right());
        let y = BandScale::new(rows.len(), (plot_top, plot_bottom), canvas.row_padding);
        let new_group_row = rows.iter().find(|r| r.is_new).map(|r| r.index);

        log::debug!(
            "layout: {:?} -> {} rows, {}x{}px, new-group row {:?}",
            mode,
            rows.len(),
            canvas.width,
            height,
            new_group_row
        );

        Self {
            mode,
            rows,
            x,
            y,
            width: canvas.width,
            height,
            new_group_row,
            plot_top,
            plot_bottom,
        }
    }

    pub fn plot_top(&self) -> f32 {
        self.plot_top
    }

    pub fn plot_bottom(&self) -> f32 {
        self.plot_bottom
    }

    /// Vertical extent `(top, height)` of a row
    #[cfg(test)]
    pub(crate) fn row_span(&self, index: usize) -> Option<(f32, f32)> {
        self.y.position(index).map(|top| (top, self.y.bandwidth()))
    }

    /// Row a band is drawn on
    #[cfg(test)]
    pub(crate) fn row_of(&self, id: BandId) -> Option<&Row> {
        self.rows.iter().find(|r| r.members.contains(&id))
    }

    /// All rows belonging to a group
    #[cfg(test)]
    pub(crate) fn rows_for_group<'a>(&'a self, group: &'a str) -> impl Iterator<Item = &'a Row> + 'a {
        self.rows.iter().filter(move |r| r.group == group)
    }
}

/// Group sequence walked by the layout: canonical order, then unlisted
/// groups seen on bands. The flag tells whether the group is listed.
pub fn row_domain(store: &RecordStore) -> Vec<(&str, bool)> {
    store
        .initial_order()
        .iter()
        .map(|g| (g.as_str(), true))
        .chain(store.unlisted_groups().into_iter().map(|g| (g, false)))
        .collect()
}

fn push_collapsed(rows: &mut Vec<Row>, store: &RecordStore, group: &str, listed: bool, is_new: bool) {
    rows.push(Row {
        index: rows.len(),
        group: group.to_string(),
        formation: None,
        members: store.members_of(group).map(|b| b.id).collect(),
        first_of_group: true,
        is_new,
        listed,
    });
}

fn push_expanded(rows: &mut Vec<Row>, store: &RecordStore, group: &str, listed: bool, is_new: bool) {
    let mut seen = HashSet::new();
    let formations: Vec<&str> = store
        .members_of(group)
        .map(|b| b.formation_name.as_str())
        .filter(|f| seen.insert(*f))
        .collect();

    // Zero or one formation: same single row as collapsed mode
    if formations.len() < 2 {
        push_collapsed(rows, store, group, listed, is_new);
        return;
    }

    for (i, formation) in formations.iter().enumerate() {
        rows.push(Row {
            index: rows.len(),
            group: group.to_string(),
            formation: Some(formation.to_string()),
            members: store
                .members_of(group)
                .filter(|b| b.formation_name == *formation)
                .map(|b| b.id)
                .collect(),
            first_of_group: i == 0,
            is_new,
            listed,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BandRecord, GroupRecord};

    fn groups(names: &[&str]) -> Vec<GroupRecord> {
        names
            .iter()
            .enumerate()
            .map(|(i, n)| GroupRecord::new(*n, i as u32 + 1))
            .collect()
    }

    fn refs(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    /// G1 holds F1 (0.0-0.3, twice) and F2 (0.3-1.0); G2 is empty
    fn scenario() -> RecordStore {
        RecordStore::from_parts(
            vec![
                BandRecord::new("F1", "G1", 0.0, 0.3),
                BandRecord::new("F2", "G1", 0.3, 1.0),
                BandRecord::new("F1", "G1", 0.0, 0.3),
            ],
            groups(&["G1", "G2"]),
            refs(&["G2"]),
        )
    }

    #[test]
    fn test_scenario_collapsed() {
        let store = scenario();
        let layout = Layout::compute(&store, LayoutMode::Collapsed, &CanvasConfig::default());

        let names: Vec<_> = layout.rows.iter().map(|r| r.group.as_str()).collect();
        assert_eq!(names, ["G1", "G2"]);
        assert_eq!(layout.rows[0].members.len(), 3);
        assert!(layout.rows[1].is_empty());
        assert!(layout.rows[0].is_new);
        assert!(!layout.rows[1].is_new);
        assert_eq!(layout.new_group_row, Some(0));
        assert_eq!(layout.height, CanvasConfig::default().collapsed_height);
    }

    #[test]
    fn test_scenario_expanded() {
        let store = scenario();
        let layout = Layout::compute(&store, LayoutMode::Expanded, &CanvasConfig::default());

        let rows: Vec<_> = layout
            .rows
            .iter()
            .map(|r| (r.group.as_str(), r.formation.as_deref(), r.members.len()))
            .collect();
        assert_eq!(
            rows,
            [("G1", Some("F1"), 2), ("G1", Some("F2"), 1), ("G2", None, 0)]
        );
        assert!(layout.rows[0].shows_label());
        assert!(!layout.rows[1].shows_label());
        assert!(layout.rows[2].separator_above());
        assert!(!layout.rows[0].separator_above());
    }

    #[test]
    fn test_expansion_counts() {
        let store = RecordStore::from_parts(
            vec![
                BandRecord::new("A", "G", 0.0, 0.1),
                BandRecord::new("A", "G", 0.2, 0.3),
                BandRecord::new("B", "G", 0.5, 0.6),
            ],
            groups(&["G", "Empty"]),
            vec![],
        );
        let canvas = CanvasConfig::default();

        let collapsed = Layout::compute(&store, LayoutMode::Collapsed, &canvas);
        assert_eq!(collapsed.rows_for_group("G").count(), 1);
        assert_eq!(collapsed.rows_for_group("Empty").count(), 1);

        let expanded = Layout::compute(&store, LayoutMode::Expanded, &canvas);
        assert_eq!(expanded.rows_for_group("G").count(), 2);
        assert_eq!(expanded.rows_for_group("Empty").count(), 1);
        assert!(expanded.rows_for_group("Empty").all(|r| r.is_empty()));
    }

    #[test]
    fn test_new_group_detection() {
        let store = RecordStore::from_parts(
            vec![BandRecord::new("F", "G3", 0.1, 0.2)],
            groups(&["G1", "G3", "G2"]),
            refs(&["G1", "G2"]),
        );
        let layout = Layout::compute(&store, LayoutMode::Collapsed, &CanvasConfig::default());
        let flagged: Vec<_> = layout
            .rows
            .iter()
            .filter(|r| r.is_new)
            .map(|r| r.group.as_str())
            .collect();
        assert_eq!(flagged, ["G3"]);
        assert_eq!(layout.new_group_row, Some(1));
    }

    #[test]
    fn test_layout_is_idempotent() {
        let store = scenario();
        let canvas = CanvasConfig::default();
        for mode in [LayoutMode::Collapsed, LayoutMode::Expanded] {
            let a = Layout::compute(&store, mode, &canvas);
            let b = Layout::compute(&store, mode, &canvas);
            assert_eq!(a, b);
            assert_eq!(a.y.step().to_bits(), b.y.step().to_bits());
        }
    }

    #[test]
    fn test_unlisted_groups_trail_and_count_as_new() {
        let store = RecordStore::from_parts(
            vec![
                BandRecord::new("X", "Ghost", 0.1, 0.2),
                BandRecord::new("Y", "G1", 0.1, 0.2),
            ],
            groups(&["G1"]),
            vec![],
        );
        let layout = Layout::compute(&store, LayoutMode::Collapsed, &CanvasConfig::default());
        assert_eq!(layout.rows.len(), 2);
        assert_eq!(layout.rows[1].group, "Ghost");
        assert!(!layout.rows[1].listed);
        assert!(layout.rows[1].is_new);
        assert_eq!(layout.new_group_row, Some(1));
    }

    #[test]
    fn test_expanded_height_grows_with_floor() {
        let canvas = CanvasConfig::default();
        let names: Vec<String> = (0..40).map(|i| format!("G{i}")).collect();
        let many: Vec<&str> = names.iter().map(String::as_str).collect();
        let store = RecordStore::from_parts(vec![], groups(&many), vec![]);

        let expanded = Layout::compute(&store, LayoutMode::Expanded, &canvas);
        let expected =
            canvas.margin_top + canvas.margin_bottom + 40.0 * canvas.expanded_row_height;
        assert_eq!(expanded.height, expected.max(canvas.collapsed_height));

        let small = RecordStore::from_parts(vec![], groups(&["G"]), vec![]);
        let floor = Layout::compute(&small, LayoutMode::Expanded, &canvas);
        assert_eq!(floor.height, canvas.collapsed_height);
    }

    #[test]
    fn test_empty_store_degrades_to_empty_layout() {
        let layout = Layout::compute(&RecordStore::new(), LayoutMode::Expanded, &CanvasConfig::default());
        assert!(layout.rows.is_empty());
        assert_eq!(layout.new_group_row, None);
        assert_eq!(layout.row_span(0), None);
    }
}
