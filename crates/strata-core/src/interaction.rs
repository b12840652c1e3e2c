//! Per-band drag state machine
//!
//! ```text
//!         pointer down on body/handle
//!   Idle ─────────────────────────────> Dragging { id, handle }
//!    ^                                     │  pointer move: recompute,
//!    │           pointer up                │  write back, restyle
//!    └─────────────────────────────────────┘
//! ```
//!
//! Edge handles overwrite one boundary (left = top, right = bottom) and swap
//! the pair when they cross. Body drags shift both boundaries by the same
//! delta, each clamped to `[0, 1]` on its own, so the interval can shrink at
//! the domain ends.

use crate::config::LayoutConfig;
use crate::layout::Layout;
use crate::model::{BandId, BandRecord};
use crate::scale::LinearScale;
use crate::scene::Scene;
use crate::store::RecordStore;

/// Part of a band grabbed by the pointer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragHandle {
    /// Whole interval moves
    Body,
    /// Edits `top`
    Left,
    /// Edits `bottom`
    Right,
}

impl DragHandle {
    fn flipped(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
            Self::Body => Self::Body,
        }
    }
}

/// Band and handle under a pointer position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hit {
    pub id: BandId,
    pub handle: DragHandle,
}

/// Find the topmost interactive band under `(x, y)`
///
/// Edge handles win over the body of the same band.
pub fn hit_test(scene: &Scene, x: f32, y: f32) -> Option<Hit> {
    scene
        .bands()
        .iter()
        .rev()
        .filter(|b| b.is_interactive() && b.geometry.contains_y(y))
        .find_map(|b| {
            let g = &b.geometry;
            let (l0, l1) = g.left_handle();
            let (r0, r1) = g.right_handle();
            let handle = if x >= l0 && x < l1 {
                DragHandle::Left
            } else if x > r0 && x <= r1 {
                DragHandle::Right
            } else if x >= g.x && x <= g.x + g.width {
                DragHandle::Body
            } else {
                return None;
            };
            Some(Hit { id: b.id, handle })
        })
}

/// Move one boundary to `value` (clamped to `[0, 1]`)
///
/// Returns the new `(top, bottom)` and the handle now being dragged, which
/// flips when the boundaries cross.
pub fn adjust_boundary(top: f64, bottom: f64, handle: DragHandle, value: f64) -> (f64, f64, DragHandle) {
    let value = value.clamp(0.0, 1.0);
    let (top, bottom) = match handle {
        DragHandle::Left => (value, bottom),
        DragHandle::Right => (top, value),
        DragHandle::Body => (top, bottom),
    };
    if top > bottom {
        (bottom, top, handle.flipped())
    } else {
        (top, bottom, handle)
    }
}

/// Centre the interval on `pointer_x`, keeping its pixel width inside the axis
pub fn move_formation(top: f64, bottom: f64, pointer_x: f32, x: &LinearScale) -> (f64, f64) {
    let lo = top.min(bottom);
    let width = x.span((top - bottom).abs());
    let min_left = x.map(0.0);
    let max_left = x.map(1.0) - width;
    let left = (pointer_x - width / 2.0).min(max_left).max(min_left);
    let delta = x.invert(left) - lo;
    (
        (top + delta).clamp(0.0, 1.0),
        (bottom + delta).clamp(0.0, 1.0),
    )
}

/// Numeric boundaries a drag starts from; unparsable values use the domain ends
fn drag_values(record: &BandRecord) -> (f64, f64) {
    (
        record.top_value().unwrap_or(0.0).clamp(0.0, 1.0),
        record.bottom_value().unwrap_or(1.0).clamp(0.0, 1.0),
    )
}

/// An active drag
#[derive(Debug, Clone, PartialEq)]
pub struct DragSession {
    pub id: BandId,
    pub handle: DragHandle,
    /// Record as it was when the drag started
    pub snapshot: BandRecord,
    /// Live values, kept even if the store no longer holds the band
    current: BandRecord,
}

impl DragSession {
    pub fn current(&self) -> &BandRecord {
        &self.current
    }
}

#[derive(Debug, Clone, Default)]
pub struct DragController {
    session: Option<DragSession>,
}

impl DragController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_dragging(&self) -> bool {
        self.session.is_some()
    }

    pub fn session(&self) -> Option<&DragSession> {
        self.session.as_ref()
    }

    /// Pointer down: start a drag if the pointer is over a band
    pub fn begin(&mut self, scene: &mut Scene, store: &RecordStore, x: f32, y: f32) -> Option<Hit> {
        let hit = hit_test(scene, x, y)?;
        let record = store.band(hit.id)?.clone();
        if let Some(visual) = scene.band_mut(hit.id) {
            visual.dragging = true;
        }
        log::info!(
            "begin: dragging {} '{}' by {:?}",
            hit.id,
            record.formation_name,
            hit.handle
        );
        self.session = Some(DragSession {
            id: hit.id,
            handle: hit.handle,
            snapshot: record.clone(),
            current: record,
        });
        Some(hit)
    }

    /// Pointer move: recompute the interval, write it back and restyle the band
    pub fn update(
        &mut self,
        x: f32,
        store: &mut RecordStore,
        layout: &Layout,
        scene: &mut Scene,
        config: &LayoutConfig,
    ) -> Option<(f64, f64)> {
        let session = self.session.as_mut()?;
        let (top, bottom) = drag_values(&session.current);

        let (top, bottom) = match session.handle {
            DragHandle::Body => move_formation(top, bottom, x, &layout.x),
            handle => {
                let (top, bottom, handle) =
                    adjust_boundary(top, bottom, handle, layout.x.invert(x));
                session.handle = handle;
                (top, bottom)
            }
        };

        session.current.set_interval(top, bottom);
        store.write_back(session.id, top, bottom);
        scene.refresh_band(&session.current, layout, config);
        log::trace!("update: {} -> ({:.4}, {:.4})", session.id, top, bottom);
        Some((top, bottom))
    }

    /// Pointer up: clear the drag outline
    pub fn end(&mut self, scene: &mut Scene) -> Option<DragSession> {
        let session = self.session.take()?;
        if let Some(visual) = scene.band_mut(session.id) {
            visual.dragging = false;
        }
        log::info!(
            "end: {} settled at {}",
            session.id,
            session.current.label()
        );
        Some(session)
    }

    /// Forget the session without touching the scene (after a rebuild)
    pub fn cancel(&mut self) {
        self.session = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::LayoutMode;
    use crate::model::GroupRecord;

    fn setup() -> (RecordStore, Layout, Scene, LayoutConfig) {
        let config = LayoutConfig::default();
        let store = RecordStore::from_parts(
            vec![
                BandRecord::new("F1", "G1", 0.2, 0.4),
                BandRecord::new("F1", "G1", 0.2, 0.4),
            ],
            vec![GroupRecord::new("G1", 1)],
            vec![],
        );
        let layout = Layout::compute(&store, LayoutMode::Collapsed, &config.canvas);
        let scene = Scene::build(&layout, &store, &config);
        (store, layout, scene, config)
    }

    fn row_mid(layout: &Layout) -> f32 {
        let (top, height) = layout.row_span(0).unwrap();
        top + height / 2.0
    }

    #[test]
    fn test_adjust_boundary_clamps_and_swaps() {
        assert_eq!(adjust_boundary(0.2, 0.4, DragHandle::Left, -0.5), (0.0, 0.4, DragHandle::Left));
        assert_eq!(adjust_boundary(0.2, 0.4, DragHandle::Right, 1.7), (0.2, 1.0, DragHandle::Right));
        assert_eq!(adjust_boundary(0.2, 0.4, DragHandle::Left, 0.6), (0.4, 0.6, DragHandle::Right));
        assert_eq!(adjust_boundary(0.2, 0.4, DragHandle::Right, 0.1), (0.1, 0.2, DragHandle::Left));
    }

    #[test]
    fn test_handle_drags_preserve_ordering() {
        let mut top = 0.3;
        let mut bottom = 0.6;
        let mut handle = DragHandle::Left;
        // Deterministic pseudo-random walk over and past the domain ends
        let mut seed: u64 = 0x2545_f491_4f6c_dd1d;
        for _ in 0..2000 {
            seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            let value = (seed >> 11) as f64 / (1u64 << 53) as f64 * 1.6 - 0.3;
            if seed & 1 == 0 {
                handle = handle.flipped();
            }
            let (t, b, h) = adjust_boundary(top, bottom, handle, value);
            assert!(0.0 <= t && t <= b && b <= 1.0, "{t} {b}");
            top = t;
            bottom = b;
            handle = h;
        }
    }

    #[test]
    fn test_move_formation_keeps_width_inside() {
        let x = LinearScale::unit(100.0, 1100.0);
        let (t, b) = move_formation(0.2, 0.4, 600.0, &x);
        assert!((t - 0.4).abs() < 1e-6);
        assert!((b - 0.6).abs() < 1e-6);

        // Pushed past the right end: left edge stops at x(1) - width
        let (t, b) = move_formation(0.2, 0.4, 5000.0, &x);
        assert!((t - 0.8).abs() < 1e-6);
        assert!((b - 1.0).abs() < 1e-6);

        let (t, b) = move_formation(0.2, 0.4, -5000.0, &x);
        assert!(t.abs() < 1e-6);
        assert!((b - 0.2).abs() < 1e-6);
    }

    #[test]
    fn test_move_formation_clamps_each_bound() {
        // Reversed interval: each bound is clamped on its own
        let x = LinearScale::unit(0.0, 100.0);
        let (t, b) = move_formation(0.9, 0.1, 100.0, &x);
        assert!(t <= 1.0 && b >= 0.0);
        assert!((t - 1.0).abs() < 1e-6);
        assert!((b - 0.2).abs() < 1e-6);
    }

    #[test]
    fn test_hit_test_handles_before_body() {
        let (_, layout, scene, _) = setup();
        let y = row_mid(&layout);
        let g = scene.bands()[1].geometry;

        let left = hit_test(&scene, g.x - 2.0, y).unwrap();
        assert_eq!(left.handle, DragHandle::Left);
        // Topmost (last drawn) of two identical bands wins
        assert_eq!(left.id, scene.bands()[1].id);

        let right = hit_test(&scene, g.x + g.width + 2.0, y).unwrap();
        assert_eq!(right.handle, DragHandle::Right);
        let body = hit_test(&scene, g.x + g.width / 2.0, y).unwrap();
        assert_eq!(body.handle, DragHandle::Body);

        assert!(hit_test(&scene, g.x - 50.0, y).is_none());
        assert!(hit_test(&scene, g.x + 1.0, layout.plot_bottom() + 10.0).is_none());
    }

    #[test]
    fn test_drag_writes_back_by_id() {
        let (mut store, layout, mut scene, config) = setup();
        let mut drag = DragController::new();
        let y = row_mid(&layout);
        let g = scene.bands()[1].geometry;

        let hit = drag.begin(&mut scene, &store, g.x + g.width + 2.0, y).unwrap();
        assert!(scene.band(hit.id).unwrap().dragging);

        let (top, bottom) = drag
            .update(layout.x.map(0.9), &mut store, &layout, &mut scene, &config)
            .unwrap();
        assert!((top - 0.2).abs() < 1e-6);
        assert!((bottom - 0.9).abs() < 1e-4);

        // Only the grabbed duplicate changed
        let first = &store.bands()[0];
        assert_eq!(first.bottom_value(), Some(0.4));
        let second = store.band(hit.id).unwrap();
        assert!((second.bottom_value().unwrap() - 0.9).abs() < 1e-4);
        assert!(scene.band(hit.id).unwrap().label.ends_with("0.90)"));

        let session = drag.end(&mut scene).unwrap();
        assert_eq!(session.snapshot.bottom_value(), Some(0.4));
        assert!(!scene.band(hit.id).unwrap().dragging);
        assert!(!drag.is_dragging());
    }

    #[test]
    fn test_crossing_handles_flip_session_side() {
        let (mut store, layout, mut scene, config) = setup();
        let mut drag = DragController::new();
        let y = row_mid(&layout);
        let g = scene.bands()[0].geometry;
        drag.begin(&mut scene, &store, g.x + g.width + 2.0, y);

        drag.update(layout.x.map(0.1), &mut store, &layout, &mut scene, &config);
        assert_eq!(drag.session().unwrap().handle, DragHandle::Left);
        let (top, bottom) = drag
            .update(layout.x.map(0.05), &mut store, &layout, &mut scene, &config)
            .unwrap();
        assert!(top < bottom);
        assert!((bottom - 0.2).abs() < 1e-6);
    }

    #[test]
    fn test_write_back_miss_still_updates_scene() {
        let (mut store, layout, mut scene, config) = setup();
        let mut drag = DragController::new();
        let y = row_mid(&layout);
        let g = scene.bands()[0].geometry;
        let hit = drag.begin(&mut scene, &store, g.x + g.width / 2.0, y).unwrap();

        store.replace(vec![], vec![], vec![]);
        assert!(drag
            .update(layout.x.map(0.5), &mut store, &layout, &mut scene, &config)
            .is_some());
        assert!(scene.band(hit.id).unwrap().label.starts_with("F1 (0.40"));
    }
}
