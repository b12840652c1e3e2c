//! Legend-driven highlight and exclusive visibility
//!
//! Both passes only restyle [`BandVisual`](crate::scene::BandVisual)s in an
//! existing scene. They never touch the record store or the layout.

use crate::scene::{Emphasis, Scene};

/// Current legend emphasis
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HighlightController {
    highlighted: Option<String>,
    exclusive: Option<String>,
}

impl HighlightController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn highlighted(&self) -> Option<&str> {
        self.highlighted.as_deref()
    }

    pub fn exclusive(&self) -> Option<&str> {
        self.exclusive.as_deref()
    }

    /// Single click: emphasise one formation, dim the others
    ///
    /// Any previous emphasis is reset first. Clicking the highlighted
    /// formation again returns to the baseline.
    pub fn highlight(&mut self, scene: &mut Scene, formation: &str) {
        let toggled_off = self.highlighted.as_deref() == Some(formation);
        self.exclusive = None;
        self.highlighted = (!toggled_off).then(|| formation.to_string());
        log::debug!("highlight: {:?}", self.highlighted);
        self.apply(scene);
    }

    /// Double click: show one formation exclusively, or leave exclusive mode
    pub fn toggle_exclusive(&mut self, scene: &mut Scene, formation: &str) {
        let toggled_off = self.exclusive.as_deref() == Some(formation);
        self.highlighted = None;
        self.exclusive = (!toggled_off).then(|| formation.to_string());
        log::debug!("toggle_exclusive: {:?}", self.exclusive);
        self.apply(scene);
    }

    /// Drop all emphasis
    pub fn clear(&mut self, scene: &mut Scene) {
        self.highlighted = None;
        self.exclusive = None;
        self.apply(scene);
    }

    /// Restyle every band from the current state (also used after a rebuild)
    pub fn apply(&self, scene: &mut Scene) {
        for band in scene.bands_mut() {
            band.emphasis = match (&self.exclusive, &self.highlighted) {
                (Some(name), _) if band.formation == *name => Emphasis::Exclusive,
                (Some(_), _) => Emphasis::Hidden,
                (None, Some(name)) if band.formation == *name => Emphasis::Highlighted,
                (None, Some(_)) => Emphasis::Dimmed,
                (None, None) => Emphasis::Baseline,
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LayoutConfig;
    use crate::layout::{Layout, LayoutMode};
    use crate::model::{BandRecord, GroupRecord};
    use crate::store::RecordStore;

    fn scene() -> Scene {
        let store = RecordStore::from_parts(
            vec![
                BandRecord::new("A", "G1", 0.1, 0.2),
                BandRecord::new("B", "G1", 0.3, 0.4),
                BandRecord::new("A", "G2", 0.5, 0.6),
                BandRecord::new("C", "G2", 0.9, 0.1),
            ],
            vec![GroupRecord::new("G1", 1), GroupRecord::new("G2", 2)],
            vec![],
        );
        let config = LayoutConfig::default();
        let layout = Layout::compute(&store, LayoutMode::Collapsed, &config.canvas);
        Scene::build(&layout, &store, &config)
    }

    fn emphasis(scene: &Scene) -> Vec<Emphasis> {
        scene.bands().iter().map(|b| b.emphasis).collect()
    }

    #[test]
    fn test_highlight_splits_match_and_others() {
        let mut scene = scene();
        let mut hl = HighlightController::new();
        hl.highlight(&mut scene, "A");
        use Emphasis::*;
        assert_eq!(emphasis(&scene), [Highlighted, Dimmed, Highlighted, Dimmed]);

        // Abnormal band "C" stays opaque while dimmed
        let style = LayoutConfig::default().bands;
        assert_eq!(scene.bands()[3].opacity(&style), 1.0);
        assert!(scene.bands()[0].stroke(&style).is_some());
        assert!(scene.bands()[1].stroke(&style).is_none());
    }

    #[test]
    fn test_highlight_never_stacks() {
        let mut scene = scene();
        let mut hl = HighlightController::new();
        hl.highlight(&mut scene, "A");
        hl.highlight(&mut scene, "B");
        use Emphasis::*;
        assert_eq!(emphasis(&scene), [Dimmed, Highlighted, Dimmed, Dimmed]);

        hl.highlight(&mut scene, "B");
        assert_eq!(hl.highlighted(), None);
        assert!(emphasis(&scene).iter().all(|e| *e == Baseline));
    }

    #[test]
    fn test_exclusive_toggle() {
        let mut scene = scene();
        let mut hl = HighlightController::new();
        hl.highlight(&mut scene, "B");
        hl.toggle_exclusive(&mut scene, "A");
        assert_eq!(hl.highlighted(), None);
        use Emphasis::*;
        assert_eq!(emphasis(&scene), [Exclusive, Hidden, Exclusive, Hidden]);
        assert!(!scene.bands()[1].is_interactive());

        hl.toggle_exclusive(&mut scene, "A");
        assert_eq!(hl.exclusive(), None);
        assert!(emphasis(&scene).iter().all(|e| *e == Baseline));
    }

    #[test]
    fn test_exclusive_switches_formation() {
        let mut scene = scene();
        let mut hl = HighlightController::new();
        hl.toggle_exclusive(&mut scene, "A");
        hl.toggle_exclusive(&mut scene, "B");
        assert_eq!(hl.exclusive(), Some("B"));
        use Emphasis::*;
        assert_eq!(emphasis(&scene), [Hidden, Exclusive, Hidden, Hidden]);
    }
}
