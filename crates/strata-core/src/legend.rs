//! Legend model: one entry per distinct formation

use crate::color::{formation_color, Rgb};
use crate::store::RecordStore;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegendEntry {
    pub formation: String,
    pub color: Rgb,
}

/// Distinct formations in first-seen order with their categorical colour
pub fn legend_entries(store: &RecordStore) -> Vec<LegendEntry> {
    store
        .formations()
        .into_iter()
        .map(|name| LegendEntry {
            formation: name.to_string(),
            color: formation_color(name),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BandRecord, GroupRecord};

    #[test]
    fn test_legend_entries_follow_first_seen_order() {
        let store = RecordStore::from_parts(
            vec![
                BandRecord::new("B", "G1", 0.0, 0.1),
                BandRecord::new("A", "G1", 0.2, 0.3),
                BandRecord::new("B", "G2", 0.9, 0.1),
            ],
            vec![GroupRecord::new("G1", 1), GroupRecord::new("G2", 2)],
            vec![],
        );
        let entries = legend_entries(&store);
        let names: Vec<_> = entries.iter().map(|e| e.formation.as_str()).collect();
        assert_eq!(names, ["B", "A"]);
        assert_eq!(entries[0].color, formation_color("B"));
    }
}
