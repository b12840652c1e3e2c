//! Record store: the single source of truth for bands and groups
//!
//! The store owns the band list, the group list, the canonical group order
//! fixed at load time (append-only afterwards) and the optional reference
//! order used to flag new groups. All mutation goes through the methods
//! here; manual add/edit is validated, drag write-back is not (the drag
//! engine clamps on its own).

use std::collections::HashSet;

use crate::error::ValidationError;
use crate::model::{BandId, BandRecord, GroupRecord};
use crate::validate::{check_interval, check_name, IntervalRule};

#[derive(Debug, Clone, Default)]
pub struct RecordStore {
    bands: Vec<BandRecord>,
    groups: Vec<GroupRecord>,
    /// Canonical row sequence; every name at most once
    initial_order: Vec<String>,
    /// External ordering, only used to classify groups as new
    reference_order: Vec<String>,
    next_id: u64,
}

impl RecordStore {
    /// Empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from loaded records
    #[cfg(test)]
    pub(crate) fn from_parts(
        bands: Vec<BandRecord>,
        groups: Vec<GroupRecord>,
        reference_order: Vec<String>,
    ) -> Self {
        let mut store = Self::new();
        store.replace(bands, groups, reference_order);
        store
    }

    /// Replace the whole store contents
    ///
    /// Every band gets a fresh id; the canonical order is the group list
    /// with duplicate names dropped.
    pub fn replace(
        &mut self,
        bands: Vec<BandRecord>,
        groups: Vec<GroupRecord>,
        reference_order: Vec<String>,
    ) {
        let mut seen = HashSet::new();
        self.groups = groups
            .into_iter()
            .filter(|g| seen.insert(g.group_name.clone()))
            .collect();
        self.initial_order = self.groups.iter().map(|g| g.group_name.clone()).collect();
        self.reference_order = reference_order;

        self.bands = bands;
        for band in &mut self.bands {
            self.next_id += 1;
            band.id = BandId(self.next_id);
        }

        log::info!(
            "replace: {} bands, {} groups, reference order of {}",
            self.bands.len(),
            self.groups.len(),
            self.reference_order.len()
        );
    }

    pub fn bands(&self) -> &[BandRecord] {
        &self.bands
    }

    pub fn groups(&self) -> &[GroupRecord] {
        &self.groups
    }

    pub fn initial_order(&self) -> &[String] {
        &self.initial_order
    }

    pub fn reference_order(&self) -> &[String] {
        &self.reference_order
    }

    pub fn is_empty(&self) -> bool {
        self.bands.is_empty() && self.groups.is_empty()
    }

    /// Look up a band by id
    pub fn band(&self, id: BandId) -> Option<&BandRecord> {
        self.bands.iter().find(|b| b.id == id)
    }

    fn band_mut(&mut self, id: BandId) -> Option<&mut BandRecord> {
        self.bands.iter_mut().find(|b| b.id == id)
    }

    /// A group is new iff a reference order exists and does not list it
    pub fn is_new_group(&self, group_name: &str) -> bool {
        !self.reference_order.is_empty() && !self.reference_order.iter().any(|g| g == group_name)
    }

    /// Bands belonging to a group, in store order
    pub fn members_of<'a>(&'a self, group_name: &'a str) -> impl Iterator<Item = &'a BandRecord> + 'a {
        self.bands.iter().filter(move |b| b.group_name == group_name)
    }

    /// Groups referenced by bands but missing from the canonical order,
    /// in first-seen order
    pub fn unlisted_groups(&self) -> Vec<&str> {
        let mut seen: HashSet<&str> = self.initial_order.iter().map(String::as_str).collect();
        self.bands
            .iter()
            .map(|b| b.group_name.as_str())
            .filter(|g| seen.insert(*g))
            .collect()
    }

    /// Distinct formation names in first-seen order
    pub fn formations(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.bands
            .iter()
            .map(|b| b.formation_name.as_str())
            .filter(|n| seen.insert(*n))
            .collect()
    }

    /// Append a group to the canonical order if it is not there yet
    ///
    /// Returns true if the group was appended.
    pub fn ensure_group(&mut self, group_name: &str) -> bool {
        if self.initial_order.iter().any(|g| g == group_name) {
            return false;
        }
        let sequence_index = self.groups.len() as u32 + 1;
        self.groups.push(GroupRecord::new(group_name, sequence_index));
        self.initial_order.push(group_name.to_string());
        log::info!("ensure_group: appended '{}' at position {}", group_name, sequence_index);
        true
    }

    /// Manually add a band
    ///
    /// Requires non-blank names, numeric `0 <= top < bottom <= 1` and a
    /// formation name not already present.
    pub fn add_band(&mut self, mut band: BandRecord) -> Result<BandId, ValidationError> {
        check_name(&band.formation_name, ValidationError::EmptyFormation)?;
        check_name(&band.group_name, ValidationError::EmptyGroup)?;
        let top = band
            .top_value()
            .ok_or(ValidationError::NotNumeric { field: "Top" })?;
        let bottom = band
            .bottom_value()
            .ok_or(ValidationError::NotNumeric { field: "Bottom" })?;
        check_interval(top, bottom, IntervalRule::Strict)?;
        if self.bands.iter().any(|b| b.formation_name == band.formation_name) {
            return Err(ValidationError::DuplicateFormation(band.formation_name));
        }

        self.ensure_group(&band.group_name);
        self.next_id += 1;
        band.id = BandId(self.next_id);
        log::info!(
            "add_band: '{}' in '{}' [{}, {}] as {}",
            band.formation_name,
            band.group_name,
            top,
            bottom,
            band.id
        );
        let id = band.id;
        self.bands.push(band);
        Ok(id)
    }

    /// Edit a band's interval and group
    ///
    /// Requires numeric `0 <= top <= bottom <= 1` and a non-blank group.
    pub fn update_band(
        &mut self,
        id: BandId,
        top: f64,
        bottom: f64,
        group_name: &str,
    ) -> Result<(), ValidationError> {
        check_interval(top, bottom, IntervalRule::AllowEqual)?;
        check_name(group_name, ValidationError::EmptyGroup)?;
        if self.band(id).is_none() {
            return Err(ValidationError::UnknownBand(id));
        }

        self.ensure_group(group_name);
        if let Some(band) = self.band_mut(id) {
            band.set_interval(top, bottom);
            band.group_name = group_name.to_string();
            log::info!(
                "update_band: {} '{}' -> '{}' [{}, {}]",
                id,
                band.formation_name,
                group_name,
                top,
                bottom
            );
        }
        Ok(())
    }

    /// Drag write-back: overwrite the interval without validation
    ///
    /// A missing id is a silent no-op; returns whether a record was updated.
    pub fn write_back(&mut self, id: BandId, top: f64, bottom: f64) -> bool {
        match self.band_mut(id) {
            Some(band) => {
                band.set_interval(top, bottom);
                true
            }
            None => {
                log::debug!("write_back: {} not in store, skipping", id);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Depth;

    fn sample() -> RecordStore {
        RecordStore::from_parts(
            vec![
                BandRecord::new("F1", "G1", 0.0, 0.3),
                BandRecord::new("F2", "G1", 0.3, 1.0),
                BandRecord::new("F3", "G9", 0.2, 0.4),
            ],
            vec![
                GroupRecord::new("G1", 1),
                GroupRecord::new("G2", 2),
                GroupRecord::new("G1", 3),
            ],
            vec!["G2".to_string()],
        )
    }

    #[test]
    fn test_ids_are_unique() {
        let store = sample();
        let ids: HashSet<_> = store.bands().iter().map(|b| b.id).collect();
        assert_eq!(ids.len(), 3);
        assert!(!ids.contains(&BandId::default()));
    }

    #[test]
    fn test_initial_order_drops_duplicates() {
        let store = sample();
        assert_eq!(store.initial_order(), ["G1", "G2"]);
        assert_eq!(store.unlisted_groups(), vec!["G9"]);
    }

    #[test]
    fn test_new_group_classification() {
        let store = sample();
        assert!(store.is_new_group("G1"));
        assert!(!store.is_new_group("G2"));

        let no_reference = RecordStore::from_parts(vec![], vec![GroupRecord::new("G1", 1)], vec![]);
        assert!(!no_reference.is_new_group("G1"));
    }

    #[test]
    fn test_add_band_validates() {
        let mut store = sample();
        let before = store.bands().to_vec();

        let inverted = BandRecord::new("F4", "G1", 0.5, 0.5);
        assert!(matches!(
            store.add_band(inverted),
            Err(ValidationError::TopNotBeforeBottom { .. })
        ));

        let duplicate = BandRecord::new("F1", "G1", 0.1, 0.2);
        assert_eq!(
            store.add_band(duplicate),
            Err(ValidationError::DuplicateFormation("F1".to_string()))
        );

        let mut raw = BandRecord::new("F5", "G1", 0.1, 0.2);
        raw.top = Depth::Raw("x".to_string());
        assert_eq!(
            store.add_band(raw),
            Err(ValidationError::NotNumeric { field: "Top" })
        );

        assert_eq!(store.bands(), before.as_slice());
    }

    #[test]
    fn test_add_band_to_unseen_group_appends_order() {
        let mut store = sample();
        let id = store.add_band(BandRecord::new("F4", "G7", 0.1, 0.2)).unwrap();
        assert_eq!(store.band(id).unwrap().formation_name, "F4");
        assert_eq!(store.initial_order(), ["G1", "G2", "G7"]);
        assert_eq!(store.groups().last().unwrap().sequence_index, 3);
    }

    #[test]
    fn test_update_band() {
        let mut store = sample();
        let id = store.bands()[0].id;

        store.update_band(id, 0.1, 0.1, "G2").unwrap();
        let band = store.band(id).unwrap();
        assert_eq!(band.top, Depth::Value(0.1));
        assert_eq!(band.group_name, "G2");

        assert!(store.update_band(id, 0.6, 0.5, "G2").is_err());
        assert_eq!(store.band(id).unwrap().top, Depth::Value(0.1));

        assert_eq!(
            store.update_band(BandId(999), 0.1, 0.2, "G1"),
            Err(ValidationError::UnknownBand(BandId(999)))
        );
    }

    #[test]
    fn test_write_back_targets_identity_not_value() {
        let mut store = RecordStore::from_parts(
            vec![
                BandRecord::new("Twin", "G1", 0.2, 0.4),
                BandRecord::new("Twin", "G1", 0.2, 0.4),
            ],
            vec![GroupRecord::new("G1", 1)],
            vec![],
        );
        let second = store.bands()[1].id;
        assert!(store.write_back(second, 0.5, 0.7));
        assert_eq!(store.bands()[0].top, Depth::Value(0.2));
        assert_eq!(store.bands()[1].top, Depth::Value(0.5));

        assert!(!store.write_back(BandId(42), 0.0, 1.0));
    }

    #[test]
    fn test_formations_first_seen() {
        let store = sample();
        assert_eq!(store.formations(), vec!["F1", "F2", "F3"]);
    }
}
