//! crates/meter_capture_core/src/store.rs
//!
//! The in-progress draft meter and the meters finalized for the current session.

use crate::domain::{DraftUpdate, MeterReading};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeterRecordStore {
    draft: MeterReading,
    meters: Vec<MeterReading>,
}

impl MeterRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restores a store from previously finalized meters, with an empty draft.
    pub fn from_meters(meters: Vec<MeterReading>) -> Self {
        Self {
            draft: MeterReading::default(),
            meters,
        }
    }

    pub fn draft(&self) -> &MeterReading {
        &self.draft
    }

    pub fn meters(&self) -> &[MeterReading] {
        &self.meters
    }

    pub fn len(&self) -> usize {
        self.meters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.meters.is_empty()
    }

    pub fn update_draft(&mut self, update: DraftUpdate) {
        self.draft.apply(update);
    }

    /// Appends the draft to the finalized meters and starts a new empty draft.
    /// Incomplete drafts are accepted. Returns the index of the new meter.
    pub fn finalize_draft(&mut self) -> usize {
        let finalized = std::mem::take(&mut self.draft);
        self.meters.push(finalized);
        self.meters.len() - 1
    }

    /// Meters whose scanned code contains `query`, or whose energy type label
    /// contains it ignoring case. Finalized order is preserved.
    pub fn search(&self, query: &str) -> Vec<MeterReading> {
        self.meters
            .iter()
            .filter(|meter| meter.matches(query))
            .cloned()
            .collect()
    }

    /// Drops all meters and the draft.
    pub fn clear(&mut self) {
        self.draft = MeterReading::default();
        self.meters.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::EnergyType;

    fn meter(code: &str, energy: EnergyType) -> MeterReading {
        MeterReading {
            scanned_code: Some(code.to_string()),
            energy_type: energy,
            ..Default::default()
        }
    }

    fn sample_store() -> MeterRecordStore {
        MeterRecordStore::from_meters(vec![
            meter("M123", EnergyType::Electricity),
            meter("X999", EnergyType::Water),
        ])
    }

    #[test]
    fn finalize_appends_last_set_values_and_resets_draft() {
        let mut store = MeterRecordStore::new();
        store.update_draft(DraftUpdate::Count(3));
        store.update_draft(DraftUpdate::ScannedCode(Some("A1".to_string())));
        store.update_draft(DraftUpdate::ScannedCode(Some("A2".to_string())));
        store.update_draft(DraftUpdate::EnergyType(EnergyType::Heat));
        store.update_draft(DraftUpdate::MeterPhoto(Some("file:///m.jpg".to_string())));

        let index = store.finalize_draft();

        assert_eq!(index, 0);
        let appended = &store.meters()[0];
        assert_eq!(appended.count, 3);
        assert_eq!(appended.scanned_code.as_deref(), Some("A2"));
        assert_eq!(appended.energy_type, EnergyType::Heat);
        assert_eq!(appended.meter_photo.as_deref(), Some("file:///m.jpg"));
        assert_eq!(appended.distance_photo, None);
        assert_eq!(store.draft(), &MeterReading::default());
    }

    #[test]
    fn finalize_accepts_an_empty_draft() {
        let mut store = MeterRecordStore::new();
        store.finalize_draft();
        store.finalize_draft();
        assert_eq!(store.len(), 2);
        assert!(store.meters().iter().all(|m| m == &MeterReading::default()));
    }

    #[test]
    fn finalized_meters_are_not_touched_by_later_draft_edits() {
        let mut store = MeterRecordStore::new();
        store.update_draft(DraftUpdate::Count(1));
        store.finalize_draft();
        store.update_draft(DraftUpdate::Count(9));
        assert_eq!(store.meters()[0].count, 1);
        assert_eq!(store.draft().count, 9);
    }

    #[test]
    fn search_matches_code_substring() {
        let results = sample_store().search("123");
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].scanned_code.as_deref(), Some("M123"));
    }

    #[test]
    fn search_matches_energy_type_ignoring_case() {
        let results = sample_store().search("strom");
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].scanned_code.as_deref(), Some("M123"));

        let results = sample_store().search("WASSER");
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].scanned_code.as_deref(), Some("X999"));
    }

    #[test]
    fn search_code_match_is_case_sensitive() {
        assert!(sample_store().search("m123").is_empty());
    }

    #[test]
    fn search_skips_meters_without_code_instead_of_failing() {
        let mut store = sample_store();
        store.finalize_draft();
        let results = store.search("9");
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].scanned_code.as_deref(), Some("X999"));
    }

    #[test]
    fn empty_query_returns_every_meter_in_order() {
        let mut store = sample_store();
        store.finalize_draft();
        assert_eq!(store.search("").len(), 3);
    }

    #[test]
    fn clear_drops_meters_and_draft() {
        let mut store = sample_store();
        store.update_draft(DraftUpdate::Count(4));
        store.clear();
        assert!(store.is_empty());
        assert_eq!(store.draft(), &MeterReading::default());
    }
}
