//! Dashboard summary counts.

use crate::collection::CollectionKey;
use crate::constants::AVAILABLE_BEDS;
use crate::store::RecordStore;
use crate::HospitalResult;
use serde::Serialize;

/// Record counts shown on the dashboard cards.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct DashboardSummary {
    pub patients: usize,
    pub doctors: usize,
    pub staff: usize,
    pub medicines: usize,
    pub appointments: usize,
    pub machinery: usize,
    pub available_beds: usize,
}

#[derive(Clone, Debug)]
pub struct DashboardService {
    store: RecordStore,
}

impl DashboardService {
    pub fn new(store: RecordStore) -> Self {
        Self { store }
    }

    /// Counts the records of each summarised collection, read fresh.
    pub fn summary(&self) -> HospitalResult<DashboardSummary> {
        let count = |key: CollectionKey| self.store.load(key).map(|records| records.len());

        Ok(DashboardSummary {
            patients: count(CollectionKey::Patients)?,
            doctors: count(CollectionKey::Doctors)?,
            staff: count(CollectionKey::Staff)?,
            medicines: count(CollectionKey::Medicines)?,
            appointments: count(CollectionKey::Appointments)?,
            machinery: count(CollectionKey::Machinery)?,
            available_beds: AVAILABLE_BEDS,
        })
    }
}
