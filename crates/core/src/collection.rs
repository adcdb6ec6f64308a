//! Storage keys for the persisted collections.

use crate::HospitalError;
use std::fmt;
use std::str::FromStr;

/// Fixed storage key of one collection. Each key owns exactly one file.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CollectionKey {
    Patients,
    Doctors,
    Staff,
    Medicines,
    LabTests,
    Appointments,
    Machinery,
    Billing,
}

impl CollectionKey {
    /// Every collection, in the order the records screens present them.
    pub const ALL: [CollectionKey; 8] = [
        CollectionKey::Patients,
        CollectionKey::Doctors,
        CollectionKey::Staff,
        CollectionKey::Medicines,
        CollectionKey::LabTests,
        CollectionKey::Appointments,
        CollectionKey::Machinery,
        CollectionKey::Billing,
    ];

    /// Collections managed purely through the generic record screens.
    ///
    /// Appointments and billing have dedicated workflows and are excluded.
    pub const ENTITIES: [CollectionKey; 6] = [
        CollectionKey::Patients,
        CollectionKey::Doctors,
        CollectionKey::Staff,
        CollectionKey::Medicines,
        CollectionKey::LabTests,
        CollectionKey::Machinery,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            CollectionKey::Patients => "patients",
            CollectionKey::Doctors => "doctors",
            CollectionKey::Staff => "staff",
            CollectionKey::Medicines => "medicines",
            CollectionKey::LabTests => "lab_tests",
            CollectionKey::Appointments => "appointments",
            CollectionKey::Machinery => "machinery",
            CollectionKey::Billing => "billing",
        }
    }

    pub fn is_entity(self) -> bool {
        Self::ENTITIES.contains(&self)
    }
}

impl fmt::Display for CollectionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CollectionKey {
    type Err = HospitalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|key| key.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| HospitalError::UnknownCollection(wanted.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str_accepts_storage_names() {
        for key in CollectionKey::ALL {
            assert_eq!(key.as_str().parse::<CollectionKey>().unwrap(), key);
        }
        assert_eq!(
            " Lab_Tests ".parse::<CollectionKey>().unwrap(),
            CollectionKey::LabTests
        );
    }

    #[test]
    fn test_from_str_rejects_unknown_key() {
        let err = "beds".parse::<CollectionKey>().unwrap_err();
        assert!(matches!(err, HospitalError::UnknownCollection(ref k) if k == "beds"));
    }

    #[test]
    fn test_entities_exclude_workflow_collections() {
        assert!(CollectionKey::Patients.is_entity());
        assert!(!CollectionKey::Appointments.is_entity());
        assert!(!CollectionKey::Billing.is_entity());
    }
}
