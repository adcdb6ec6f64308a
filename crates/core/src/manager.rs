//! Schema-driven record management.
//!
//! [`RecordManager`] pairs one [`EntitySchema`] with the [`RecordStore`] and offers the three
//! operations every records screen needs: list, validate-and-add, and delete-by-match. The
//! patients, doctors, staff, medicines, lab tests and machinery screens are all this one type
//! with a different schema. The appointment and billing workflows build on it too.
//!
//! ## Matching semantics
//!
//! Records carry no identifier. A delete names a record by the values shown for it, in schema
//! field order, and removes **every** record whose values are all equal to that selection. Two
//! identical rows are indistinguishable, so deleting one deletes both.

use crate::collection::CollectionKey;
use crate::record::Record;
use crate::schema::EntitySchema;
use crate::store::RecordStore;
use crate::validation::validate_field;
use crate::{HospitalError, HospitalResult, NonEmptyText};
use std::collections::HashMap;

/// Generic CRUD over one collection.
#[derive(Clone, Debug)]
pub struct RecordManager {
    store: RecordStore,
    schema: &'static EntitySchema,
}

impl RecordManager {
    pub fn new(store: RecordStore, key: CollectionKey) -> Self {
        Self {
            store,
            schema: EntitySchema::of(key),
        }
    }

    pub fn schema(&self) -> &'static EntitySchema {
        self.schema
    }

    pub fn key(&self) -> CollectionKey {
        self.schema.key
    }

    /// Loads the collection unchanged, in persisted order.
    pub fn list(&self) -> HospitalResult<Vec<Record>> {
        self.store.load(self.key())
    }

    /// Validates a candidate against the schema and builds the normalised record.
    ///
    /// Candidate keys are matched to field names without regard to case. When several keys
    /// match one field, the exact-case key is used, otherwise the lexicographically smallest.
    /// Keys that are not schema fields are ignored. The returned record holds exactly the
    /// schema fields, in schema order, with trimmed values.
    ///
    /// # Errors
    ///
    /// - `MissingField` naming the first field (in schema order) that is absent or blank.
    /// - `InvalidNumber`, `InvalidDate` or `InvalidTime` for the first value that does not
    ///   satisfy its field kind. Blankness of every field is checked before any kind.
    pub fn validate(&self, candidate: &HashMap<String, String>) -> HospitalResult<Record> {
        // An exact key wins over case variants; among variants the smallest key wins.
        let lookup = |name: &str| {
            candidate
                .iter()
                .filter(|(k, _)| k.trim().eq_ignore_ascii_case(name))
                .min_by(|(a, _), (b, _)| (a.trim() != name, *a).cmp(&(b.trim() != name, *b)))
                .map(|(_, v)| v.as_str())
                .unwrap_or("")
        };

        let mut values = Vec::with_capacity(self.schema.fields.len());
        for field in self.schema.fields {
            let value = NonEmptyText::new(lookup(field.name))
                .map_err(|_| HospitalError::MissingField(field.name.to_string()))?;
            values.push((field, value));
        }

        for (field, value) in &values {
            validate_field(field, value.as_str())?;
        }

        Ok(values
            .into_iter()
            .map(|(field, value)| (field.name, value.into_inner()))
            .collect())
    }

    /// Validates `candidate` and appends it to the end of the collection.
    ///
    /// No duplicate detection is performed. Nothing is loaded or written unless validation
    /// passes.
    ///
    /// # Returns
    ///
    /// The collection size after the append.
    pub fn add(&self, candidate: &HashMap<String, String>) -> HospitalResult<usize> {
        let record = self.validate(candidate)?;
        self.append(record)
    }

    /// Appends an already validated record.
    pub(crate) fn append(&self, record: Record) -> HospitalResult<usize> {
        let mut records = self.store.load(self.key())?;
        records.push(record);
        self.store.save(self.key(), &records)?;

        tracing::info!("added {} ({} total)", self.schema.title, records.len());
        Ok(records.len())
    }

    /// Removes every record whose values equal `selection`, aligned to schema field order.
    ///
    /// A selection that matches nothing still succeeds and rewrites the unchanged collection.
    ///
    /// # Returns
    ///
    /// The number of records removed.
    ///
    /// # Errors
    ///
    /// - `NoSelection` if `selection` is empty.
    /// - `SelectionMismatch` if it does not have one value per schema field.
    pub fn delete<S: AsRef<str>>(&self, selection: &[S]) -> HospitalResult<usize> {
        if selection.is_empty() {
            return Err(HospitalError::NoSelection);
        }
        if selection.len() != self.schema.fields.len() {
            return Err(HospitalError::SelectionMismatch {
                expected: self.schema.fields.len(),
                actual: selection.len(),
            });
        }

        let records = self.store.load(self.key())?;
        let before = records.len();
        let kept: Vec<Record> = records
            .into_iter()
            .filter(|record| !record.matches(self.schema, selection))
            .collect();
        self.store.save(self.key(), &kept)?;

        let removed = before - kept.len();
        if removed == 0 {
            tracing::warn!("delete {} matched no records", self.schema.title);
        } else {
            tracing::info!("deleted {removed} {} record(s)", self.schema.title);
        }
        Ok(removed)
    }
}

/// Builds a candidate map from `(field, value)` pairs.
pub fn candidate<K: Into<String>, V: Into<String>>(
    pairs: impl IntoIterator<Item = (K, V)>,
) -> HashMap<String, String> {
    pairs
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CoreConfig;
    use std::path::Path;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn test_manager(data_dir: &Path, key: CollectionKey) -> RecordManager {
        let cfg = CoreConfig::new(data_dir.to_path_buf()).expect("CoreConfig::new should succeed");
        RecordManager::new(RecordStore::new(Arc::new(cfg)), key)
    }

    fn patient(name: &str, age: &str, disease: &str) -> HashMap<String, String> {
        candidate([("name", name), ("age", age), ("disease", disease)])
    }

    #[test]
    fn test_add_appends_trimmed_record() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let patients = test_manager(temp_dir.path(), CollectionKey::Patients);

        patients.add(&patient("Alice", "30", "Flu")).unwrap();
        let size = patients
            .add(&patient("  Bob ", " 42", "Cold  "))
            .expect("add should succeed");
        assert_eq!(size, 2);

        let records = patients.list().unwrap();
        assert_eq!(records.len(), 2, "length should grow by one per add");
        let last = records.last().unwrap();
        assert_eq!(last.values_for(patients.schema()), vec!["Bob", "42", "Cold"]);
        assert_eq!(records[0].get("name"), "Alice", "prior order is preserved");
    }

    #[test]
    fn test_add_keeps_only_schema_fields_in_schema_order() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let medicines = test_manager(temp_dir.path(), CollectionKey::Medicines);

        medicines
            .add(&candidate([
                ("Price", "2.50"),
                ("colour", "white"),
                ("NAME", "Paracetamol"),
                ("quantity", "100"),
            ]))
            .expect("add should succeed");

        let records = medicines.list().unwrap();
        let fields: Vec<_> = records[0].iter().collect();
        assert_eq!(
            fields,
            vec![("name", "Paracetamol"), ("quantity", "100"), ("price", "2.50")]
        );
    }

    #[test]
    fn test_case_variant_keys_resolve_deterministically() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let patients = test_manager(temp_dir.path(), CollectionKey::Patients);

        let exact = patients
            .validate(&candidate([
                ("Name", "Upper"),
                ("name", "Exact"),
                ("NAME", "Shout"),
                ("age", "30"),
                ("disease", "Flu"),
            ]))
            .expect("validate should succeed");
        assert_eq!(exact.get("name"), "Exact");

        let variants = patients
            .validate(&candidate([
                ("Name", "Upper"),
                ("NAME", "Shout"),
                ("age", "30"),
                ("disease", "Flu"),
            ]))
            .expect("validate should succeed");
        assert_eq!(variants.get("name"), "Shout", "\"NAME\" sorts before \"Name\"");
    }

    #[test]
    fn test_add_rejects_blank_fields_without_writing() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let patients = test_manager(temp_dir.path(), CollectionKey::Patients);
        patients.add(&patient("Alice", "30", "Flu")).unwrap();

        for (blank_field, input) in [
            ("name", patient("", "30", "Flu")),
            ("age", patient("Bob", "   ", "Flu")),
            ("disease", patient("Bob", "30", "\t")),
        ] {
            let err = patients.add(&input).unwrap_err();
            assert!(
                matches!(err, HospitalError::MissingField(ref f) if f == blank_field),
                "expected MissingField({blank_field}), got {err:?}"
            );
        }

        let err = patients
            .add(&candidate([("name", "Bob"), ("age", "30")]))
            .unwrap_err();
        assert!(matches!(err, HospitalError::MissingField(ref f) if f == "disease"));

        assert_eq!(patients.list().unwrap().len(), 1, "collection unchanged");
    }

    #[test]
    fn test_blank_check_precedes_kind_check() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let patients = test_manager(temp_dir.path(), CollectionKey::Patients);

        let err = patients.add(&patient("Bob", "abc", "")).unwrap_err();
        assert!(matches!(err, HospitalError::MissingField(ref f) if f == "disease"));
    }

    #[test]
    fn test_integer_field_validation() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let patients = test_manager(temp_dir.path(), CollectionKey::Patients);

        for bad in ["12.5", "-3", "abc"] {
            let err = patients.add(&patient("Bob", bad, "Flu")).unwrap_err();
            assert!(
                matches!(err, HospitalError::InvalidNumber(ref f) if f == "age"),
                "{bad:?} should be rejected"
            );
        }
        assert!(patients.list().unwrap().is_empty(), "collection unchanged");

        patients.add(&patient("Baby", "0", "Colic")).expect("0 is valid");
        patients.add(&patient("Bob", "42", "Flu")).expect("42 is valid");
        assert_eq!(patients.list().unwrap().len(), 2);
    }

    #[test]
    fn test_decimal_field_validation() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let lab_tests = test_manager(temp_dir.path(), CollectionKey::LabTests);

        lab_tests
            .add(&candidate([("test name", "CBC"), ("price", "19.99")]))
            .expect("19.99 is valid");
        let err = lab_tests
            .add(&candidate([("test name", "CBC"), ("price", "nine")]))
            .unwrap_err();
        assert!(matches!(err, HospitalError::InvalidNumber(ref f) if f == "price"));
        assert_eq!(lab_tests.list().unwrap().len(), 1);
    }

    #[test]
    fn test_add_allows_duplicates() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let doctors = test_manager(temp_dir.path(), CollectionKey::Doctors);
        let lee = candidate([
            ("name", "Dr. Lee"),
            ("specialization", "Cardiology"),
            ("phone", "555-0101"),
        ]);

        doctors.add(&lee).unwrap();
        doctors.add(&lee).unwrap();
        assert_eq!(doctors.list().unwrap().len(), 2);
    }

    #[test]
    fn test_delete_removes_all_equal_records() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let patients = test_manager(temp_dir.path(), CollectionKey::Patients);
        patients.add(&patient("Alice", "30", "Flu")).unwrap();
        patients.add(&patient("Bob", "41", "Cold")).unwrap();
        patients.add(&patient("Alice", "30", "Flu")).unwrap();

        let removed = patients
            .delete(&["Alice", "30", "Flu"])
            .expect("delete should succeed");
        assert_eq!(removed, 2, "both identical rows should be removed");

        let remaining = patients.list().unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].get("name"), "Bob");
    }

    #[test]
    fn test_delete_requires_every_field_to_match() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let patients = test_manager(temp_dir.path(), CollectionKey::Patients);
        patients.add(&patient("Alice", "30", "Flu")).unwrap();

        let removed = patients.delete(&["Alice", "30", "Cold"]).unwrap();
        assert_eq!(removed, 0);
        assert_eq!(patients.list().unwrap().len(), 1);
    }

    #[test]
    fn test_delete_absent_match_is_a_no_op() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let staff = test_manager(temp_dir.path(), CollectionKey::Staff);
        staff
            .add(&candidate([("name", "Sam"), ("role", "Nurse"), ("phone", "1")]))
            .unwrap();
        let before = staff.list().unwrap();

        let removed = staff
            .delete(&["Nobody", "Porter", "2"])
            .expect("delete of an absent record should succeed");
        assert_eq!(removed, 0);
        assert_eq!(staff.list().unwrap(), before);
    }

    #[test]
    fn test_delete_on_missing_collection_succeeds() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let machinery = test_manager(temp_dir.path(), CollectionKey::Machinery);

        let removed = machinery.delete(&["MRI", "1", "Acme"]).unwrap();
        assert_eq!(removed, 0);
        assert!(machinery.list().unwrap().is_empty());
    }

    #[test]
    fn test_delete_requires_a_selection() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let patients = test_manager(temp_dir.path(), CollectionKey::Patients);

        let empty: [&str; 0] = [];
        assert!(matches!(
            patients.delete(&empty),
            Err(HospitalError::NoSelection)
        ));
        assert!(matches!(
            patients.delete(&["Alice", "30"]),
            Err(HospitalError::SelectionMismatch {
                expected: 3,
                actual: 2
            })
        ));
    }

    #[test]
    fn test_delete_matches_missing_fields_as_empty_text() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        std::fs::write(
            temp_dir.path().join("lab_tests.json"),
            r#"[{"test name": "X-Ray"}, {"test name": "CBC", "price": "10"}]"#,
        )
        .unwrap();
        let lab_tests = test_manager(temp_dir.path(), CollectionKey::LabTests);

        let removed = lab_tests.delete(&["X-Ray", ""]).unwrap();
        assert_eq!(removed, 1);
        assert_eq!(lab_tests.list().unwrap()[0].get("test name"), "CBC");
    }
}
