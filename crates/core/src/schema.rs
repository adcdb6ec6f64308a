//! Declarative entity schemas.
//!
//! One static table per collection describes the fields a record carries, the order they are
//! entered and displayed in, and the validation rule each value must satisfy. Every screen in
//! the system is driven from these tables; nothing else knows the field lists.

use crate::collection::CollectionKey;

/// Validation rule applied to a field value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldKind {
    /// Any non-blank text.
    Text,
    /// Non-negative whole number, digits only.
    Integer,
    /// Real number, e.g. `19.99`.
    Decimal,
    /// Calendar date in strict `YYYY-MM-DD` form.
    Date,
    /// 24-hour clock time in strict `HH:MM` form.
    Time,
}

/// One field of an entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FieldSpec {
    /// Label shown on forms and table headings.
    pub label: &'static str,
    /// Storage key: the lower-cased label.
    pub name: &'static str,
    /// Suggested entry width in characters.
    pub display_width: u16,
    pub kind: FieldKind,
}

impl FieldSpec {
    const fn new(label: &'static str, name: &'static str, display_width: u16, kind: FieldKind) -> Self {
        Self {
            label,
            name,
            display_width,
            kind,
        }
    }
}

/// Field layout of one collection.
#[derive(Debug, PartialEq, Eq)]
pub struct EntitySchema {
    pub key: CollectionKey,
    /// Singular title used in messages, e.g. "Lab Test".
    pub title: &'static str,
    pub fields: &'static [FieldSpec],
}

impl EntitySchema {
    /// Schema for the given collection.
    pub fn of(key: CollectionKey) -> &'static EntitySchema {
        match key {
            CollectionKey::Patients => &PATIENTS,
            CollectionKey::Doctors => &DOCTORS,
            CollectionKey::Staff => &STAFF,
            CollectionKey::Medicines => &MEDICINES,
            CollectionKey::LabTests => &LAB_TESTS,
            CollectionKey::Appointments => &APPOINTMENTS,
            CollectionKey::Machinery => &MACHINERY,
            CollectionKey::Billing => &BILLING,
        }
    }

    pub fn field_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(|f| f.name)
    }

    pub fn field(&self, name: &str) -> Option<&'static FieldSpec> {
        self.fields.iter().find(|f| f.name.eq_ignore_ascii_case(name))
    }
}

use FieldKind::{Date, Decimal, Integer, Text, Time};

static PATIENTS: EntitySchema = EntitySchema {
    key: CollectionKey::Patients,
    title: "Patient",
    fields: &[
        FieldSpec::new("Name", "name", 30, Text),
        FieldSpec::new("Age", "age", 10, Integer),
        FieldSpec::new("Disease", "disease", 30, Text),
    ],
};

static DOCTORS: EntitySchema = EntitySchema {
    key: CollectionKey::Doctors,
    title: "Doctor",
    fields: &[
        FieldSpec::new("Name", "name", 30, Text),
        FieldSpec::new("Specialization", "specialization", 30, Text),
        FieldSpec::new("Phone", "phone", 20, Text),
    ],
};

static STAFF: EntitySchema = EntitySchema {
    key: CollectionKey::Staff,
    title: "Staff Member",
    fields: &[
        FieldSpec::new("Name", "name", 30, Text),
        FieldSpec::new("Role", "role", 30, Text),
        FieldSpec::new("Phone", "phone", 20, Text),
    ],
};

static MEDICINES: EntitySchema = EntitySchema {
    key: CollectionKey::Medicines,
    title: "Medicine",
    fields: &[
        FieldSpec::new("Name", "name", 30, Text),
        FieldSpec::new("Quantity", "quantity", 10, Integer),
        FieldSpec::new("Price", "price", 10, Decimal),
    ],
};

static LAB_TESTS: EntitySchema = EntitySchema {
    key: CollectionKey::LabTests,
    title: "Lab Test",
    fields: &[
        FieldSpec::new("Test Name", "test name", 30, Text),
        FieldSpec::new("Price", "price", 10, Decimal),
    ],
};

static MACHINERY: EntitySchema = EntitySchema {
    key: CollectionKey::Machinery,
    title: "Machine",
    fields: &[
        FieldSpec::new("Machine Name", "machine name", 30, Text),
        FieldSpec::new("Quantity", "quantity", 10, Integer),
        FieldSpec::new("Supplier", "supplier", 30, Text),
    ],
};

static APPOINTMENTS: EntitySchema = EntitySchema {
    key: CollectionKey::Appointments,
    title: "Appointment",
    fields: &[
        FieldSpec::new("Patient Name", "patient name", 30, Text),
        FieldSpec::new("Doctor", "doctor", 30, Text),
        FieldSpec::new("Date", "date", 30, Date),
        FieldSpec::new("Time", "time", 30, Time),
    ],
};

static BILLING: EntitySchema = EntitySchema {
    key: CollectionKey::Billing,
    title: "Bill",
    fields: &[
        FieldSpec::new("Patient", "patient", 30, Text),
        FieldSpec::new("Medicine", "medicine", 30, Text),
        FieldSpec::new("Quantity", "quantity", 30, Integer),
        FieldSpec::new("Price", "price", 10, Decimal),
        FieldSpec::new("Total", "total", 10, Decimal),
    ],
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_collection_has_a_matching_schema() {
        for key in CollectionKey::ALL {
            let schema = EntitySchema::of(key);
            assert_eq!(schema.key, key, "schema key should match collection");
            assert!(!schema.fields.is_empty());
        }
    }

    #[test]
    fn test_field_names_are_lower_cased_labels() {
        for key in CollectionKey::ALL {
            for field in EntitySchema::of(key).fields {
                assert_eq!(field.name, field.label.to_lowercase());
            }
        }
    }

    #[test]
    fn test_field_lookup_ignores_case() {
        let schema = EntitySchema::of(CollectionKey::LabTests);
        let field = schema.field("Test Name").expect("field should be found");
        assert_eq!(field.kind, FieldKind::Text);
        assert!(schema.field("supplier").is_none());
    }

    #[test]
    fn test_medicine_field_order() {
        let names: Vec<_> = EntitySchema::of(CollectionKey::Medicines)
            .field_names()
            .collect();
        assert_eq!(names, vec!["name", "quantity", "price"]);
    }
}
