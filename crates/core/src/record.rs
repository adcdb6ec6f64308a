//! Record representation and its on-disk wire form.
//!
//! A record is an ordered mapping from lower-cased field name to text. Numbers and dates are
//! never held natively; consumers reinterpret the text through the validation helpers.
//!
//! On disk each record is a JSON object. Older files may hold numeric JSON values (bills
//! written with numeric quantity/price/total), so loading coerces every scalar to its JSON text
//! while nested arrays or objects are rejected.

use crate::schema::EntitySchema;
use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// One stored record. Field order is preserved from insertion or from the file.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Record {
    fields: Vec<(String, String)>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `name` to `value`, replacing an existing value in place.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((name, value)),
        }
    }

    /// Value stored under `name`, or the empty string when the field is absent.
    pub fn get(&self, name: &str) -> &str {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
            .unwrap_or("")
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.iter().any(|(n, _)| n == name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    /// Values in schema field order, as a table row would show them.
    pub fn values_for(&self, schema: &EntitySchema) -> Vec<String> {
        schema
            .field_names()
            .map(|name| self.get(name).to_string())
            .collect()
    }

    /// True if every schema field equals the aligned selection value.
    pub fn matches<S: AsRef<str>>(&self, schema: &EntitySchema, selection: &[S]) -> bool {
        schema
            .field_names()
            .zip(selection)
            .all(|(name, wanted)| self.get(name) == wanted.as_ref())
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut record = Record::new();
        for (name, value) in iter {
            record.insert(name, value);
        }
        record
    }
}

impl Serialize for Record {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// A scalar JSON value as it may appear in a stored record.
#[derive(Deserialize)]
#[serde(untagged)]
enum FieldValueWire {
    Text(String),
    Number(serde_json::Number),
    Flag(bool),
    Null,
}

impl FieldValueWire {
    fn into_text(self) -> String {
        match self {
            FieldValueWire::Text(s) => s,
            FieldValueWire::Number(n) => n.to_string(),
            FieldValueWire::Flag(b) => b.to_string(),
            FieldValueWire::Null => String::new(),
        }
    }
}

impl<'de> Deserialize<'de> for Record {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct RecordVisitor;

        impl<'de> Visitor<'de> for RecordVisitor {
            type Value = Record;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("an object of scalar field values")
            }

            fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut record = Record::new();
                while let Some(name) = access.next_key::<String>()? {
                    let value: FieldValueWire = access.next_value().map_err(|_| {
                        de::Error::custom(format!("field '{name}' must be a scalar value"))
                    })?;
                    record.insert(name, value.into_text());
                }
                Ok(record)
            }
        }

        deserializer.deserialize_map(RecordVisitor)
    }
}
