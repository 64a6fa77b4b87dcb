//! Output document model for extracted data objects.
//!
//! The extractor produces a [`Document`]: an ordered mapping whose entries are
//! either a single ungrouped [`DataObject`] (declared before any group marker)
//! or a named [`Entry::Group`] of objects. The distinction is decided once, at
//! insertion time, and carried as an explicit tag — never inferred later from
//! the spelling of a key.
//!
//! After extraction the document is normalized: every object ends up with
//! `unit`, `min` and `max` fields, defaulted to `null` or (for `unit`) derived
//! from the object's own name, depending on [`UnitDefault`]. Normalization is
//! idempotent; running it twice changes nothing.

mod units;
mod writer;

use indexmap::IndexMap;
use serde_json::{Map, Value};
use tracing::trace;

pub use units::{derive_unit, substitute_unit, UNIT_SUBSTITUTIONS};
pub use writer::{to_json_string, write_json_file};

/// Normalized metadata fields guaranteed on every object
const NORMALIZED_FIELDS: [&str; 3] = ["unit", "min", "max"];

/// How a missing `unit` field is filled in during normalization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnitDefault {
    /// Derive the unit from the object's name (`bat_voltage_mV` etc.);
    /// the behavior of the newest parser generation, and the default
    #[default]
    DeriveFromName,
    /// Always default a missing unit to `null`
    Null,
}

/// One extracted data object: its resolved ID, the literal the ID was written
/// as, and the declared metadata fields in declaration order.
#[derive(Debug, Clone, PartialEq)]
pub struct DataObject {
    /// Numeric ID, unique within the document
    pub id: u32,
    /// The ID as it appeared in source: the original literal for bare hex
    /// numbers, or the hex rendering of a resolved symbol
    pub idx: String,
    /// Declared metadata plus normalized fields, in encounter order
    pub fields: Map<String, Value>,
}

impl DataObject {
    /// Creates an object from its resolved ID, source literal and declared
    /// metadata. Declared `id`/`idx` keys are superseded by the resolved ones.
    pub fn new(id: u32, idx: impl Into<String>, mut fields: Map<String, Value>) -> Self {
        fields.shift_remove("id");
        fields.shift_remove("idx");
        Self {
            id,
            idx: idx.into(),
            fields,
        }
    }

    /// Fills in missing `unit`, `min` and `max` fields.
    ///
    /// `name` is the key the object is stored under; with
    /// [`UnitDefault::DeriveFromName`] it feeds the unit heuristic.
    fn normalize(&mut self, name: &str, unit_default: UnitDefault) {
        if !self.fields.contains_key("unit") {
            let unit = match unit_default {
                UnitDefault::DeriveFromName => {
                    derive_unit(name).map(Value::String).unwrap_or(Value::Null)
                }
                UnitDefault::Null => Value::Null,
            };
            trace!("Defaulting unit of {} to {}", name, unit);
            self.fields.insert("unit".to_string(), unit);
        }
        for field in ["min", "max"] {
            if !self.fields.contains_key(field) {
                self.fields.insert(field.to_string(), Value::Null);
            }
        }
    }

    /// Returns true if the object carries every normalized field
    pub fn is_normalized(&self) -> bool {
        NORMALIZED_FIELDS
            .iter()
            .all(|f| self.fields.contains_key(*f))
    }
}

/// A top-level document entry: a single ungrouped object, or a group
#[derive(Debug, Clone, PartialEq)]
pub enum Entry {
    /// An object declared before any group marker
    Object(DataObject),
    /// A named group of objects, keyed by object name in encounter order
    Group(IndexMap<String, DataObject>),
}

/// The full extraction result: top-level entries in encounter order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    entries: IndexMap<String, Entry>,
}

impl Document {
    /// Creates an empty document
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a fresh, empty group under `name`.
    ///
    /// A repeated group name replaces the earlier container, matching the
    /// overwrite semantics of the generated mapping.
    pub fn open_group(&mut self, name: impl Into<String>) {
        self.entries.insert(name.into(), Entry::Group(IndexMap::new()));
    }

    /// Inserts an ungrouped object at the top level, keyed by name
    pub fn insert_root_object(&mut self, name: impl Into<String>, object: DataObject) {
        self.entries.insert(name.into(), Entry::Object(object));
    }

    /// Inserts an object into the group `group`, opening it if needed.
    ///
    /// The extractor only calls this for the group it most recently opened.
    pub fn insert_grouped_object(
        &mut self,
        group: &str,
        name: impl Into<String>,
        object: DataObject,
    ) {
        match self.entries.get_mut(group) {
            Some(Entry::Group(objects)) => {
                objects.insert(name.into(), object);
            }
            _ => {
                let mut objects = IndexMap::new();
                objects.insert(name.into(), object);
                self.entries.insert(group.to_string(), Entry::Group(objects));
            }
        }
    }

    /// Visits every object once and fills in missing `unit`, `min` and `max`
    /// fields according to `unit_default`. Idempotent.
    pub fn normalize(&mut self, unit_default: UnitDefault) {
        for (key, entry) in self.entries.iter_mut() {
            match entry {
                Entry::Object(object) => object.normalize(key, unit_default),
                Entry::Group(objects) => {
                    for (name, object) in objects.iter_mut() {
                        object.normalize(name, unit_default);
                    }
                }
            }
        }
    }

    /// Top-level entries in encounter order
    pub fn entries(&self) -> impl Iterator<Item = (&str, &Entry)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Looks up a top-level entry by name
    pub fn get(&self, name: &str) -> Option<&Entry> {
        self.entries.get(name)
    }

    /// Looks up an object inside a group
    pub fn get_grouped(&self, group: &str, name: &str) -> Option<&DataObject> {
        match self.entries.get(group)? {
            Entry::Group(objects) => objects.get(name),
            Entry::Object(_) => None,
        }
    }

    /// Total number of objects across all entries
    pub fn object_count(&self) -> usize {
        self.entries
            .values()
            .map(|e| match e {
                Entry::Object(_) => 1,
                Entry::Group(objects) => objects.len(),
            })
            .sum()
    }

    /// Returns true if the document has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn object(id: u32, idx: &str, fields: Value) -> DataObject {
        let Value::Object(fields) = fields else {
            panic!("test fields must be a JSON object");
        };
        DataObject::new(id, idx, fields)
    }

    #[test]
    fn test_declared_id_keys_are_superseded() {
        let obj = object(0x50, "0x50", json!({"id": 999, "idx": "bogus", "type": "float"}));
        assert_eq!(obj.id, 0x50);
        assert_eq!(obj.idx, "0x50");
        assert_eq!(obj.fields.get("id"), None);
        assert_eq!(obj.fields.get("type"), Some(&json!("float")));
    }

    #[test]
    fn test_normalize_fills_missing_fields_with_null() {
        let mut doc = Document::new();
        doc.open_group("Battery");
        doc.insert_grouped_object("Battery", "rState", object(0x40, "0x40", json!({})));

        doc.normalize(UnitDefault::Null);

        let obj = doc.get_grouped("Battery", "rState").unwrap();
        assert_eq!(obj.fields.get("unit"), Some(&Value::Null));
        assert_eq!(obj.fields.get("min"), Some(&Value::Null));
        assert_eq!(obj.fields.get("max"), Some(&Value::Null));
        assert!(obj.is_normalized());
    }

    #[test]
    fn test_normalize_derives_unit_from_name() {
        let mut doc = Document::new();
        doc.insert_root_object("bat_voltage_mV", object(0x41, "0x41", json!({})));
        doc.insert_root_object("rInt_degC", object(0x36, "0x36", json!({})));
        doc.insert_root_object("_internal_flag", object(0x42, "0x42", json!({})));

        doc.normalize(UnitDefault::DeriveFromName);

        let volt = match doc.get("bat_voltage_mV").unwrap() {
            Entry::Object(o) => o,
            _ => panic!("expected root object"),
        };
        assert_eq!(volt.fields.get("unit"), Some(&json!("voltage/mV")));

        let temp = match doc.get("rInt_degC").unwrap() {
            Entry::Object(o) => o,
            _ => panic!("expected root object"),
        };
        assert_eq!(temp.fields.get("unit"), Some(&json!("°C")));

        let flag = match doc.get("_internal_flag").unwrap() {
            Entry::Object(o) => o,
            _ => panic!("expected root object"),
        };
        assert_eq!(flag.fields.get("unit"), Some(&Value::Null));
    }

    #[test]
    fn test_normalize_keeps_declared_fields() {
        let mut doc = Document::new();
        doc.insert_root_object(
            "rLoad_W",
            object(0x60, "0x60", json!({"unit": "W", "min": 0, "max": 150})),
        );

        doc.normalize(UnitDefault::DeriveFromName);

        let obj = match doc.get("rLoad_W").unwrap() {
            Entry::Object(o) => o,
            _ => panic!("expected root object"),
        };
        assert_eq!(obj.fields.get("unit"), Some(&json!("W")));
        assert_eq!(obj.fields.get("min"), Some(&json!(0)));
        assert_eq!(obj.fields.get("max"), Some(&json!(150)));
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let mut doc = Document::new();
        doc.open_group("Solar");
        doc.insert_grouped_object(
            "Solar",
            "rPower_W",
            object(0x51, "0x51", json!({"title": "Solar power"})),
        );

        doc.normalize(UnitDefault::DeriveFromName);
        let once = doc.clone();
        doc.normalize(UnitDefault::DeriveFromName);
        assert_eq!(doc, once);
    }

    #[test]
    fn test_reopening_a_group_replaces_it() {
        let mut doc = Document::new();
        doc.open_group("Device");
        doc.insert_grouped_object("Device", "cType", object(0x21, "0x21", json!({})));
        doc.open_group("Device");

        match doc.get("Device").unwrap() {
            Entry::Group(objects) => assert!(objects.is_empty()),
            _ => panic!("expected group"),
        }
    }

    #[test]
    fn test_object_count() {
        let mut doc = Document::new();
        assert_eq!(doc.object_count(), 0);
        doc.insert_root_object("cNodeID", object(0x1d, "0x1D", json!({})));
        doc.open_group("Device");
        doc.insert_grouped_object("Device", "cType", object(0x21, "0x21", json!({})));
        doc.insert_grouped_object("Device", "cManufacturer", object(0x20, "0x20", json!({})));
        assert_eq!(doc.object_count(), 3);
    }
}
