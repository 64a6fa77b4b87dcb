//! JSON emission for the output document.
//!
//! The document is serialized with stable key ordering as encountered in the
//! source: `id` and `idx` first on every object, then the declared and
//! normalized fields in order. Output is UTF-8 with four-space indentation
//! and no ASCII escaping, so substituted unit glyphs like `°C` appear
//! literally in the file.

use std::path::Path;

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::ser::PrettyFormatter;

use crate::error::{Error, Result};

use super::{DataObject, Document, Entry};

impl Serialize for DataObject {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(2 + self.fields.len()))?;
        map.serialize_entry("id", &self.id)?;
        map.serialize_entry("idx", &self.idx)?;
        for (key, value) in &self.fields {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl Serialize for Entry {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Entry::Object(object) => object.serialize(serializer),
            Entry::Group(objects) => {
                let mut map = serializer.serialize_map(Some(objects.len()))?;
                for (name, object) in objects {
                    map.serialize_entry(name, object)?;
                }
                map.end()
            }
        }
    }
}

impl Serialize for Document {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, entry) in &self.entries {
            map.serialize_entry(name, entry)?;
        }
        map.end()
    }
}

/// Renders the document as pretty-printed JSON with four-space indentation
pub fn to_json_string(document: &Document) -> String {
    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    document
        .serialize(&mut serializer)
        .expect("document serialization is infallible");
    buf.push(b'\n');
    String::from_utf8(buf).expect("serialized JSON is valid UTF-8")
}

/// Writes the document to `path` as a pretty-printed JSON file
pub fn write_json_file(document: &Document, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    std::fs::write(path, to_json_string(document)).map_err(|e| Error::file_write(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::UnitDefault;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn sample_document() -> Document {
        let mut doc = Document::new();
        doc.insert_root_object(
            "cNodeID",
            DataObject::new(0x1d, "0x1D", serde_json::Map::new()),
        );
        doc.open_group("Device");
        let fields = match json!({"title": {"en": "Internal Temperature"}}) {
            serde_json::Value::Object(m) => m,
            _ => unreachable!(),
        };
        doc.insert_grouped_object("Device", "rInt_degC", DataObject::new(0x36, "0x36", fields));
        doc.normalize(UnitDefault::DeriveFromName);
        doc
    }

    #[test]
    fn test_key_order_id_idx_first() {
        let doc = sample_document();
        let text = to_json_string(&doc);
        let id_pos = text.find("\"id\"").unwrap();
        let idx_pos = text.find("\"idx\"").unwrap();
        let title_pos = text.find("\"title\"").unwrap();
        assert!(id_pos < idx_pos);
        assert!(idx_pos < title_pos);
    }

    #[test]
    fn test_four_space_indentation() {
        let text = to_json_string(&sample_document());
        assert!(text.contains("\n    \"cNodeID\": {"));
        assert!(text.contains("\n        \"id\": 29,"));
        assert!(text.ends_with("}\n"));
    }

    #[test]
    fn test_unicode_is_not_escaped() {
        let text = to_json_string(&sample_document());
        assert!(text.contains("°C"));
        assert!(!text.contains("\\u"));
    }

    #[test]
    fn test_round_trip() {
        let doc = sample_document();
        let text = to_json_string(&doc);
        let parsed: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(
            parsed,
            json!({
                "cNodeID": {
                    "id": 29,
                    "idx": "0x1D",
                    "unit": null,
                    "min": null,
                    "max": null
                },
                "Device": {
                    "rInt_degC": {
                        "id": 54,
                        "idx": "0x36",
                        "title": {"en": "Internal Temperature"},
                        "unit": "°C",
                        "min": null,
                        "max": null
                    }
                }
            })
        );
    }

    #[test]
    fn test_write_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("info.json");
        let doc = sample_document();

        write_json_file(&doc, &path).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, to_json_string(&doc));
    }
}
