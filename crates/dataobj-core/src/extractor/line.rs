//! Line-level token parsing for group and object declarations.
//!
//! Declarations are macro-invocation-like statements:
//!
//! ```c
//! TS_GROUP(ID_DEVICE, "Device", TS_NO_CALLBACK, ID_ROOT),
//! TS_ITEM_FLOAT(0x36, "rInt_degC", &dev_stat.internal_temp, 1,
//! ```
//!
//! This module never parses C/C++; it only slices out the two tokens the
//! extractor needs: the quoted name (second comma-separated field) and the
//! ID literal (text between the first `(` and the following `,`).

/// Extracts the second comma-separated field, stripped of spaces and quotes.
///
/// This is the name token of both group and object declarations. Returns
/// `None` if the line has fewer than two comma-separated fields.
pub(crate) fn name_token(line: &str) -> Option<&str> {
    let token = line.split(',').nth(1)?;
    Some(token.trim_matches(|c: char| c == ' ' || c == '"'))
}

/// Extracts the ID literal: the trimmed text between the first `(` and the
/// next `,`. Returns `None` if either delimiter is missing.
pub(crate) fn id_literal(line: &str) -> Option<&str> {
    let after_paren = &line[line.find('(')? + 1..];
    let literal = after_paren[..after_paren.find(',')?].trim();
    Some(literal)
}

/// Returns true for lines consisting only of the given marker and whitespace
pub(crate) fn is_marker(line: &str, marker: &str) -> bool {
    line.trim() == marker
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_name_token_object_declaration() {
        let line = r#"    TS_ITEM_STRING(0x1D, "cNodeID", device_id, sizeof(device_id),"#;
        assert_eq!(name_token(line), Some("cNodeID"));
    }

    #[test]
    fn test_name_token_group_declaration() {
        let line = r#"    TS_GROUP(ID_DEVICE, "Device", TS_NO_CALLBACK, ID_ROOT),"#;
        assert_eq!(name_token(line), Some("Device"));
    }

    #[test]
    fn test_name_token_missing_comma() {
        assert_eq!(name_token("TS_GROUP(ID_DEVICE)"), None);
        assert_eq!(name_token(""), None);
    }

    #[test]
    fn test_id_literal_hex() {
        let line = r#"    TS_ITEM_FLOAT(0x36, "rInt_degC", &dev_stat.internal_temp, 1,"#;
        assert_eq!(id_literal(line), Some("0x36"));
    }

    #[test]
    fn test_id_literal_symbol() {
        let line = r#"TS_GROUP(ID_DEVICE, "Device", TS_NO_CALLBACK, ID_ROOT),"#;
        assert_eq!(id_literal(line), Some("ID_DEVICE"));
    }

    #[test]
    fn test_id_literal_missing_delimiters() {
        assert_eq!(id_literal("TS_ITEM_FLOAT 0x36"), None);
        assert_eq!(id_literal("TS_ITEM_FLOAT(0x36"), None);
    }

    #[test]
    fn test_is_marker() {
        assert!(is_marker("    /*{   ", "/*{"));
        assert!(is_marker("}*/", "}*/"));
        assert!(!is_marker("/*{ \"title\": 1 }*/", "/*{"));
    }
}
