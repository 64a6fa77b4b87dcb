//! Unit derivation from data-object naming conventions.
//!
//! Firmware data objects encode their physical unit in the trailing
//! underscore-delimited components of their name: `rInt_degC`, `rLoad_W`,
//! `bat_voltage_mV`. When an object declares no explicit `unit` field, the
//! newest parser generation derives one from the name:
//!
//! - leading-underscore names (`_internal_flag`) are internal and never
//!   derive a unit;
//! - more than two components: components 2 and 3 joined as `"a/b"`
//!   (`bat_voltage_mV` → `voltage/mV`);
//! - exactly two components: component 2 (`rInt_degC` → `degC`);
//! - a single component: no unit.
//!
//! The derived spelling is then rewritten through a small fixed substitution
//! table so ASCII-only source names render proper unit glyphs in the output
//! document. Declared units are never rewritten.
//!
//! The heuristic is knowingly ambiguous for longer names; it reproduces the
//! newest documented parser behavior exactly rather than second-guessing it.

/// Spelling fixes applied to derived units
pub const UNIT_SUBSTITUTIONS: &[(&str, &str)] = &[("degC", "°C")];

/// Rewrites a derived unit through [`UNIT_SUBSTITUTIONS`].
///
/// Units without a table entry pass through unchanged.
pub fn substitute_unit(unit: &str) -> &str {
    UNIT_SUBSTITUTIONS
        .iter()
        .find(|(from, _)| *from == unit)
        .map(|(_, to)| *to)
        .unwrap_or(unit)
}

/// Derives a unit from an object name, or `None` if the name carries none
pub fn derive_unit(name: &str) -> Option<String> {
    if name.starts_with('_') {
        return None;
    }

    let components: Vec<&str> = name.split('_').collect();
    let derived = match components.len() {
        0 | 1 => return None,
        2 => components[1].to_string(),
        _ => format!("{}/{}", components[1], components[2]),
    };

    Some(substitute_unit(&derived).to_string())
}
