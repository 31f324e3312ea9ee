//! YAML positions file parsing
//!
//! A positions file is a top-level sequence of mappings with `name`,
//! `latitude`, `longitude` and optional `altitude`. Individual bad entries
//! are dropped; only a structurally invalid file is an error.

use phototag_types::{Error, PositionRecord, Result};
use serde_yaml::Value;

pub fn parse_positions(yaml_text: &str, source_file: &str) -> Result<Vec<PositionRecord>> {
    let document: Value = serde_yaml::from_str(yaml_text)
        .map_err(|e| Error::Parse(format!("invalid YAML: {e}")))?;

    let Value::Sequence(entries) = document else {
        return Err(Error::Parse(
            "positions file must contain a top-level list".to_string(),
        ));
    };

    let mut records = Vec::new();
    for entry in &entries {
        match position_from_entry(entry, source_file) {
            Some(record) => records.push(record),
            None => {
                tracing::debug!(source_file, "dropping invalid position entry");
            }
        }
    }
    Ok(records)
}

fn position_from_entry(entry: &Value, source_file: &str) -> Option<PositionRecord> {
    if !entry.is_mapping() {
        return None;
    }

    let name = yaml_string(entry.get("name")?)?;
    let latitude = entry.get("latitude")?.as_f64()?;
    let longitude = entry.get("longitude")?.as_f64()?;
    if !PositionRecord::coordinates_in_range(latitude, longitude) {
        return None;
    }
    let altitude = entry.get("altitude").and_then(Value::as_f64);

    Some(PositionRecord {
        name,
        latitude,
        longitude,
        altitude,
        source_file: source_file.to_string(),
    })
}

fn yaml_string(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_positions() {
        let yaml = r#"
- name: Base camp
  latitude: 45.5
  longitude: -75.2
  altitude: 120.0
- name: Summit
  latitude: 45.9
  longitude: -75.4
"#;
        let records = parse_positions(yaml, "places.yaml").unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].name, "Base camp");
        assert_eq!(records[0].altitude, Some(120.0));
        assert_eq!(records[1].altitude, None);
        assert_eq!(records[1].source_file, "places.yaml");
    }

    #[test]
    fn test_invalid_entries_are_dropped_individually() {
        let yaml = r#"
- name: Missing longitude
  latitude: 45.5
- name: Out of range
  latitude: 91.0
  longitude: 0.0
- name: Bad longitude
  latitude: 0.0
  longitude: 200.0
- just a string
- name: Good
  latitude: 10.0
  longitude: 20.0
"#;
        let records = parse_positions(yaml, "places.yaml").unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "Good");
    }

    #[test]
    fn test_integer_coordinates_accepted() {
        let yaml = "- name: 42\n  latitude: 45\n  longitude: -75\n";
        let records = parse_positions(yaml, "places.yaml").unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "42");
        assert_eq!(records[0].latitude, 45.0);
    }

    #[test]
    fn test_top_level_mapping_is_rejected() {
        let yaml = "name: not a list\n";
        assert!(matches!(
            parse_positions(yaml, "places.yaml"),
            Err(Error::Parse(_))
        ));
    }

    #[test]
    fn test_unparseable_text_is_rejected() {
        assert!(parse_positions(": : :", "places.yaml").is_err());
    }

    #[test]
    fn test_empty_sequence() {
        let records = parse_positions("[]", "places.yaml").unwrap();
        assert!(records.is_empty());
    }
}
