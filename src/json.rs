//! JSON form of a service list
//!
//! The mapping is direct: PascalCase keys as in the archive grammar, absent
//! optional values omitted, non-ASCII text kept as is.

use crate::error::{ArchiveError, Result};
use crate::file_reader;
use crate::model::Service;
use std::path::Path;

/// Pretty-printed JSON for a list of services.
pub fn to_json(services: &[Service]) -> Result<String> {
    Ok(serde_json::to_string_pretty(services)?)
}

/// Parse a JSON document holding a list of services.
pub fn from_json(text: &str) -> Result<Vec<Service>> {
    Ok(serde_json::from_str(text)?)
}

/// Load services from a JSON file; `.gz` and `.bz2` files are decompressed.
pub fn load_from_json_file(path: impl AsRef<Path>) -> Result<Vec<Service>> {
    let path = path.as_ref();
    let reader = file_reader::open(path).map_err(|err| ArchiveError::io(path, err))?;
    Ok(serde_json::from_reader(reader)?)
}

/// Save services as pretty JSON; `.gz` and `.bz2` paths are compressed.
pub fn save_to_json_file(path: impl AsRef<Path>, services: &[Service]) -> Result<()> {
    let path = path.as_ref();
    let mut json = to_json(services)?;
    json.push('\n');
    file_reader::write_file(path, json.as_bytes()).map_err(|err| ArchiveError::io(path, err))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::User;

    fn sample() -> Vec<Service> {
        let mut service = Service::new(1, "Café Board", "Forum", "");
        service.add_user(
            7,
            User {
                name: Some("Ana".into()),
                ..Default::default()
            },
        );
        vec![service]
    }

    #[test]
    fn test_json_shape() {
        let json = to_json(&sample()).unwrap();
        assert!(json.contains("\"Service\": \"Café Board\""));
        assert!(json.contains("\"7\": {"));
        assert!(!json.contains("\"Handle\""));
        assert_eq!(from_json(&json).unwrap(), sample());
    }

    #[test]
    fn test_missing_keys_take_defaults() {
        let services = from_json(r#"[{"Entry": 3}]"#).unwrap();
        assert_eq!(services[0].entry, Some(3));
        assert_eq!(services[0].time_zone, "UTC");
        assert!(services[0].users.is_empty());
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(from_json("{"), Err(ArchiveError::Json(_))));
        assert!(matches!(
            from_json(r#"[{"Entry": -1}]"#),
            Err(ArchiveError::Json(_))
        ));
    }

    #[test]
    fn test_gzip_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["board.json", "board.json.gz", "board.json.bz2"] {
            let path = dir.path().join(name);
            save_to_json_file(&path, &sample()).unwrap();
            assert_eq!(load_from_json_file(&path).unwrap(), sample());
        }
    }
}
