//! YAML form of a service list
//!
//! Same keys and shape as the JSON mapping in [`crate::json`].

use crate::error::{ArchiveError, Result};
use crate::file_reader;
use crate::model::Service;
use std::path::Path;

/// YAML document for a list of services.
pub fn to_yaml(services: &[Service]) -> Result<String> {
    Ok(serde_yaml::to_string(services)?)
}

/// Parse a YAML document holding a list of services.
pub fn from_yaml(text: &str) -> Result<Vec<Service>> {
    Ok(serde_yaml::from_str(text)?)
}

/// Load services from a YAML file; `.gz` and `.bz2` files are decompressed.
pub fn load_from_yaml_file(path: impl AsRef<Path>) -> Result<Vec<Service>> {
    let path = path.as_ref();
    let reader = file_reader::open(path).map_err(|err| ArchiveError::io(path, err))?;
    Ok(serde_yaml::from_reader(reader)?)
}

/// Save services as YAML; `.gz` and `.bz2` paths are compressed.
pub fn save_to_yaml_file(path: impl AsRef<Path>, services: &[Service]) -> Result<()> {
    let path = path.as_ref();
    let yaml = to_yaml(services)?;
    file_reader::write_file(path, yaml.as_bytes()).map_err(|err| ArchiveError::io(path, err))
}
