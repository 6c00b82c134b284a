//! Include blocks: splicing separately parsed files into the current parse
//!
//! An include block lists one file path per line. When the block closes,
//! each file is parsed in declaration order with the full parser, then the
//! resulting services are merged according to the block flavour.

use crate::error::{ArchiveError, Result};
use crate::model::Service;
use crate::parser::{self, CategoryRegistry, ParseOptions};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Resolve an include path against the including document's directory.
pub fn resolve_path(file: &str, base_dir: Option<&Path>) -> PathBuf {
    let path = Path::new(file);
    match base_dir {
        Some(base) if path.is_relative() => base.join(path),
        _ => path.to_path_buf(),
    }
}

/// Parse every listed file and return their services in order.
///
/// With `follow_includes` off nothing is opened and the result is empty.
pub fn load_services(files: &[String], options: &ParseOptions) -> Result<Vec<Service>> {
    if !options.follow_includes {
        debug!(count = files.len(), "Include files not followed");
        return Ok(Vec::new());
    }

    let mut services = Vec::new();
    for file in files {
        let path = resolve_path(file, options.base_dir.as_deref());
        let nested = options.descend();
        if nested.depth() > options.max_include_depth {
            return Err(ArchiveError::IncludeDepth {
                path,
                depth: nested.depth(),
            });
        }
        debug!(path = %path.display(), depth = nested.depth(), "Including file");
        services.extend(parser::parse_file(&path, &nested)?);
    }
    Ok(services)
}

/// Merge included users into `service`; later IDs overwrite earlier ones.
pub fn merge_users(service: &mut Service, included: Vec<Service>) {
    for source in included {
        service.users.extend(source.users);
    }
}

/// Append included threads to `service`.
pub fn merge_messages(service: &mut Service, included: Vec<Service>) {
    for source in included {
        service.message_threads.extend(source.message_threads);
    }
}

/// Append included categories to `service`, registering their IDs so later
/// `InSub` references in the including document resolve.
pub(crate) fn merge_categories(
    service: &mut Service,
    included: Vec<Service>,
    registry: &mut CategoryRegistry,
) {
    for source in included {
        for mut category in source.categories {
            category.derive_type_and_level();
            if let Some(id) = category.id {
                registry.register(&category.kind_type, id);
            }
            service.categories.push(category);
        }
    }
}
