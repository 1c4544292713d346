//! Per-service rewrites applied while merging a fragment.

use serde_yaml::{Mapping, Value};
use std::path::{Component, Path, PathBuf};

/// Attach `service` to the shared network exactly once.
///
/// - no `networks` key (or null) ⇒ `[network]`
/// - list form ⇒ `network` appended when missing
/// - mapping form ⇒ replaced by `[network]`; per-network settings are dropped
pub fn attach_network(service: &mut Mapping, network: &str) {
    let key = Value::String("networks".to_string());
    let shared = Value::String(network.to_string());

    match service.get_mut(&key) {
        Some(Value::Sequence(list)) => {
            let mut seen = false;
            list.retain(|entry| {
                if *entry != shared {
                    return true;
                }
                let keep = !seen;
                seen = true;
                keep
            });
            if !seen {
                list.push(shared);
            }
        }
        _ => {
            service.insert(key, Value::Sequence(vec![shared]));
        }
    }
}

/// Rewrite relative host paths in a service's `volumes` list.
pub fn resolve_volumes(service: &mut Mapping, fragment_dir: &Path) {
    let key = Value::String("volumes".to_string());
    if let Some(Value::Sequence(volumes)) = service.get_mut(&key) {
        for volume in volumes.iter_mut() {
            if let Value::String(spec) = volume {
                *spec = resolve_volume_path(spec, fragment_dir);
            }
        }
    }
}

/// Resolve the host side of a `HOST:CONTAINER[:MODE]` volume string.
///
/// Only hosts starting with `./` or `../` are rewritten, to an absolute path
/// under `fragment_dir`. Strings without a colon, named volumes and absolute
/// paths come back unchanged.
pub fn resolve_volume_path(volume: &str, fragment_dir: &Path) -> String {
    let Some((host, rest)) = volume.split_once(':') else {
        return volume.to_string();
    };

    if !(host.starts_with("./") || host.starts_with("../")) {
        return volume.to_string();
    }

    let resolved = normalize(&absolute(fragment_dir).join(host));
    format!("{}:{}", resolved.display(), rest)
}

fn absolute(dir: &Path) -> PathBuf {
    if dir.is_absolute() {
        return dir.to_path_buf();
    }
    std::env::current_dir()
        .map(|cwd| cwd.join(dir))
        .unwrap_or_else(|_| dir.to_path_buf())
}

/// Collapse `.` and `..` without touching the filesystem.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}
