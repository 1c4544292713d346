use super::Workspace;
use crate::error::{Error, Result};
use std::fs;
use std::path::PathBuf;

/// Build the combined `.env` handed to `docker compose --env-file`.
///
/// Concatenates `config/credentials.env` and `config/services.env` under
/// section headers. Sources that do not exist are omitted; the output file
/// is always written, possibly empty.
pub fn generate_env_file(workspace: &Workspace) -> Result<PathBuf> {
    let mut sections = Vec::new();

    let credentials = workspace.credentials_env();
    if credentials.exists() {
        let content = fs::read_to_string(&credentials)?;
        sections.push(format!("# === CREDENTIALS ===\n{}", content));
    }

    let services = workspace.services_env();
    if services.exists() {
        let content = fs::read_to_string(&services)?;
        sections.push(format!("\n# === SERVICES ===\n{}", content));
    }

    let temp_dir = workspace.temp_dir();
    fs::create_dir_all(&temp_dir).map_err(|e| {
        Error::Filesystem(format!(
            "Failed to create '{}': {}",
            temp_dir.display(),
            e
        ))
    })?;

    let output = workspace.env_file_path();
    fs::write(&output, sections.join("\n"))?;
    tracing::debug!("Wrote env file {}", output.display());

    Ok(output)
}
