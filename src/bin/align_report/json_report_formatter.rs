use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use serde::Serialize;

fn create_output(path: &Path) -> Result<File, String> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|err| {
            format!(
                "Failed to create output directory '{}': {err}",
                parent.display()
            )
        })?;
    }
    File::create(path)
        .map_err(|err| format!("Failed to create output file '{}': {err}", path.display()))
}

/// Pretty JSON with a trailing newline.
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), String> {
    let mut file = create_output(path)?;
    serde_json::to_writer_pretty(&mut file, value)
        .map_err(|err| format!("Failed to serialize JSON '{}': {err}", path.display()))?;
    file.write_all(b"\n")
        .map_err(|err| format!("Failed to finalize output file '{}': {err}", path.display()))?;
    Ok(())
}

pub fn write_text(path: &Path, body: &str) -> Result<(), String> {
    let mut file = create_output(path)?;
    file.write_all(body.as_bytes())
        .map_err(|err| format!("Failed to write output file '{}': {err}", path.display()))
}
