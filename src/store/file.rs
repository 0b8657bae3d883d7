use anyhow::{bail, Context, Result};
use std::{
    fs,
    io::{ErrorKind, Write},
    path::{Path, PathBuf},
};
use tracing::{debug, warn};

use super::KeyValueStore;

/// One `<key>.json` file per key under `dir`.
///
/// Writes go to `<key>.json.tmp` first and are renamed into place, so a reader
/// sees either the old value or the new one.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open a store rooted at `dir`, creating the directory if needed.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .with_context(|| format!("creating store directory `{}`", dir.display()))?;
        Ok(Self { dir })
    }

    fn path_for(&self, key: &str) -> Result<PathBuf> {
        if key.is_empty()
            || !key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            bail!("invalid store key `{}`", key);
        }
        Ok(self.dir.join(format!("{}.json", key)))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(s) => Ok(Some(s)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).with_context(|| format!("reading `{}`", path.display())),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let final_path = self.path_for(key)?;
        let tmp_path = final_path.with_extension("json.tmp");

        if let Err(e) = write_and_rename(&tmp_path, &final_path, value) {
            // drop the partial tmp file
            if let Err(rm) = fs::remove_file(&tmp_path) {
                if rm.kind() != ErrorKind::NotFound {
                    warn!(path = %tmp_path.display(), error = %rm, "could not remove temporary file");
                }
            }
            return Err(e);
        }
        debug!(path = %final_path.display(), bytes = value.len(), "stored value");
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e).with_context(|| format!("failed to delete `{}`", path.display())),
        }
    }
}

fn write_and_rename(tmp_path: &Path, final_path: &Path, value: &str) -> Result<()> {
    let mut file = fs::File::create(tmp_path)
        .with_context(|| format!("could not create temporary file `{}`", tmp_path.display()))?;
    file.write_all(value.as_bytes())
        .with_context(|| format!("writing `{}`", tmp_path.display()))?;
    file.sync_all()
        .with_context(|| format!("syncing `{}`", tmp_path.display()))?;
    drop(file);

    fs::rename(tmp_path, final_path).with_context(|| {
        format!(
            "failed to rename `{}` to `{}`",
            tmp_path.display(),
            final_path.display()
        )
    })
}
