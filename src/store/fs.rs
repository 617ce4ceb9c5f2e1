use crate::error::Result;
use crate::store::Store;
use crate::zonefile::ZoneFile;
use log::info;
use std::io::Write;
use std::path::PathBuf;
use tempfile::NamedTempFile;

/// Writes zone files into a directory, each through a temporary file in the
/// same directory that is renamed over the target once complete.
#[derive(Clone)]
pub struct FsStore {
    dir: PathBuf,
}

impl FsStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl Store for FsStore {
    fn put(&self, file: &ZoneFile) -> Result<()> {
        let path = self.dir.join(&file.name);
        let mut temp = NamedTempFile::new_in(&self.dir)?;
        temp.write_all(&file.contents)?;
        temp.as_file().sync_all()?;
        temp.persist(&path).map_err(|e| e.error)?;
        info!("Wrote {}", path.display());
        Ok(())
    }

    fn clone_dyn(&self) -> Box<dyn Store> {
        Box::new(self.clone())
    }
}
