use crate::error::Result;
use crate::zonefile::ZoneFile;

pub mod fs;
pub mod memory;

/// Destination of rendered zone files.
pub trait Store: Send + Sync {
    /// Replaces `file` as a whole; readers never see a partial zone.
    fn put(&self, file: &ZoneFile) -> Result<()>;
    fn clone_dyn(&self) -> Box<dyn Store>;
}

impl Clone for Box<dyn Store> {
    fn clone(&self) -> Self {
        self.clone_dyn()
    }
}
