use crate::error::Result;
use crate::store::Store;
use crate::zonefile::ZoneFile;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

#[derive(Clone, Default)]
pub struct MemoryStore {
    files: Arc<RwLock<HashMap<String, Vec<u8>>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<Vec<u8>> {
        self.files.read().ok()?.get(name).cloned()
    }

    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = match self.files.read() {
            Ok(files) => files.keys().cloned().collect(),
            Err(_) => Vec::new(),
        };
        names.sort();
        names
    }
}

impl Store for MemoryStore {
    fn put(&self, file: &ZoneFile) -> Result<()> {
        let mut files = self
            .files
            .write()
            .map_err(|_| std::io::Error::new(std::io::ErrorKind::Other, "memory store lock poisoned"))?;
        files.insert(file.name.clone(), file.contents.clone());
        Ok(())
    }

    fn clone_dyn(&self) -> Box<dyn Store> {
        Box::new(self.clone())
    }
}
