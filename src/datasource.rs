use crate::error::Result;
use crate::zone::Domain;
use std::path::PathBuf;

pub mod yaml;

/// A fully declared domain and the serial its zones are stamped with.
#[derive(Debug)]
pub struct Declaration {
    pub domain: Domain,
    pub serial: u32,
    pub source: PathBuf,
}

pub trait DataSource: Send + Sync {
    /// Returns true when the declarations changed since the last call.
    fn update(&mut self) -> Result<bool>;
    fn get_declarations(&self) -> Result<Vec<Declaration>>;
}
