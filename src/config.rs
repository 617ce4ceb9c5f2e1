use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Clone, Debug)]
#[clap(about = "Generates forward and reverse zone files for every view of a declared domain")]
pub struct Config {
    /// Domain declaration file, or a directory of *.yaml declarations
    #[clap(long, short = 's', default_value = "zones", env = "ZONE_SOURCE")]
    pub source: PathBuf,

    /// Directory receiving the generated db.* files
    #[clap(long, short = 'o', default_value = ".", env = "ZONE_OUTPUT")]
    pub output: PathBuf,

    /// SOA serial for every zone (defaults to the declaration file's mtime)
    #[clap(long, env = "ZONE_SERIAL")]
    pub serial: Option<u32>,

    /// Regenerate on change, checking every this many seconds (0 runs once)
    #[clap(long, short = 'i', default_value = "0", env = "INTERVAL")]
    pub interval: u64,

    /// Print the zones to stdout instead of writing them
    #[clap(long, env = "DRY_RUN")]
    pub dry_run: bool,
}
