use crate::datasource::yaml::YamlDataSource;
use crate::datasource::DataSource;
use crate::service::generator::{generate_all, run_generator};
use crate::store::fs::FsStore;
use crate::store::memory::MemoryStore;
use crate::store::Store;
use clap::Parser;
use config::Config;
use log::info;
use simple_error::SimpleError;
use std::error::Error;
use std::io::Write;
use tokio::signal;
use tokio_util::sync::CancellationToken;

mod config;
mod datasource;
mod error;
mod service;
mod store;
mod util;
mod zone;
mod zonefile;

type Result<T> = std::result::Result<T, Box<dyn Error>>;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let config: &'static Config = Box::leak(Box::new(Config::parse()));
    if !config.source.exists() {
        return Err(Box::from(SimpleError::new(format!(
            "declaration source {} does not exist",
            config.source.display()
        ))));
    }
    let mut source: Box<dyn DataSource> =
        Box::new(YamlDataSource::new(&config.source, config.serial));

    if config.dry_run {
        let store = MemoryStore::new();
        generate_all(source.as_ref(), &store).await?;
        let mut stdout = std::io::stdout().lock();
        for name in store.names() {
            writeln!(stdout, ";; {}", name)?;
            stdout.write_all(&store.get(&name).unwrap_or_default())?;
        }
        return Ok(());
    }

    if !config.output.is_dir() {
        return Err(Box::from(SimpleError::new(format!(
            "output directory {} does not exist",
            config.output.display()
        ))));
    }
    let store: Box<dyn Store> = Box::new(FsStore::new(&config.output));

    if config.interval == 0 {
        source.update()?;
        let written = generate_all(source.as_ref(), store.as_ref()).await?;
        info!("Wrote {} zone files.", written);
        return Ok(());
    }

    let token = CancellationToken::new();
    let token_copy = token.clone();
    let generator = tokio::spawn(async move {
        run_generator(config, source, store, token_copy)
            .await
            .expect("Generator stopped with error");
    });
    signal::ctrl_c().await?;
    info!("Gracefully shutting down...");
    token.cancel();
    generator.await?;
    Ok(())
}
