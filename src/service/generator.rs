use crate::config::Config;
use crate::datasource::{DataSource, Declaration};
use crate::error::Result;
use crate::store::Store;
use crate::zonefile::render_view;
use log::{info, warn};
use std::sync::Arc;
use std::time::Duration;
use tokio::select;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;

/// Renders and stores every view of one domain. Views are rendered in
/// parallel from the frozen model; a view whose rendering fails writes none
/// of its files.
pub async fn generate(declaration: Declaration, store: Box<dyn Store>) -> Result<usize> {
    let Declaration {
        domain,
        serial,
        source,
    } = declaration;
    if domain.views().is_empty() {
        warn!(
            "{} declares no views in {}, nothing to generate",
            domain.fqdn(),
            source.display()
        );
        return Ok(0);
    }
    info!(
        "Generating {} (serial {}) from {}",
        domain.fqdn(),
        serial,
        source.display()
    );
    let domain = Arc::new(domain);
    let tasks = domain.views().iter().cloned().map(|view| {
        let domain = domain.clone();
        let store = store.clone();
        tokio::task::spawn_blocking(move || -> Result<usize> {
            let files = render_view(&domain, serial, &view)?;
            for file in &files {
                store.put(file)?;
            }
            Ok(files.len())
        })
    });
    let mut written = 0;
    for joined in futures_util::future::join_all(tasks).await {
        written += joined??;
    }
    Ok(written)
}

/// Generates every declared domain, stopping at the first failure.
pub async fn generate_all(source: &dyn DataSource, store: &dyn Store) -> Result<usize> {
    let mut written = 0;
    for declaration in source.get_declarations()? {
        written += generate(declaration, store.clone_dyn()).await?;
    }
    Ok(written)
}

/// Regenerates whenever the source changes until cancelled. Failures are
/// logged and leave the previously written zones in place.
pub async fn run_generator(
    config: &Config,
    mut source: Box<dyn DataSource>,
    store: Box<dyn Store>,
    cancellation_token: CancellationToken,
) -> Result<()> {
    info!("Generator started.");
    loop {
        info!("Checking declarations...");
        match source.update() {
            Ok(true) => match generate_all(source.as_ref(), store.as_ref()).await {
                Ok(written) => info!("Wrote {} zone files.", written),
                Err(e) => warn!("Generation failed: {}", e),
            },
            Ok(false) => info!("No changes."),
            Err(e) => warn!("Unable to read declarations: {}", e),
        }
        select! {
            _ = sleep(Duration::from_secs(config.interval)) => {
                continue
            }
            _ = cancellation_token.cancelled() => {
                break
            }
        }
    }
    info!("Generator shut down.");
    Ok(())
}
