//! Command handlers.

use std::io::Write;
use std::sync::Arc;

use anyhow::{Context, Result};
use scenery_bundle::{Bundle, Fetcher, Locator, SchemeFetcher};
use scenery_core::LoaderConfig;

use crate::cli::{Args, Command};

/// Run a parsed command, writing results to `out`.
pub async fn run(args: Args, out: &mut impl Write) -> Result<()> {
    let config = LoaderConfig::load(args.config.as_deref())
        .context("Failed to load loader configuration")?;
    log::debug!("Loader configuration: {config:?}");

    match args.command {
        Command::Resolve {
            scene,
            base,
            references,
        } => {
            let bundle = scene_bundle(&scene, base.as_deref());
            cmd_resolve(&bundle, &references, out)
        }
        Command::Load { scene } => {
            let fetcher = SchemeFetcher::new(&config)?;
            let bundle = scene_bundle(&scene, None);
            cmd_load(&bundle, &fetcher, out).await
        }
    }
}

/// Root bundle for a scene given on the command line.
pub fn scene_bundle(scene: &str, base: Option<&str>) -> Arc<Bundle> {
    Bundle::new(Locator::from(scene), base, None)
}

/// Print each reference's resolved resource as one JSON line.
pub fn cmd_resolve(bundle: &Bundle, references: &[String], out: &mut impl Write) -> Result<()> {
    for reference in references {
        let resource = bundle
            .resolve(reference)
            .with_context(|| format!("Failed to resolve '{reference}'"))?;
        serde_json::to_writer(&mut *out, &resource)?;
        writeln!(out)?;
    }
    Ok(())
}

/// Fetch and parse the scene, then print it as pretty JSON.
pub async fn cmd_load(bundle: &Bundle, fetcher: &dyn Fetcher, out: &mut impl Write) -> Result<()> {
    let document = bundle.load(fetcher).await?;
    serde_json::to_writer_pretty(&mut *out, &document)
        .context("Scene document cannot be represented as JSON")?;
    writeln!(out)?;
    Ok(())
}
