use std::path::PathBuf;

use anyhow::{Context, Result};
use image::Rgb;

use crate::config::Config;
use crate::data::loader;
use crate::data::model::{NodeKind, Topology};
use crate::render::{export, plot};

// ---------------------------------------------------------------------------
// One plotting run
// ---------------------------------------------------------------------------

/// What a successful run produced.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub enbs: usize,
    pub ues: usize,
    pub buildings: usize,
    pub output: PathBuf,
    pub size: (u32, u32),
}

/// Load every input, then draw and save the figure.
///
/// All inputs are parsed before drawing starts, so a malformed file never
/// leaves a partial or stale-looking image behind.
pub fn run(config: &Config) -> Result<RunSummary> {
    config.validate().context("invalid configuration")?;

    let topology = load_topology(config)?;

    if config.keep_intermediates {
        for path in [&config.enbs, &config.ues] {
            loader::write_intermediates(path, config.field)
                .with_context(|| format!("writing intermediates for {}", path.display()))?;
        }
    }

    let mut image = plot::render(&topology, &config.plot).context("rendering topology")?;
    if config.plot.tight {
        let pad = (config.plot.pad_inches * config.plot.dpi).round() as u32;
        image = export::crop_tight(&image, Rgb([255, 255, 255]), pad);
    }

    export::save_png(&image, &config.output).context("saving figure")?;
    log::info!(
        "Saved {} ({}x{} px)",
        config.output.display(),
        image.width(),
        image.height()
    );

    Ok(RunSummary {
        enbs: topology.enbs.len(),
        ues: topology.ues.len(),
        buildings: topology.buildings.len(),
        output: config.output.clone(),
        size: image.dimensions(),
    })
}

fn load_topology(config: &Config) -> Result<Topology> {
    let enbs = loader::load_nodes(&config.enbs, NodeKind::Enb, config.field)
        .context("loading eNB locations")?;
    log::info!("Loaded {} eNBs from {}", enbs.len(), config.enbs.display());

    let ues = loader::load_nodes(&config.ues, NodeKind::Ue, config.field)
        .context("loading UE locations")?;
    log::info!("Loaded {} UEs from {}", ues.len(), config.ues.display());

    let buildings = match &config.buildings {
        Some(path) => {
            let b = loader::load_buildings(path).context("loading buildings")?;
            log::info!("Loaded {} buildings from {}", b.len(), path.display());
            b
        }
        None => Vec::new(),
    };

    Ok(Topology {
        enbs,
        ues,
        buildings,
    })
}
