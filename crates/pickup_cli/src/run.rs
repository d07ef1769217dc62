use crate::roster_file::RosterFile;
use anyhow::{bail, Context, Result};
use pickup_core::{
    begin_anchoring, AnchorageSummary, Distributor, RejectionReason, Roster, SplitReport,
    SquadConfig, Strategy,
};
use std::path::PathBuf;
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct SplitOptions {
    pub roster: PathBuf,
    pub config: Option<PathBuf>,
    pub strategy: Strategy,
    pub seed: Option<u64>,
}

/// A refused anchorage request, kept for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
    pub request: Vec<String>,
    pub reason: RejectionReason,
}

#[derive(Debug, Clone)]
pub struct SplitOutcome {
    pub anchorages: Vec<AnchorageSummary>,
    pub rejections: Vec<Rejection>,
    pub report: SplitReport,
}

/// Explicit path first, then `PICKUP_CONFIG_PATH`, then the five-a-side preset.
pub fn load_config(path: Option<&PathBuf>) -> Result<SquadConfig> {
    match path {
        Some(path) => SquadConfig::from_path(path)
            .with_context(|| format!("Failed to load config: {}", path.display())),
        None => SquadConfig::from_env().context("Failed to load config from environment"),
    }
}

/// Loads the roster, applies the requested anchorages and splits the pool.
pub fn run_split(options: &SplitOptions) -> Result<SplitOutcome> {
    let config = load_config(options.config.as_ref())?;
    let file = RosterFile::load(&options.roster)?;
    let mut roster = Roster::from_entries(file.players, &config).context("Invalid roster")?;

    let (anchorages, rejections) = apply_anchorages(&mut roster, &config, &file.anchorages)?;

    let seed = options.seed.unwrap_or_else(|| Distributor::from_entropy(options.strategy).seed());
    let mut distributor = Distributor::from_config(options.strategy, seed, &config);
    let teams = distributor
        .distribute(&mut roster, &config.quotas)
        .context("Could not split the roster into two teams")?;

    info!(strategy = %options.strategy, seed, "split complete");
    let report = SplitReport::new(options.strategy, seed, &teams);
    Ok(SplitOutcome { anchorages, rejections, report })
}

fn apply_anchorages(
    roster: &mut Roster,
    config: &SquadConfig,
    requests: &[Vec<String>],
) -> Result<(Vec<AnchorageSummary>, Vec<Rejection>)> {
    let mut session = begin_anchoring(roster, &config.quotas, config.anchorage_limits())
        .context("Roster does not match the configured quotas")?;

    let mut rejections = Vec::new();
    for request in requests {
        if let Err(reason) = session.create(request) {
            warn!(players = ?request, %reason, "anchorage rejected");
            rejections.push(Rejection { request: request.clone(), reason });
        }
    }

    if !session.can_finish() {
        return Ok((Vec::new(), rejections));
    }

    match session.finish() {
        Ok(plan) => Ok((plan.anchorages, rejections)),
        Err(reason) => bail!("Anchorages cannot be used: {}", reason),
    }
}
