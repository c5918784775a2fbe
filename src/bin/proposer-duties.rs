use std::sync::Arc;

use clap::Parser;
use tracing::info;

use proposer_duties::{
    beacon_chain::{BeaconNodeHttp, Epoch, StaticValidatorId, ValidatorIdProvider},
    get_proposer_schedule, log,
};

/// Prints which validators propose the blocks of an epoch.
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    /// Epoch to fetch the proposer duties of.
    epoch: u64,

    /// Only show duties of this validator, given as INDEX:PUBKEY. May be repeated.
    #[clap(long = "validator")]
    validators: Vec<StaticValidatorId>,

    /// Print the schedule as JSON.
    #[clap(long)]
    json: bool,
}

#[tokio::main]
pub async fn main() -> Result<(), anyhow::Error> {
    log::init();

    let cli = Cli::parse();

    let beacon_node = BeaconNodeHttp::from_env()?;
    info!("fetching proposer duties for epoch {}", cli.epoch);

    let validators = cli
        .validators
        .into_iter()
        .map(|validator| Arc::new(validator) as Arc<dyn ValidatorIdProvider>)
        .collect::<Vec<_>>();

    let schedule = get_proposer_schedule(&beacon_node, Epoch(cli.epoch), &validators).await?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&schedule)?);
    } else {
        for proposal in schedule {
            println!("{proposal}");
        }
    }

    Ok(())
}
