use std::{collections::HashSet, sync::Arc};

use proposer_duties::beacon_chain::{
    BeaconNode, BeaconNodeHttp, Epoch, StaticValidatorId, ValidatorIdProvider, ValidatorIndex,
};

// Medalla testnet, where these validators proposed in epoch 4092.
const VALIDATOR_16056: &str = "16056:0x9553a63a58d3a776a2483184e5af37aedf131b82ef1e0bcba7b3c01818f490371aac0c6f9a327fb7eb89190af7b085a5";
const VALIDATOR_35476: &str = "35476:0x9216091f3e4fe0b0562a6c5bf6e8c35cf0c3b321b6f415de6631d7d12e58603e1e23c8d78f449b601f8d244d26f70aa7";

fn validators() -> Vec<Arc<dyn ValidatorIdProvider>> {
    [VALIDATOR_16056, VALIDATOR_35476]
        .iter()
        .map(|text| {
            Arc::new(text.parse::<StaticValidatorId>().unwrap()) as Arc<dyn ValidatorIdProvider>
        })
        .collect()
}

#[ignore = "requires BEACON_URL pointing at a node with history"]
#[tokio::test]
async fn old_epoch_test() {
    let beacon_node = BeaconNodeHttp::from_env().unwrap();
    let duties = beacon_node.proposer_duties(Epoch(1), &[]).await.unwrap();
    assert_eq!(duties.len(), 32);
}

#[ignore = "requires BEACON_URL pointing at a node with history"]
#[tokio::test]
async fn recent_epoch_test() {
    let beacon_node = BeaconNodeHttp::from_env().unwrap();
    let duties = beacon_node
        .proposer_duties(Epoch(10989), &[])
        .await
        .unwrap();
    assert_eq!(duties.len(), 32);
}

#[ignore = "requires BEACON_URL pointing at a node with history"]
#[tokio::test]
async fn with_validators_test() {
    let beacon_node = BeaconNodeHttp::from_env().unwrap();
    let duties = beacon_node
        .proposer_duties(Epoch(4092), &validators())
        .await
        .unwrap();

    assert_eq!(duties.len(), 2);
    let indices: HashSet<ValidatorIndex> =
        duties.iter().map(|duty| duty.validator_index).collect();
    assert_eq!(indices, HashSet::from([16056, 35476]));

    let unfiltered = beacon_node
        .proposer_duties(Epoch(4092), &[])
        .await
        .unwrap();
    assert!(duties.iter().all(|duty| unfiltered.contains(duty)));
}
