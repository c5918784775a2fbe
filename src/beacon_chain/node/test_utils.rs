use serde_json::json;

use super::*;

pub struct ProposerDutyBuilder {
    pubkey: Option<PublicKey>,
    slot: Slot,
    validator_index: ValidatorIndex,
}

impl ProposerDutyBuilder {
    pub fn new(slot: Slot) -> Self {
        Self {
            pubkey: None,
            slot,
            validator_index: 0,
        }
    }

    pub fn validator_index(mut self, validator_index: ValidatorIndex) -> Self {
        self.validator_index = validator_index;
        self
    }

    pub fn pubkey(mut self, pubkey: PublicKey) -> Self {
        self.pubkey = Some(pubkey);
        self
    }

    pub fn build(self) -> ProposerDuty {
        ProposerDuty {
            pubkey: self
                .pubkey
                .unwrap_or_else(|| pubkey_for_index(self.validator_index)),
            validator_index: self.validator_index,
            slot: self.slot,
        }
    }
}

/// A recognizable but otherwise meaningless key, the index in the leading bytes.
pub fn pubkey_for_index(validator_index: ValidatorIndex) -> PublicKey {
    let mut bytes = [0xaa; PublicKey::LEN];
    bytes[..8].copy_from_slice(&validator_index.to_be_bytes());
    PublicKey(bytes)
}

/// One duty for every slot in `epoch`, the nth slot proposed by validator `first_index + n`.
pub fn full_schedule(epoch: Epoch, first_index: ValidatorIndex) -> Vec<ProposerDuty> {
    (0..Epoch::SLOTS_PER_EPOCH)
        .map(|offset| {
            ProposerDutyBuilder::new(epoch.start_slot() + offset)
                .validator_index(first_index + offset)
                .build()
        })
        .collect()
}

/// The JSON body a standard beacon API node serves for these duties.
pub fn proposer_duties_body(duties: &[ProposerDuty]) -> String {
    json!({
        "dependent_root": "0x8c1e7b3a1d5f8e6c4b2a09f7e5d3c1b9a7f5e3d1c9b7a5f3e1d9c7b5a3f1e9d7",
        "execution_optimistic": false,
        "data": duties,
    })
    .to_string()
}
