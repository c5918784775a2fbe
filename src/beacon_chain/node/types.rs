use serde::{Deserialize, Serialize};

use crate::{
    beacon_chain::{Epoch, PublicKey, Slot, ValidatorIndex},
    json_codecs::{from_u64_string, to_u64_string},
};

/// The validator expected to propose the block at `slot`.
#[derive(Clone, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub struct ProposerDuty {
    pub pubkey: PublicKey,
    #[serde(deserialize_with = "from_u64_string", serialize_with = "to_u64_string")]
    pub validator_index: ValidatorIndex,
    pub slot: Slot,
}

/// Proposer duties of one epoch, together with what the node told us about them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProposerDuties {
    pub epoch: Epoch,
    /// Block root the schedule was computed from. Duties stay valid while this root is canonical.
    pub dependent_root: Option<String>,
    pub execution_optimistic: Option<bool>,
    pub duties: Vec<ProposerDuty>,
}

#[derive(Debug, Deserialize)]
pub(super) struct ProposerDutiesEnvelope {
    pub dependent_root: Option<String>,
    pub execution_optimistic: Option<bool>,
    pub data: Vec<ProposerDuty>,
}

/// Standard beacon API nodes wrap the duties in an envelope, older Lighthouse releases answered
/// with the bare list.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(super) enum ProposerDutiesBody {
    Envelope(ProposerDutiesEnvelope),
    Bare(Vec<ProposerDuty>),
}

impl ProposerDutiesBody {
    pub fn into_duties(self, epoch: Epoch) -> ProposerDuties {
        match self {
            Self::Envelope(envelope) => ProposerDuties {
                epoch,
                dependent_root: envelope.dependent_root,
                execution_optimistic: envelope.execution_optimistic,
                duties: envelope.data,
            },
            Self::Bare(duties) => ProposerDuties {
                epoch,
                dependent_root: None,
                execution_optimistic: None,
                duties,
            },
        }
    }
}
