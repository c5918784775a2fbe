mod node;
mod units;
mod validator_id;

pub use node::test_utils::full_schedule;
pub use node::test_utils::proposer_duties_body;
pub use node::test_utils::ProposerDutyBuilder;
pub use node::BeaconNode;
pub use node::BeaconNodeHttp;
pub use node::BeaconNodeHttpBuilder;
pub use node::BuildBeaconNodeError;
pub use node::MockBeaconNode;
pub use node::ProposerDuties;
pub use node::ProposerDutiesError;
pub use node::ProposerDuty;

pub use units::Epoch;
pub use units::Slot;

pub use validator_id::MockValidatorIdProvider;
pub use validator_id::ParsePublicKeyError;
pub use validator_id::ParseStaticValidatorIdError;
pub use validator_id::PublicKey;
pub use validator_id::StaticValidatorId;
pub use validator_id::ValidatorIdProvider;
pub use validator_id::ValidatorIndex;

use chrono::{DateTime, Utc};
use lazy_static::lazy_static;

lazy_static! {
    pub static ref GENESIS_TIMESTAMP: DateTime<Utc> = "2020-12-01T12:00:23Z".parse().unwrap();
}
