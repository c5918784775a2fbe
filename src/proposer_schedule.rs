//! Turns the proposer duties of an epoch into something a person can read.

use std::{fmt, sync::Arc};

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use tracing::info;

use crate::beacon_chain::{
    BeaconNode, Epoch, ProposerDutiesError, ProposerDuty, PublicKey, Slot, ValidatorIdProvider,
    ValidatorIndex,
};

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ScheduledProposal {
    pub slot: Slot,
    /// `None` for slots too far out to have a representable start time.
    pub slot_time: Option<DateTime<Utc>>,
    pub validator_index: ValidatorIndex,
    pub pubkey: PublicKey,
}

impl From<ProposerDuty> for ScheduledProposal {
    fn from(duty: ProposerDuty) -> Self {
        Self {
            slot: duty.slot,
            slot_time: duty.slot.date_time(),
            validator_index: duty.validator_index,
            pubkey: duty.pubkey,
        }
    }
}

impl fmt::Display for ScheduledProposal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let slot_time = self.slot_time.map_or_else(
            || "-".to_string(),
            |slot_time| slot_time.to_rfc3339_opts(SecondsFormat::Secs, true),
        );
        write!(
            f,
            "{:>10}  {:<20}  {:>8}  {}",
            self.slot, slot_time, self.validator_index, self.pubkey
        )
    }
}

pub async fn get_proposer_schedule(
    beacon_node: &(impl BeaconNode + Sync),
    epoch: Epoch,
    validators: &[Arc<dyn ValidatorIdProvider>],
) -> Result<Vec<ScheduledProposal>, ProposerDutiesError> {
    let duties = beacon_node.proposer_duties(epoch, validators).await?;

    if duties.is_empty() {
        info!("no proposer duties for the given validators in epoch {epoch}");
    }

    Ok(duties.into_iter().map(Into::into).collect())
}

#[cfg(test)]
mod tests {
    use crate::beacon_chain::{full_schedule, MockBeaconNode, ProposerDutyBuilder};

    use super::*;

    #[tokio::test]
    async fn get_proposer_schedule_test() {
        let mut beacon_node = MockBeaconNode::new();
        beacon_node
            .expect_proposer_duties()
            .withf(|epoch, validators| *epoch == Epoch(4092) && validators.is_empty())
            .returning(|epoch, _| Ok(full_schedule(epoch, 16_000)));

        let schedule = get_proposer_schedule(&beacon_node, Epoch(4092), &[])
            .await
            .unwrap();

        assert_eq!(schedule.len(), 32);
        assert_eq!(schedule[0].slot, Slot(130_944));
        assert_eq!(schedule[0].validator_index, 16_000);
        assert_eq!(
            schedule[0].slot_time,
            Some("2020-12-19T16:29:11Z".parse::<DateTime<Utc>>().unwrap())
        );
    }

    #[tokio::test]
    async fn get_proposer_schedule_far_future_epoch_test() {
        let epoch = Epoch(30_000_000_000);
        let mut beacon_node = MockBeaconNode::new();
        beacon_node
            .expect_proposer_duties()
            .returning(|epoch, _| Ok(full_schedule(epoch, 0)));

        let schedule = get_proposer_schedule(&beacon_node, epoch, &[])
            .await
            .unwrap();

        assert_eq!(schedule.len(), 32);
        assert_eq!(schedule[0].slot, Slot(960_000_000_000));
        assert!(schedule.iter().all(|proposal| proposal.slot_time.is_none()));
        assert!(schedule[0]
            .to_string()
            .starts_with("960000000000  -                            0  0x"));
    }

    #[tokio::test]
    async fn get_proposer_schedule_error_test() {
        let mut beacon_node = MockBeaconNode::new();
        beacon_node
            .expect_proposer_duties()
            .returning(|_, _| Err(ProposerDutiesError::Cancelled));

        let error = get_proposer_schedule(&beacon_node, Epoch(1), &[])
            .await
            .unwrap_err();

        assert!(error.is_cancelled());
    }

    #[test]
    fn display_scheduled_proposal_test() {
        let duty = ProposerDutyBuilder::new(Slot(32))
            .validator_index(7)
            .pubkey(PublicKey([0x11; PublicKey::LEN]))
            .build();
        let line = ScheduledProposal::from(duty).to_string();
        assert_eq!(
            line,
            format!(
                "        32  2020-12-01T12:06:47Z         7  0x{}",
                "11".repeat(PublicKey::LEN)
            )
        );
    }
}
