//! Functions that know how to ask a beacon node which validators propose when. The node computes
//! the schedule, we only fetch, decode and optionally narrow it down to the validators we care
//! about. Nothing is retried, callers decide what to do with a failed request.
pub mod test_utils;
mod types;

use std::{collections::HashSet, sync::Arc, time::Duration};

use async_trait::async_trait;
use format_url::FormatUrl;
use futures::future::{try_join_all, AbortRegistration, Abortable};
use mockall::automock;
use reqwest::{StatusCode, Url};
use thiserror::Error;
use tracing::debug;

use crate::{
    env::{DEFAULT_BEACON_TIMEOUT, ENV_CONFIG},
    performance::TimedExt,
};

use super::{Epoch, PublicKey, Slot, ValidatorIdProvider, ValidatorIndex};

pub use types::{ProposerDuties, ProposerDuty};

use types::ProposerDutiesBody;

#[derive(Debug, Error)]
pub enum ProposerDutiesError {
    #[error("failed to reach beacon node")]
    Network(#[source] reqwest::Error),
    #[error("beacon node responded with status {status}, url = {url}")]
    UnexpectedStatus { status: StatusCode, url: String },
    #[error("failed to decode proposer duties")]
    Decode(#[from] serde_json::Error),
    #[error("proposer duties for epoch {epoch} are inconsistent: {reason}")]
    InconsistentSchedule { epoch: Epoch, reason: String },
    #[error("failed to resolve validator identity at position {position}")]
    IdentityResolution {
        position: usize,
        #[source]
        source: anyhow::Error,
    },
    #[error("proposer duties request was cancelled")]
    Cancelled,
}

impl ProposerDutiesError {
    /// The node could not be reached, timed out, or refused to serve the duties.
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network(_) | Self::UnexpectedStatus { .. })
    }

    /// The node answered, but not with a schedule we can accept.
    pub fn is_decode(&self) -> bool {
        matches!(self, Self::Decode(_) | Self::InconsistentSchedule { .. })
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

#[derive(Debug, Error)]
pub enum BuildBeaconNodeError {
    #[error("a beacon node address is required")]
    MissingAddress,
    #[error("invalid beacon node address {0}, expected something like http://127.0.0.1:5052")]
    InvalidAddress(String),
    #[error("beacon node timeout must be greater than zero")]
    InvalidTimeout,
    #[error("invalid BEACON_TIMEOUT_MS {0}, expected whole milliseconds")]
    InvalidTimeoutSetting(String),
    #[error("failed to build http client")]
    Client(#[from] reqwest::Error),
}

#[automock]
#[async_trait]
pub trait BeaconNode {
    /// Proposer duties for `epoch`, narrowed to `validators` unless that is empty. Duties keep the
    /// order the node returned them in.
    async fn proposer_duties(
        &self,
        epoch: Epoch,
        validators: &[Arc<dyn ValidatorIdProvider>],
    ) -> Result<Vec<ProposerDuty>, ProposerDutiesError>;

    /// Like `proposer_duties` but keeps the dependent root and optimistic flag the node sent.
    async fn proposer_duties_response(
        &self,
        epoch: Epoch,
        validators: &[Arc<dyn ValidatorIdProvider>],
    ) -> Result<ProposerDuties, ProposerDutiesError>;
}

#[derive(Clone, Debug)]
pub struct BeaconNodeHttp {
    address: String,
    client: reqwest::Client,
    timeout: Duration,
}

#[derive(Debug, Default)]
pub struct BeaconNodeHttpBuilder {
    address: Option<String>,
    timeout: Option<Duration>,
}

impl BeaconNodeHttpBuilder {
    pub fn address(mut self, address: &str) -> Self {
        self.address = Some(address.to_string());
        self
    }

    /// Applies to each request as a whole, connecting included.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn build(self) -> Result<BeaconNodeHttp, BuildBeaconNodeError> {
        let address = self
            .address
            .filter(|address| !address.trim().is_empty())
            .ok_or(BuildBeaconNodeError::MissingAddress)?;
        let address = parse_address(&address)?;

        let timeout = self.timeout.unwrap_or(DEFAULT_BEACON_TIMEOUT);
        if timeout.is_zero() {
            return Err(BuildBeaconNodeError::InvalidTimeout);
        }

        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(BeaconNodeHttp {
            address,
            client,
            timeout,
        })
    }
}

fn parse_address(address: &str) -> Result<String, BuildBeaconNodeError> {
    let address = address.trim().trim_end_matches('/');
    match Url::parse(address) {
        Ok(url) if (url.scheme() == "http" || url.scheme() == "https") && url.has_host() => {
            Ok(address.to_string())
        }
        _ => Err(BuildBeaconNodeError::InvalidAddress(address.to_string())),
    }
}

fn make_proposer_duties_url(address: &str, epoch: Epoch) -> String {
    FormatUrl::new(address)
        .with_path_template("/eth/v1/validator/duties/proposer/:epoch")
        .with_substitutes(vec![("epoch", epoch.to_string().as_str())])
        .format_url()
}

/// Resolves the index of every provider concurrently. Fails on the first provider that fails.
async fn resolve_indices(
    validators: &[Arc<dyn ValidatorIdProvider>],
) -> Result<HashSet<ValidatorIndex>, ProposerDutiesError> {
    let indices = try_join_all(validators.iter().enumerate().map(
        |(position, validator)| async move {
            validator
                .index()
                .await
                .map_err(|source| ProposerDutiesError::IdentityResolution { position, source })
        },
    ))
    .await?;

    Ok(indices.into_iter().collect())
}

/// Reads a `BEACON_TIMEOUT_MS` style setting, unset meaning the default.
fn parse_timeout_setting(setting: Option<&str>) -> Result<Duration, BuildBeaconNodeError> {
    match setting {
        None => Ok(DEFAULT_BEACON_TIMEOUT),
        Some(text) => text
            .trim()
            .parse::<u64>()
            .map(Duration::from_millis)
            .map_err(|_| BuildBeaconNodeError::InvalidTimeoutSetting(text.to_string())),
    }
}

fn check_schedule(epoch: Epoch, duties: &[ProposerDuty]) -> Result<(), ProposerDutiesError> {
    if duties.len() as u64 > Epoch::SLOTS_PER_EPOCH {
        return Err(ProposerDutiesError::InconsistentSchedule {
            epoch,
            reason: format!(
                "got {} duties but an epoch only has {} slots",
                duties.len(),
                Epoch::SLOTS_PER_EPOCH
            ),
        });
    }

    if let Some(duty) = duties.iter().find(|duty| !epoch.contains(duty.slot)) {
        return Err(ProposerDutiesError::InconsistentSchedule {
            epoch,
            reason: format!(
                "slot {} is outside of the epoch, expected {} to {}",
                duty.slot,
                epoch.start_slot(),
                epoch.end_slot()
            ),
        });
    }

    // A slot has at most one proposer.
    let mut seen_slots = HashSet::with_capacity(duties.len());
    if let Some(duty) = duties.iter().find(|duty| !seen_slots.insert(duty.slot)) {
        return Err(ProposerDutiesError::InconsistentSchedule {
            epoch,
            reason: format!("slot {} is assigned more than once", duty.slot),
        });
    }

    Ok(())
}

impl BeaconNodeHttp {
    pub fn builder() -> BeaconNodeHttpBuilder {
        BeaconNodeHttpBuilder::default()
    }

    /// Builds a client from `BEACON_URL` and `BEACON_TIMEOUT_MS`.
    pub fn from_env() -> Result<Self, BuildBeaconNodeError> {
        let address = ENV_CONFIG
            .beacon_url
            .as_ref()
            .ok_or(BuildBeaconNodeError::MissingAddress)?;
        let timeout = parse_timeout_setting(ENV_CONFIG.beacon_timeout_ms.as_deref())?;

        Self::builder().address(address).timeout(timeout).build()
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn get_proposer_duties(
        &self,
        epoch: Epoch,
    ) -> Result<ProposerDuties, ProposerDutiesError> {
        let url = make_proposer_duties_url(&self.address, epoch);

        let res = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(ProposerDutiesError::Network)?;

        let status = res.status();
        if !status.is_success() {
            return Err(ProposerDutiesError::UnexpectedStatus {
                status,
                url: res.url().to_string(),
            });
        }

        let bytes = res.bytes().await.map_err(ProposerDutiesError::Network)?;
        let duties = serde_json::from_slice::<ProposerDutiesBody>(&bytes)?.into_duties(epoch);

        check_schedule(epoch, &duties.duties)?;

        Ok(duties)
    }

    /// `proposer_duties` that gives up as soon as the paired `AbortHandle` is aborted. Nothing is
    /// returned from an aborted call, the request in flight is dropped.
    pub async fn proposer_duties_abortable(
        &self,
        epoch: Epoch,
        validators: &[Arc<dyn ValidatorIdProvider>],
        registration: AbortRegistration,
    ) -> Result<Vec<ProposerDuty>, ProposerDutiesError> {
        Abortable::new(self.proposer_duties(epoch, validators), registration)
            .await
            .unwrap_or_else(|_aborted| {
                debug!("proposer duties request for epoch {epoch} aborted");
                Err(ProposerDutiesError::Cancelled)
            })
    }
}

#[async_trait]
impl BeaconNode for BeaconNodeHttp {
    async fn proposer_duties(
        &self,
        epoch: Epoch,
        validators: &[Arc<dyn ValidatorIdProvider>],
    ) -> Result<Vec<ProposerDuty>, ProposerDutiesError> {
        self.proposer_duties_response(epoch, validators)
            .await
            .map(|response| response.duties)
    }

    async fn proposer_duties_response(
        &self,
        epoch: Epoch,
        validators: &[Arc<dyn ValidatorIdProvider>],
    ) -> Result<ProposerDuties, ProposerDutiesError> {
        debug!(
            %epoch,
            validators = validators.len(),
            "fetching proposer duties"
        );

        let (mut response, indices) = futures::try_join!(
            self.get_proposer_duties(epoch).timed("get_proposer_duties"),
            resolve_indices(validators)
        )?;

        if !validators.is_empty() {
            response
                .duties
                .retain(|duty| indices.contains(&duty.validator_index));
        }

        debug!(
            %epoch,
            duties = response.duties.len(),
            "fetched proposer duties"
        );

        Ok(response)
    }
}
