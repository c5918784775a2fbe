pub mod beacon_chain;
pub mod env;
mod json_codecs;
pub mod log;
mod performance;
mod proposer_schedule;

pub use proposer_schedule::get_proposer_schedule;
pub use proposer_schedule::ScheduledProposal;
