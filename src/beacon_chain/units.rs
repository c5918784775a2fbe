mod epoch;
mod slot;

pub use epoch::Epoch;
pub use slot::Slot;
