//! Session controller: city selection, baseline load, disruption runs and
//! result publication, reconciled against out-of-order responses by epoch.

mod controller;
mod phase;

pub use controller::{BaselineTicket, Clock, PublishedRun, RunTicket, SessionController};
pub use phase::{Epoch, ReadyPhase, SessionPhase};
