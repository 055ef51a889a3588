//! Long-running operation module
//!
//! Some Cloudflare endpoints (D1 export and import) start a server-side job
//! and report progress through repeated calls carrying a bookmark. A
//! [`LongRunningOperation`] issues those calls; the [`Poller`] decides when to
//! make them and when to give up.

mod poller;
mod types;

pub use poller::{Poller, PollerConfig};
pub use types::{LongRunningOperation, OperationState, OperationStatus};

#[cfg(test)]
mod tests;
