//! Library side of the `snirf2bids` converter.

pub mod logging;
pub mod pipeline;
pub mod types;
