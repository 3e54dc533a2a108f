pub mod metrics;
pub mod valuation;

pub use metrics::*;
pub use valuation::*;
