//! Risk analytics.
//!
//! Provides historical Value-at-Risk and the cross-asset correlation matrix.

mod correlation;
mod var;

pub use correlation::{correlation_matrix, CorrelationMatrix};
pub use var::{historical_var_pct, value_at_risk, DEFAULT_VAR_CONFIDENCE};
