//! Rate Router Configuration

use tracing::warn;

/// Minimum improvement a relaxation must beat before it is accepted.
pub const DEFAULT_EPS: f64 = 1e-12;

/// Environment variable overriding the relaxation tolerance
pub const EPS_ENV_VAR: &str = "RATE_ROUTER_EPS";

/// Engine settings shared by the router and the arbitrage detector
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineConfig {
    /// Relaxation tolerance in log-weight space
    pub eps: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self { eps: DEFAULT_EPS }
    }
}

impl EngineConfig {
    pub fn new(eps: f64) -> Self {
        Self { eps: sanitize_eps(eps) }
    }

    /// Create configuration from environment variables.
    /// Falls back to `DEFAULT_EPS` when the variable is unset or unusable.
    pub fn from_env() -> Self {
        match std::env::var(EPS_ENV_VAR) {
            Ok(raw) => Self::from_raw(&raw),
            Err(_) => Self::default(),
        }
    }

    fn from_raw(raw: &str) -> Self {
        match raw.trim().parse::<f64>() {
            Ok(eps) => Self::new(eps),
            Err(e) => {
                warn!("Ignoring {}={:?}: {} (using {:e})", EPS_ENV_VAR, raw, e, DEFAULT_EPS);
                Self::default()
            }
        }
    }
}

fn sanitize_eps(eps: f64) -> f64 {
    if eps.is_finite() && eps >= 0.0 {
        eps
    } else {
        warn!("Tolerance {} is not a finite non-negative number, using {:e}", eps, DEFAULT_EPS);
        DEFAULT_EPS
    }
}
