use thiserror::Error;

/// Application-level error carrying the process exit code.
///
/// Exit codes: `2` for input/configuration problems, `4` for runtime/data problems.
#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

/// Result alias for the analytics core.
pub type AnalyticsResult<T> = Result<T, AnalyticsError>;

/// Precondition violations raised by the analytics core.
///
/// These are caller bugs (bad inputs), reported at the point of violation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalyticsError {
    /// A curve needs at least one point.
    #[error("Curve has no points")]
    EmptyCurve,

    /// Tenors must be finite and strictly positive.
    #[error("Invalid curve tenor {tenor} (must be finite and > 0)")]
    InvalidTenor { tenor: f64 },

    /// Yields must be finite.
    #[error("Invalid curve yield {yield_} at tenor {tenor}")]
    InvalidYield { tenor: f64, yield_: f64 },

    /// Each tenor may appear only once.
    #[error("Duplicate curve tenor {tenor}")]
    DuplicateTenor { tenor: f64 },

    /// A twist needs two distinct tenors to define its weights.
    #[error("Twist requires at least two distinct tenors, curve has {points}")]
    DegenerateTwist { points: usize },

    /// Bond fields out of their valid domain.
    #[error("Invalid bond spec: {reason}")]
    InvalidBond { reason: String },

    /// The per-period discount base `1 + y/f` must be positive.
    #[error("Yield {yield_} gives a non-positive discount base at frequency {frequency}")]
    InvalidYieldForPricing { yield_: f64, frequency: u32 },

    /// Duration bump must be finite and positive.
    #[error("Invalid duration bump {bump} (must be finite and > 0)")]
    InvalidBump { bump: f64 },

    /// Horizons must be finite and non-negative.
    #[error("Invalid horizon {horizon} years")]
    InvalidHorizon { horizon: f64 },

    /// Shock sizes must be finite.
    #[error("Invalid shock of {bp}bp")]
    InvalidShock { bp: f64 },
}

impl From<AnalyticsError> for AppError {
    fn from(err: AnalyticsError) -> Self {
        AppError::new(2, err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn analytics_errors_map_to_input_exit_code() {
        let err: AppError = AnalyticsError::DegenerateTwist { points: 1 }.into();
        assert_eq!(err.exit_code(), 2);
        assert!(err.message().contains("two distinct tenors"));
    }
}
