pub mod error;
pub mod time_value;
pub mod types;

#[cfg(feature = "amortization")]
pub mod amortization;

#[cfg(feature = "numeric")]
pub mod numeric;

pub use error::TaksitError;
pub use types::*;

/// Standard result type for all taksit operations
pub type TaksitResult<T> = Result<T, TaksitError>;
