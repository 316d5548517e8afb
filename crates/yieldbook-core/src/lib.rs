pub mod error;
pub mod time_value;
pub mod types;

#[cfg(feature = "investment")]
pub mod investment;

#[cfg(feature = "portfolio")]
pub mod portfolio;

pub use error::YieldbookError;
pub use types::*;

/// Standard result type for all yieldbook operations
pub type YieldbookResult<T> = Result<T, YieldbookError>;
