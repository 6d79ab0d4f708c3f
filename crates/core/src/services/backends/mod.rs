#[cfg(feature = "slither-backend")]
pub mod slither;

#[cfg(feature = "slither-backend")]
pub use slither::{SlitherBackend, SlitherJsonBackend};
