//! Chain parameters and consensus constants for the Dash wire formats.

pub mod constants;
pub mod params;

pub use params::Network;

/// A 256-bit hash. Fields of this type are stored in display order (the
/// byte order shown by block explorers) and reversed when written to the
/// wire.
pub type Hash256 = [u8; 32];
