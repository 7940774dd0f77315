//! A bit-exact verifier for the PCMP ("Permuted Compressed Monotone
//! Proof") container format: see each module's doc comment for the
//! invariant it establishes.

pub mod compress;
pub mod config;
pub mod container;
pub mod errors;
pub mod io;
pub mod merkle;
pub mod ordered_float;
pub mod predict;
pub mod varint;
pub mod verify;

pub use config::VerifyConfig;
pub use errors::Error;
pub use verify::{verify_bytes, verify_path, VerifyInfo};

pub type Result<T> = std::result::Result<T, Error>;
