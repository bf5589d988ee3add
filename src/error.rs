//! Error taxonomy for the selection engine.
//!
//! Every variant is a precondition violation the caller can check ahead of
//! time via the exposed availability counts; nothing here is fatal to the
//! host. Malformed persisted state is not represented: the storage codecs
//! recover to defaults locally and never surface it.

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EngineError {
    /// No item with positive weight, or selection parameters that cannot
    /// produce a result (e.g. splitting into zero teams).
    #[error("no usable input for this operation")]
    InvalidInput,

    /// A draw was requested but every participant has already been drawn.
    #[error("no participants left to draw")]
    PoolExhausted,
}
