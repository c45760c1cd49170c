//! Error taxonomy for fabric planning.
//!
//! Configuration and topology-construction errors are fatal and surface
//! before anything is written or installed. Per-switch classification
//! errors are recovered locally by the provisioner and never abort the
//! process.

/// Errors raised while validating fabric parameters, decoding switch
/// identities, or constructing the topology plan.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FabricError {
    /// Fabric parameter rejected before any construction is attempted.
    #[error("invalid fabric parameter k={k}: must be an even integer in 2..=254")]
    InvalidParameter { k: u16 },

    /// Switch identity matches no valid role and coordinate combination.
    #[error("unrecognized switch identity {id:#08x} for k={k}")]
    UnrecognizedIdentity { id: u32, k: u8 },

    /// A coordinate fell outside its valid range during address or name
    /// construction.
    #[error("{what}={value} out of range, limit {limit}")]
    OutOfRange {
        what: &'static str,
        value: u32,
        limit: u32,
    },

    /// Two links claimed the same port on one switch while wiring the
    /// topology.
    #[error("port {port} assigned twice on switch {switch}")]
    PortConflict { switch: String, port: u16 },

    /// The control-plane sink rejected a rule installation.
    #[error("rule installation failed on switch {switch:#08x}: {reason}")]
    Install { switch: u32, reason: String },
}
