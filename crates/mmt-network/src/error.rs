//! Network-subsystem error type.

use thiserror::Error;

use mmt_core::NodeId;

/// Errors produced by `mmt-network`.
#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("no path from {from} to {to}")]
    NoPath { from: NodeId, to: NodeId },

    #[error("node {0} not found in network")]
    NodeNotFound(NodeId),
}

pub type NetworkResult<T> = Result<T, NetworkError>;
