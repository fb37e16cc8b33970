//! Error types for graph editing operations.
//!
//! Connection validation failures are ordinary outcomes of user gestures
//! (dragging a wire onto the wrong pin) and live in [`ConnectError`].
//! Everything else in [`GraphError`] points at a stale handle held by the
//! caller.

use crate::graph::{ArcId, NodeId, NodePin};
use thiserror::Error;

/// Reasons why two pins cannot be connected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConnectError {
    /// Both endpoints belong to the same node
    #[error("Cannot connect pins on the same node")]
    SameNode,
    /// Both pins are inputs or both are outputs
    #[error("Must connect an input to an output")]
    SameStream,
    /// One pin carries flow, the other data
    #[error("Cannot connect a flow pin to a data pin")]
    ActionMismatch,
    /// The pins carry different data types
    #[error("Type mismatch: output is `{output}`, input is `{input}`")]
    DtypeMismatch { output: String, input: String },
    /// The flow output already continues somewhere
    #[error("Flow output already has an outgoing connection")]
    FanOutViolation,
    /// The data input already has a source
    #[error("Data input already has an incoming connection")]
    FanInViolation,
    /// Endpoints were required in output, input order but came reversed
    #[error("Expected an output pin followed by an input pin")]
    Reversed,
}

/// Errors returned by [`Graph`](crate::Graph) operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    #[error(transparent)]
    Validation(#[from] ConnectError),

    #[error("Node {0:?} not found")]
    NodeNotFound(NodeId),

    #[error("Arc {0:?} not found")]
    ArcNotFound(ArcId),

    #[error("Pin {0:?} not found")]
    PinNotFound(NodePin),

    #[error("Node template `{0}` not found")]
    TemplateNotFound(String),

    #[error("Invalid snapshot: {0}")]
    InvalidSnapshot(String),
}

impl GraphError {
    /// Whether this is a user-triggerable validation failure rather than a
    /// stale-handle lookup failure.
    pub fn is_validation(&self) -> bool {
        matches!(self, GraphError::Validation(_))
    }
}

/// Result alias for graph operations.
pub type Result<T> = std::result::Result<T, GraphError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{Action, Stream};

    #[test]
    fn test_connect_error_display() {
        assert_eq!(
            ConnectError::SameNode.to_string(),
            "Cannot connect pins on the same node"
        );
        assert_eq!(
            ConnectError::SameStream.to_string(),
            "Must connect an input to an output"
        );
        assert_eq!(
            ConnectError::DtypeMismatch {
                output: "int".into(),
                input: "string".into()
            }
            .to_string(),
            "Type mismatch: output is `int`, input is `string`"
        );
        assert_eq!(
            ConnectError::FanOutViolation.to_string(),
            "Flow output already has an outgoing connection"
        );
        assert_eq!(
            ConnectError::FanInViolation.to_string(),
            "Data input already has an incoming connection"
        );
    }

    #[test]
    fn test_validation_is_transparent() {
        let err: GraphError = ConnectError::ActionMismatch.into();
        assert!(err.is_validation());
        assert_eq!(err.to_string(), ConnectError::ActionMismatch.to_string());
    }

    #[test]
    fn test_lookup_errors_are_not_validation() {
        let err = GraphError::NodeNotFound(NodeId(7));
        assert!(!err.is_validation());
        assert_eq!(err.to_string(), "Node NodeId(7) not found");

        let pin = NodePin::new(NodeId(1), Action::Data, Stream::Input, 2);
        assert!(!GraphError::PinNotFound(pin).is_validation());
    }
}
