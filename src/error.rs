use thiserror::Error;

use crate::bridge::BridgePhase;

pub type BridgeResult<T> = Result<T, BridgeError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BridgeError {
    #[error("engine construction failed: {0}")]
    Construction(String),

    #[error("engine call failed: {0}")]
    Engine(String),

    #[error("bridge is {phase:?}; cannot {action}")]
    InvalidPhase {
        phase: BridgePhase,
        action: &'static str,
    },
}
