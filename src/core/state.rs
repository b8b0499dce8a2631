use serde::{Deserialize, Serialize};

/// Lifecycle state of a constructed node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum NodeState {
    /// Input buffer empty
    #[default]
    Idle,
    /// Input buffered, processing condition not evaluated or not met
    Buffering,
    Processing,
    /// Output handed to downstream nodes
    Emitted,
}

impl NodeState {
    /// Check if transition from current state to target state is valid
    pub fn can_transition_to(&self, target: &NodeState) -> bool {
        use NodeState::*;

        matches!(
            (self, target),
            // From Idle (generators process without buffered input)
            (Idle, Buffering) |
            (Idle, Processing) |

            // From Buffering
            (Buffering, Processing) |
            (Buffering, Idle) |

            // From Processing
            (Processing, Emitted) |
            (Processing, Idle) |
            (Processing, Buffering) |

            // From Emitted
            (Emitted, Idle) |
            (Emitted, Buffering) |
            (Emitted, Processing) |

            // Withheld output released once the next-node gate opens
            (Idle, Emitted) |
            (Buffering, Emitted)
        )
    }

    /// Get human-readable state name
    pub fn name(&self) -> &str {
        match self {
            Self::Idle => "Idle",
            Self::Buffering => "Buffering",
            Self::Processing => "Processing",
            Self::Emitted => "Emitted",
        }
    }
}
