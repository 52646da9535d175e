//! molbridge: synchronization bridge for an embedded molecular viewer.
//!
//! The crate connects a host-owned observable property model (~25 declarative
//! keys) to a stateful, asynchronously-constructed PDBe Mol* viewer instance:
//! configuration snapshots are derived from the model, engine-bound commands
//! are gated behind the readiness signal, per-key changes dispatch to either
//! a targeted capability call or a full reconfiguration, and engine-originated
//! interaction events are relayed back into the model.

pub mod bridge;
pub mod color;
pub mod config;
pub mod engine;
pub mod error;
pub mod events;
pub mod keys;
pub mod model;
pub mod params;
pub mod queue;
pub mod resources;
pub mod telemetry;
pub mod visibility;

pub use bridge::{BridgePhase, SubscriptionRecord, ViewerBridge};
pub use color::{Rgb, normalize_color};
pub use config::ViewerConfig;
pub use engine::{Engine, EngineConnector};
pub use error::{BridgeError, BridgeResult};
pub use events::{EventChannel, InteractionEvent, InteractionKind};
pub use keys::{Binding, PropertyKey, TargetedOp};
pub use model::{MemoryPropertyModel, PropertyModel};
pub use visibility::{HideFlags, StructuralCategory, VisibilityMap};
