//! Core data model for butterfly-narrate
//!
//! Route input types, the routing-data facade, turn codes, compass labels,
//! hint tokens and the error type shared by every renderer.

pub mod azimuth;
pub mod error;
pub mod facade;
pub mod hint;
pub mod route;
pub mod turn;

pub use error::{NarrateError, Result};
pub use facade::{NetworkSnapshot, RoutingDataFacade};
pub use route::{
    EdgeWeight, FixedPointCoordinate, NameId, NodeId, PathData, PhantomNode, PhantomNodes,
    RawRoute, COORDINATE_PRECISION, INVALID_EDGE_WEIGHT,
};
pub use turn::{InstructionCode, TurnInstruction};
