//! # Butterfly-narrate
//!
//! Turns a computed route into something a client can show: geometry,
//! turn-by-turn instructions with consolidated roundabouts, a distance/time
//! summary, route names and resumption hints, for the primary route and an
//! optional alternative.
//!
//! ## Example
//!
//! ```rust,no_run
//! use butterfly_narrate::{describe, DescriptorConfig, NetworkSnapshot, OutputFormat, RawRoute};
//!
//! # fn main() -> butterfly_narrate::Result<()> {
//! let network = NetworkSnapshot::load("network.json")?;
//! let route: RawRoute = serde_json::from_slice(&std::fs::read("route.json")?)?;
//! let document = describe(OutputFormat::Json, &network, DescriptorConfig::default(), &route)?;
//! println!("{}", String::from_utf8_lossy(&document));
//! # Ok(())
//! # }
//! ```

pub mod core;
pub mod description;
pub mod descriptors;

pub use crate::core::{
    FixedPointCoordinate, InstructionCode, NarrateError, NetworkSnapshot, PathData, PhantomNode,
    PhantomNodes, RawRoute, Result, RoutingDataFacade, TurnInstruction,
};
pub use crate::core::hint::{decode_hint, encode_hint};
pub use crate::description::{PathDescription, SegmentInformation};
pub use crate::descriptors::{
    describe, Descriptor, DescriptorConfig, JsonDescriptor, LengthDescriptor, OutputFormat,
    TerminalIndexPolicy, WayIdDescriptor,
};
