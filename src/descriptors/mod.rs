//! Route renderers
//!
//! A descriptor turns one `RawRoute` into the bytes of one output document.
//! Descriptors only hold the routing-data facade and their configuration;
//! everything built while rendering lives on the stack of a single `run`
//! call, so one descriptor can serve concurrent renders.

pub mod json;
pub mod length;
pub mod narration;
pub mod way_ids;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::core::error::{NarrateError, Result};
use crate::core::facade::RoutingDataFacade;
use crate::core::route::RawRoute;

pub use json::JsonDescriptor;
pub use length::LengthDescriptor;
pub use narration::{build_instructions, InstructionRow, Narration};
pub use way_ids::WayIdDescriptor;

/// Index carried by the arrival row when no necessary segment was seen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TerminalIndexPolicy {
    /// Never go below 0
    #[default]
    Clamp,
    /// Keep the arithmetic result, -1 for an empty route
    Raw,
}

/// Renderer options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DescriptorConfig {
    /// Include the route geometry
    pub geometry: bool,
    /// Include turn-by-turn instructions
    pub instructions: bool,
    /// Encoded polyline instead of a coordinate list
    pub encode_geometry: bool,
    /// Generalization level of the geometry, 0..=18
    pub zoom_level: u8,
    pub terminal_index: TerminalIndexPolicy,
}

impl Default for DescriptorConfig {
    fn default() -> Self {
        Self {
            geometry: true,
            instructions: true,
            encode_geometry: true,
            zoom_level: 18,
            terminal_index: TerminalIndexPolicy::Clamp,
        }
    }
}

/// Document format produced by a descriptor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Json,
    Length,
    WayIds,
}

impl FromStr for OutputFormat {
    type Err = NarrateError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "length" => Ok(OutputFormat::Length),
            "wayids" | "way_ids" | "way-ids" => Ok(OutputFormat::WayIds),
            _ => Err(NarrateError::UnknownFormat(s.to_string())),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OutputFormat::Json => "json",
            OutputFormat::Length => "length",
            OutputFormat::WayIds => "wayids",
        };
        f.write_str(name)
    }
}

/// Renders a raw route into one output document
pub trait Descriptor {
    fn run(&self, route: &RawRoute) -> Result<Vec<u8>>;
}

/// Render `route` in `format` with a fresh descriptor
pub fn describe<F: RoutingDataFacade>(
    format: OutputFormat,
    facade: &F,
    config: DescriptorConfig,
    route: &RawRoute,
) -> Result<Vec<u8>> {
    let start = std::time::Instant::now();
    let output = match format {
        OutputFormat::Json => JsonDescriptor::new(facade, config).run(route),
        OutputFormat::Length => LengthDescriptor::new().run(route),
        OutputFormat::WayIds => WayIdDescriptor::new(facade).run(route),
    }?;
    tracing::debug!(
        format = %format,
        bytes = output.len(),
        elapsed_us = start.elapsed().as_micros() as u64,
        "route rendered"
    );
    Ok(output)
}
