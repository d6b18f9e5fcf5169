//! Command definitions for the butterfly-narrate binary

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::{Path, PathBuf};

use butterfly_narrate::{
    decode_hint, describe, DescriptorConfig, NetworkSnapshot, OutputFormat, RawRoute,
    RoutingDataFacade, TerminalIndexPolicy,
};

#[derive(Parser)]
#[command(name = "butterfly-narrate")]
#[command(about = "Turn-by-turn narration for computed OSM routes", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Log debug events
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Log as JSON lines instead of plain text
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Render a route document
    Render {
        /// Network snapshot (node coordinates and road names, JSON)
        #[arg(short, long)]
        network: PathBuf,

        /// Route as produced by the search (JSON)
        #[arg(short, long)]
        route: PathBuf,

        /// Output format: json, length or wayids
        #[arg(short, long, default_value = "json")]
        format: OutputFormat,

        /// Renderer options (JSON); flags below override it
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Leave out the route geometry
        #[arg(long)]
        no_geometry: bool,

        /// Leave out turn-by-turn instructions
        #[arg(long)]
        no_instructions: bool,

        /// Coordinate list instead of an encoded polyline
        #[arg(long)]
        verbose_geometry: bool,

        /// Geometry zoom level (0-18)
        #[arg(short, long)]
        zoom: Option<u8>,

        /// Keep -1 as the arrival row index of routes without turns
        #[arg(long)]
        raw_terminal_index: bool,

        /// Output file, or "-" for stdout
        #[arg(short, long, default_value = "-")]
        output: String,
    },

    /// Decode a hint token into its phantom node
    DecodeHint {
        /// Token from a rendered document's hint_data
        token: String,
    },

    /// Print the checksum of a network snapshot
    Checksum {
        /// Network snapshot (JSON)
        #[arg(short, long)]
        network: PathBuf,
    },
}

/// Flag overrides applied on top of the base configuration
#[derive(Debug, Default, Clone, Copy)]
pub struct ConfigOverrides {
    pub no_geometry: bool,
    pub no_instructions: bool,
    pub verbose_geometry: bool,
    pub zoom: Option<u8>,
    pub raw_terminal_index: bool,
}

impl ConfigOverrides {
    pub fn apply(self, mut config: DescriptorConfig) -> DescriptorConfig {
        if self.no_geometry {
            config.geometry = false;
        }
        if self.no_instructions {
            config.instructions = false;
        }
        if self.verbose_geometry {
            config.encode_geometry = false;
        }
        if let Some(zoom) = self.zoom {
            config.zoom_level = zoom;
        }
        if self.raw_terminal_index {
            config.terminal_index = TerminalIndexPolicy::Raw;
        }
        config
    }
}

impl Cli {
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Render {
                network,
                route,
                format,
                config,
                no_geometry,
                no_instructions,
                verbose_geometry,
                zoom,
                raw_terminal_index,
                output,
            } => {
                let snapshot = load_network(&network)?;
                let raw_route = load_route(&route)?;

                let base = match config {
                    Some(path) => load_config(&path)?,
                    None => DescriptorConfig::default(),
                };
                let config = ConfigOverrides {
                    no_geometry,
                    no_instructions,
                    verbose_geometry,
                    zoom,
                    raw_terminal_index,
                }
                .apply(base);
                tracing::debug!(?config, %format, "rendering route");

                let document = describe(format, &snapshot, config, &raw_route)
                    .with_context(|| format!("Failed to render {}", route.display()))?;
                write_output(&output, &document)
            }
            Commands::DecodeHint { token } => {
                let phantom = decode_hint(&token)?;
                println!("{}", serde_json::to_string_pretty(&phantom)?);
                Ok(())
            }
            Commands::Checksum { network } => {
                let snapshot = load_network(&network)?;
                println!("{}", snapshot.check_sum());
                Ok(())
            }
        }
    }
}

fn load_network(path: &Path) -> Result<NetworkSnapshot> {
    let snapshot = NetworkSnapshot::load(path)
        .with_context(|| format!("Failed to load network snapshot {}", path.display()))?;
    tracing::info!(
        nodes = snapshot.node_count(),
        names = snapshot.name_count(),
        checksum = snapshot.check_sum(),
        "network snapshot loaded"
    );
    Ok(snapshot)
}

fn load_route(path: &Path) -> Result<RawRoute> {
    let data = std::fs::read(path)
        .with_context(|| format!("Failed to read route {}", path.display()))?;
    serde_json::from_slice(&data)
        .with_context(|| format!("Failed to parse route {}", path.display()))
}

fn load_config(path: &Path) -> Result<DescriptorConfig> {
    let data = std::fs::read(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    serde_json::from_slice(&data)
        .with_context(|| format!("Failed to parse config {}", path.display()))
}

fn write_output(output: &str, document: &[u8]) -> Result<()> {
    if output == "-" {
        let mut stdout = std::io::stdout().lock();
        stdout.write_all(document)?;
        stdout.write_all(b"\n")?;
        stdout.flush()?;
    } else {
        std::fs::write(output, document).with_context(|| format!("Failed to write {output}"))?;
        tracing::info!(path = output, bytes = document.len(), "document written");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_arguments() {
        let cli = Cli::parse_from([
            "butterfly-narrate",
            "render",
            "--network",
            "net.json",
            "--route",
            "route.json",
            "--format",
            "wayids",
            "--zoom",
            "12",
            "--no-instructions",
        ]);
        match cli.command {
            Commands::Render {
                format,
                zoom,
                no_instructions,
                output,
                ..
            } => {
                assert_eq!(format, OutputFormat::WayIds);
                assert_eq!(zoom, Some(12));
                assert!(no_instructions);
                assert_eq!(output, "-");
            }
            _ => panic!("expected render"),
        }
    }

    #[test]
    fn test_unknown_format_rejected() {
        let parsed = Cli::try_parse_from([
            "butterfly-narrate",
            "render",
            "--network",
            "n.json",
            "--route",
            "r.json",
            "--format",
            "gpx",
        ]);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_overrides_applied_on_top_of_config() {
        let overrides = ConfigOverrides {
            verbose_geometry: true,
            zoom: Some(10),
            raw_terminal_index: true,
            ..Default::default()
        };
        let config = overrides.apply(DescriptorConfig::default());
        assert!(config.geometry);
        assert!(config.instructions);
        assert!(!config.encode_geometry);
        assert_eq!(config.zoom_level, 10);
        assert_eq!(config.terminal_index, TerminalIndexPolicy::Raw);
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from([
            "butterfly-narrate",
            "decode-hint",
            "abc",
            "--verbose",
            "--log-json",
        ]);
        assert!(cli.verbose);
        assert!(cli.log_json);
    }
}
