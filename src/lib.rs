//! # PUD Parser
//!
//! A Warcraft II map (.pud) decoder and preview renderer.
//!
//! A PUD file is a flat sequence of tagged chunks. This library locates the
//! chunks that describe a map, decodes them into a [`MapDescription`] and
//! can rasterize that description into a top-down preview image.
//!
//! ## Quick Start
//!
//! ```no_run
//! use pud_parser::{decode, render, RenderOptions, ExportFormat};
//!
//! fn preview(data: &[u8]) -> Result<(), Box<dyn std::error::Error>> {
//!     let map = decode(data)?;
//!     println!("{} ({}, {})", map.description, map.era, map.dimensions_string());
//!
//!     let image = render(&map, &RenderOptions::default());
//!     let png = image.encode(ExportFormat::Png)?;
//!     std::fs::write(ExportFormat::Png.default_file_name(), png)?;
//!     Ok(())
//! }
//! ```
//!
//! ## Module Overview
//!
//! - [`error`] - Error types and result alias
//! - [`binary`] - Bounds-checked little-endian reads over a byte slice
//! - [`chunk`] - Chunk tags and tag scanning
//! - [`format`] - File constants, eras and size classes
//! - [`map`] - The decoded map model and unit classification
//! - [`decode`] - Chunk-by-chunk decoding into a [`MapDescription`]
//! - [`color`] - Tile, player and unit display colors
//! - [`render`] - Rasterization and PNG/JPEG export
//!
//! ## Format Reference
//!
//! Each chunk is an 8-byte header (4-byte ASCII tag, `u32` payload length)
//! followed by its payload:
//!
//! | Tag    | Payload                                    | Required |
//! |--------|--------------------------------------------|----------|
//! | `TYPE` | `"WAR2 MAP\0\0"`, 2 bytes, `u32` format tag | yes      |
//! | `VER ` | `u16` version                              | no       |
//! | `DESC` | 32-byte NUL-padded description             | no       |
//! | `ERAX` | `u16` era (preferred over `ERA `)          | no       |
//! | `ERA ` | `u16` era                                  | no       |
//! | `DIM ` | `u16` width, `u16` height                  | no       |
//! | `MTXM` | `u16` tile code per cell, row-major        | no       |
//! | `UNIT` | 8-byte unit records                        | no       |
//!
//! All multi-byte integers are stored in little-endian byte order.

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod binary;
pub mod chunk;
pub mod color;
pub mod decode;
pub mod error;
pub mod format;
pub mod map;
pub mod render;

// Re-export commonly used types at the crate root
pub use color::Rgba;
pub use decode::{decode, decode_with_report, DecodeReport, DecodeWarning};
pub use error::{DecodeError, ExportError, RenderError, Result};
pub use format::{Era, SizeClass};
pub use map::{MapDescription, MapStats, Unit, UnitKind};
pub use render::{render, try_render, ExportFormat, PixelBuffer, RenderOptions};
