//! # mdocx
//!
//! Pure helper functions for markdown-to-document conversion pipelines.
//!
//! A converter that turns parsed markdown into a styled document (DOCX and
//! friends) needs a layer of small deterministic translations between the two
//! worlds. This crate is that layer:
//!
//! - Map markdown heading depths and alignment keywords to the document
//!   format's style tokens ([`heading_level`], [`alignment`])
//! - Collect image tokens from a parsed markdown token tree in reading order
//!   ([`collect_image_tokens`])
//! - Resolve and validate image file extensions from filenames and MIME types
//!   ([`image_extension`])
//! - Classify image sources and inspect raster payloads ([`is_http`],
//!   [`parse_data_url`], [`sniff_format`], [`image_dimensions`])
//!
//! It does not parse markdown or render documents; it only supplies the
//! translation helpers those layers call.
//!
//! ## Quick start
//!
//! ```
//! use mdocx::{HeadingLevel, ImageFormat, heading_level, image_extension};
//!
//! assert_eq!(heading_level(Some(2)), Some(HeadingLevel::Heading2));
//!
//! let format = image_extension("photo.JPG", None).unwrap();
//! assert_eq!(format, ImageFormat::Jpg);
//! assert_eq!(format.extension(), "jpg");
//! ```

pub mod error;
pub mod image;
pub mod style;
pub mod token;

pub use error::{Error, Result};
pub use image::{
    DataUrl, ImageFormat, image_dimensions, image_extension, is_http, parse_data_url,
    sniff_format, source_filename,
};
pub use style::{Alignment, HeadingLevel, alignment, heading_level};
pub use token::{ContentToken, TokenKind, collect_image_tokens, collect_image_tokens_into};
