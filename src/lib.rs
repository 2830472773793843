//! # basejpeg
//!
//! A self-contained sequential baseline JPEG encoder.
//!
//! The encoder turns an in-memory pixel buffer (grayscale, RGB, or RGBA)
//! into a standards-compliant baseline JPEG stream: quality-scaled
//! quantization tables, a fast AAN forward DCT, fixed canonical Huffman
//! tables, and full-resolution 4:4:4 chroma. There is no decoder and no
//! progressive mode.
//!
//! ## Example
//!
//! ```rust
//! use basejpeg::{jpeg, ColorType};
//!
//! // Encode a 1x1 red RGB pixel to an in-memory buffer
//! let pixels: Vec<u8> = vec![255, 0, 0];
//! let data = jpeg::encode(&pixels, 1, 1, 85).unwrap();
//! assert_eq!(&data[0..2], &[0xFF, 0xD8]);
//!
//! // Or stream to any sink, e.g. grayscale into a reused Vec
//! let mut out = Vec::new();
//! jpeg::encode_to_sink(&mut out, &[128u8; 64], 8, 8, ColorType::Gray, 75).unwrap();
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod bits;
pub mod color;
pub mod error;
pub mod jpeg;
pub mod sink;

pub use color::ColorType;
pub use error::{Error, Result};
pub use sink::{IoSink, Sink};
