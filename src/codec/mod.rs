//! Reed-Solomon and binary BCH codecs over GF(2^M)
//!
//! Decoding runs the classic pipeline:
//! syndromes, Berlekamp-Massey locator (seeded with known erasures),
//! root search, Forney magnitudes, then in-place correction.

mod berlekamp_massey;
pub mod block;
pub mod builder;
pub mod config;
mod correction;
mod encoder;
mod forney;
pub mod generator;
mod roots;
mod syndromes;
pub mod types;

pub use block::BlockCodec;
pub use builder::CodecBuilder;
pub use config::{DecoderConfig, ErasurePolicy};
pub use generator::{GeneratorPolynomial, GeneratorStrategy, MinimalPolynomials, RootProduct};
pub use types::{DecodeFailure, DecodeOutcome, Syndromes};
