//! Reed-Solomon and binary BCH forward error correction over GF(2^M)
//!
//! - [`galois`]: field tables and arithmetic with explicit value/index forms
//! - [`codec`]: generator construction, systematic encoding and
//!   errors-and-erasures decoding of N-symbol codewords
//! - [`stream`]: length-prefixed byte streams over GF(2^8) codecs

pub mod args;
pub mod codec;
pub mod error;
pub mod galois;
pub mod stream;

pub use codec::{BlockCodec, CodecBuilder, DecodeFailure, DecodeOutcome, DecoderConfig};
pub use error::{CodecError, CodecResult, FieldError};
pub use galois::{GaloisField, Index, Symbol, Value};
