//! Error types for field construction and codec operations
//!
//! Uncorrectable codewords are not errors: `BlockCodec::decode` reports them as
//! [`DecodeOutcome::Uncorrectable`](crate::codec::DecodeOutcome::Uncorrectable).
//! The variants below cover invalid configurations and caller contract violations.

use thiserror::Error;

/// Errors raised while building or using a Galois field
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    /// Field degree outside the supported range
    #[error("field degree {0} is outside the supported range 2..={max}", max = crate::galois::MAX_DEGREE)]
    UnsupportedDegree(u32),

    /// Storage type cannot hold every field element
    #[error("{bits}-bit symbols cannot hold elements of GF(2^{degree})")]
    SymbolTooNarrow { degree: u32, bits: u32 },

    /// Polynomial degree does not match the field degree
    #[error("polynomial {poly:#x} is not of degree {degree}")]
    DegreeMismatch { poly: u32, degree: u32 },

    /// Table generation did not cycle through every nonzero element
    #[error("polynomial {poly:#x} is not primitive over GF(2)")]
    NotPrimitive { poly: u32 },

    /// Value outside `0..=N`
    #[error("value {value} is not an element of GF(2^{degree})")]
    ValueOutOfRange { value: u32, degree: u32 },

    /// Index outside `0..N`
    #[error("index {index} is outside 0..{order}")]
    IndexOutOfRange { index: u32, order: u32 },

    /// Buffer symbol above the allowed bound
    #[error("symbol {value} at position {position} exceeds the maximum of {bound}")]
    SymbolOutOfRange {
        position: usize,
        value: u32,
        bound: u32,
    },
}

/// Errors raised by codec construction and by malformed encode/decode requests
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// Field construction or symbol validation failed
    #[error(transparent)]
    Field(#[from] FieldError),

    /// Number of generator roots is zero or not below the field order
    #[error("{roots} generator roots requested, must be in 1..{order}")]
    RootCount { roots: usize, order: u32 },

    /// Parity length cannot fit in a codeword
    #[error("parity length {parity} must be in 1..{order}")]
    ParityLength { parity: usize, order: u32 },

    /// Minimal polynomial is zero or wider than the field allows
    #[error("minimal polynomial {poly:#x} is not a nonzero polynomial of degree at most {degree}")]
    InvalidMinimalPolynomial { poly: u32, degree: u32 },

    /// Minimal polynomial degrees do not add up to the parity length
    #[error("minimal polynomial degrees sum to {actual}, expected {expected}")]
    GeneratorDegree { actual: usize, expected: usize },

    /// Generator polynomial does not vanish at one of its roots
    #[error("generator polynomial does not vanish at pe^{power}")]
    GeneratorRoot { power: u64 },

    /// Buffer has the wrong number of symbols
    #[error("buffer holds {actual} symbols, expected {expected}")]
    BufferLength { actual: usize, expected: usize },

    /// Erasure position outside the codeword
    #[error("erasure position {position} is outside a codeword of {length} symbols")]
    ErasureOutOfRange { position: usize, length: usize },

    /// Erasure position listed more than once
    #[error("erasure position {0} is listed more than once")]
    DuplicateErasure(usize),

    /// More erasures than generator roots
    #[error("{count} erasures exceed the {roots} generator roots")]
    TooManyErasures { count: usize, roots: usize },
}

/// Result type for codec operations
pub type CodecResult<T> = Result<T, CodecError>;
