//! Types and structures for codec operations

use crate::galois::{Index, Symbol, Value};
use smallvec::SmallVec;
use thiserror::Error;

/// Generator root count up to which decode scratch space stays inline
pub(crate) const INLINE_ROOTS: usize = 64;

/// Polynomial scratch buffer, ascending coefficients
pub(crate) type Poly<T> = SmallVec<[Value<T>; INLINE_ROOTS + 1]>;

/// Error positions in index form
pub(crate) type Locations<T> = SmallVec<[Index<T>; INLINE_ROOTS]>;

/// Raw symbols of a polynomial, for log output
pub(crate) fn symbols<T: Symbol>(values: &[Value<T>]) -> Vec<T> {
    values.iter().map(|v| v.get()).collect()
}

/// Received codeword evaluated at each generator root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Syndromes<T: Symbol> {
    pub(crate) values: Poly<T>,
    pub(crate) nonzero: usize,
}

impl<T: Symbol> Syndromes<T> {
    /// Syndrome i is the codeword evaluated at pe^(FCR+i)
    pub fn values(&self) -> &[Value<T>] {
        &self.values
    }

    /// Number of nonzero syndromes
    pub fn nonzero(&self) -> usize {
        self.nonzero
    }

    /// True when no corruption was detected
    pub fn is_clean(&self) -> bool {
        self.nonzero == 0
    }

    pub fn to_symbols(&self) -> Vec<T> {
        symbols(&self.values)
    }
}

/// Why a corrupted codeword could not be corrected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DecodeFailure {
    /// Locator is trivial, or longer than `roots` syndromes and the
    /// erasures can pin down
    #[error("error locator degree {degree} is zero or beyond the radius of {roots} roots")]
    LocatorDegree { degree: usize, roots: usize },

    /// Locator does not split into distinct roots over the field
    #[error("error locator of degree {degree} has only {found} roots")]
    MissingRoots { found: usize, degree: usize },

    /// Formal derivative of the locator vanishes at a root
    #[error("locator derivative vanishes at position {position}")]
    DegenerateDerivative { position: usize },

    /// Correction is not a symbol of the code (non-binary BCH correction)
    #[error("error magnitude {magnitude} at position {position} exceeds the symbol bound {bound}")]
    MagnitudeOutOfRange {
        position: usize,
        magnitude: u32,
        bound: u32,
    },

    /// Every located error has magnitude zero
    #[error("located errors carry no correction")]
    NoCorrection,

    /// Corrected word is still not a codeword
    #[error("{nonzero} syndromes remain nonzero after correction")]
    ResidualSyndromes { nonzero: usize },
}

/// Result of decoding one codeword
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeOutcome {
    /// All syndromes were zero, nothing to correct
    Clean,
    /// Number of symbols changed in place
    Corrected(usize),
    /// Corruption detected but not correctable, buffer left as received
    Uncorrectable(DecodeFailure),
}

impl DecodeOutcome {
    /// Integer status: 0 clean, positive correction count, -1 failure
    pub fn status(&self) -> isize {
        match self {
            DecodeOutcome::Clean => 0,
            DecodeOutcome::Corrected(count) => *count as isize,
            DecodeOutcome::Uncorrectable(_) => -1,
        }
    }

    /// Number of corrected symbols, `None` on failure
    pub fn corrections(&self) -> Option<usize> {
        match self {
            DecodeOutcome::Clean => Some(0),
            DecodeOutcome::Corrected(count) => Some(*count),
            DecodeOutcome::Uncorrectable(_) => None,
        }
    }

    pub fn is_recovered(&self) -> bool {
        !matches!(self, DecodeOutcome::Uncorrectable(_))
    }
}
