//! Builder for block codecs
//!
//! ```
//! use rsfec::codec::CodecBuilder;
//!
//! let codec = CodecBuilder::<u8>::new(8, 0x11D)
//!     .roots(16)
//!     .first_consecutive_root(1)
//!     .build()
//!     .unwrap();
//! assert_eq!((codec.n(), codec.k()), (255, 239));
//! ```

use super::block::BlockCodec;
use super::config::DecoderConfig;
use super::generator::MinimalPolynomials;
use crate::error::{CodecError, CodecResult};
use crate::galois::{GaloisField, Symbol};
use std::marker::PhantomData;

/// Collects code parameters and builds a [`BlockCodec`]
///
/// Without minimal polynomials the result is a Reed-Solomon codec, with them a
/// binary BCH codec. Field tables come from [`GaloisField::shared`].
#[derive(Debug, Clone)]
pub struct CodecBuilder<T: Symbol> {
    degree: u32,
    poly: u32,
    roots: Option<usize>,
    fcr: u32,
    minimal_polynomials: Option<Vec<u32>>,
    parity: Option<usize>,
    config: DecoderConfig,
    _symbol: PhantomData<T>,
}

impl<T: Symbol> CodecBuilder<T> {
    /// Start from field GF(2^degree) generated by `poly`
    pub fn new(degree: u32, poly: u32) -> Self {
        Self {
            degree,
            poly,
            roots: None,
            fcr: 0,
            minimal_polynomials: None,
            parity: None,
            config: DecoderConfig::default(),
            _symbol: PhantomData,
        }
    }

    /// Number of consecutive generator roots NR (required)
    pub fn roots(mut self, roots: usize) -> Self {
        self.roots = Some(roots);
        self
    }

    /// Power of the first generator root, 0 by default
    pub fn first_consecutive_root(mut self, fcr: u32) -> Self {
        self.fcr = fcr;
        self
    }

    /// Build a binary BCH code from these minimal polynomials
    pub fn minimal_polynomials(mut self, polynomials: &[u32]) -> Self {
        self.minimal_polynomials = Some(polynomials.to_vec());
        self
    }

    /// Expected parity length
    pub fn parity(mut self, parity: usize) -> Self {
        self.parity = Some(parity);
        self
    }

    pub fn decoder_config(mut self, config: DecoderConfig) -> Self {
        self.config = config;
        self
    }

    pub fn build(self) -> CodecResult<BlockCodec<T>> {
        let field = GaloisField::<T>::shared(self.degree, self.poly)?;
        let roots = self.roots.unwrap_or(0);

        let codec = match self.minimal_polynomials {
            Some(polynomials) => {
                let mut strategy = MinimalPolynomials::new(polynomials);
                if let Some(parity) = self.parity {
                    strategy = strategy.with_parity(parity);
                }
                BlockCodec::new(field, &strategy, roots, self.fcr)?
            }
            None => {
                if let Some(parity) = self.parity.filter(|&p| p != roots) {
                    return Err(CodecError::GeneratorDegree {
                        actual: roots,
                        expected: parity,
                    });
                }
                BlockCodec::reed_solomon(field, roots, self.fcr)?
            }
        };

        Ok(codec.with_config(self.config))
    }
}
