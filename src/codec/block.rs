//! Block codec: encode, syndromes and in-place decode of N-symbol codewords
//!
//! One codec serves both code families. The [`GeneratorStrategy`] decides the
//! generator and the symbol alphabet: Reed-Solomon words carry any field
//! element, binary BCH words carry only 0 and 1.
//!
//! Codeword layout is `data[0..K] ++ parity[K..N]`, with `code[0]` the
//! coefficient of `x^(N-1)`.

use super::config::{DecoderConfig, ErasurePolicy};
use super::correction::correct;
use super::generator::{GeneratorPolynomial, GeneratorStrategy, MinimalPolynomials, RootProduct};
use super::types::{DecodeFailure, DecodeOutcome, Poly, Syndromes};
use super::{encoder, syndromes};
use crate::error::{CodecError, CodecResult};
use crate::galois::{as_values, as_values_mut, GaloisField, Index, Symbol, Value};
use bytemuck::TransparentWrapper;
use log::{debug, trace};
use smallvec::smallvec;
use std::sync::Arc;

/// Systematic cyclic block codec over GF(2^M)
#[derive(Debug, Clone)]
pub struct BlockCodec<T: Symbol> {
    field: Arc<GaloisField<T>>,
    generator: GeneratorPolynomial<T>,
    roots: Vec<Index<T>>,
    fcr: u32,
    n: usize,
    k: usize,
    symbol_bound: u32,
    config: DecoderConfig,
}

impl<T: Symbol> BlockCodec<T> {
    /// Codec with `roots` consecutive generator roots starting at pe^fcr
    pub fn new<S: GeneratorStrategy>(
        field: Arc<GaloisField<T>>,
        strategy: &S,
        roots: usize,
        fcr: u32,
    ) -> CodecResult<Self> {
        let order = field.order();
        if roots == 0 || roots >= order as usize {
            return Err(CodecError::RootCount { roots, order });
        }
        let parity = strategy.parity_len(roots);
        if parity == 0 || parity >= order as usize {
            return Err(CodecError::ParityLength { parity, order });
        }

        let generator = GeneratorPolynomial::build(&field, strategy, roots, fcr)?;
        let root_powers = (0..roots as u64)
            .map(|i| field.primitive_power(fcr as u64 + i))
            .collect();
        let n = order as usize;
        let symbol_bound = strategy.symbol_bound(&field);

        debug!(
            "Created ({}, {}) block codec over GF(2^{}) with {} roots from pe^{}",
            n,
            n - parity,
            field.degree(),
            roots,
            fcr
        );

        Ok(Self {
            field,
            generator,
            roots: root_powers,
            fcr,
            n,
            k: n - parity,
            symbol_bound,
            config: DecoderConfig::default(),
        })
    }

    /// Reed-Solomon codec, parity length equals `roots`
    pub fn reed_solomon(field: Arc<GaloisField<T>>, roots: usize, fcr: u32) -> CodecResult<Self> {
        Self::new(field, &RootProduct, roots, fcr)
    }

    /// Binary BCH codec from minimal polynomials whose degrees sum to `parity`
    pub fn bch(
        field: Arc<GaloisField<T>>,
        roots: usize,
        fcr: u32,
        polynomials: &[u32],
        parity: usize,
    ) -> CodecResult<Self> {
        let strategy = MinimalPolynomials::new(polynomials).with_parity(parity);
        Self::new(field, &strategy, roots, fcr)
    }

    pub fn with_config(mut self, config: DecoderConfig) -> Self {
        self.config = config;
        self
    }

    pub fn field(&self) -> &Arc<GaloisField<T>> {
        &self.field
    }

    pub fn generator(&self) -> &GeneratorPolynomial<T> {
        &self.generator
    }

    /// Codeword length N
    pub fn n(&self) -> usize {
        self.n
    }

    /// Data length K
    pub fn k(&self) -> usize {
        self.k
    }

    pub fn parity_len(&self) -> usize {
        self.n - self.k
    }

    /// Number of generator roots NR
    pub fn roots(&self) -> usize {
        self.roots.len()
    }

    /// First consecutive root FCR
    pub fn fcr(&self) -> u32 {
        self.fcr
    }

    /// Largest symbol value a codeword may hold
    pub fn symbol_bound(&self) -> u32 {
        self.symbol_bound
    }

    pub fn config(&self) -> &DecoderConfig {
        &self.config
    }

    /// Guaranteed number of correctable errors without erasures
    pub fn correctable_errors(&self) -> usize {
        self.roots.len() / 2
    }

    /// Encode in place: `code[..K]` is the data, `code[K..]` receives the parity
    pub fn encode(&self, code: &mut [T]) -> CodecResult<()> {
        check_length(code.len(), self.n)?;
        let (data, parity) = code.split_at_mut(self.k);
        let data = as_values(data, self.symbol_bound)?;
        encoder::encode(
            &self.field,
            self.generator.index_form(),
            data,
            Value::wrap_slice_mut(parity),
        );
        Ok(())
    }

    /// Encode `data` (K symbols) into a separate `parity` buffer
    pub fn encode_parity(&self, data: &[T], parity: &mut [T]) -> CodecResult<()> {
        check_length(data.len(), self.k)?;
        check_length(parity.len(), self.parity_len())?;
        let data = as_values(data, self.symbol_bound)?;
        encoder::encode(
            &self.field,
            self.generator.index_form(),
            data,
            Value::wrap_slice_mut(parity),
        );
        Ok(())
    }

    /// Syndromes of a received word, for detection without correction
    pub fn compute_syndromes(&self, code: &[T]) -> CodecResult<Syndromes<T>> {
        check_length(code.len(), self.n)?;
        let code = as_values(code, self.symbol_bound)?;
        Ok(self.syndromes_of(code))
    }

    fn syndromes_of(&self, code: &[Value<T>]) -> Syndromes<T> {
        let mut values: Poly<T> = smallvec![Value::zero(); self.roots.len()];
        let nonzero = syndromes::compute(&self.field, &self.roots, code, &mut values);
        Syndromes { values, nonzero }
    }

    /// Correct `code` in place, using `erasures` as known-bad positions
    ///
    /// An uncorrectable word is reported as [`DecodeOutcome::Uncorrectable`]
    /// and left as received, except that [`ErasurePolicy::Clear`] zeroes the
    /// erased symbols before anything else happens.
    pub fn decode(&self, code: &mut [T], erasures: &[usize]) -> CodecResult<DecodeOutcome> {
        check_length(code.len(), self.n)?;
        self.check_erasures(erasures)?;
        let code = as_values_mut(code, self.symbol_bound)?;

        if self.config.erasure_policy == ErasurePolicy::Clear {
            for &position in erasures {
                code[position] = Value::zero();
            }
        }

        let syndromes = self.syndromes_of(code);
        if syndromes.is_clean() {
            return Ok(DecodeOutcome::Clean);
        }

        let correction = match correct(&self.field, syndromes.values(), erasures, self.fcr) {
            Ok(correction) => correction,
            Err(failure) => return Ok(self.failed(failure)),
        };

        let mut count = 0;
        for (position, magnitude) in correction.iter() {
            let value = magnitude.get().to_u32();
            if value > self.symbol_bound {
                return Ok(self.failed(DecodeFailure::MagnitudeOutOfRange {
                    position,
                    magnitude: value,
                    bound: self.symbol_bound,
                }));
            }
            if !magnitude.is_zero() {
                count += 1;
            }
        }
        if count == 0 {
            return Ok(self.failed(DecodeFailure::NoCorrection));
        }

        for (position, magnitude) in correction.iter() {
            code[position] += magnitude;
        }

        if self.config.verify {
            let residual = self.syndromes_of(code);
            if !residual.is_clean() {
                for (position, magnitude) in correction.iter() {
                    code[position] += magnitude;
                }
                return Ok(self.failed(DecodeFailure::ResidualSyndromes {
                    nonzero: residual.nonzero(),
                }));
            }
        }

        Ok(DecodeOutcome::Corrected(count))
    }

    fn failed(&self, failure: DecodeFailure) -> DecodeOutcome {
        trace!("Decode failed: {}", failure);
        DecodeOutcome::Uncorrectable(failure)
    }

    fn check_erasures(&self, erasures: &[usize]) -> CodecResult<()> {
        if erasures.len() > self.roots.len() {
            return Err(CodecError::TooManyErasures {
                count: erasures.len(),
                roots: self.roots.len(),
            });
        }
        for (i, &position) in erasures.iter().enumerate() {
            if position >= self.n {
                return Err(CodecError::ErasureOutOfRange {
                    position,
                    length: self.n,
                });
            }
            if erasures[..i].contains(&position) {
                return Err(CodecError::DuplicateErasure(position));
            }
        }
        Ok(())
    }
}

fn check_length(actual: usize, expected: usize) -> CodecResult<()> {
    if actual != expected {
        return Err(CodecError::BufferLength { actual, expected });
    }
    Ok(())
}
