//! Generator polynomial construction
//!
//! Two strategies build the generator of a cyclic code over GF(2^M):
//!
//! - [`RootProduct`]: Reed-Solomon, `g(x) = prod_{i=0}^{NR-1} (x - pe^(FCR+i))`.
//! - [`MinimalPolynomials`]: binary BCH, `g(x)` is the product of caller-supplied
//!   minimal polynomials over GF(2), given as bitmasks (bit j = coefficient of x^j).
//!
//! Whatever the strategy, the result must vanish at every pe^(FCR+i), which is
//! checked before a [`GeneratorPolynomial`] is handed out.

use crate::error::{CodecError, CodecResult};
use crate::galois::{GaloisField, Index, Symbol, Value};
use log::debug;

/// Strategy for building a code's generator polynomial
pub trait GeneratorStrategy {
    /// Parity length (generator degree) for `roots` generator roots
    fn parity_len(&self, roots: usize) -> usize;

    /// Largest symbol value carried by codewords
    fn symbol_bound<T: Symbol>(&self, field: &GaloisField<T>) -> u32;

    /// Ascending generator coefficients of degree `parity_len(roots)`
    fn build<T: Symbol>(
        &self,
        field: &GaloisField<T>,
        roots: usize,
        fcr: u32,
    ) -> CodecResult<Vec<Value<T>>>;
}

/// Reed-Solomon generator with NR consecutive roots starting at pe^FCR
#[derive(Debug, Clone, Copy, Default)]
pub struct RootProduct;

impl GeneratorStrategy for RootProduct {
    fn parity_len(&self, roots: usize) -> usize {
        roots
    }

    fn symbol_bound<T: Symbol>(&self, field: &GaloisField<T>) -> u32 {
        field.order()
    }

    fn build<T: Symbol>(
        &self,
        field: &GaloisField<T>,
        roots: usize,
        fcr: u32,
    ) -> CodecResult<Vec<Value<T>>> {
        let pe = Index::new(1);
        let mut root = field.primitive_power(fcr as u64);
        let mut generator = vec![Value::zero(); roots + 1];

        // Multiply the accumulator by (x + root), one factor at a time
        for i in 0..roots {
            generator[i] = Value::one();
            for j in (1..=i).rev() {
                generator[j] = field.fma(root, generator[j], generator[j - 1]);
            }
            generator[0] = field.mul(generator[0], root);
            root = field.mul_index(root, pe);
        }
        generator[roots] = Value::one();

        Ok(generator)
    }
}

/// Binary BCH generator from minimal polynomials over GF(2)
#[derive(Debug, Clone, Default)]
pub struct MinimalPolynomials {
    polynomials: Vec<u32>,
    parity: Option<usize>,
}

impl MinimalPolynomials {
    pub fn new(polynomials: impl Into<Vec<u32>>) -> Self {
        Self {
            polynomials: polynomials.into(),
            parity: None,
        }
    }

    /// Expected parity length; defaults to the number of roots
    pub fn with_parity(mut self, parity: usize) -> Self {
        self.parity = Some(parity);
        self
    }

    pub fn polynomials(&self) -> &[u32] {
        &self.polynomials
    }
}

impl GeneratorStrategy for MinimalPolynomials {
    fn parity_len(&self, roots: usize) -> usize {
        self.parity.unwrap_or(roots)
    }

    fn symbol_bound<T: Symbol>(&self, _field: &GaloisField<T>) -> u32 {
        1
    }

    fn build<T: Symbol>(
        &self,
        field: &GaloisField<T>,
        roots: usize,
        _fcr: u32,
    ) -> CodecResult<Vec<Value<T>>> {
        let m = field.degree();
        for &poly in &self.polynomials {
            if poly == 0 || poly >> (m + 1) != 0 {
                return Err(CodecError::InvalidMinimalPolynomial { poly, degree: m });
            }
        }

        let expected = self.parity_len(roots);
        let actual: usize = self.polynomials.iter().map(|&p| poly_degree(p)).sum();
        if actual != expected {
            return Err(CodecError::GeneratorDegree { actual, expected });
        }

        let bit = |poly: u32, j: usize| Value::new(T::from_u32((poly >> j) & 1));
        let mut generator = vec![Value::zero(); expected + 1];
        generator[0] = Value::one();
        let mut degree = 0;

        // Binary coefficients, so each nonzero term just adds a shifted copy
        for &poly in &self.polynomials {
            let poly_deg = poly_degree(poly);
            for i in (0..=degree).rev() {
                if generator[i].is_zero() {
                    continue;
                }
                generator[i] = bit(poly, 0);
                for j in 1..=poly_deg {
                    generator[i + j] += bit(poly, j);
                }
            }
            degree += poly_deg;
        }

        Ok(generator)
    }
}

fn poly_degree(poly: u32) -> usize {
    (u32::BITS - 1 - poly.leading_zeros()) as usize
}

/// Generator polynomial in both representations
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorPolynomial<T: Symbol> {
    coefficients: Vec<Value<T>>,
    indices: Vec<Option<Index<T>>>,
}

impl<T: Symbol> GeneratorPolynomial<T> {
    /// Build with `strategy` and check that every root pe^(FCR+i) is a zero
    pub fn build<S: GeneratorStrategy>(
        field: &GaloisField<T>,
        strategy: &S,
        roots: usize,
        fcr: u32,
    ) -> CodecResult<Self> {
        let coefficients = strategy.build(field, roots, fcr)?;
        let indices = coefficients.iter().map(|&c| field.to_index(c)).collect();
        let generator = Self {
            coefficients,
            indices,
        };

        for i in 0..roots as u64 {
            let power = fcr as u64 + i;
            if !generator.eval(field, field.primitive_power(power)).is_zero() {
                return Err(CodecError::GeneratorRoot { power });
            }
        }

        debug!(
            "Generator polynomial of degree {}: {:?}",
            generator.degree(),
            generator.coefficients.iter().map(|c| c.get()).collect::<Vec<_>>()
        );
        Ok(generator)
    }

    /// Ascending coefficients, the leading one is 1
    pub fn coefficients(&self) -> &[Value<T>] {
        &self.coefficients
    }

    pub fn degree(&self) -> usize {
        self.coefficients.len() - 1
    }

    /// Coefficients in index form, `None` for zero coefficients
    pub(crate) fn index_form(&self) -> &[Option<Index<T>>] {
        &self.indices
    }

    /// Horner evaluation at x
    pub fn eval(&self, field: &GaloisField<T>, x: Index<T>) -> Value<T> {
        let degree = self.degree();
        let mut acc = self.coefficients[degree];
        for j in 1..=degree {
            acc = field.fma(x, acc, self.coefficients[degree - j]);
        }
        acc
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coefficients<T: Symbol>(generator: &GeneratorPolynomial<T>) -> Vec<T> {
        generator.coefficients().iter().map(|c| c.get()).collect()
    }

    #[test]
    fn test_reed_solomon_generator() {
        let field = GaloisField::<u8>::new(4, 0b10011).unwrap();
        let generator = GeneratorPolynomial::build(&field, &RootProduct, 4, 0).unwrap();
        // (x + 1)(x + a)(x + a^2)(x + a^3)
        assert_eq!(coefficients(&generator), vec![12, 1, 3, 15, 1]);
        assert_eq!(generator.degree(), 4);
    }

    #[test]
    fn test_reed_solomon_generator_vanishes_at_roots() {
        let field = GaloisField::<u16>::new(8, 0x11D).unwrap();
        for fcr in [0, 1, 120] {
            let generator = GeneratorPolynomial::build(&field, &RootProduct, 32, fcr).unwrap();
            for i in 0..32 {
                let root = field.primitive_power(fcr as u64 + i);
                assert!(generator.eval(&field, root).is_zero());
            }
            // pe^(FCR+NR) is not a root
            let outside = field.primitive_power(fcr as u64 + 32);
            assert!(!generator.eval(&field, outside).is_zero());
        }
    }

    #[test]
    fn test_bch_15_7_generator() {
        let field = GaloisField::<u8>::new(4, 0b10011).unwrap();
        let strategy = MinimalPolynomials::new([0b10011, 0b11111]).with_parity(8);
        let generator = GeneratorPolynomial::build(&field, &strategy, 4, 1).unwrap();
        // x^8 + x^7 + x^6 + x^4 + 1
        assert_eq!(coefficients(&generator), vec![1, 0, 0, 0, 1, 0, 1, 1, 1]);
        assert!(generator.index_form()[1].is_none());
    }

    #[test]
    fn test_bch_15_5_generator() {
        let field = GaloisField::<u8>::new(4, 0b10011).unwrap();
        let strategy = MinimalPolynomials::new([0b10011, 0b11111, 0b111]).with_parity(10);
        let generator = GeneratorPolynomial::build(&field, &strategy, 6, 1).unwrap();
        assert_eq!(
            coefficients(&generator),
            vec![1, 1, 1, 0, 1, 1, 0, 0, 1, 0, 1]
        );
    }

    #[test]
    fn test_bch_degree_sum_must_match() {
        let field = GaloisField::<u8>::new(4, 0b10011).unwrap();
        let strategy = MinimalPolynomials::new([0b10011, 0b11111]);
        assert_eq!(
            GeneratorPolynomial::build(&field, &strategy, 4, 1).unwrap_err(),
            CodecError::GeneratorDegree {
                actual: 8,
                expected: 4
            }
        );
    }

    #[test]
    fn test_bch_rejects_wide_minimal_polynomial() {
        let field = GaloisField::<u8>::new(4, 0b10011).unwrap();
        let strategy = MinimalPolynomials::new([0b100101]).with_parity(5);
        assert_eq!(
            GeneratorPolynomial::build(&field, &strategy, 2, 1).unwrap_err(),
            CodecError::InvalidMinimalPolynomial {
                poly: 0b100101,
                degree: 4
            }
        );
    }

    #[test]
    fn test_bch_missing_root_detected() {
        let field = GaloisField::<u8>::new(4, 0b10011).unwrap();
        // m1 covers a, a^2, a^4 but not a^3
        let strategy = MinimalPolynomials::new([0b10011]);
        assert_eq!(
            GeneratorPolynomial::build(&field, &strategy, 4, 1).unwrap_err(),
            CodecError::GeneratorRoot { power: 3 }
        );
    }
}
