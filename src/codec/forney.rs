//! Forney's algorithm for error magnitudes
//!
//! With evaluator `Omega(x) = S(x) Lambda(x) mod x^NR`, the magnitude at a root
//! `r` of the locator is `r^(FCR-1) Omega(r) / Lambda'(r)`. In characteristic
//! two the formal derivative keeps only the odd-degree terms of the locator.

use super::types::{DecodeFailure, Poly};
use crate::galois::{GaloisField, Index, Symbol, Value};

/// Write `S(x) Lambda(x) mod x^NR` into `evaluator`, returning its degree
///
/// Coefficients above the locator degree are left zero. `None` means the
/// evaluator is the zero polynomial.
pub(crate) fn compute_evaluator<T: Symbol>(
    field: &GaloisField<T>,
    syndromes: &[Value<T>],
    locator: &[Value<T>],
    evaluator: &mut [Value<T>],
) -> Option<usize> {
    evaluator.fill(Value::zero());
    let limit = (locator.len() - 1).min(syndromes.len() - 1);

    let mut degree = None;
    for i in 0..=limit {
        let mut acc = Value::zero();
        for j in 0..=i {
            acc = field.fma(syndromes[i - j], locator[j], acc);
        }
        evaluator[i] = acc;
        if !acc.is_zero() {
            degree = Some(i);
        }
    }
    degree
}

/// Magnitude for each location, zero where the evaluator vanishes
pub(crate) fn compute_magnitudes<T: Symbol>(
    field: &GaloisField<T>,
    locator: &[Value<T>],
    evaluator: &[Value<T>],
    locations: &[Index<T>],
    fcr: u32,
    magnitudes: &mut Poly<T>,
) -> Result<(), DecodeFailure> {
    magnitudes.clear();
    let pe = Index::new(1);

    for &location in locations {
        let root = field.mul_index(location, pe);

        let mut eval = Value::zero();
        for &c in evaluator.iter().rev() {
            eval = field.fma(eval, root, c);
        }
        if eval.is_zero() {
            magnitudes.push(Value::zero());
            continue;
        }

        let root2 = field.mul_index(root, root);
        let mut power = Index::new(0);
        let mut derivative = Value::zero();
        for &c in locator.iter().skip(1).step_by(2) {
            derivative = field.fma(c, power, derivative);
            power = field.mul_index(power, root2);
        }

        let quotient = field
            .checked_div(eval, derivative)
            .ok_or(DecodeFailure::DegenerateDerivative {
                position: location.get().to_usize(),
            })?;
        magnitudes.push(field.mul(quotient, field.pow_index(root, fcr as i64 - 1)));
    }
    Ok(())
}
