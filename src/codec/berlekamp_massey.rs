//! Berlekamp-Massey error locator with erasure seeding
//!
//! The locator `C(x)` has `C[0] = 1` and its reciprocal roots are the locator
//! values `X = pe^(N-1-p)` of the corrupted positions `p`. Known erasures seed
//! `C(x)` with `prod (1 + X_e x)`, after which the iteration only has to find
//! the remaining unknown errors from the syndromes not consumed by erasures.

use super::types::Poly;
use crate::galois::{GaloisField, Symbol, Value};
use smallvec::smallvec;

/// Reset `locator` to the product of `(1 + x pe^(N-1-p))` over the erasures
pub(crate) fn erasure_locator<T: Symbol>(
    field: &GaloisField<T>,
    erasures: &[usize],
    locator: &mut [Value<T>],
) {
    debug_assert!(erasures.len() < locator.len());
    locator.fill(Value::zero());
    locator[0] = Value::one();

    let n = field.order() as u64;
    for (degree, &position) in erasures.iter().enumerate() {
        let x = field.primitive_power(n - 1 - position as u64);
        for j in (0..=degree).rev() {
            locator[j + 1] = field.fma(x, locator[j], locator[j + 1]);
        }
    }
}

/// Run the iteration over `syndromes`, updating a seeded `locator` in place
///
/// `locator` has `syndromes.len() + 1` coefficients and must hold the erasure
/// locator for `erasures` positions. Returns the register length L, which
/// bounds the degree of the result.
pub(crate) fn solve<T: Symbol>(
    field: &GaloisField<T>,
    syndromes: &[Value<T>],
    locator: &mut [Value<T>],
    erasures: usize,
) -> usize {
    let nr = syndromes.len();
    debug_assert_eq!(locator.len(), nr + 1);

    let mut previous: Poly<T> = locator.iter().copied().collect();
    let mut scratch: Poly<T> = smallvec![Value::zero(); nr + 1];
    let mut length = erasures;
    let mut shift = 1;

    for n in erasures..nr {
        let mut discrepancy = syndromes[n];
        for i in 1..=length {
            discrepancy = field.fma(locator[i], syndromes[n - i], discrepancy);
        }

        let Some(d) = field.to_index(discrepancy) else {
            shift += 1;
            continue;
        };

        // C(x) - d x^shift B(x)
        scratch[..shift].copy_from_slice(&locator[..shift]);
        for i in shift..=nr {
            scratch[i] = field.fma(d, previous[i - shift], locator[i]);
        }

        if 2 * length <= n + erasures {
            length = n + erasures + 1 - length;
            for (b, &c) in previous.iter_mut().zip(locator.iter()) {
                *b = field.div(c, d);
            }
            shift = 1;
        } else {
            shift += 1;
        }
        locator.copy_from_slice(&scratch);
    }

    length
}
