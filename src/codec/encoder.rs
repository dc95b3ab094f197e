//! Systematic encoding by polynomial division
//!
//! The parity symbols are the remainder of `data(x) * x^NP` divided by the
//! generator, computed with a feedback shift register. `parity[0]` holds the
//! highest-degree remainder coefficient, so the codeword is `data ++ parity`.

use crate::galois::{GaloisField, Index, Symbol, Value};

/// Fill `parity` with the remainder of `data * x^NP` modulo the generator
///
/// `generator` holds the ascending coefficients in index form and has
/// `parity.len() + 1` entries.
pub(crate) fn encode<T: Symbol>(
    field: &GaloisField<T>,
    generator: &[Option<Index<T>>],
    data: &[Value<T>],
    parity: &mut [Value<T>],
) {
    let np = parity.len();
    debug_assert_eq!(generator.len(), np + 1);
    parity.fill(Value::zero());

    for &symbol in data {
        match field.to_index(symbol + parity[0]) {
            Some(feedback) => {
                for j in 1..np {
                    parity[j - 1] = match generator[np - j] {
                        Some(g) => field.fma(g, feedback, parity[j]),
                        None => parity[j],
                    };
                }
                parity[np - 1] = match generator[0] {
                    Some(g) => field.mul(g, feedback),
                    None => Value::zero(),
                };
            }
            None => {
                // Zero feedback is a plain shift
                parity.copy_within(1.., 0);
                parity[np - 1] = Value::zero();
            }
        }
    }
}
