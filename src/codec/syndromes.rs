use crate::galois::{GaloisField, Index, Symbol, Value};

/// Evaluate `code` at each root with Horner's rule
///
/// `code[0]` is the highest-degree coefficient. Writes one syndrome per root
/// into `out` and returns how many are nonzero.
pub(crate) fn compute<T: Symbol>(
    field: &GaloisField<T>,
    roots: &[Index<T>],
    code: &[Value<T>],
    out: &mut [Value<T>],
) -> usize {
    debug_assert_eq!(roots.len(), out.len());
    let mut nonzero = 0;
    for (syndrome, &root) in out.iter_mut().zip(roots) {
        let mut acc = Value::zero();
        for &symbol in code {
            acc = field.fma(acc, root, symbol);
        }
        *syndrome = acc;
        if !acc.is_zero() {
            nonzero += 1;
        }
    }
    nonzero
}
