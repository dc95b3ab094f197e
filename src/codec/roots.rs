//! Error locations from the roots of the locator polynomial
//!
//! A root `pe^(p+1)` of the locator marks codeword position `p`. Degrees one
//! and two are solved in closed form, anything larger falls back to a Chien
//! search over every nonzero field element. A locator that does not split
//! yields fewer locations than its degree.

use super::types::{Locations, INLINE_ROOTS};
use crate::galois::{GaloisField, Index, Symbol, Value};
use smallvec::SmallVec;

/// Push the positions marked by the roots of `locator` into `out`
///
/// `locator` holds exactly `degree + 1` coefficients with a nonzero leading
/// term.
pub(crate) fn find_locations<T: Symbol>(
    field: &GaloisField<T>,
    locator: &[Value<T>],
    out: &mut Locations<T>,
) {
    out.clear();
    match locator.len() - 1 {
        0 => {}
        1 => linear(field, locator, out),
        2 => quadratic(field, locator, out),
        _ => chien_search(field, locator, out),
    }
}

fn linear<T: Symbol>(field: &GaloisField<T>, locator: &[Value<T>], out: &mut Locations<T>) {
    let root = field
        .checked_div(locator[0], locator[1])
        .and_then(|r| field.to_index(r));
    if let Some(root) = root {
        out.push(field.div_index(root, Index::new(1)));
    }
}

/// Roots of a x^2 + b x + c through the substitution x = (b/a) r, which turns
/// the equation into r^2 + r = ac/b^2
fn quadratic<T: Symbol>(field: &GaloisField<T>, locator: &[Value<T>], out: &mut Locations<T>) {
    let (c, b, a) = (locator[0], locator[1], locator[2]);
    if b.is_zero() || c.is_zero() {
        return;
    }

    let ba = field.div(b, a);
    let Some(r) = field.artin_schreier_root(field.div(field.mul(a, c), field.mul(b, b))) else {
        return;
    };

    let first = field.mul(ba, r);
    let (Some(x0), Some(x1)) = (field.to_index(first), field.to_index(first + ba)) else {
        return;
    };
    let pe = Index::new(1);
    out.push(field.div_index(x0, pe));
    out.push(field.div_index(x1, pe));
}

/// Evaluate the locator at pe^1 ... pe^N, keeping each term in index form so
/// stepping to the next power is one index addition per coefficient
fn chien_search<T: Symbol>(field: &GaloisField<T>, locator: &[Value<T>], out: &mut Locations<T>) {
    let degree = locator.len() - 1;
    // Nonzero terms of degree >= 1 with the per-step multiplier pe^j
    let mut terms: SmallVec<[(Index<T>, Index<T>); INLINE_ROOTS]> = locator
        .iter()
        .enumerate()
        .skip(1)
        .filter_map(|(j, &c)| Some((field.to_index(c)?, field.primitive_power(j as u64))))
        .collect();

    for i in 0..field.order() {
        let mut sum = locator[0];
        for (term, step) in terms.iter_mut() {
            *term = field.mul_index(*term, *step);
            sum += field.to_value(*term);
        }
        if sum.is_zero() {
            out.push(Index::new(i));
            if out.len() == degree {
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::berlekamp_massey::erasure_locator;

    fn gf16() -> GaloisField<u8> {
        GaloisField::new(4, 0b10011).unwrap()
    }

    fn positions(field: &GaloisField<u8>, locator: &[Value<u8>]) -> Vec<u8> {
        let mut out = Locations::new();
        find_locations(field, locator, &mut out);
        out.iter().map(|l| l.get()).collect()
    }

    fn locator_of(field: &GaloisField<u8>, positions: &[usize]) -> Vec<Value<u8>> {
        let mut locator = vec![Value::zero(); positions.len() + 1];
        erasure_locator(field, positions, &mut locator);
        locator
    }

    /// Constant c for which x^2 + x + c has no root
    fn irreducible_constant(field: &GaloisField<u8>) -> Value<u8> {
        (1..16u8)
            .map(|c| field.value(c).unwrap())
            .find(|&c| field.artin_schreier_root(c).is_none())
            .unwrap()
    }

    #[test]
    fn test_linear_locator() {
        let field = gf16();
        for p in 0..15 {
            assert_eq!(positions(&field, &locator_of(&field, &[p])), vec![p as u8]);
        }
    }

    #[test]
    fn test_quadratic_locator() {
        let field = gf16();
        for (p, q) in [(0, 1), (3, 11), (7, 14)] {
            let mut found = positions(&field, &locator_of(&field, &[p, q]));
            found.sort();
            assert_eq!(found, vec![p as u8, q as u8]);
        }
    }

    #[test]
    fn test_quadratic_without_roots() {
        let field = gf16();
        let c = irreducible_constant(&field);
        assert!(positions(&field, &[c, Value::one(), Value::one()]).is_empty());
        // Zero linear term is rejected outright
        assert!(positions(&field, &[Value::one(), Value::zero(), Value::one()]).is_empty());
    }

    #[test]
    fn test_chien_search() {
        let field = gf16();
        let locator = locator_of(&field, &[12, 1, 7]);
        assert_eq!(positions(&field, &locator), vec![1, 7, 12]);

        let locator = locator_of(&field, &[0, 2, 4, 6, 8]);
        assert_eq!(positions(&field, &locator), vec![0, 2, 4, 6, 8]);
    }

    #[test]
    fn test_chien_search_incomplete_split() {
        let field = gf16();
        let c = irreducible_constant(&field);
        // (c + x + x^2)(1 + X x) with X marking position 3
        let x = field.primitive_power(11);
        let locator = [
            c,
            field.fma(c, x, Value::one()),
            field.to_value(x) + Value::one(),
            field.to_value(x),
        ];
        assert_eq!(positions(&field, &locator), vec![3]);
    }
}
