//! Syndromes to corrections: locator, locations, magnitudes

use super::berlekamp_massey::{erasure_locator, solve};
use super::forney::{compute_evaluator, compute_magnitudes};
use super::roots::find_locations;
use super::types::{symbols, DecodeFailure, Locations, Poly};
use crate::galois::{GaloisField, Symbol, Value};
use log::trace;
use smallvec::smallvec;

/// Positions to patch and the values to XOR into them
#[derive(Debug)]
pub(crate) struct Correction<T: Symbol> {
    pub(crate) locations: Locations<T>,
    pub(crate) magnitudes: Poly<T>,
}

impl<T: Symbol> Correction<T> {
    /// (buffer position, magnitude) pairs
    pub(crate) fn iter(&self) -> impl Iterator<Item = (usize, Value<T>)> + '_ {
        self.locations
            .iter()
            .map(|l| l.get().to_usize())
            .zip(self.magnitudes.iter().copied())
    }
}

/// Locate and size the errors behind nonzero `syndromes`
pub(crate) fn correct<T: Symbol>(
    field: &GaloisField<T>,
    syndromes: &[Value<T>],
    erasures: &[usize],
    fcr: u32,
) -> Result<Correction<T>, DecodeFailure> {
    let nr = syndromes.len();
    let mut locator: Poly<T> = smallvec![Value::zero(); nr + 1];
    erasure_locator(field, erasures, &mut locator);
    let length = solve(field, syndromes, &mut locator, erasures.len());
    // 2L <= NR + f bounds what the syndromes can locate
    if 2 * length > nr + erasures.len() {
        return Err(DecodeFailure::LocatorDegree {
            degree: length,
            roots: nr,
        });
    }

    let mut degree = length;
    while degree > 0 && locator[degree].is_zero() {
        degree -= 1;
    }
    if degree == 0 {
        return Err(DecodeFailure::LocatorDegree { degree, roots: nr });
    }
    let locator = &locator[..=degree];
    trace!("syndromes = {:?}", symbols(syndromes));
    trace!("locator = {:?}", symbols(locator));

    let mut locations = Locations::new();
    find_locations(field, locator, &mut locations);
    trace!(
        "locations = {:?}",
        locations.iter().map(|l| l.get()).collect::<Vec<_>>()
    );
    if locations.len() < degree {
        return Err(DecodeFailure::MissingRoots {
            found: locations.len(),
            degree,
        });
    }

    let mut evaluator: Poly<T> = smallvec![Value::zero(); nr];
    let evaluator = match compute_evaluator(field, syndromes, locator, &mut evaluator) {
        Some(d) => &evaluator[..=d],
        None => &evaluator[..0],
    };
    trace!("evaluator = {:?}", symbols(evaluator));

    let mut magnitudes = Poly::new();
    compute_magnitudes(field, locator, evaluator, &locations, fcr, &mut magnitudes)?;
    trace!("magnitudes = {:?}", symbols(&magnitudes));

    Ok(Correction {
        locations,
        magnitudes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::syndromes;

    fn syndromes_of(field: &GaloisField<u8>, errors: &[(usize, u8)]) -> Vec<Value<u8>> {
        let roots: Vec<_> = (0..4).map(|i| field.primitive_power(i)).collect();
        let mut code = vec![Value::zero(); 15];
        for &(p, v) in errors {
            code[p] = field.value(v).unwrap();
        }
        let mut s = vec![Value::zero(); 4];
        syndromes::compute(field, &roots, &code, &mut s);
        s
    }

    fn pairs(correction: &Correction<u8>) -> Vec<(usize, u8)> {
        let mut pairs: Vec<_> = correction.iter().map(|(p, m)| (p, m.get())).collect();
        pairs.sort();
        pairs
    }

    #[test]
    fn test_corrects_two_errors() {
        let field = GaloisField::<u8>::new(4, 0b10011).unwrap();
        let s = syndromes_of(&field, &[(3, 5), (10, 12)]);
        let correction = correct(&field, &s, &[], 0).unwrap();
        assert_eq!(pairs(&correction), vec![(3, 5), (10, 12)]);
    }

    #[test]
    fn test_four_erasures() {
        let field = GaloisField::<u8>::new(4, 0b10011).unwrap();
        let s = syndromes_of(&field, &[(0, 1), (4, 2), (9, 3), (14, 4)]);
        let correction = correct(&field, &s, &[14, 0, 9, 4], 0).unwrap();
        assert_eq!(pairs(&correction), vec![(0, 1), (4, 2), (9, 3), (14, 4)]);
    }

    #[test]
    fn test_register_beyond_radius() {
        let field = GaloisField::<u8>::new(4, 0b10011).unwrap();
        let roots = [field.primitive_power(0)];
        let mut code = vec![Value::zero(); 15];
        code[3] = field.value(6).unwrap();
        let mut s = vec![Value::zero(); 1];
        syndromes::compute(&field, &roots, &code, &mut s);

        // One syndrome cannot place a single error
        assert_eq!(
            correct(&field, &s, &[], 0).unwrap_err(),
            DecodeFailure::LocatorDegree { degree: 1, roots: 1 }
        );
        // but it can size a single erasure
        let correction = correct(&field, &s, &[3], 0).unwrap();
        assert_eq!(pairs(&correction), vec![(3, 6)]);
    }

    #[test]
    fn test_three_errors_are_not_silently_accepted() {
        let field = GaloisField::<u8>::new(4, 0b10011).unwrap();
        let errors = [(1, 7), (6, 2), (11, 9)];
        let s = syndromes_of(&field, &errors);
        // Beyond the radius: either fail or produce something other than the truth
        if let Ok(correction) = correct(&field, &s, &[], 0) {
            assert_ne!(pairs(&correction), errors.to_vec());
        }
    }
}
