//! Property-based tests for field arithmetic and the block codec
//!
//! Codewords, error patterns and erasure sets are drawn by proptest; the
//! decoder must restore every pattern inside its correction radius.

use proptest::prelude::*;
use proptest::sample::subsequence;
use rsfec::codec::{BlockCodec, CodecBuilder, DecodeOutcome};
use rsfec::GaloisField;
use std::sync::{Arc, OnceLock};

fn field() -> Arc<GaloisField<u8>> {
    GaloisField::shared(8, 0x11D).unwrap()
}

fn codec() -> &'static BlockCodec<u8> {
    static CODEC: OnceLock<BlockCodec<u8>> = OnceLock::new();
    CODEC.get_or_init(|| CodecBuilder::new(8, 0x11D).roots(16).build().unwrap())
}

fn encoded(data: &[u8]) -> Vec<u8> {
    let mut code = data.to_vec();
    code.resize(255, 0);
    codec().encode(&mut code).unwrap();
    code
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Multiplication distributes over addition
    #[test]
    fn prop_distributive(a in 0u8..=255, b in 0u8..=255, c in 0u8..=255) {
        let gf = field();
        let (a, b, c) = (gf.value(a).unwrap(), gf.value(b).unwrap(), gf.value(c).unwrap());
        prop_assert_eq!(gf.mul(a, b + c), gf.mul(a, b) + gf.mul(a, c));
        prop_assert_eq!(gf.fma(a, b, c), gf.mul(a, b) + c);
    }

    /// Division undoes multiplication for nonzero divisors
    #[test]
    fn prop_division_inverts_multiplication(a in 0u8..=255, b in 1u8..=255) {
        let gf = field();
        let (a, b) = (gf.value(a).unwrap(), gf.value(b).unwrap());
        prop_assert_eq!(gf.div(gf.mul(a, b), b), a);
        prop_assert_eq!(gf.checked_div(a, b), Some(gf.mul(a, gf.rcp(b))));
    }

    /// Every encoded message is a codeword
    #[test]
    fn prop_encoded_syndromes_vanish(data in prop::collection::vec(any::<u8>(), 239)) {
        let code = encoded(&data);
        prop_assert_eq!(&code[..239], &data[..]);
        prop_assert!(codec().compute_syndromes(&code).unwrap().is_clean());
    }

    /// Up to NR/2 symbol errors are corrected exactly
    #[test]
    fn prop_corrects_within_radius(
        data in prop::collection::vec(any::<u8>(), 239),
        positions in subsequence((0..255usize).collect::<Vec<_>>(), 0..=8),
        noise in prop::collection::vec(1u8..=255, 8),
    ) {
        let original = encoded(&data);
        let mut code = original.clone();
        for (&p, &e) in positions.iter().zip(&noise) {
            code[p] ^= e;
        }

        let expected = match positions.len() {
            0 => DecodeOutcome::Clean,
            n => DecodeOutcome::Corrected(n),
        };
        prop_assert_eq!(codec().decode(&mut code, &[]).unwrap(), expected);
        prop_assert_eq!(code, original);
    }

    /// e errors and f erasures are recovered whenever 2e + f <= NR
    #[test]
    fn prop_errors_and_erasures(
        data in prop::collection::vec(any::<u8>(), 239),
        positions in subsequence((0..255usize).collect::<Vec<_>>(), 16),
        errors in 0usize..=8,
        noise in prop::collection::vec(any::<u8>(), 16),
    ) {
        let erasures = 16 - 2 * errors;
        let original = encoded(&data);
        let mut code = original.clone();
        let (error_positions, rest) = positions.split_at(errors);
        let erasure_positions = &rest[..erasures];
        for (&p, &e) in error_positions.iter().zip(&noise) {
            code[p] ^= e.max(1);
        }
        for (&p, &e) in erasure_positions.iter().zip(&noise[errors..]) {
            code[p] = e;
        }

        let outcome = codec().decode(&mut code, erasure_positions).unwrap();
        prop_assert!(outcome.is_recovered());
        prop_assert_eq!(code, original);
    }

    /// Beyond the radius the decoder either reports failure or lands on a codeword
    #[test]
    fn prop_over_limit_is_consistent(
        data in prop::collection::vec(any::<u8>(), 239),
        positions in subsequence((0..255usize).collect::<Vec<_>>(), 9..=20),
        noise in prop::collection::vec(1u8..=255, 20),
    ) {
        let mut code = encoded(&data);
        for (&p, &e) in positions.iter().zip(&noise) {
            code[p] ^= e;
        }
        let received = code.clone();

        match codec().decode(&mut code, &[]).unwrap() {
            DecodeOutcome::Uncorrectable(_) => prop_assert_eq!(code, received),
            _ => prop_assert_eq!(codec().decode(&mut code, &[]).unwrap(), DecodeOutcome::Clean),
        }
    }
}
