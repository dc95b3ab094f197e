use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};
use rsfec::codec::{BlockCodec, CodecBuilder};
use rsfec::stream::{check_bytes, decode_bytes, encode_bytes, StreamConfig, StreamError};

fn codec() -> BlockCodec<u8> {
    CodecBuilder::new(8, 0x11D).roots(16).build().unwrap()
}

fn payload(len: usize, seed: u64) -> Vec<u8> {
    let mut data = vec![0u8; len];
    StdRng::seed_from_u64(seed).fill_bytes(&mut data);
    data
}

#[test]
fn test_round_trip_with_damage() {
    let codec = codec();
    let config = StreamConfig::default();
    let data = payload(10_000, 1);
    let mut encoded = encode_bytes(&codec, &data, &config).unwrap();
    let blocks = encoded.len() / 255;
    assert_eq!(blocks, (8 + 10_000usize).div_ceil(239));

    // Eight damaged symbols in every odd block
    let mut rng = StdRng::seed_from_u64(2);
    for block in (1..blocks).step_by(2) {
        for j in 0..8 {
            encoded[block * 255 + j * 31] ^= rng.random_range(1..=255u8);
        }
    }
    let damaged = check_bytes(&codec, &encoded, &config).unwrap();
    assert_eq!(damaged, (1..blocks).step_by(2).collect::<Vec<_>>());

    let (decoded, report) = decode_bytes(&codec, &encoded, &config).unwrap();
    assert_eq!(decoded, data);
    assert!(report.is_recovered());
    assert_eq!(report.blocks, blocks);
    assert_eq!(report.clean, blocks.div_ceil(2));
    assert_eq!(report.repaired(), blocks / 2);
    assert_eq!(report.corrected, 8 * (blocks / 2));
}

#[test]
fn test_uncorrectable_block_is_reported() {
    let codec = codec();
    let config = StreamConfig::new(2, true);
    let data = payload(1_000, 3);
    let mut encoded = encode_bytes(&codec, &data, &config).unwrap();

    // Wipe most of the third block
    for byte in &mut encoded[2 * 255 + 10..2 * 255 + 200] {
        *byte = !*byte;
    }
    let (decoded, report) = decode_bytes(&codec, &encoded, &config).unwrap();
    assert_eq!(report.failed, vec![2]);
    assert!(!report.is_recovered());
    assert_eq!(decoded.len(), data.len());
    assert_eq!(&decoded[..2 * 239 - 8], &data[..2 * 239 - 8]);
}

#[test]
fn test_sequential_decode() {
    let codec = codec();
    let config = StreamConfig::new(0, false);
    let data = payload(3_000, 4);
    let mut encoded = encode_bytes(&codec, &data, &config).unwrap();
    encoded[5] ^= 0x40;
    let (decoded, report) = decode_bytes(&codec, &encoded, &config).unwrap();
    assert_eq!(decoded, data);
    assert_eq!(report.corrected, 1);
}

#[test]
fn test_corrupt_length_prefix() {
    let codec = codec();
    let config = StreamConfig::default();
    let mut encoded = encode_bytes(&codec, b"short", &config).unwrap();
    // Rewrite the prefix and re-encode so the block is a valid codeword
    encoded[..8].copy_from_slice(&u64::MAX.to_le_bytes());
    codec.encode(&mut encoded).unwrap();

    assert!(matches!(
        decode_bytes(&codec, &encoded, &config),
        Err(StreamError::LengthPrefix {
            declared: u64::MAX,
            available: 231
        })
    ));
}
