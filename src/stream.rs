//! Byte-stream framing over GF(2^8) block codecs
//!
//! The payload is prefixed with its length as a little-endian u64, split into
//! K-byte data blocks (the last one zero-padded) and each block is encoded to
//! an N-byte codeword. Blocks are independent, so encoding, decoding and
//! checking run in parallel over a shared codec.

use crate::codec::{BlockCodec, DecodeOutcome};
use crate::error::CodecError;
use log::{debug, warn};
use rayon::prelude::*;
use thiserror::Error;

const LENGTH_PREFIX: usize = std::mem::size_of::<u64>();

/// Errors from stream encoding and decoding
#[derive(Debug, Error)]
pub enum StreamError {
    #[error("codec error: {0}")]
    Codec(#[from] CodecError),

    #[error("stream framing needs byte symbols, codec symbols are bounded by {bound}")]
    SymbolWidth { bound: u32 },

    #[error("encoded stream of {length} bytes is not a nonzero multiple of the {block}-byte block")]
    Truncated { length: usize, block: usize },

    #[error("length prefix declares {declared} bytes but only {available} were decoded")]
    LengthPrefix { declared: u64, available: usize },

    #[error("failed to build thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// Configuration for parallel block processing
#[derive(Debug, Clone)]
pub struct StreamConfig {
    /// Number of threads for computation (0 = auto-detect)
    pub threads: usize,
    /// Whether to process blocks in parallel
    pub parallel: bool,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            threads: 0,
            parallel: true,
        }
    }
}

impl StreamConfig {
    pub fn new(threads: usize, parallel: bool) -> Self {
        Self { threads, parallel }
    }

    pub fn from_args(matches: &clap::ArgMatches) -> Self {
        let threads = matches
            .get_one::<usize>("threads")
            .copied()
            .unwrap_or(0);
        let parallel = !matches.get_flag("no-parallel");
        Self::new(threads, parallel)
    }

    /// Get effective thread count (auto-detect if 0)
    pub fn effective_threads(&self) -> usize {
        match (self.parallel, self.threads) {
            (false, _) => 1,
            (true, 0) => std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(4),
            (true, n) => n,
        }
    }

    /// Run `op` on a pool sized by this configuration
    fn install<R: Send>(&self, op: impl FnOnce() -> R + Send) -> Result<R, StreamError> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.effective_threads())
            .build()?;
        Ok(pool.install(op))
    }
}

/// Summary of a stream decode
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StreamReport {
    pub blocks: usize,
    pub clean: usize,
    /// Total symbols corrected across all blocks
    pub corrected: usize,
    /// Indices of blocks that could not be corrected
    pub failed: Vec<usize>,
}

impl StreamReport {
    fn from_outcomes(outcomes: &[DecodeOutcome]) -> Self {
        let mut report = Self {
            blocks: outcomes.len(),
            ..Self::default()
        };
        for (index, outcome) in outcomes.iter().enumerate() {
            match outcome {
                DecodeOutcome::Clean => report.clean += 1,
                DecodeOutcome::Corrected(count) => report.corrected += count,
                DecodeOutcome::Uncorrectable(failure) => {
                    warn!("Block {} is uncorrectable: {}", index, failure);
                    report.failed.push(index);
                }
            }
        }
        report
    }

    pub fn is_recovered(&self) -> bool {
        self.failed.is_empty()
    }

    /// Blocks that needed at least one correction
    pub fn repaired(&self) -> usize {
        self.blocks - self.clean - self.failed.len()
    }
}

fn check_codec(codec: &BlockCodec<u8>) -> Result<(), StreamError> {
    match codec.symbol_bound() {
        255 => Ok(()),
        bound => Err(StreamError::SymbolWidth { bound }),
    }
}

fn check_encoded(codec: &BlockCodec<u8>, encoded: &[u8]) -> Result<(), StreamError> {
    check_codec(codec)?;
    let block = codec.n();
    if encoded.is_empty() || encoded.len() % block != 0 {
        return Err(StreamError::Truncated {
            length: encoded.len(),
            block,
        });
    }
    Ok(())
}

/// Frame and encode `payload` into a sequence of N-byte codewords
pub fn encode_bytes(
    codec: &BlockCodec<u8>,
    payload: &[u8],
    config: &StreamConfig,
) -> Result<Vec<u8>, StreamError> {
    check_codec(codec)?;
    let (n, k) = (codec.n(), codec.k());

    let framed_len = LENGTH_PREFIX + payload.len();
    let blocks = framed_len.div_ceil(k);
    let mut encoded = vec![0u8; blocks * n];

    // Lay the framed payload out across the data portions of each block
    let framed = (payload.len() as u64)
        .to_le_bytes()
        .into_iter()
        .chain(payload.iter().copied());
    for (i, byte) in framed.enumerate() {
        encoded[(i / k) * n + i % k] = byte;
    }

    let encode = |block: &mut [u8]| codec.encode(block);
    if config.parallel {
        config.install(|| encoded.par_chunks_mut(n).try_for_each(encode))??;
    } else {
        encoded.chunks_mut(n).try_for_each(encode)?;
    }

    debug!(
        "Encoded {} payload bytes into {} blocks of {}",
        payload.len(),
        blocks,
        n
    );
    Ok(encoded)
}

/// Decode a stream produced by [`encode_bytes`], correcting each block
///
/// Blocks that fail to decode are listed in the report and contribute their
/// data portion as received. When the failed block carries an unusable length
/// prefix the whole decoded data area is returned.
pub fn decode_bytes(
    codec: &BlockCodec<u8>,
    encoded: &[u8],
    config: &StreamConfig,
) -> Result<(Vec<u8>, StreamReport), StreamError> {
    check_encoded(codec, encoded)?;
    let (n, k) = (codec.n(), codec.k());

    let mut blocks = encoded.to_vec();
    let decode = |block: &mut [u8]| codec.decode(block, &[]);
    let outcomes: Vec<DecodeOutcome> = if config.parallel {
        config.install(|| {
            blocks
                .par_chunks_mut(n)
                .map(decode)
                .collect::<Result<Vec<_>, CodecError>>()
        })??
    } else {
        blocks
            .chunks_mut(n)
            .map(decode)
            .collect::<Result<Vec<_>, CodecError>>()?
    };
    let report = StreamReport::from_outcomes(&outcomes);

    let framed: Vec<u8> = blocks
        .chunks(n)
        .flat_map(|block| &block[..k])
        .copied()
        .collect();
    let (prefix, body) = framed
        .split_first_chunk::<LENGTH_PREFIX>()
        .ok_or(StreamError::LengthPrefix {
            declared: 0,
            available: 0,
        })?;
    let declared = u64::from_le_bytes(*prefix);
    let length = match usize::try_from(declared) {
        Ok(len) if len <= body.len() => len,
        // A damaged first block already shows up in the report
        _ if report.failed.first() == Some(&0) => {
            warn!(
                "Length prefix lost in block 0 (declares {} bytes), keeping all {} decoded bytes",
                declared,
                body.len()
            );
            body.len()
        }
        _ => {
            return Err(StreamError::LengthPrefix {
                declared,
                available: body.len(),
            })
        }
    };

    debug!(
        "Decoded {} blocks: {} clean, {} symbols corrected, {} failed",
        report.blocks,
        report.clean,
        report.corrected,
        report.failed.len()
    );
    Ok((body[..length].to_vec(), report))
}

/// Indices of blocks with nonzero syndromes, without correcting anything
pub fn check_bytes(
    codec: &BlockCodec<u8>,
    encoded: &[u8],
    config: &StreamConfig,
) -> Result<Vec<usize>, StreamError> {
    check_encoded(codec, encoded)?;
    let n = codec.n();

    let check = |(index, block): (usize, &[u8])| {
        codec
            .compute_syndromes(block)
            .map(|s| (!s.is_clean()).then_some(index))
    };
    let damaged: Vec<Option<usize>> = if config.parallel {
        config.install(|| {
            encoded
                .par_chunks(n)
                .enumerate()
                .map(check)
                .collect::<Result<Vec<_>, CodecError>>()
        })??
    } else {
        encoded
            .chunks(n)
            .enumerate()
            .map(check)
            .collect::<Result<Vec<_>, CodecError>>()?
    };

    Ok(damaged.into_iter().flatten().collect())
}
