//! Command-line front end: protect files with RS(255, 255 - NR) over GF(2^8)

use anyhow::{Context, Result};
use rsfec::args::{parse_args, CLI_POLY};
use rsfec::codec::{BlockCodec, CodecBuilder};
use rsfec::stream::{self, StreamConfig};
use std::fs;
use std::path::PathBuf;

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .format_timestamp(None)
        .format_module_path(false)
        .format_target(false)
        .init();

    let matches = parse_args();
    match matches.subcommand() {
        Some(("encode", sub_matches)) => handle_encode(sub_matches),
        Some(("decode", sub_matches)) => handle_decode(sub_matches),
        Some(("check", sub_matches)) => handle_check(sub_matches),
        Some((cmd, _)) => {
            eprintln!("Unknown command: {}", cmd);
            std::process::exit(1);
        }
        None => {
            eprintln!("Error: No command specified");
            eprintln!("\nUse 'rsfec --help' for usage information");
            std::process::exit(1);
        }
    }
}

fn build_codec(matches: &clap::ArgMatches) -> Result<BlockCodec<u8>> {
    let roots = matches.get_one::<u16>("roots").copied().unwrap_or(16);
    let fcr = matches.get_one::<u32>("fcr").copied().unwrap_or(0);
    CodecBuilder::new(8, CLI_POLY)
        .roots(roots as usize)
        .first_consecutive_root(fcr)
        .build()
        .with_context(|| format!("Failed to build codec with {} roots from pe^{}", roots, fcr))
}

fn path_arg(matches: &clap::ArgMatches, name: &str) -> Result<PathBuf> {
    matches
        .get_one::<PathBuf>(name)
        .cloned()
        .with_context(|| format!("Missing {} argument", name))
}

fn read_input(matches: &clap::ArgMatches) -> Result<(PathBuf, Vec<u8>)> {
    let input = path_arg(matches, "input")?;
    let data =
        fs::read(&input).with_context(|| format!("Failed to read {}", input.display()))?;
    Ok((input, data))
}

fn write_output(matches: &clap::ArgMatches, data: &[u8]) -> Result<PathBuf> {
    let output = path_arg(matches, "output")?;
    fs::write(&output, data).with_context(|| format!("Failed to write {}", output.display()))?;
    Ok(output)
}

fn handle_encode(matches: &clap::ArgMatches) -> Result<()> {
    let codec = build_codec(matches)?;
    let config = StreamConfig::from_args(matches);
    let (input, payload) = read_input(matches)?;

    let encoded = stream::encode_bytes(&codec, &payload, &config)
        .with_context(|| format!("Failed to encode {}", input.display()))?;
    let output = write_output(matches, &encoded)?;

    println!(
        "Encoded {} bytes into {} blocks of RS({}, {}): {}",
        payload.len(),
        encoded.len() / codec.n(),
        codec.n(),
        codec.k(),
        output.display()
    );
    Ok(())
}

fn handle_decode(matches: &clap::ArgMatches) -> Result<()> {
    let codec = build_codec(matches)?;
    let config = StreamConfig::from_args(matches);
    let (input, encoded) = read_input(matches)?;

    let (payload, report) = stream::decode_bytes(&codec, &encoded, &config)
        .with_context(|| format!("Failed to decode {}", input.display()))?;
    let output = write_output(matches, &payload)?;

    println!(
        "Decoded {} blocks: {} clean, {} repaired ({} symbols corrected), {} uncorrectable",
        report.blocks,
        report.clean,
        report.repaired(),
        report.corrected,
        report.failed.len()
    );
    println!("Wrote {} bytes to {}", payload.len(), output.display());

    if report.is_recovered() {
        Ok(())
    } else {
        eprintln!("\nUncorrectable blocks: {:?}", report.failed);
        std::process::exit(2);
    }
}

fn handle_check(matches: &clap::ArgMatches) -> Result<()> {
    let codec = build_codec(matches)?;
    let config = StreamConfig::from_args(matches);
    let quiet = matches.get_flag("quiet");
    let (input, encoded) = read_input(matches)?;

    let damaged = stream::check_bytes(&codec, &encoded, &config)
        .with_context(|| format!("Failed to check {}", input.display()))?;
    let blocks = encoded.len() / codec.n();

    if damaged.is_empty() {
        if !quiet {
            println!("All {} blocks are intact.", blocks);
        }
        Ok(())
    } else {
        if !quiet {
            println!("{} of {} blocks are damaged: {:?}", damaged.len(), blocks, damaged);
        }
        std::process::exit(1);
    }
}
