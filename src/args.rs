use clap::{value_parser, Arg, ArgAction, Command};
use std::fs;
use std::path::PathBuf;

/// Field polynomial x^8 + x^4 + x^3 + x^2 + 1 used by the command-line codec
pub const CLI_POLY: u32 = 0x11D;

fn existing_file(input: &str) -> Result<PathBuf, String> {
    let path = fs::canonicalize(input).map_err(|_| "Failed to resolve input path")?;
    if path.is_file() {
        Ok(path)
    } else {
        Err(String::from("Input file does not exist"))
    }
}

fn output_file(output: &str) -> Result<PathBuf, String> {
    let path = PathBuf::from(output);
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() && !parent.exists() => {
            Err(String::from("Output directory does not exist"))
        }
        _ => Ok(path),
    }
}

fn code_args(command: Command) -> Command {
    command
        .arg(
            Arg::new("roots")
                .short('r')
                .long("roots")
                .help("Number of parity symbols per 255-byte block")
                .value_name("NR")
                .value_parser(value_parser!(u16).range(1..255))
                .default_value("16"),
        )
        .arg(
            Arg::new("fcr")
                .long("fcr")
                .help("Power of the first consecutive generator root")
                .value_name("FCR")
                .value_parser(value_parser!(u32))
                .default_value("0"),
        )
        .arg(
            Arg::new("threads")
                .short('t')
                .long("threads")
                .help("Number of CPU threads for computation (0 = auto-detect)")
                .value_name("N")
                .value_parser(value_parser!(usize))
                .default_value("0"),
        )
        .arg(
            Arg::new("no-parallel")
                .long("no-parallel")
                .help("Process blocks on the calling thread only")
                .action(ArgAction::SetTrue),
        )
}

fn input_arg() -> Arg {
    Arg::new("input")
        .help("Input file")
        .required(true)
        .index(1)
        .value_parser(existing_file)
}

fn output_arg() -> Arg {
    Arg::new("output")
        .help("Output file")
        .required(true)
        .index(2)
        .value_parser(output_file)
}

/// Command-line definition of the `rsfec` binary
pub fn build_cli() -> Command {
    Command::new("rsfec")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Reed-Solomon forward error correction for files over GF(2^8)")
        .arg_required_else_help(true)
        .subcommand_required(true)
        .subcommand(code_args(
            Command::new("encode")
                .visible_alias("e")
                .about("Encode a file into protected 255-byte blocks")
                .arg(input_arg())
                .arg(output_arg()),
        ))
        .subcommand(code_args(
            Command::new("decode")
                .visible_alias("d")
                .about("Correct and unwrap an encoded file")
                .arg(input_arg())
                .arg(output_arg()),
        ))
        .subcommand(code_args(
            Command::new("check")
                .visible_alias("c")
                .about("Report damaged blocks without correcting them")
                .arg(input_arg())
                .arg(
                    Arg::new("quiet")
                        .short('q')
                        .long("quiet")
                        .help("Quiet mode - exit status only")
                        .action(ArgAction::SetTrue),
                ),
        ))
}

pub fn parse_args() -> clap::ArgMatches {
    build_cli().get_matches()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_consistent() {
        build_cli().debug_assert();
    }

    #[test]
    fn test_defaults() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let input = file.path().to_str().unwrap();
        let matches = build_cli()
            .try_get_matches_from(["rsfec", "encode", input, "out.rsf"])
            .unwrap();
        let (name, sub) = matches.subcommand().unwrap();
        assert_eq!(name, "encode");
        assert_eq!(sub.get_one::<u16>("roots"), Some(&16));
        assert_eq!(sub.get_one::<u32>("fcr"), Some(&0));
        assert_eq!(sub.get_one::<usize>("threads"), Some(&0));
        assert!(!sub.get_flag("no-parallel"));
    }

    #[test]
    fn test_rejects_invalid_values() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let input = file.path().to_str().unwrap();
        for roots in ["0", "255"] {
            assert!(build_cli()
                .try_get_matches_from(["rsfec", "check", input, "--roots", roots])
                .is_err());
        }
        assert!(build_cli()
            .try_get_matches_from(["rsfec", "check", "/nonexistent/input.rsf"])
            .is_err());
        assert!(build_cli()
            .try_get_matches_from(["rsfec", "decode", input, "/nonexistent/dir/out"])
            .is_err());
    }
}
