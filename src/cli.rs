// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// We use the "derive" API which lets us define the CLI structure using a
// plain struct and attributes (the #[...] things).
// =============================================================================

use clap::Parser;
use std::path::PathBuf;

use crate::config::DEFAULT_CONCURRENCY;

// The whole CLI: there is only one thing this tool does, so no subcommands
#[derive(Parser, Debug)]
#[command(
    name = "crt-hunter",
    version = "0.1.0",
    about = "Discover subdomains from certificate transparency logs (crt.sh)",
    long_about = "crt-hunter searches crt.sh for certificates issued under each target domain \
                  and writes every unique subdomain it finds to a text file, one per line."
)]
pub struct Cli {
    /// Domain names, e.g. example.com example2.com
    #[arg(short, long, num_args = 1..)]
    pub domains: Vec<String>,

    /// File containing a list of domains, one per line
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// File to save the subdomains to
    #[arg(short, long)]
    pub output: PathBuf,

    /// Number of concurrent lookups
    #[arg(short, long, default_value_t = DEFAULT_CONCURRENCY)]
    pub threads: usize,

    /// Log debug output (same as RUST_LOG=debug)
    #[arg(short, long)]
    pub verbose: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_command_line() {
        let cli = Cli::try_parse_from([
            "crt-hunter",
            "-d",
            "example.com",
            "example.org",
            "-i",
            "domains.txt",
            "-o",
            "out/subs.txt",
            "-t",
            "8",
        ])
        .unwrap();

        assert_eq!(cli.domains, vec!["example.com", "example.org"]);
        assert_eq!(cli.input, Some(PathBuf::from("domains.txt")));
        assert_eq!(cli.output, PathBuf::from("out/subs.txt"));
        assert_eq!(cli.threads, 8);
        assert!(!cli.verbose);
    }

    #[test]
    fn test_threads_default() {
        let cli = Cli::try_parse_from(["crt-hunter", "-d", "example.com", "-o", "out.txt"]).unwrap();
        assert_eq!(cli.threads, 5);
    }

    #[test]
    fn test_output_is_required() {
        assert!(Cli::try_parse_from(["crt-hunter", "-d", "example.com"]).is_err());
    }
}
