//! Command-line surface for the `exprflow` binary.

use clap::Parser;

/// A line-oriented expression interpreter with concurrent map/reduce.
#[derive(Debug, Parser)]
#[command(name = "exprflow", version, about)]
pub struct Cli {
    /// Program file to read; omit to read from standard input
    pub file: Option<std::path::PathBuf>,

    /// Overrides the sequential/parallel boundary for map/reduce
    #[arg(long, default_value_t = crate::parallel::DEFAULT_MULTITHREAD_THRESHOLD)]
    pub threshold: usize,

    /// Enables verbose tracing output on standard error
    #[arg(long, short)]
    pub verbose: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_threshold_matches_design_constant() {
        let cli = Cli::parse_from(["exprflow"]);
        assert_eq!(cli.threshold, crate::parallel::DEFAULT_MULTITHREAD_THRESHOLD);
        assert!(cli.file.is_none());
        assert!(!cli.verbose);
    }

    #[test]
    fn test_threshold_override() {
        let cli = Cli::parse_from(["exprflow", "--threshold", "4"]);
        assert_eq!(cli.threshold, 4);
    }

    #[test]
    fn test_file_argument() {
        let cli = Cli::parse_from(["exprflow", "program.ef"]);
        assert_eq!(cli.file, Some(std::path::PathBuf::from("program.ef")));
    }
}
