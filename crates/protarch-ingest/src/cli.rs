//! Command-line definitions for the `protarch` binary

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Protarch - protein region decomposition and architecture encoding
#[derive(Parser, Debug)]
#[command(name = "protarch")]
#[command(author, version, about, long_about = None)]
#[command(arg_required_else_help = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Pipeline configuration file (TOML)
    #[arg(short, long, env = "PROTARCH_CONFIG", global = true)]
    pub config: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Partition proteins into regions and encode their architectures
    Run(RunArgs),

    /// Add qscore, CATH label and quality category columns to a domain table
    Quality {
        /// Domain table with a `tid` column
        #[arg(long)]
        domains: PathBuf,

        /// Quality scores, `tid<TAB>qscore` without header
        #[arg(long)]
        qscores: PathBuf,

        /// Domain summary with `ted_id` and `cath_label` columns
        #[arg(long)]
        summary: Option<PathBuf>,

        /// Output domain table
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Convert TED domain boundary records into a domain table
    ParseTed {
        /// Boundary records, `tid<TAB>positions<TAB>level` without header
        #[arg(long)]
        boundaries: PathBuf,

        /// Keep only accessions present in this protein table
        #[arg(long)]
        proteins: Option<PathBuf>,

        /// Output domain table
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Render MobiDB JSON lines into an annotation table
    SequenceFeatures {
        /// MobiDB entries, one JSON object per line
        #[arg(long)]
        mobidb: PathBuf,

        /// Features to extract (defaults to the disorder, structure and
        /// low-complexity features)
        #[arg(long, value_delimiter = ',')]
        features: Vec<String>,

        /// Output annotation table
        #[arg(short, long)]
        output: PathBuf,
    },
}

#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// Protein table (accession first, length last)
    #[arg(long)]
    pub proteins: PathBuf,

    /// Domain table (acc, tednum, dom_start, dom_end)
    #[arg(long)]
    pub domains: PathBuf,

    /// Annotation table (acc plus one residue-string column per source)
    #[arg(long)]
    pub annotations: PathBuf,

    /// Directory for regions.tsv, architectures.tsv, linkers.tsv and rejections.tsv
    #[arg(short, long, default_value = ".")]
    pub output_dir: PathBuf,

    /// Minimum region lengths, comma separated
    #[arg(long, value_delimiter = ',')]
    pub min_lengths: Vec<usize>,

    /// Sources encoded into architectures, comma separated
    #[arg(long, value_delimiter = ',')]
    pub categorical_sources: Vec<String>,

    /// Source whose empty spans exclude a region
    #[arg(long)]
    pub primary_source: Option<String>,

    /// Worker threads
    #[arg(short = 'j', long)]
    pub threads: Option<usize>,

    /// Keep proteins that have no annotation table row
    #[arg(long)]
    pub allow_missing_annotations: bool,

    /// Compress the output tables
    #[arg(long)]
    pub gzip: bool,

    /// Show a progress bar
    #[arg(long)]
    pub progress: bool,
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_run_lists() {
        let cli = Cli::try_parse_from([
            "protarch",
            "run",
            "--proteins",
            "p.tsv",
            "--domains",
            "d.tsv",
            "--annotations",
            "a.tsv",
            "--min-lengths",
            "5,15",
            "--categorical-sources",
            "th50",
        ])
        .unwrap();

        let Commands::Run(args) = cli.command else {
            panic!("expected run");
        };
        assert_eq!(args.min_lengths, vec![5, 15]);
        assert_eq!(args.categorical_sources, vec!["th50"]);
        assert_eq!(args.output_dir, PathBuf::from("."));
        assert!(!args.gzip);
    }
}
