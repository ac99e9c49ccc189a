mod generate;
mod scan;

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "skanner", version, about = "Scanner generator and matcher")]
pub struct SkannerArgs {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Compiles a list of regular expressions into a DFA artifact
    Generate(GenerateArgs),
    /// Runs a DFA artifact over a line-oriented input file
    Scan(ScanArgs),
}

#[derive(Debug, Args)]
pub struct GenerateArgs {
    /// Prints generation statistics to stdout
    #[arg(long)]
    profile: bool,
    /// File with one regular expression per line; line k defines token ID k
    regex_file: PathBuf,
    /// Destination for the compiled DFA artifact
    output_file: PathBuf,
}

#[derive(Debug, Args)]
pub struct ScanArgs {
    /// A DFA artifact produced by `skanner generate`
    dfa_file: PathBuf,
    /// Line-oriented input file; every line is matched on its own
    input_file: PathBuf,
    /// Destination for the per-line match results
    results_file: PathBuf,
}

fn main() {
    let args = SkannerArgs::parse();
    let result = match &args.command {
        Command::Generate(args) => generate::run(args).map_err(|error| error.to_string()),
        Command::Scan(args) => scan::run(args).map_err(|error| error.to_string()),
    };
    if let Err(message) = result {
        eprintln!("{message}");
        std::process::exit(-1);
    }
}
