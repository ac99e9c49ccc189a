use crate::GenerateArgs;
use skanner::dfa::serializer::{self, DfaFormatError};
use skanner::generator::{self, GeneratorError};
use std::path::PathBuf;
use std::time::Instant;
use std::{fs, io};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to read regex file {path}: {source}")]
    ReadRegexFile { path: PathBuf, source: io::Error },
    #[error("no regular expressions found in {0}")]
    NoExpressions(PathBuf),
    #[error("failed to generate scanner: {0}")]
    Generate(#[from] GeneratorError),
    #[error("failed to write DFA artifact {path}: {source}")]
    WriteArtifact {
        path: PathBuf,
        source: DfaFormatError,
    },
}

pub fn run(args: &GenerateArgs) -> Result<(), Error> {
    let raw = fs::read(&args.regex_file).map_err(|source| Error::ReadRegexFile {
        path: args.regex_file.clone(),
        source,
    })?;
    let expressions = load_expressions(&raw);
    if expressions.is_empty() {
        return Err(Error::NoExpressions(args.regex_file.clone()));
    }

    let generation_started = Instant::now();
    let dfa = generator::generate_scanner(&expressions)?;
    let generation_time = generation_started.elapsed();

    let serialization_started = Instant::now();
    serializer::serialize_to_file(&dfa, &args.output_file).map_err(|source| {
        Error::WriteArtifact {
            path: args.output_file.clone(),
            source,
        }
    })?;
    let serialization_time = serialization_started.elapsed();

    if args.profile {
        println!("patterns:      {}", expressions.len());
        println!("dfa states:    {}", dfa.state_count());
        println!("alphabet size: {}", dfa.alphabet().len());
        println!("generation:    {generation_time:?}");
        println!("serialization: {serialization_time:?}");
    }

    Ok(())
}

/// One expression per line, with surrounding ASCII whitespace trimmed and blank lines skipped.
/// The position among the *kept* lines is the expression's token ID.
fn load_expressions(raw: &[u8]) -> Vec<Vec<u8>> {
    raw.split(|&byte| byte == b'\n')
        .map(|line| line.trim_ascii())
        .filter(|line| !line.is_empty())
        .map(<[u8]>::to_vec)
        .collect()
}
