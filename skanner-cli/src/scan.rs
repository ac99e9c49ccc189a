use crate::ScanArgs;
use skanner::dfa::serializer::{self, DfaFormatError};
use skanner::dfa::DfaMatcher;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to load DFA artifact {path}: {source}")]
    LoadArtifact {
        path: PathBuf,
        source: DfaFormatError,
    },
    #[error("failed to read input file {path}: {source}")]
    ReadInput { path: PathBuf, source: io::Error },
    #[error("failed to write results file {path}: {source}")]
    WriteResults { path: PathBuf, source: io::Error },
}

pub fn run(args: &ScanArgs) -> Result<(), Error> {
    let dfa = serializer::deserialize_from_file(&args.dfa_file).map_err(|source| {
        Error::LoadArtifact {
            path: args.dfa_file.clone(),
            source,
        }
    })?;
    let matcher = dfa.matcher();

    let input = fs::read(&args.input_file).map_err(|source| Error::ReadInput {
        path: args.input_file.clone(),
        source,
    })?;

    let write_error = |source| Error::WriteResults {
        path: args.results_file.clone(),
        source,
    };
    let mut results = BufWriter::new(File::create(&args.results_file).map_err(write_error)?);
    write_results(&matcher, &input, &mut results).map_err(write_error)?;
    results.flush().map_err(write_error)?;
    Ok(())
}

/// One result line per input line: the 1-based line number, `;`, and the comma-separated token
/// IDs of every pattern matching the whole line (nothing after the `;` if none does).
fn write_results(
    matcher: &DfaMatcher,
    input: &[u8],
    results: &mut impl Write,
) -> io::Result<()> {
    for (index, line) in lines(input).enumerate() {
        write!(results, "{};", index + 1)?;
        let mut ids = matcher.matching_ids(line).iter();
        if let Some(first) = ids.next() {
            write!(results, "{first}")?;
            for id in ids {
                write!(results, ",{id}")?;
            }
        }
        results.write_all(b"\n")?;
    }
    Ok(())
}

/// Splits on `\n` without treating the terminator as part of the line. A trailing newline does
/// not open a final empty line, matching how line readers behave.
fn lines(input: &[u8]) -> impl Iterator<Item = &[u8]> + '_ {
    let body = input.strip_suffix(b"\n").unwrap_or(input);
    (!input.is_empty())
        .then(|| body.split(|&byte| byte == b'\n'))
        .into_iter()
        .flatten()
}
