//! Binary serialization of compiled automata. The artifact written by [serialize] and read back
//! by [deserialize] is a fixed little-endian layout:
//!
//! | Offset | Size | Field |
//! |--------|------|-------|
//! | 0 | 4 | magic `"DFA1"` |
//! | 4 | 4 | state count (`u32`, includes the dead state) |
//! | 8 | 4 | alphabet size (`u32`) |
//! | 12 | alphabet size | the alphabet symbols, one byte each |
//! | ... | states × (alphabet size + 1) × 4 | transition matrix, row-major: per state, one `u32` next state per symbol followed by the `u32` wildcard-fallback state |
//! | ... | per state | accepting record: `u8` flag; if nonzero, `u32` ID count and that many `u32` token IDs |
//!
//! The dead-state ID 0 doubles as the "no transition" sentinel in the matrix. Reading validates
//! the magic, every matrix entry being a known state, and complete records; a short read
//! surfaces as [DfaFormatError::Truncated] rather than a bare I/O error. A partially written
//! artifact is invalid and reading it will fail.

use crate::dfa::{AcceptingState, Dfa};
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;
use thiserror::Error;

/// The four magic bytes opening every artifact.
pub const MAGIC: [u8; 4] = *b"DFA1";

/// The error raised when an artifact cannot be read back: it is not a DFA artifact at all, it
/// ends too early, it references states that do not exist, or the underlying I/O fails.
#[derive(Debug, Error)]
pub enum DfaFormatError {
    #[error("bad magic {found:?}, expected \"DFA1\"")]
    BadMagic { found: [u8; 4] },
    #[error("unexpected end of DFA data")]
    Truncated,
    #[error("transition to state {target} out of range (state count is {state_count})")]
    StateOutOfRange { target: u32, state_count: u32 },
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Writes `dfa` to `writer` in the format described in the
/// [module documentation](crate::dfa::serializer).
pub fn serialize(dfa: &Dfa, writer: &mut impl Write) -> io::Result<()> {
    writer.write_all(&MAGIC)?;
    writer.write_all(&(dfa.state_count() as u32).to_le_bytes())?;
    writer.write_all(&(dfa.alphabet().len() as u32).to_le_bytes())?;
    writer.write_all(dfa.alphabet())?;

    for state in 0..dfa.state_count() as u32 {
        for symbol_index in 0..dfa.alphabet().len() {
            writer.write_all(&dfa.next_state(state, symbol_index).to_le_bytes())?;
        }
        writer.write_all(&dfa.wildcard_next_state(state).to_le_bytes())?;
    }

    for state in 0..dfa.state_count() as u32 {
        let ids = dfa.accepting_ids(state);
        writer.write_all(&[u8::from(dfa.is_accepting(state))])?;
        if dfa.is_accepting(state) {
            writer.write_all(&(ids.len() as u32).to_le_bytes())?;
            for id in ids {
                writer.write_all(&id.to_le_bytes())?;
            }
        }
    }

    Ok(())
}

/// Reads a DFA back from `reader`, validating the format along the way.
pub fn deserialize(reader: &mut impl Read) -> Result<Dfa, DfaFormatError> {
    let mut magic = [0u8; 4];
    reader.read_exact(&mut magic).map_err(truncation)?;
    if magic != MAGIC {
        return Err(DfaFormatError::BadMagic { found: magic });
    }

    let state_count = read_u32(reader)?;
    let alphabet_size = read_u32(reader)?;
    let mut alphabet = vec![0u8; alphabet_size as usize];
    reader.read_exact(&mut alphabet).map_err(truncation)?;

    let in_range = |target: u32| {
        if target < state_count {
            Ok(target)
        } else {
            Err(DfaFormatError::StateOutOfRange {
                target,
                state_count,
            })
        }
    };

    let mut transitions = Vec::with_capacity(state_count as usize);
    let mut wildcard_transitions = Vec::with_capacity(state_count as usize);
    for _ in 0..state_count {
        let mut row = Vec::with_capacity(alphabet_size as usize);
        for _ in 0..alphabet_size {
            row.push(in_range(read_u32(reader)?)?);
        }
        transitions.push(row);
        wildcard_transitions.push(in_range(read_u32(reader)?)?);
    }

    let mut accepting = Vec::with_capacity(state_count as usize);
    for _ in 0..state_count {
        let mut flag = [0u8; 1];
        reader.read_exact(&mut flag).map_err(truncation)?;
        if flag[0] == 0 {
            accepting.push(AcceptingState::rejecting());
        } else {
            let id_count = read_u32(reader)?;
            let mut ids = Vec::with_capacity(id_count as usize);
            for _ in 0..id_count {
                ids.push(read_u32(reader)?);
            }
            accepting.push(AcceptingState::new(true, ids));
        }
    }

    Ok(Dfa::new(
        alphabet,
        transitions,
        wildcard_transitions,
        accepting,
    ))
}

/// Writes `dfa` to a fresh artifact file, replacing any previous content.
pub fn serialize_to_file(dfa: &Dfa, path: impl AsRef<Path>) -> Result<(), DfaFormatError> {
    let mut writer = BufWriter::new(File::create(path)?);
    serialize(dfa, &mut writer)?;
    writer.flush()?;
    Ok(())
}

/// Reads a DFA from an artifact file.
pub fn deserialize_from_file(path: impl AsRef<Path>) -> Result<Dfa, DfaFormatError> {
    let mut reader = BufReader::new(File::open(path)?);
    deserialize(&mut reader)
}

fn read_u32(reader: &mut impl Read) -> Result<u32, DfaFormatError> {
    let mut buffer = [0u8; 4];
    reader.read_exact(&mut buffer).map_err(truncation)?;
    Ok(u32::from_le_bytes(buffer))
}

/// A short read means the artifact was cut off; anything else is a real I/O failure.
fn truncation(error: io::Error) -> DfaFormatError {
    if error.kind() == io::ErrorKind::UnexpectedEof {
        DfaFormatError::Truncated
    } else {
        DfaFormatError::Io(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_state_dfa() -> Dfa {
        Dfa::new(
            vec![b'a', b'b'],
            vec![vec![1, 0], vec![1, 1]],
            vec![0, 0],
            vec![
                AcceptingState::rejecting(),
                // Deliberately out of ascending order: the codec must preserve IDs as written
                AcceptingState::new(true, vec![42, 7]),
            ],
        )
    }

    #[test]
    fn round_trip_preserves_dfa() {
        let dfa = two_state_dfa();
        let mut buffer = Vec::new();
        serialize(&dfa, &mut buffer).unwrap();
        let deserialized = deserialize(&mut buffer.as_slice()).unwrap();
        assert_eq!(dfa, deserialized);
    }

    #[test]
    fn deserialize_rejects_invalid_magic() {
        let result = deserialize(&mut &b"bad!"[..]);
        assert!(matches!(
            result,
            Err(DfaFormatError::BadMagic { found: _ })
        ));
    }

    #[test]
    fn deserialize_rejects_truncated_data() {
        let dfa = two_state_dfa();
        let mut buffer = Vec::new();
        serialize(&dfa, &mut buffer).unwrap();
        for length in 0..buffer.len() {
            let result = deserialize(&mut &buffer[..length]);
            assert!(
                matches!(result, Err(DfaFormatError::Truncated)),
                "expected truncation error at length {length}"
            );
        }
    }

    #[test]
    fn deserialize_rejects_out_of_range_states() {
        let mut buffer = Vec::new();
        buffer.extend_from_slice(&MAGIC);
        buffer.extend_from_slice(&1u32.to_le_bytes()); // one state
        buffer.extend_from_slice(&1u32.to_le_bytes()); // one symbol
        buffer.push(b'a');
        buffer.extend_from_slice(&9u32.to_le_bytes()); // transition to state 9
        buffer.extend_from_slice(&0u32.to_le_bytes());
        buffer.push(0);
        let result = deserialize(&mut buffer.as_slice());
        assert!(matches!(
            result,
            Err(DfaFormatError::StateOutOfRange {
                target: 9,
                state_count: 1
            })
        ));
    }
}
