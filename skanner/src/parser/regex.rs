use crate::regex::{Leaf, Regex, RegexNode, SymbolSet};
use nom::branch::alt;
use nom::bytes::complete::take;
use nom::character::complete;
use nom::character::complete::one_of;
use nom::combinator::{cut, map, opt, value, verify};
use nom::error::{Error, ErrorKind};
use nom::multi::{many1, separated_list1};
use nom::sequence::{pair, preceded, terminated, tuple};
use nom::IResult;

pub(crate) fn full_regex(input: &[u8]) -> IResult<&[u8], Regex> {
    map(expression, |tree| Regex { tree })(input)
}

fn expression(input: &[u8]) -> IResult<&[u8], RegexNode> {
    alternation(input)
}

fn alternation(input: &[u8]) -> IResult<&[u8], RegexNode> {
    map(
        separated_list1(complete::char('|'), sequence),
        join_alternatives,
    )(input)
}

fn sequence(input: &[u8]) -> IResult<&[u8], RegexNode> {
    map(many1(repetition), join_sequence)(input)
}

fn join_alternatives(alternatives: Vec<RegexNode>) -> RegexNode {
    alternatives
        .into_iter()
        .reduce(|left, right| RegexNode::Union(Box::new(left), Box::new(right)))
        .expect("separated_list1 yields at least one alternative")
}

fn join_sequence(items: Vec<RegexNode>) -> RegexNode {
    items
        .into_iter()
        .reduce(|left, right| RegexNode::Concat(Box::new(left), Box::new(right)))
        .expect("many1 yields at least one item")
}

fn repetition(input: &[u8]) -> IResult<&[u8], RegexNode> {
    map(pair(atom, opt(one_of("*+?"))), apply_repetition)(input)
}

fn apply_repetition((node, operator): (RegexNode, Option<char>)) -> RegexNode {
    match operator {
        Some('*') => RegexNode::Kleene(Box::new(node)),
        // One-or-more is the node followed by zero-or-more copies of it
        Some('+') => RegexNode::Concat(
            Box::new(node.clone()),
            Box::new(RegexNode::Kleene(Box::new(node))),
        ),
        Some('?') => RegexNode::Optional(Box::new(node)),
        None => node,
        _ => unreachable!("one_of only yields *, + or ?"),
    }
}

fn atom(input: &[u8]) -> IResult<&[u8], RegexNode> {
    alt((group, char_class, map(escape, symbol_leaf), wildcard, literal))(input)
}

fn group(input: &[u8]) -> IResult<&[u8], RegexNode> {
    preceded(
        complete::char('('),
        cut(terminated(expression, complete::char(')'))),
    )(input)
}

fn char_class(input: &[u8]) -> IResult<&[u8], RegexNode> {
    map(
        preceded(
            complete::char('['),
            cut(terminated(
                pair(opt(complete::char('^')), many1(class_item)),
                complete::char(']'),
            )),
        ),
        |(negation, items)| {
            let symbols: SymbolSet = items.iter().flat_map(|item| item.iter()).collect();
            let symbols = if negation.is_some() {
                symbols.complement()
            } else {
                symbols
            };
            RegexNode::Leaf(Leaf::new(symbols))
        },
    )(input)
}

fn class_item(input: &[u8]) -> IResult<&[u8], SymbolSet> {
    alt((escape, class_range, map(class_byte, SymbolSet::singleton)))(input)
}

fn class_range(input: &[u8]) -> IResult<&[u8], SymbolSet> {
    let (rest, (low, _, high)) = tuple((class_byte, complete::char('-'), class_byte))(input)?;
    if low > high {
        // An inverted range is malformed, not a set of three literals
        Err(nom::Err::Failure(Error::new(input, ErrorKind::Verify)))
    } else {
        Ok((rest, SymbolSet::range(low, high)))
    }
}

fn class_byte(input: &[u8]) -> IResult<&[u8], u8> {
    verify(map(take(1usize), one_byte), |byte| {
        *byte != b']' && *byte != b'\\'
    })(input)
}

fn wildcard(input: &[u8]) -> IResult<&[u8], RegexNode> {
    value(RegexNode::Leaf(Leaf::wildcard()), complete::char('.'))(input)
}

fn literal(input: &[u8]) -> IResult<&[u8], RegexNode> {
    map(
        verify(map(take(1usize), one_byte), |byte| {
            !is_reserved_byte(*byte)
        }),
        |byte| RegexNode::Leaf(Leaf::new(SymbolSet::singleton(byte))),
    )(input)
}

fn escape(input: &[u8]) -> IResult<&[u8], SymbolSet> {
    map(preceded(complete::char('\\'), take(1usize)), |bytes| {
        escape_set(one_byte(bytes))
    })(input)
}

fn escape_set(byte: u8) -> SymbolSet {
    match byte {
        b'd' => SymbolSet::digits(),
        b'D' => SymbolSet::digits().complement(),
        b'w' => SymbolSet::word(),
        b'W' => SymbolSet::word().complement(),
        b's' => SymbolSet::whitespace(),
        b'S' => SymbolSet::whitespace().complement(),
        other => SymbolSet::singleton(other),
    }
}

fn symbol_leaf(symbols: SymbolSet) -> RegexNode {
    RegexNode::Leaf(Leaf::new(symbols))
}

// Helper function to take a &[u8] of one byte and return that byte
fn one_byte(bytes: &[u8]) -> u8 {
    debug_assert_eq!(bytes.len(), 1, "take(1) should take exactly 1 byte");
    bytes[0]
}

fn is_reserved_byte(byte: u8) -> bool {
    matches!(
        byte,
        b'(' | b')' | b'|' | b'*' | b'+' | b'?' | b'[' | b']' | b'\\' | b'.'
    )
}
