use crate::dfa::{serializer, Dfa, DfaMatcher, DEAD_STATE};
use crate::generator::{generate_scanner, GeneratorError};
use crate::nfa::{InvariantViolation, Nfa, NfaEdge, NfaNodeFactory};
use crate::parser;
use ::regex::Regex as LibRegex;
use proptest::prelude::*;

fn build_matcher(dfa: &Dfa) -> DfaMatcher<'_> {
    dfa.matcher()
}

fn single_pattern_dfa(expression: &[u8]) -> Dfa {
    generate_scanner(&[expression]).unwrap()
}

fn expect_matches(matcher: &DfaMatcher, inputs: &[&[u8]]) {
    for input in inputs {
        assert!(
            matcher.matches(input),
            "expected to accept {:?}",
            String::from_utf8_lossy(input)
        );
    }
}

fn expect_rejections(matcher: &DfaMatcher, inputs: &[&[u8]]) {
    for input in inputs {
        assert!(
            !matcher.matches(input),
            "expected to reject {:?}",
            String::from_utf8_lossy(input)
        );
    }
}

#[test]
fn single_literal_accepts_exact_match() {
    let dfa = single_pattern_dfa(b"a");
    let matcher = build_matcher(&dfa);
    expect_matches(&matcher, &[b"a"]);
    expect_rejections(&matcher, &[b"", b"b", b"aa"]);
}

#[test]
fn union_accepts_either_alternative() {
    let dfa = single_pattern_dfa(b"a|b");
    let matcher = build_matcher(&dfa);
    expect_matches(&matcher, &[b"a", b"b"]);
    expect_rejections(&matcher, &[b"", b"c", b"ab"]);
}

#[test]
fn concatenation_accepts_sequence() {
    let dfa = single_pattern_dfa(b"ab");
    let matcher = build_matcher(&dfa);
    expect_matches(&matcher, &[b"ab"]);
    expect_rejections(&matcher, &[b"", b"a", b"b", b"abc"]);
}

#[test]
fn kleene_star_accepts_zero_or_more_occurrences() {
    let dfa = single_pattern_dfa(b"a*");
    let matcher = build_matcher(&dfa);
    expect_matches(&matcher, &[b"", b"a", b"aaaa"]);
    expect_rejections(&matcher, &[b"b", b"ab", b"ba"]);
}

#[test]
fn plus_requires_at_least_one_occurrence() {
    let dfa = single_pattern_dfa(b"a+");
    let matcher = build_matcher(&dfa);
    expect_matches(&matcher, &[b"a", b"aaaa"]);
    expect_rejections(&matcher, &[b"", b"b"]);
}

#[test]
fn optional_accepts_zero_or_one_occurrence() {
    let dfa = single_pattern_dfa(b"a?");
    let matcher = build_matcher(&dfa);
    expect_matches(&matcher, &[b"", b"a"]);
    expect_rejections(&matcher, &[b"aa", b"b"]);
}

#[test]
fn complex_regex_handles_abc_or_def_repeatedly() {
    let dfa = single_pattern_dfa(b"(abc|def)*");
    let matcher = build_matcher(&dfa);
    expect_matches(&matcher, &[b"", b"abc", b"defabc", b"defabcdef"]);
    expect_rejections(&matcher, &[b"ab", b"abcde", b"xyz", b"abcdefg"]);
}

#[test]
fn nested_repetition_with_optional_group() {
    let dfa = single_pattern_dfa(b"(abc|def)*(x)?123");
    let matcher = build_matcher(&dfa);
    expect_matches(
        &matcher,
        &[b"123", b"abc123", b"defabcdefx123", b"defabcdef123"],
    );
    expect_rejections(&matcher, &[b"ab", b"abcde", b"xyz", b"abcdefg"]);
}

#[test]
fn wildcard_matches_any_single_byte() {
    let dfa = single_pattern_dfa(b"a.a");
    let matcher = build_matcher(&dfa);
    // 'b' and '!' are outside the DFA alphabet and ride the wildcard fallback, while 'a' is
    // inside it and reaches the wildcard through the ordinary per-symbol move
    expect_matches(&matcher, &[b"aaa", b"aba", b"a!a"]);
    expect_rejections(&matcher, &[b"aa", b"aaaa", b"ab", b"bba"]);
}

#[test]
fn wildcard_only_pattern_has_empty_alphabet() {
    let dfa = single_pattern_dfa(b".+");
    assert!(dfa.alphabet().is_empty());
    let matcher = build_matcher(&dfa);
    expect_matches(&matcher, &[b"x", b"anything at all", b"\x00\xff"]);
    expect_rejections(&matcher, &[b""]);
}

#[test]
fn character_classes_match_their_members() {
    let dfa = single_pattern_dfa(b"[a-c]+[0-9]");
    let matcher = build_matcher(&dfa);
    expect_matches(&matcher, &[b"a1", b"cab9", b"bbb0"]);
    expect_rejections(&matcher, &[b"d1", b"a", b"1", b"a10"]);
}

#[test]
fn multiple_patterns_report_their_token_ids() {
    let expressions: &[&[u8]] = &[b"a(abc|def)*", b"(ayz)?789"];
    let dfa = generate_scanner(expressions).unwrap();
    let matcher = build_matcher(&dfa);
    assert_eq!(matcher.matching_ids(b"a"), &[0]);
    assert_eq!(matcher.matching_ids(b"789"), &[1]);
    assert_eq!(matcher.matching_ids(b"ayz789"), &[1]);
    assert_eq!(matcher.matching_ids(b"aabcdef"), &[0]);
    assert!(matcher.matching_ids(b"ayz").is_empty());
}

#[test]
fn overlapping_patterns_report_every_match() {
    let expressions: &[&[u8]] = &[b"\\w+", b"\\d+", b"0x[0-9a-f]+"];
    let dfa = generate_scanner(expressions).unwrap();
    let matcher = build_matcher(&dfa);
    assert_eq!(matcher.matching_ids(b"x"), &[0]);
    assert_eq!(matcher.matching_ids(b"42"), &[0, 1]);
    assert_eq!(matcher.matching_ids(b"0xbeef"), &[0, 2]);
    assert_eq!(matcher.matching_ids(b"0"), &[0, 1]);
}

#[test]
fn scan_results_survive_serialization() {
    let expressions: &[&[u8]] = &[b"a(abc|def)*", b"(ayz)?789", b"\\d+"];
    let inputs: &[&[u8]] = &[b"a", b"789", b"ayz789", b"aabc", b"", b"nope"];

    let dfa = generate_scanner(expressions).unwrap();
    let mut artifact = Vec::new();
    serializer::serialize(&dfa, &mut artifact).unwrap();
    let restored = serializer::deserialize(&mut artifact.as_slice()).unwrap();
    assert_eq!(dfa, restored);

    let matcher = build_matcher(&dfa);
    let restored_matcher = build_matcher(&restored);
    for input in inputs {
        assert_eq!(
            matcher.matching_ids(input),
            restored_matcher.matching_ids(input)
        );
    }
}

#[test]
fn generation_fails_fast_with_the_pattern_index() {
    let expressions: &[&[u8]] = &[b"a+", b"[z-a]", b"b"];
    match generate_scanner(expressions) {
        Err(GeneratorError::Pattern { index, .. }) => assert_eq!(index, 1),
        other => panic!("expected a pattern error, got {other:?}"),
    }
}

#[test]
fn empty_pattern_list_is_rejected() {
    let expressions: &[&[u8]] = &[];
    assert_eq!(
        generate_scanner(expressions),
        Err(GeneratorError::EmptyPatternList)
    );
}

#[test]
fn locked_nfa_rejects_mutation_and_serves_lookups() {
    let mut factory = NfaNodeFactory::new();
    let mut start = factory.create_node();
    let accepting = factory.create_node();
    start.add_edge(NfaEdge::epsilon(accepting.id()));
    let (start_id, accepting_id) = (start.id(), accepting.id());
    let mut nfa = Nfa::new(start_id, accepting_id, vec![start, accepting]);

    // Lookup and conversion require the lock
    assert_eq!(
        nfa.node(start_id).unwrap_err(),
        InvariantViolation::NfaNotLocked
    );
    assert_eq!(nfa.to_dfa().unwrap_err(), InvariantViolation::NfaNotLocked);
    assert!(nfa.node_mut(start_id).is_ok());

    nfa.lock();
    assert_eq!(nfa.node(start_id).unwrap().id(), start_id);
    assert_eq!(nfa.node(accepting_id).unwrap().id(), accepting_id);
    assert_eq!(
        nfa.node(u32::MAX).unwrap_err(),
        InvariantViolation::UnknownNode(u32::MAX)
    );

    // ...and once locked, nothing may change
    let extra = factory.create_node();
    assert_eq!(nfa.add_node(extra), Err(InvariantViolation::NfaLocked));
    assert_eq!(
        nfa.node_mut(start_id).unwrap_err(),
        InvariantViolation::NfaLocked
    );

    // An ε-edge from start to accept makes the empty string the whole language
    let dfa = nfa.to_dfa().unwrap();
    let matcher = dfa.matcher();
    expect_matches(&matcher, &[b""]);
    expect_rejections(&matcher, &[b"a"]);
}

#[test]
fn dead_state_loops_back_to_itself() {
    let dfa = single_pattern_dfa(b"ab?c");
    for symbol_index in 0..dfa.alphabet().len() {
        assert_eq!(dfa.next_state(DEAD_STATE, symbol_index), DEAD_STATE);
    }
    assert_eq!(dfa.wildcard_next_state(DEAD_STATE), DEAD_STATE);
    assert!(!dfa.is_accepting(DEAD_STATE));
    assert!(dfa.accepting_ids(DEAD_STATE).is_empty());
}

/// Strategy producing expressions that both this crate and the `regex` crate agree on the
/// meaning of, used to cross-check the whole pipeline below.
fn random_pattern() -> impl Strategy<Value = String> {
    let base = prop_oneof![8 => "[a-e]", 1 => Just(String::from("."))];
    base.prop_recursive(8, 64, 10, |inner| {
        prop_oneof![
            10 => prop::collection::vec(inner.clone(), 1..6)
                .prop_map(|items| format!("({})", items.join(""))),
            10 => prop::collection::vec(inner.clone(), 1..6)
                .prop_map(|items| format!("({})", items.join("|"))),
            3 => inner.clone().prop_map(|r| format!("({r})*")),
            3 => inner.clone().prop_map(|r| format!("({r})+")),
            3 => inner.clone().prop_map(|r| format!("({r})?")),
        ]
    })
}

proptest! {
    /// The compiled scanner must agree with the `regex` crate on anchored whole-string
    /// matching, for every expression of the shared feature set.
    #[test]
    fn matcher_agrees_with_reference_implementation(
        pattern in random_pattern(),
        inputs in prop::collection::vec("[a-f]{0,10}", 25)
    ) {
        let dfa = generate_scanner(&[pattern.as_bytes()]).unwrap();
        let matcher = dfa.matcher();
        let reference = LibRegex::new(&format!("^({pattern})$")).unwrap();
        for input in &inputs {
            prop_assert_eq!(
                matcher.matches(input.as_bytes()),
                reference.is_match(input),
                "disagreement on pattern {:?} input {:?}", &pattern, input
            );
        }
    }

    /// Writing and re-reading an artifact yields an identical automaton.
    #[test]
    fn serializer_round_trips_generated_automata(
        patterns in prop::collection::vec(random_pattern(), 1..4)
    ) {
        let expressions: Vec<&[u8]> = patterns.iter().map(String::as_bytes).collect();
        let dfa = generate_scanner(&expressions).unwrap();
        let mut artifact = Vec::new();
        serializer::serialize(&dfa, &mut artifact).unwrap();
        let restored = serializer::deserialize(&mut artifact.as_slice()).unwrap();
        prop_assert_eq!(dfa, restored);
    }

    /// Every state has exactly one successor per alphabet symbol plus a wildcard fallback, all
    /// within the state table, and accepting IDs are strictly ascending.
    #[test]
    fn generated_automata_are_deterministic_and_well_formed(
        patterns in prop::collection::vec(random_pattern(), 1..5)
    ) {
        let expressions: Vec<&[u8]> = patterns.iter().map(String::as_bytes).collect();
        let dfa = generate_scanner(&expressions).unwrap();
        let state_count = dfa.state_count() as u32;
        for state in 0..state_count {
            for symbol_index in 0..dfa.alphabet().len() {
                prop_assert!(dfa.next_state(state, symbol_index) < state_count);
            }
            prop_assert!(dfa.wildcard_next_state(state) < state_count);
            let ids = dfa.accepting_ids(state);
            prop_assert!(ids.windows(2).all(|pair| pair[0] < pair[1]));
            prop_assert_eq!(dfa.is_accepting(state), !ids.is_empty());
        }
    }

    /// Matching is equivalent to parsing the single pattern and driving the conversions by hand.
    #[test]
    fn generator_matches_manual_pipeline(
        pattern in random_pattern(),
        inputs in prop::collection::vec("[a-f]{0,8}", 10)
    ) {
        let generated = generate_scanner(&[pattern.as_bytes()]).unwrap();
        let manual = parser::regex(pattern.as_bytes()).unwrap().to_nfa().to_dfa().unwrap();
        let generated_matcher = generated.matcher();
        let manual_matcher = manual.matcher();
        for input in &inputs {
            prop_assert_eq!(
                generated_matcher.matches(input.as_bytes()),
                manual_matcher.matches(input.as_bytes())
            );
        }
    }
}
