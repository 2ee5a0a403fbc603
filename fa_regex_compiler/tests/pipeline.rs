use fa_regex_compiler::{
    compile, compile_with, minimize, Automaton, CompiledRegex, ErrorKind, Syntax,
};
use std::collections::BTreeSet;

/// Every string over `symbols` of length at most `max_len`.
fn all_strings(symbols: &[char], max_len: usize) -> Vec<String> {
    let mut out = vec![String::new()];
    let mut frontier = vec![String::new()];
    for _ in 0..max_len {
        let mut next = Vec::new();
        for prefix in &frontier {
            for c in symbols {
                let mut s = prefix.clone();
                s.push(*c);
                next.push(s);
            }
        }
        out.extend(next.iter().cloned());
        frontier = next;
    }
    out
}

fn compiled(pattern: &str) -> CompiledRegex {
    compile(pattern).unwrap_or_else(|e| panic!("{pattern:?}: {e}"))
}

fn check(pattern: &str, accepted: &[&str], rejected: &[&str]) {
    let c = compiled(pattern);
    for input in accepted {
        assert_eq!(c.stage_verdicts(input), [true; 3], "{pattern:?} should accept {input:?}");
    }
    for input in rejected {
        assert_eq!(c.stage_verdicts(input), [false; 3], "{pattern:?} should reject {input:?}");
    }
}

const PATTERNS: &[&str] = &[
    "ab*",
    "a|b",
    "(a|b)*abb",
    "a?",
    "[a-c]",
    "a*",
    "(ab|c)+d?",
    "a(b|c)*d+",
    "((a|ε)b)*",
    "(a*b*)*",
    "a?b?c?",
    "(a|b)(a|b)(a|b)",
    "[ab]*a[ab]",
    "ε",
    "\\n",
    "a\\*b",
];

#[test]
fn scenarios() {
    check("ab*", &["a", "abbb"], &["b", ""]);
    check("a|b", &["a", "b"], &["ab"]);
    check("(a|b)*abb", &["abb", "aabb"], &["ab"]);
    check("a?", &["", "a"], &["aa"]);
    check("[a-c]", &["a"], &["d"]);
}

#[test]
fn malformed_pattern_produces_no_automaton() {
    let e = compile("(a|b").unwrap_err();
    assert_eq!(e.kind(), ErrorKind::UnbalancedParentheses);

    for (pattern, kind) in [
        ("a)", ErrorKind::UnbalancedParentheses),
        ("[a-c", ErrorKind::MalformedCharacterClass),
        ("[]", ErrorKind::MalformedCharacterClass),
        ("a é", ErrorKind::InvalidCharacter),
        ("*a", ErrorKind::DanglingOperator),
        ("a|", ErrorKind::DanglingOperator),
        ("", ErrorKind::EmptyExpression),
        ("()", ErrorKind::EmptyExpression),
    ] {
        assert_eq!(compile(pattern).unwrap_err().kind(), kind, "{pattern:?}");
    }
}

#[test]
fn stages_agree_on_every_short_string() {
    for pattern in PATTERNS {
        let c = compiled(pattern);
        let symbols: Vec<char> = c.alphabet().iter().copied().chain(['z']).collect();
        for input in all_strings(&symbols, 5) {
            let [nfa, dfa, min] = c.stage_verdicts(&input);
            assert_eq!(nfa, dfa, "{pattern:?} NFA vs DFA on {input:?}");
            assert_eq!(dfa, min, "{pattern:?} DFA vs minimized on {input:?}");
        }
    }
}

#[test]
fn tokenizer_and_thompson_agree_on_alphabet() {
    for pattern in PATTERNS {
        let c = compiled(pattern);
        assert_eq!(c.alphabet(), c.nfa().alphabet(), "{pattern:?}");
        assert_eq!(c.nfa().alphabet(), c.dfa().alphabet(), "{pattern:?}");
    }
}

#[test]
fn minimal_state_counts() {
    for (pattern, states) in [
        ("ab*", 2),
        ("a|b", 2),
        ("(a|b)*abb", 4),
        ("a?", 2),
        ("[a-c]", 2),
        ("a*", 1),
        ("(a*b*)*", 1),
        ("(a|b)(a|b)(a|b)", 4),
        ("[ab]*a[ab]", 4),
    ] {
        assert_eq!(compiled(pattern).minimized().len(), states, "{pattern:?}");
    }
}

#[test]
fn minimization_is_idempotent() {
    for pattern in PATTERNS {
        let c = compiled(pattern);
        let again = minimize(c.minimized());
        assert_eq!(&again, c.minimized(), "{pattern:?}");
    }
}

#[test]
fn compilation_is_deterministic() {
    for pattern in PATTERNS {
        let first = compiled(pattern);
        let second = compiled(pattern);
        assert_eq!(first.postfix(), second.postfix());
        assert_eq!(first.nfa(), second.nfa());
        assert_eq!(first.dfa(), second.dfa());
        assert_eq!(first.minimized(), second.minimized());
    }
}

#[test]
fn no_unreachable_states_are_returned() {
    for pattern in PATTERNS {
        let c = compiled(pattern);
        assert!(c.dfa().unreachable_states().is_empty(), "{pattern:?}");
        assert!(c.minimized().unreachable_states().is_empty(), "{pattern:?}");
    }
}

#[test]
fn minimized_start_is_first_state() {
    for pattern in PATTERNS {
        let c = compiled(pattern);
        assert_eq!(c.minimized().start().index(), 0, "{pattern:?}");
    }
}

#[test]
fn escapes_and_epsilon() {
    check("\\n", &["\\n"], &["n", "\\", "\n"]);
    check("a\\*b", &["a*b"], &["ab", "aab"]);
    check("ε", &[""], &["ε", "a"]);
    check("a(b|ε)c", &["ac", "abc"], &["abbc"]);
    check("[\\n-p]", &["\\", "n", "o", "p"], &["m", "q"]);
}

#[test]
fn custom_syntax() {
    let syntax = Syntax::with_literals("xy".chars()).with_epsilon('e');
    let c = compile_with("x(y|e)", &syntax).unwrap();
    assert!(c.is_match("x"));
    assert!(c.is_match("xy"));
    assert!(!c.is_match("xe"));
    assert_eq!(c.alphabet(), &BTreeSet::from(['x', 'y']));
    assert_eq!(
        compile_with("xa", &syntax).unwrap_err().kind(),
        ErrorKind::InvalidCharacter
    );
}

#[test]
fn custom_epsilon_marker_is_displayed() {
    let syntax = Syntax::default().with_epsilon('e');
    let c = compile_with("ae", &syntax).unwrap();
    assert_eq!(c.postfix_text(), "a e .");
    assert_eq!(c.tree_text().unwrap(), "(a.e)");
    assert!(c.nfa_table().to_string().starts_with("state | a  | e\n"));

    let escaped = compile_with("a\\e", &syntax).unwrap();
    assert_eq!(escaped.tree_text().unwrap(), "(a.\\e)");
    assert!(escaped.is_match("ae"));
}

#[test]
fn symbols_outside_the_alphabet_reject() {
    let c = compiled("(a|b)*");
    assert!(c.is_match(""));
    assert!(!c.nfa().simulate("abc"));
    assert!(!c.dfa().simulate("c"));
    assert!(!c.minimized().simulate("ac"));
}

/// Cross-checks against the `regex` crate on syntax both engines read the same way.
#[test]
fn agrees_with_regex_crate() {
    let shared = [
        "ab*",
        "a|b",
        "(a|b)*abb",
        "a?",
        "[a-c]",
        "(ab|c)+d?",
        "a(b|c)*d+",
        "[ab]*a[ab]",
        "(a|bc)*(d|ab)?",
        "[b-d]+a?",
    ];
    let symbols = ['a', 'b', 'c', 'd', 'x'];
    let inputs = all_strings(&symbols, 5);

    for pattern in shared {
        let ours = compiled(pattern);
        let theirs = regex::Regex::new(&format!("^(?:{pattern})$")).unwrap();
        for input in &inputs {
            assert_eq!(
                ours.is_match(input),
                theirs.is_match(input),
                "{pattern:?} on {input:?}"
            );
            assert_eq!(ours.nfa().simulate(input), theirs.is_match(input));
        }
    }
}
