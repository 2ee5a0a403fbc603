use fa_regex_compiler::{compile, CompiledRegex, TransitionTable};
use itertools::Itertools;
use log::{debug, warn};
use proc_fa_regex::regex;
use regex::Regex;
use std::process::ExitCode;

const USAGE: &str = "usage: fa_regex <pattern> [input...]";

const fn identifier(to_test: &str) -> bool {
    regex!("[a-z_][a-z0-9_]*").test(to_test)
}

const fn abb_suffix(to_test: &str) -> bool {
    regex!("(a|b)*abb").test(to_test)
}

/// Characters both engines read the same way. Escapes, the epsilon marker, whitespace and
/// punctuation like `.` or `^` mean different things to the `regex` crate.
fn shared_syntax(c: char) -> bool {
    c.is_ascii_alphanumeric() || "()[]|*+?-_".contains(c)
}

/// The `regex` crate reads `*?`, `+?` and `??` as lazy quantifiers. Here the `?` applies to
/// the quantified expression, so `a+?` is `(a+)?`.
fn cross_checkable(pattern: &str) -> bool {
    pattern.chars().all(shared_syntax)
        && !pattern
            .chars()
            .tuple_windows()
            .any(|(q, next)| "*+?".contains(q) && next == '?')
}

fn oracle(pattern: &str) -> Option<Regex> {
    if !cross_checkable(pattern) {
        debug!("Skipping regex crate cross-check for {:?}", pattern);
        return None;
    }
    match Regex::new(&format!("^(?:{pattern})$")) {
        Ok(re) => Some(re),
        Err(e) => {
            warn!("regex crate rejected {:?}: {}", pattern, e);
            None
        }
    }
}

fn print_stages(compiled: &CompiledRegex) {
    println!("Postfix: {}", compiled.postfix_text());
    match compiled.tree_text() {
        Ok(tree) => println!("Tree   : {tree}"),
        Err(e) => warn!("Could not rebuild tree: {}", e),
    }
    println!("Alphabet: {{{}}}", compiled.alphabet().iter().join(", "));

    println!("\nNFA ({} states)", compiled.nfa().len());
    print!("{}", compiled.nfa_table());
    println!("\nDFA ({} states)", compiled.dfa().len());
    print!("{}", TransitionTable::from_dfa(compiled.dfa()));
    println!("\nMinimized DFA ({} states)", compiled.minimized().len());
    print!("{}", TransitionTable::from_dfa(compiled.minimized()).lettered());
}

fn verdict(accepted: bool) -> &'static str {
    if accepted { "accept" } else { "reject" }
}

fn main() -> ExitCode {
    env_logger::init();

    assert!(identifier("snake_case"));
    assert!(!identifier("9lives"));
    assert!(abb_suffix("babb"));
    assert!(!abb_suffix("abba"));

    let mut args = std::env::args().skip(1);
    let Some(pattern) = args.next() else {
        eprintln!("{USAGE}");
        return ExitCode::from(2);
    };
    let inputs: Vec<String> = args.collect();

    let compiled = match compile(&pattern) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{pattern:?}: {e}");
            return ExitCode::from(1);
        }
    };

    print_stages(&compiled);

    if inputs.is_empty() {
        return ExitCode::SUCCESS;
    }

    let re = oracle(&pattern);
    println!();
    for input in &inputs {
        let [nfa, dfa, min] = compiled.stage_verdicts(input);
        let mut line = format!(
            "{input:?}: NFA {} | DFA {} | minimized {}",
            verdict(nfa),
            verdict(dfa),
            verdict(min)
        );
        if let Some(re) = &re {
            line.push_str(&format!(" | regex {}", verdict(re.is_match(input))));
        }
        println!("{line}");
    }

    ExitCode::SUCCESS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quantifier_followed_by_question_is_not_cross_checked() {
        for pattern in ["a+?", "a*?", "a??", "(ab)+?c"] {
            assert!(!cross_checkable(pattern), "{pattern:?}");
            assert!(oracle(pattern).is_none(), "{pattern:?}");
        }
        assert!(compile("a+?").unwrap().is_match(""));
    }

    #[test]
    fn shared_patterns_agree_with_regex() {
        for pattern in ["ab*", "(a|b)*abb", "a?b+", "a+(b?)", "[a-c]+"] {
            let re = oracle(pattern).unwrap();
            let ours = compile(pattern).unwrap();
            for input in ["", "a", "ab", "abb", "aabb", "bc", "abbb"] {
                assert_eq!(ours.is_match(input), re.is_match(input), "{pattern:?} on {input:?}");
            }
        }
    }

    #[test]
    fn other_punctuation_is_not_cross_checked() {
        assert!(!cross_checkable("a.b"));
        assert!(!cross_checkable("a\\*"));
        assert!(!cross_checkable("aε"));
        assert!(!cross_checkable("a b"));
    }
}
