// phonorule-cli: shared utilities for the command-line tool.

use std::process;

use phonorule_core::{Corpus, Example, parse_form};
use serde::Deserialize;

/// On-disk corpus shape: a list of examples, each with its surface forms in
/// tense order and an optional lemma. Forms use the phoneme notation
/// accepted by `parse_form` (compact, or space-separated symbols).
#[derive(Debug, Deserialize)]
struct RawCorpus {
    examples: Vec<RawExample>,
}

#[derive(Debug, Deserialize)]
struct RawExample {
    #[serde(default)]
    lemma: Option<String>,
    forms: Vec<String>,
}

/// Parse a corpus from its JSON text.
pub fn parse_corpus(text: &str) -> Result<Corpus, String> {
    let raw: RawCorpus = serde_json::from_str(text).map_err(|e| format!("bad corpus: {e}"))?;
    let examples = raw
        .examples
        .into_iter()
        .enumerate()
        .map(|(i, example)| {
            let lemma = example
                .lemma
                .map(|l| parse_form(&l))
                .transpose()
                .map_err(|e| format!("example {i}: {e}"))?;
            let forms = example
                .forms
                .iter()
                .map(|f| parse_form(f))
                .collect::<Result<Vec<_>, _>>()
                .map_err(|e| format!("example {i}: {e}"))?;
            Ok(Example { lemma, forms })
        })
        .collect::<Result<Vec<_>, String>>()?;
    Corpus::new(examples).map_err(|e| e.to_string())
}

/// Read and parse a corpus file.
pub fn load_corpus(path: &str) -> Result<Corpus, String> {
    let text =
        std::fs::read_to_string(path).map_err(|e| format!("failed to read {path}: {e}"))?;
    parse_corpus(&text)
}

/// Extract one value-carrying option (`--flag VALUE`, `--flag=VALUE` or
/// `-f VALUE`) from the args. Returns `(value, remaining_args)`; a missing
/// value is a usage error and exits via [`fatal`].
pub fn take_option(args: &[String], long: &str, short: &str) -> (Option<String>, Vec<String>) {
    match try_take_option(args, long, short) {
        Ok(parsed) => parsed,
        Err(msg) => fatal(&msg),
    }
}

fn try_take_option(
    args: &[String],
    long: &str,
    short: &str,
) -> Result<(Option<String>, Vec<String>), String> {
    let prefixed = format!("{long}=");
    let mut value = None;
    let mut remaining = Vec::new();
    let mut skip_next = false;

    for (i, arg) in args.iter().enumerate() {
        if skip_next {
            skip_next = false;
            continue;
        }
        if let Some(val) = arg.strip_prefix(&prefixed) {
            value = Some(val.to_string());
        } else if arg == long || arg == short {
            if i + 1 < args.len() {
                value = Some(args[i + 1].clone());
                skip_next = true;
            } else {
                return Err(format!("{arg} requires a value"));
            }
        } else {
            remaining.push(arg.clone());
        }
    }

    Ok((value, remaining))
}

/// First `-`-prefixed argument left over after option extraction, if any.
/// Anything matching is an option the tool does not understand.
pub fn unknown_option(args: &[String]) -> Option<&str> {
    args.iter().find(|a| a.starts_with('-')).map(String::as_str)
}

/// Parse an option value, exiting with a usage error when malformed.
pub fn parse_value<T: std::str::FromStr>(value: &str, flag: &str) -> T {
    match value.parse() {
        Ok(v) => v,
        Err(_) => fatal(&format!("invalid value for {flag}: {value}")),
    }
}

/// Print an error message and exit with code 1.
pub fn fatal(msg: &str) -> ! {
    eprintln!("error: {msg}");
    process::exit(1);
}

/// Check if `--help` or `-h` is in the args.
pub fn wants_help(args: &[String]) -> bool {
    args.iter().any(|a| a == "--help" || a == "-h")
}

#[cfg(test)]
mod tests {
    use super::*;
    use phonorule_core::format_form;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn take_option_accepts_all_spellings() {
        for spelling in [
            &["--depth", "3", "corpus.json"][..],
            &["--depth=3", "corpus.json"][..],
            &["-d", "3", "corpus.json"][..],
        ] {
            let (value, rest) = take_option(&args(spelling), "--depth", "-d");
            assert_eq!(value.as_deref(), Some("3"));
            assert_eq!(rest, args(&["corpus.json"]));
        }
    }

    #[test]
    fn take_option_leaves_other_args_alone() {
        let (value, rest) = take_option(&args(&["-s", "1", "corpus.json"]), "--depth", "-d");
        assert_eq!(value, None);
        assert_eq!(rest, args(&["-s", "1", "corpus.json"]));
    }

    #[test]
    fn missing_option_value_is_a_usage_error() {
        let err = try_take_option(&args(&["corpus.json", "--depth"]), "--depth", "-d").unwrap_err();
        assert_eq!(err, "--depth requires a value");
    }

    #[test]
    fn leftover_dash_arguments_are_flagged() {
        assert_eq!(
            unknown_option(&args(&["--bogus", "corpus.json"])),
            Some("--bogus")
        );
        assert_eq!(unknown_option(&args(&["corpus.json"])), None);
    }

    #[test]
    fn corpus_round_trips_through_json() {
        let corpus = parse_corpus(
            r#"{
                "examples": [
                    { "lemma": "kat", "forms": ["kat", "kats"] },
                    { "forms": ["dag", "dagz"] }
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(corpus.tenses, 2);
        assert_eq!(
            format_form(corpus.examples[0].lemma.as_ref().unwrap()),
            "kat"
        );
        assert_eq!(corpus.examples[1].lemma, None);
        assert_eq!(format_form(&corpus.examples[1].forms[1]), "dagz");
    }

    #[test]
    fn bad_symbols_are_reported_with_the_example_index() {
        let err = parse_corpus(r#"{ "examples": [ { "forms": ["xyz"] } ] }"#).unwrap_err();
        assert!(err.starts_with("example 0:"), "{err}");
    }

    #[test]
    fn ragged_corpus_is_rejected() {
        let err = parse_corpus(
            r#"{ "examples": [ { "forms": ["kat", "kats"] }, { "forms": ["dag"] } ] }"#,
        )
        .unwrap_err();
        assert!(err.contains("expected"), "{err}");
    }
}
