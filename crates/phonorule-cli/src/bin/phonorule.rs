// phonorule: induce morphological rules from a paradigm corpus.
//
// Reads a JSON corpus of example paradigms and searches for the cheapest
// rule hypothesis (one program per tense) reproducing every observed form,
// printing the solved rules and per-example latent structure.
//
// Usage:
//   phonorule [OPTIONS] CORPUS.json
//
// Options:
//   -d, --depth N       Maximum rule derivation depth (default 3)
//   -s, --stems N       Latent stem slots per example (default 0)
//   -f, --flags N       Latent boolean flags per example (default 0)
//   -c, --ceiling X     Cost bound at which the search gives up (default 200)
//       --step X        Cost bound increment (default 1)
//       --max-nodes N   Solver node budget per bound (default 500000)
//   -h, --help          Print help

use phonorule_core::FeatureCatalog;
use phonorule_induce::{GrammarConfig, SearchConfig, induce};
use phonorule_smt::{DfsSolver, SolverBudget};

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();

    if args.is_empty() || phonorule_cli::wants_help(&args) {
        println!("phonorule: induce morphological rules from a paradigm corpus.");
        println!();
        println!("Usage: phonorule [OPTIONS] CORPUS.json");
        println!();
        println!("The corpus is a JSON object with an \"examples\" array; each example");
        println!("has a \"forms\" array (one surface form per tense) and an optional");
        println!("\"lemma\". Forms are written in phoneme notation, compact (\"kats\")");
        println!("or space-separated (\"k a t s\").");
        println!();
        println!("Options:");
        println!("  -d, --depth N       Maximum rule derivation depth (default 3)");
        println!("  -s, --stems N       Latent stem slots per example (default 0)");
        println!("  -f, --flags N       Latent boolean flags per example (default 0)");
        println!("  -c, --ceiling X     Cost bound at which the search gives up (default 200)");
        println!("      --step X        Cost bound increment (default 1)");
        println!("      --max-nodes N   Solver node budget per bound (default 500000)");
        println!("  -h, --help          Print this help");
        return;
    }

    let (depth, args) = phonorule_cli::take_option(&args, "--depth", "-d");
    let (stems, args) = phonorule_cli::take_option(&args, "--stems", "-s");
    let (flags, args) = phonorule_cli::take_option(&args, "--flags", "-f");
    let (ceiling, args) = phonorule_cli::take_option(&args, "--ceiling", "-c");
    let (step, args) = phonorule_cli::take_option(&args, "--step", "--step");
    let (max_nodes, args) = phonorule_cli::take_option(&args, "--max-nodes", "--max-nodes");

    if let Some(flag) = phonorule_cli::unknown_option(&args) {
        phonorule_cli::fatal(&format!("unrecognized option {flag} (see --help)"));
    }
    let files: Vec<&String> = args.iter().collect();
    if files.len() != 1 {
        phonorule_cli::fatal("expected exactly one corpus file (see --help)");
    }

    let mut grammar = GrammarConfig::default();
    if let Some(v) = depth {
        grammar.max_depth = phonorule_cli::parse_value(&v, "--depth");
    }
    if let Some(v) = stems {
        grammar.latent_stems = phonorule_cli::parse_value(&v, "--stems");
    }
    if let Some(v) = flags {
        grammar.latent_flags = phonorule_cli::parse_value(&v, "--flags");
    }

    let mut search = SearchConfig::default();
    if let Some(v) = ceiling {
        search.ceiling = phonorule_cli::parse_value(&v, "--ceiling");
    }
    if let Some(v) = step {
        search.step = phonorule_cli::parse_value(&v, "--step");
    }

    let mut budget = SolverBudget::default();
    if let Some(v) = max_nodes {
        budget.max_nodes = phonorule_cli::parse_value(&v, "--max-nodes");
    }

    let corpus = phonorule_cli::load_corpus(files[0]).unwrap_or_else(|e| phonorule_cli::fatal(&e));
    let catalog =
        FeatureCatalog::new().unwrap_or_else(|e| phonorule_cli::fatal(&e.to_string()));

    let mut solver = DfsSolver::with_budget(budget);
    match induce(&mut solver, &catalog, &corpus, &grammar, &search) {
        Ok(hypothesis) => print!("{hypothesis}"),
        Err(e) => phonorule_cli::fatal(&e.to_string()),
    }
}
