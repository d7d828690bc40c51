//! Command-line driver for the expression analyzer.
//!
//! Prints tokens, validation results, parse traces and automaton structure for
//! one input string. Exits non-zero when any requested layer rejects it.

use anyhow::{bail, Result};
use clap::{Parser as ClapParser, Subcommand};
use expr_automata::analyzer;
use expr_automata::parser::Step;
use tracing::Level;

#[derive(ClapParser, Debug)]
#[command(name = "exprlab", version, about = "NFA/DFA tokenizer and LL(1) parser for arithmetic expressions", long_about = None)]
struct Args {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Tokenize the input with the DFA
    Tokens {
        text: String,
        /// Print the tokens as JSON
        #[arg(long)]
        json: bool,
    },
    /// Run the structural checks
    Validate { text: String },
    /// Run the LL(1) parser
    Parse {
        text: String,
        /// Print every PDA step
        #[arg(long)]
        trace: bool,
    },
    /// Tokenize, validate and parse
    Check { text: String },
    /// Describe the token automaton
    Automaton {
        /// Show the Thompson NFA instead of the DFA
        #[arg(long)]
        nfa: bool,
        /// Dump the full structure as JSON
        #[arg(long)]
        json: bool,
    },
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);
    let analyzer = analyzer();

    match args.command {
        Commands::Tokens { text, json } => {
            let tokens = analyzer.tokenize(&text)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&tokens)?);
            } else {
                for (idx, token) in tokens.iter().enumerate() {
                    println!("{:>3}  {:<8} {:?} @{}", idx, token.kind, token.lexeme, token.offset);
                }
            }
        }
        Commands::Validate { text } => {
            let tokens = analyzer.tokenize(&text)?;
            let result = analyzer.validate(&tokens);
            if !result.valid {
                bail!("invalid at token {}: {}", result.index.unwrap_or_default(), result.message);
            }
            println!("valid");
        }
        Commands::Parse { text, trace } => {
            let tokens = analyzer.tokenize(&text)?;
            let mut parser = analyzer.parser(&tokens);
            if !trace {
                parser.parse_all()?;
                println!("accepted");
                return Ok(());
            }
            let run = parser.run_traced();
            for entry in &run.entries {
                let stack: Vec<&str> = entry.stack.iter().map(|s| s.name()).collect();
                let action = match entry.step {
                    Some(Step::Matched(t)) => format!("match {}", t),
                    Some(Step::Expanded(rule)) => format!("{}", analyzer.grammar()[rule]),
                    Some(Step::Accepted) => "accept".to_string(),
                    None => "reject".to_string(),
                };
                println!("{:<28} {:>3} {:<7} {}", stack.join(" "), entry.position, entry.lookahead, action);
            }
            run.outcome?;
        }
        Commands::Check { text } => {
            let analysis = analyzer.analyze(&text)?;
            let rendered: Vec<String> = analysis.tokens.iter().map(|t| t.to_string()).collect();
            println!("tokens:     {}", rendered.join(" "));
            if analysis.validation.valid {
                println!("validation: ok");
            } else {
                println!("validation: {}", analysis.validation.message);
            }
            match &analysis.parse {
                Ok(()) => println!("parse:      accepted"),
                Err(err) => println!("parse:      {}", err),
            }
            if !analysis.accepted() {
                bail!("input rejected");
            }
        }
        Commands::Automaton { nfa, json } => {
            if nfa && json {
                println!("{}", serde_json::to_string_pretty(analyzer.nfa())?);
            } else if nfa {
                let nfa = analyzer.nfa();
                println!("states: {}  start: {}", nfa.state_count(), nfa.start());
                for (state, kind) in nfa.accept_states() {
                    println!("  accept {:>3} -> {}", state, kind);
                }
            } else if json {
                println!("{}", serde_json::to_string_pretty(analyzer.dfa())?);
            } else {
                let dfa = analyzer.dfa();
                println!("states: {}", dfa.state_count());
                for state in dfa.states() {
                    let kinds: Vec<&str> = state.tokens.iter().map(|k| k.name()).collect();
                    println!(
                        "  {:>3} transitions: {:>3} accept: [{}]",
                        state.id,
                        state.transitions.len(),
                        kinds.join(", ")
                    );
                }
            }
        }
    }
    Ok(())
}
