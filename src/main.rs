use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use itertools::Itertools;
use std::fs;
use std::io::{self, Read};

use scansion::{ClassifierConfig, DEFAULT_ERROR_BORDER, METRES, MetreClassifier, PatternAnalyzer};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Match one stress string against a grammar
    Match {
        /// Grammar, e.g. "(us)*(uS)(U)?(U)?"
        #[arg(value_name = "PATTERN")]
        pattern: String,

        /// Stress string, one symbol per syllable
        #[arg(value_name = "LINE")]
        line: String,

        /// Maximum errors a partial match may accumulate
        #[arg(short = 'e', long, default_value_t = DEFAULT_ERROR_BORDER)]
        error_border: usize,

        /// Trace matcher generations on stderr
        #[arg(long)]
        trace: bool,
    },

    /// Classify the metre of a poem given as stress strings, one per line
    Classify {
        /// Input file (stdin if omitted)
        #[arg(value_name = "FILE")]
        file: Option<String>,

        /// Print the lines with the winning metre's corrections applied
        #[arg(long)]
        improve: bool,

        /// Skip lines with more syllables than this
        #[arg(long, value_name = "N")]
        max_syllables: Option<usize>,
    },

    /// List the built-in metre templates
    Metres,
}

fn main() {
    let args = Args::parse();
    if let Err(err) = run(args.command) {
        eprintln!("{err:#}");
        std::process::exit(1);
    }
}

fn run(command: Command) -> Result<()> {
    match command {
        Command::Match {
            pattern,
            line,
            error_border,
            trace,
        } => {
            let analyzer = PatternAnalyzer::new(&pattern, error_border)
                .with_context(|| format!("Invalid grammar {pattern:?}"))?
                .with_trace(trace);
            let outcome = analyzer.accept(&line);
            println!(
                "{} strong={} weak={}{}",
                if outcome.pattern.is_empty() { "-" } else { outcome.pattern.as_str() },
                outcome.strong_errors,
                outcome.weak_errors,
                if outcome.truncated { " truncated" } else { "" }
            );
        }
        Command::Classify {
            file,
            improve,
            max_syllables,
        } => {
            let text = read_input(file.as_deref())?;
            let lines: Vec<&str> = text
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .collect();

            let mut config = ClassifierConfig::default();
            if let Some(max) = max_syllables {
                config.max_line_syllables = max;
            }
            let classifier = MetreClassifier::new(config).context("Invalid metre catalogue")?;
            let (improved, result) = classifier.improve(&lines);

            println!("{}", result.metre);
            for score in &result.scores {
                println!(
                    "{:<14} strong={} weak={} corrections={}",
                    score.metre,
                    score.strong_errors,
                    score.weak_errors,
                    score.corrections.len()
                );
            }
            if improve {
                println!("{}", improved.iter().join("\n"));
            }
        }
        Command::Metres => {
            for (name, template) in METRES.entries() {
                println!(
                    "{:<14} {} (error border {})",
                    name, template.pattern, template.error_border
                );
            }
        }
    }
    Ok(())
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => fs::read_to_string(path).with_context(|| format!("Failed to read {path}")),
        None => {
            let mut contents = String::new();
            io::stdin()
                .read_to_string(&mut contents)
                .context("Failed to read stdin")?;
            Ok(contents)
        }
    }
}
