use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use parrot_align::{align, AlignmentOp, AlignmentResult};
use parrot_score::{score, ScoreReport, Tier};
use parrot_session::{PracticeSession, RoundOutcome};
use parrot_text::{tokenize_with, TokenizerConfig};

/// Pronunciation practice: align a spoken transcript against a reference
/// phrase and score it word by word.
#[derive(Parser)]
#[command(name = "parrot")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Draw a practice phrase from the built-in bank.
    Phrase {
        /// Seed for a deterministic draw.
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Align and score a transcript against a reference phrase.
    Evaluate {
        /// The phrase the learner was asked to pronounce.
        #[arg(long)]
        reference: String,

        /// What the recognizer heard.
        #[arg(long)]
        spoken: String,

        /// Ignore punctuation when comparing words.
        #[arg(long)]
        strip_punctuation: bool,

        /// Emit the alignment and report as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Run one full session round against a drawn phrase.
    Round {
        /// What the recognizer heard.
        #[arg(long)]
        spoken: String,

        /// Seed for a deterministic phrase draw.
        #[arg(long)]
        seed: Option<u64>,

        /// Ignore punctuation when comparing words.
        #[arg(long)]
        strip_punctuation: bool,

        /// Emit the alignment and report as JSON.
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Command::Phrase { seed } => {
            let session = new_session(seed);
            println!("{}", session.current_phrase());
        }
        Command::Evaluate {
            reference,
            spoken,
            strip_punctuation,
            json,
        } => {
            let config = TokenizerConfig { strip_punctuation };
            let result = align(
                &tokenize_with(&reference, config),
                &tokenize_with(&spoken, config),
            );
            let report = score(&result);
            if json {
                print_json(&result, &report)?;
            } else {
                print_verdicts(&result, &report);
            }
        }
        Command::Round {
            spoken,
            seed,
            strip_punctuation,
            json,
        } => {
            let mut session = new_session(seed);
            session.set_tokenizer_config(TokenizerConfig { strip_punctuation });
            println!("Phrase: {}", session.current_phrase());

            match session.submit_transcript(&spoken) {
                RoundOutcome::Scored(report) => {
                    let result = session
                        .last_result()
                        .expect("scored round stores its alignment");
                    if json {
                        print_json(result, &report)?;
                    } else {
                        print_verdicts(result, &report);
                    }
                }
                RoundOutcome::NoTranscript => {
                    println!("No speech recognized; the round was not scored.");
                }
                RoundOutcome::UpstreamFailure(err) => {
                    eprintln!("Recognition failed: {err}");
                    process::exit(1);
                }
            }
        }
    }

    Ok(())
}

fn new_session(seed: Option<u64>) -> PracticeSession {
    match seed {
        Some(seed) => PracticeSession::with_seed(seed),
        None => PracticeSession::new(),
    }
}

fn print_verdicts(result: &AlignmentResult, report: &ScoreReport) {
    for op in result.ops() {
        match op {
            AlignmentOp::Match { text, .. } => println!("  ok    {text}"),
            AlignmentOp::Miss { text, .. } => println!("  miss  {text}"),
            AlignmentOp::Extra { .. } => {}
        }
    }
    for op in result.extras() {
        if let AlignmentOp::Extra { text, .. } = op {
            println!("  extra {text}");
        }
    }
    println!(
        "{}/{} words matched: {:.2}% ({})",
        report.matched_count,
        report.total_reference_tokens,
        report.percentage,
        tier_label(report.tier)
    );
}

fn print_json(
    result: &AlignmentResult,
    report: &ScoreReport,
) -> Result<(), Box<dyn std::error::Error>> {
    let payload = serde_json::json!({
        "ops": result.ops(),
        "extras": result.extras(),
        "report": report,
    });
    println!("{}", serde_json::to_string_pretty(&payload)?);
    Ok(())
}

fn tier_label(tier: Tier) -> &'static str {
    match tier {
        Tier::Excellent => "excellent",
        Tier::Acceptable => "acceptable",
        Tier::NeedsPractice => "needs practice",
    }
}
