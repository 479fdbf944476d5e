//! didact CLI - Structured tutoring content from unreliable LLM output.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use didact::{
    Config, EvaluationRecord, Extraction, LessonRecord, Level, LlmClient, QuestionKind,
    SessionState, Tutor,
};
use indicatif::ProgressBar;
use serde::Serialize;
use std::fs::OpenOptions;
use std::future::Future;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, Level as LogLevel};
use tracing_subscriber::FmtSubscriber;
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "didact")]
#[command(version)]
#[command(about = "Structured tutoring content from unreliable LLM output")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to configuration file
    #[arg(short, long, global = true, default_value = "didact.toml")]
    config: PathBuf,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a five-topic curriculum
    Curriculum {
        /// Subject area (e.g. "Mathematics")
        subject: String,

        /// Topic to build the curriculum for
        topic: String,

        /// Learner level
        #[arg(short, long, value_enum, default_value = "beginner")]
        level: Level,

        /// Append the result to a JSONL file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Generate a lesson for a topic
    Lesson {
        /// Topic to teach
        topic: String,

        /// Learner level
        #[arg(short, long, value_enum, default_value = "beginner")]
        level: Level,

        /// Append the result to a JSONL file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Evaluate an answer to a practice question
    Evaluate {
        /// The question that was asked
        #[arg(short, long)]
        question: String,

        /// The learner's answer
        #[arg(short, long)]
        answer: String,

        /// Learner level
        #[arg(short, long, value_enum, default_value = "beginner")]
        level: Level,

        /// Append the result to a JSONL file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Generate a practice question
    Question {
        /// Topic to ask about
        topic: String,

        /// Learner level
        #[arg(short, long, value_enum, default_value = "beginner")]
        level: Level,

        /// Kind of question to ask
        #[arg(short, long, value_enum, default_value = "conceptual")]
        kind: QuestionKind,

        /// Adapt difficulty to a previous-performance ratio (0.0 - 1.0)
        #[arg(long)]
        performance: Option<f64>,
    },

    /// Run an interactive tutoring session
    Session {
        /// Topic to learn
        topic: String,

        /// Subject area (defaults from config)
        #[arg(short, long)]
        subject: Option<String>,

        /// Learner level (defaults from config)
        #[arg(short, long, value_enum)]
        level: Option<Level>,
    },

    /// Validate configuration and check endpoint health
    Validate,

    /// Show example configuration
    Example,
}

fn setup_logging(verbose: bool) {
    let level = if verbose {
        LogLevel::DEBUG
    } else {
        LogLevel::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .compact()
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("Failed to set subscriber");
}

fn print_example_config() {
    let example = r#"# didact configuration file

[model]
# API key (can also use GEMINI_API_KEY env var)
# api_key = "..."
api_key_env = "GEMINI_API_KEY"
base_url = "https://generativelanguage.googleapis.com/v1beta/openai"
id = "gemini-2.0-flash"
timeout_secs = 60
max_tokens = 4096
temperature = 0.7
# system_prompt = "You are a patient, encouraging tutor."

[retry]
max_attempts = 3
base_delay_ms = 1000

[session]
subject = "Python Programming"
level = "beginner"
"#;
    println!("{example}");
}

/// One exported result, as a JSONL envelope.
#[derive(Serialize)]
struct ExportEnvelope<'a, T: Serialize> {
    id: String,
    kind: &'static str,
    generated_at: DateTime<Utc>,
    defaulted: bool,
    record: &'a T,
}

fn export<T: Serialize>(path: &Path, kind: &'static str, outcome: &Extraction<T>) -> Result<()> {
    let envelope = ExportEnvelope {
        id: Uuid::new_v4().to_string(),
        kind,
        generated_at: Utc::now(),
        defaulted: outcome.is_defaulted(),
        record: outcome.record(),
    };

    let json = serde_json::to_string(&envelope).context("Failed to serialize record")?;
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open output file {path:?}"))?;
    writeln!(file, "{json}").context("Failed to write output")?;

    info!(path = %path.display(), kind = kind, "Record exported");
    Ok(())
}

/// Run a generation future behind a spinner.
async fn with_spinner<T>(message: &'static str, fut: impl Future<Output = T>) -> T {
    let spinner = ProgressBar::new_spinner();
    spinner.set_message(message);
    spinner.enable_steady_tick(Duration::from_millis(120));
    let result = fut.await;
    spinner.finish_and_clear();
    result
}

fn print_advisory<T>(outcome: &Extraction<T>) {
    if let Some(advisory) = outcome.advisory() {
        eprintln!("note: {advisory}");
    }
}

fn print_lesson(topic: &str, lesson: &LessonRecord) {
    println!("# {topic}\n");
    println!("## Learning Objectives\n{}\n", lesson.objectives);
    println!("## Introduction\n{}\n", lesson.introduction);
    println!("## Core Concepts\n{}\n", lesson.core_concepts);
    println!("## Examples\n{}\n", lesson.examples);
    println!("## Practice Question\n{}", lesson.practice);
}

fn print_evaluation(record: &EvaluationRecord) {
    println!("Evaluation: {}", record.evaluation);
    if !record.understanding.is_empty() {
        println!("\nUnderstanding:\n{}", record.understanding);
    }
    if !record.feedback.is_empty() {
        println!("\nFeedback:\n{}", record.feedback);
    }
    if !record.next_steps.is_empty() {
        println!("\nNext Steps:\n{}", record.next_steps);
    }
    println!(
        "\n{}",
        if record.move_on {
            "Ready to move on."
        } else {
            "Worth another pass before moving on."
        }
    );
}

fn read_answer() -> Result<String> {
    print!("\nYour answer (empty to skip ahead): ");
    io::stdout().flush()?;
    let mut answer = String::new();
    io::stdin().read_line(&mut answer)?;
    Ok(answer.trim().to_string())
}

/// Interactive loop: curriculum, then lesson → answer → evaluation per
/// topic, advancing on a positive move-on signal.
async fn run_session(tutor: &Tutor<LlmClient>, mut session: SessionState) -> Result<()> {
    println!("Let's learn about {}!\n", session.topic);
    println!("Learning Path:");
    for (i, topic) in session.topics.iter().enumerate() {
        println!("  {}. {}", i + 1, topic);
    }

    while let Some(topic) = session.current_topic().map(str::to_string) {
        println!("\n=== {topic} ===\n");

        let lesson = with_spinner(
            "Generating lesson...",
            tutor.build_lesson(&topic, session.level),
        )
        .await;
        print_advisory(&lesson);
        let lesson = lesson.into_record();
        print_lesson(&topic, &lesson);
        session.last_question = Some(lesson.practice.clone());

        let answer = read_answer()?;
        if answer.is_empty() {
            if !session.advance() {
                break;
            }
            continue;
        }

        let question = session.last_question.clone().unwrap_or_default();
        let evaluation = with_spinner(
            "Evaluating your answer...",
            tutor.evaluate_answer(&question, &answer, session.level),
        )
        .await;
        print_advisory(&evaluation);
        let record = evaluation.into_record();
        println!();
        print_evaluation(&record);

        if record.move_on {
            if !session.advance() {
                break;
            }
        } else {
            println!("\nLet's go over {topic} once more.");
        }
    }

    println!(
        "\nYou completed the learning path for {}. Well done!",
        session.topic
    );
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    match cli.command {
        Commands::Example => {
            print_example_config();
            return Ok(());
        }

        Commands::Validate => {
            let config = Config::from_file(&cli.config)
                .with_context(|| format!("Failed to load config from {:?}", cli.config))?;

            config
                .resolve_api_key()
                .context("Failed to resolve API key")?;

            let tutor = Tutor::from_config(&config)?;
            let health = tutor.client().health_check().await;

            info!("Configuration is valid");
            info!("  Model:    {}", config.model.id);
            info!("  Endpoint: {}", config.model.base_url);
            info!(
                "  Retry:    {} attempts, {}ms base delay",
                config.retry.max_attempts, config.retry.base_delay_ms
            );
            match health.latency_ms {
                Some(latency) => info!("  Health:   {} ({latency}ms)", health.status),
                None => info!(
                    "  Health:   {} ({})",
                    health.status,
                    health.error.unwrap_or_default()
                ),
            }
            return Ok(());
        }

        command => {
            let config = Config::from_file_or_default(&cli.config)
                .with_context(|| format!("Failed to load config from {:?}", cli.config))?;
            let tutor = Tutor::from_config(&config)?;

            match command {
                Commands::Curriculum {
                    subject,
                    topic,
                    level,
                    output,
                } => {
                    let outcome = with_spinner(
                        "Generating curriculum...",
                        tutor.build_curriculum(&subject, level, &topic),
                    )
                    .await;
                    print_advisory(&outcome);
                    println!("{}", outcome.record());
                    if let Some(path) = output {
                        export(&path, "curriculum", &outcome)?;
                    }
                }

                Commands::Lesson {
                    topic,
                    level,
                    output,
                } => {
                    let outcome =
                        with_spinner("Generating lesson...", tutor.build_lesson(&topic, level))
                            .await;
                    print_advisory(&outcome);
                    print_lesson(&topic, outcome.record());
                    if let Some(path) = output {
                        export(&path, "lesson", &outcome)?;
                    }
                }

                Commands::Evaluate {
                    question,
                    answer,
                    level,
                    output,
                } => {
                    let outcome = with_spinner(
                        "Evaluating answer...",
                        tutor.evaluate_answer(&question, &answer, level),
                    )
                    .await;
                    print_advisory(&outcome);
                    print_evaluation(outcome.record());
                    if let Some(path) = output {
                        export(&path, "evaluation", &outcome)?;
                    }
                }

                Commands::Question {
                    topic,
                    level,
                    kind,
                    performance,
                } => {
                    let outcome = match performance {
                        Some(p) => {
                            with_spinner(
                                "Generating question...",
                                tutor.pose_adaptive_question(&topic, p),
                            )
                            .await
                        }
                        None => {
                            with_spinner(
                                "Generating question...",
                                tutor.pose_question(&topic, level, kind),
                            )
                            .await
                        }
                    };
                    print_advisory(&outcome);
                    println!("{}", outcome.record());
                }

                Commands::Session {
                    topic,
                    subject,
                    level,
                } => {
                    let subject = subject.unwrap_or_else(|| config.session.subject.clone());
                    let level = level.unwrap_or_else(|| {
                        config
                            .session
                            .level
                            .parse()
                            .unwrap_or(Level::Beginner)
                    });

                    let curriculum = with_spinner(
                        "Generating curriculum...",
                        tutor.build_curriculum(&subject, level, &topic),
                    )
                    .await;
                    print_advisory(&curriculum);

                    let session = SessionState::new(subject, level, topic.as_str(), curriculum.record());
                    run_session(&tutor, session).await?;
                }

                Commands::Example | Commands::Validate => unreachable!(),
            }
        }
    }

    Ok(())
}
