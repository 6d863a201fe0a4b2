use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use faq_core::{
    evaluate_cases, load_faq_file, save_faq_jsonl, ApiEvent, EvalCase, ExtractiveGenerator,
    FaqCorpus, FaqService, FileLoader, ServiceConfig, DEFAULT_REQUIRED_PASS_RATE,
};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "faq")]
#[command(about = "Lexical FAQ matcher and offline FAQ bot")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

// Flags override FAQ_PATH, TOP_K, MODEL_ID, MAX_TOKENS and TEMPERATURE from the
// environment, which override the built-in defaults.
#[derive(Debug, Args)]
struct CorpusArgs {
    /// FAQ corpus: a JSON array (.json) or JSON Lines (.jsonl) of {question, answer}.
    #[arg(long)]
    faq: Option<PathBuf>,

    #[arg(long)]
    top_k: Option<usize>,
}

#[derive(Debug, Default, Args)]
struct GenerationArgs {
    #[arg(long)]
    model_id: Option<String>,

    #[arg(long)]
    max_tokens: Option<u32>,

    #[arg(long)]
    temperature: Option<f64>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Rank the corpus against a question and print the top matches.
    Query {
        #[command(flatten)]
        corpus: CorpusArgs,
        #[arg(long)]
        question: String,
        /// Print matches as JSON instead of key=value lines.
        #[arg(long)]
        json: bool,
    },
    /// Answer a question end to end with the offline generator.
    Ask {
        #[command(flatten)]
        corpus: CorpusArgs,
        #[command(flatten)]
        generation: GenerationArgs,
        #[arg(long)]
        question: String,
    },
    /// Handle one HTTP proxy event read from a file or stdin.
    Handle {
        #[command(flatten)]
        corpus: CorpusArgs,
        #[command(flatten)]
        generation: GenerationArgs,
        #[arg(long)]
        event: Option<PathBuf>,
    },
    /// Rewrite a corpus as JSON Lines.
    Convert {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        output: PathBuf,
    },
    /// Measure hit@k over labelled questions.
    Eval {
        #[command(flatten)]
        corpus: CorpusArgs,
        #[arg(long)]
        cases: PathBuf,
        #[arg(long, default_value_t = DEFAULT_REQUIRED_PASS_RATE)]
        min_pass_rate: f64,
    },
}

fn service_config(corpus: &CorpusArgs, generation: &GenerationArgs) -> Result<ServiceConfig> {
    let mut config = ServiceConfig::from_env()?;

    if let Some(faq) = &corpus.faq {
        config.faq_path = faq.clone();
    }
    if let Some(top_k) = corpus.top_k {
        config.top_k = top_k;
    }
    if let Some(model_id) = &generation.model_id {
        config.generation.model_id = model_id.clone();
    }
    if let Some(max_tokens) = generation.max_tokens {
        config.generation.max_tokens = max_tokens;
    }
    if let Some(temperature) = generation.temperature {
        config.generation.temperature = temperature;
    }

    config.validate()?;
    Ok(config)
}

fn offline_service(
    corpus: &CorpusArgs,
    generation: &GenerationArgs,
) -> Result<FaqService<FileLoader, ExtractiveGenerator>> {
    let config = service_config(corpus, generation)?;
    let loader = FileLoader::new(config.faq_path.clone());
    Ok(FaqService::new(config, loader, ExtractiveGenerator))
}

fn load_corpus(path: &Path) -> Result<FaqCorpus> {
    let records = load_faq_file(path)?;
    let corpus = FaqCorpus::from_records(records);
    info!(entries = corpus.len(), path = %path.display(), "Loaded FAQ entries");
    Ok(corpus)
}

fn read_eval_cases_json(path: &Path) -> Result<Vec<EvalCase>> {
    let file = File::open(path).with_context(|| format!("open {}", path.display()))?;
    let cases: Vec<EvalCase> = serde_json::from_reader(file).context("parse eval cases json")?;
    Ok(cases)
}

fn read_event(path: Option<&Path>) -> Result<ApiEvent> {
    let mut raw = String::new();
    match path {
        Some(p) => {
            File::open(p)
                .with_context(|| format!("open {}", p.display()))?
                .read_to_string(&mut raw)
                .with_context(|| format!("read {}", p.display()))?;
        }
        None => {
            std::io::stdin()
                .read_to_string(&mut raw)
                .context("read event from stdin")?;
        }
    }
    serde_json::from_str(&raw).context("parse event json")
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    match &cli.command {
        Commands::Query {
            corpus,
            question,
            json,
        } => {
            let config = service_config(corpus, &GenerationArgs::default())?;
            let faqs = load_corpus(&config.faq_path)?;
            let matches = faqs.top_k(question, config.top_k);

            if *json {
                let out: Vec<serde_json::Value> = matches
                    .iter()
                    .map(|m| {
                        serde_json::json!({
                            "question": m.entry.question(),
                            "answer": m.entry.answer(),
                            "score": m.score,
                            "breakdown": m.breakdown,
                        })
                    })
                    .collect();
                println!("{}", serde_json::to_string_pretty(&out)?);
            } else {
                for (idx, m) in matches.iter().enumerate() {
                    println!(
                        "rank={} score={:.4} jaccard_q={:.4} jaccard_a={:.4} bonus={:.1} question={}",
                        idx + 1,
                        m.score,
                        m.breakdown.jaccard_question,
                        m.breakdown.jaccard_answer,
                        m.breakdown.substring_bonus,
                        m.entry.question()
                    );
                }
            }
        }
        Commands::Ask {
            corpus,
            generation,
            question,
        } => {
            let question = question.trim();
            if question.is_empty() {
                anyhow::bail!("--question must not be empty");
            }
            let service = offline_service(corpus, generation)?;
            let resp = service.ask(question)?;
            println!("{}", serde_json::to_string_pretty(&resp)?);
        }
        Commands::Handle {
            corpus,
            generation,
            event,
        } => {
            let service = offline_service(corpus, generation)?;
            let event = read_event(event.as_deref())?;
            let resp = service.handle(&event);
            println!("{}", serde_json::to_string(&resp)?);
        }
        Commands::Convert { input, output } => {
            let records = load_faq_file(input)?;
            save_faq_jsonl(output, &records)?;
            println!(
                "converted_entries={} output={}",
                records.len(),
                output.display()
            );
        }
        Commands::Eval {
            corpus,
            cases,
            min_pass_rate,
        } => {
            let config = service_config(corpus, &GenerationArgs::default())?;
            let faqs = load_corpus(&config.faq_path)?;
            let cases = read_eval_cases_json(cases)?;
            let summary = evaluate_cases(&faqs, &cases, config.top_k);

            println!(
                "k={} total={} passed={} failed={} pass_rate={:.4} required={:.4} meets_threshold={}",
                summary.k,
                summary.total,
                summary.passed,
                summary.failed,
                summary.pass_rate,
                min_pass_rate,
                summary.meets(*min_pass_rate)
            );

            for o in &summary.outcomes {
                println!(
                    "case={} passed={} rank={} top_score={:.4} top_question={} latency={:.3}ms",
                    o.case_id,
                    o.passed,
                    o.rank.map(|r| r.to_string()).as_deref().unwrap_or("null"),
                    o.top_score,
                    o.top_question.as_deref().unwrap_or("null"),
                    o.latency_ms
                );
            }

            if !summary.meets(*min_pass_rate) {
                anyhow::bail!(
                    "pass rate {:.4} below required {:.4}",
                    summary.pass_rate,
                    min_pass_rate
                );
            }
        }
    }

    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
