use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;
use uuid::Uuid;

use dnamatch::{
    Answer, BankKind, CandidateProfile, DropTarget, EngineConfig, MatchAction, Matcher,
    OrganizationEvaluator, QuestionBank, Respondent, ScoringEngine, SeedData, Side, Store,
    TargetProfile,
};

#[derive(Parser, Debug)]
#[command(name = "dnamatch")]
#[command(about = "DNA profiling and weekly candidate/organization matching", long_about = None)]
struct Args {
    /// Data directory for the store snapshot
    #[arg(short, long, default_value = "./data")]
    data_dir: PathBuf,

    /// Engine configuration file (JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print a built-in question bank
    Questions {
        #[arg(long, default_value = "individual")]
        bank: String,
    },
    /// Score an answer file against a bank
    Score {
        #[arg(long, default_value = "individual")]
        bank: String,
        #[arg(long)]
        answers: PathBuf,
    },
    /// Evaluate an organization from a respondents file
    Evaluate {
        #[arg(long)]
        respondents: PathBuf,
    },
    /// Match one candidate profile against one target profile
    Match {
        #[arg(long)]
        candidate: PathBuf,
        #[arg(long)]
        target: PathBuf,
    },
    /// Load seed data into the store and run matching
    Seed {
        #[arg(long, default_value = "demos/seed.json")]
        file: PathBuf,
    },
    /// Match every profiled candidate against every active role
    RunMatching,
    /// Generate a weekly drop
    Drop {
        /// candidate or organization
        target: String,
        id: String,
    },
    /// Record a candidate or organization action on a match
    Act {
        match_id: Uuid,
        #[arg(long)]
        side: String,
        #[arg(long)]
        action: String,
    },
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    // stdout carries the JSON output
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting dnamatch v{}", env!("CARGO_PKG_VERSION"));

    let config = match &args.config {
        Some(path) => EngineConfig::from_path(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => EngineConfig::default(),
    };

    match args.command {
        Command::Questions { bank } => {
            let bank = QuestionBank::builtin(bank.parse::<BankKind>()?)?;
            print_json(&serde_json::json!({
                "bank": bank.kind(),
                "version": bank.version(),
                "questions": bank.questions(),
            }))
        }
        Command::Score { bank, answers } => {
            let kind = bank.parse::<BankKind>()?;
            let answers: Vec<Answer> = read_json(&answers)?;
            if config.validation.strict {
                QuestionBank::builtin(kind)?.validate_answers(&answers, &config.validation)?;
            }
            let scored = ScoringEngine::builtin(kind)?.score(&answers);
            print_json(&scored)
        }
        Command::Evaluate { respondents } => {
            let respondents: Vec<Respondent> = read_json(&respondents)?;
            let evaluator = OrganizationEvaluator::builtin(&config)?;
            print_json(&evaluator.evaluate(&respondents))
        }
        Command::Match { candidate, target } => {
            let candidate: CandidateProfile = read_json(&candidate)?;
            let target: TargetProfile = read_json(&target)?;
            let matcher = Matcher::from_config(&config.eligibility);
            print_json(&matcher.match_pair(&candidate, &target))
        }
        Command::Seed { file } => {
            let store = Store::open(&args.data_dir, config)?;
            let seed = SeedData::from_path(&file)
                .with_context(|| format!("loading seed data from {}", file.display()))?;
            let summary = store.load_seed(&seed)?;
            let created = store.run_matching();
            store.save()?;
            print_json(&serde_json::json!({
                "organizations": summary.organizations,
                "roles": summary.roles,
                "candidates": summary.candidates,
                "matches_created": created,
            }))
        }
        Command::RunMatching => {
            let store = Store::open(&args.data_dir, config)?;
            let created = store.run_matching();
            store.save()?;
            print_json(&serde_json::json!({ "matches_created": created }))
        }
        Command::Drop { target, id } => {
            let store = Store::open(&args.data_dir, config)?;
            let target = target.parse::<DropTarget>()?;
            match target {
                DropTarget::Candidate => store.generate_candidate_drop(&id)?,
                DropTarget::Organization => store.generate_organization_drop(&id)?,
            };
            store.save()?;
            let view = store
                .current_drop(target, &id)
                .with_context(|| format!("drop for {} {} was not stored", target, id))?;
            print_json(&view)
        }
        Command::Act { match_id, side, action } => {
            let store = Store::open(&args.data_dir, config)?;
            let side = side.parse::<Side>()?;
            let action = action.parse::<MatchAction>()?;
            let record = store.record_action(match_id, side, action)?;
            store.save()?;
            print_json(&record)
        }
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let data = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&data).with_context(|| format!("parsing {}", path.display()))
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
