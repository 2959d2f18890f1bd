mod terminal;

use std::fmt;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use services::{
    ChatCompletionsGenerator, Clock, FallbackExtractor, McqPrompt, PlainTextExtractor,
    QuizBuildError, QuizBuilderService, QuizLoopService, ResponseFormat, TextExtractor,
};

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    MissingPath,
    UnknownArg(String),
    InvalidNumber { flag: &'static str, raw: String },
    InvalidFormat { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::MissingPath => write!(f, "missing document path"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidNumber { flag, raw } => write!(f, "invalid {flag} value: {raw}"),
            ArgsError::InvalidFormat { raw } => {
                write!(f, "invalid --format value: {raw} (expected json or lines)")
            }
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn require_number(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<usize, ArgsError> {
    let raw = require_value(args, flag)?;
    raw.trim()
        .parse()
        .map_err(|_| ArgsError::InvalidNumber { flag, raw })
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  app [options] <document>");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --text             treat the document as a plain text file instead of a PDF");
    eprintln!("  --questions <n>    number of questions to request (default 5, max 50)");
    eprintln!("  --options <n>      options per question (default 4, 2-8)");
    eprintln!("  --format <f>       response format requested from the model: json | lines");
    eprintln!("  --shuffle          shuffle question order");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  MCQ_AI_API_KEY (required), MCQ_AI_BASE_URL, MCQ_AI_MODEL, MCQ_AI_TIMEOUT_SECS");
    eprintln!("  MCQ_OCR_LANG, MCQ_OCR_DPI, RUST_LOG");
}

#[derive(Debug, PartialEq, Eq)]
struct Args {
    path: PathBuf,
    plain_text: bool,
    shuffle: bool,
    prompt: McqPrompt,
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Option<Self>, ArgsError> {
        let mut path = None;
        let mut plain_text = false;
        let mut shuffle = false;
        let mut prompt = McqPrompt::default();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--text" => plain_text = true,
                "--shuffle" => shuffle = true,
                "--questions" => {
                    prompt = prompt.with_question_count(require_number(args, "--questions")?);
                }
                "--options" => {
                    prompt = prompt.with_option_count(require_number(args, "--options")?);
                }
                "--format" => {
                    let raw = require_value(args, "--format")?;
                    let format =
                        ResponseFormat::from_arg(&raw).ok_or(ArgsError::InvalidFormat { raw })?;
                    prompt = prompt.with_format(format);
                }
                "--help" | "-h" => return Ok(None),
                _ if arg.starts_with("--") => return Err(ArgsError::UnknownArg(arg)),
                _ if path.is_none() => path = Some(PathBuf::from(arg)),
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        let path = path.ok_or(ArgsError::MissingPath)?;
        Ok(Some(Self {
            path,
            plain_text,
            shuffle,
            prompt,
        }))
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv = std::env::args().skip(1);
    let parsed = match Args::parse(&mut argv) {
        Ok(Some(parsed)) => parsed,
        Ok(None) => {
            print_usage();
            return Ok(());
        }
        Err(e) => {
            eprintln!("{e}");
            print_usage();
            return Err(e.into());
        }
    };

    let extractor: Arc<dyn TextExtractor> = if parsed.plain_text {
        Arc::new(PlainTextExtractor)
    } else {
        Arc::new(FallbackExtractor::pdf_with_ocr())
    };
    let generator = ChatCompletionsGenerator::from_env();
    if !generator.enabled() {
        log::warn!("MCQ_AI_API_KEY is not set; question generation will fail");
    }

    let clock = Clock::system();
    let builder = QuizBuilderService::new(clock, extractor, Arc::new(generator))
        .with_prompt(parsed.prompt)
        .with_shuffle(parsed.shuffle);

    let text = {
        let builder = builder.clone();
        let path = parsed.path.clone();
        tokio::task::spawn_blocking(move || builder.extract_text(&path)).await?
    };

    let mut session = match text {
        Ok(text) => builder.start_from_text(&text).await,
        Err(err) => Err(err),
    }
    .map_err(|err: QuizBuildError| {
        log::error!("{err}");
        err.user_message()
    })?;

    println!("Loaded {} questions from {}", session.questions().len(), parsed.path.display());
    let quiz_loop = QuizLoopService::new(clock);
    let stdin = io::stdin();
    terminal::play(&mut session, &quiz_loop, stdin.lock(), io::stdout())?;
    Ok(())
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
