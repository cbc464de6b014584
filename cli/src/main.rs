use std::io::IsTerminal;
use std::io::Read;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use banter_attachments::AttachmentCache;
use banter_attachments::DirStore;
use banter_content::ContentElement;
use banter_content::MessageParser;
use banter_content::extract_attachment_ids;
use banter_stream::RenderSink;
use banter_stream::StreamConfig;
use banter_stream::StreamSession;
use banter_stream::drive;
use clap::Args;
use clap::Parser;
use clap::Subcommand;
use tokio_stream::StreamExt;
use tracing_subscriber::EnvFilter;

/// Debug tool for the chat-content pipeline: parse message bodies the way
/// the client renders them, or replay one as a simulated stream.
#[derive(Debug, Parser)]
#[command(version)]
struct Cli {
    /// Streaming config file (TOML); defaults apply when absent.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Parse a message body once and print the elements.
    Parse(ParseArgs),
    /// Feed a body through the streaming session in fixed-size chunks.
    Replay(ReplayArgs),
}

#[derive(Debug, Args)]
struct ParseArgs {
    /// Directory of attachment files named `<uuid>.<ext>`.
    #[arg(long, value_name = "DIR")]
    attachments: Option<PathBuf>,

    /// Print elements as pretty JSON instead of the one-line summary.
    #[arg(long, default_value_t = false)]
    json: bool,

    /// Input file; `-` or nothing reads stdin.
    input: Option<PathBuf>,
}

#[derive(Debug, Args)]
struct ReplayArgs {
    /// Directory of attachment files named `<uuid>.<ext>`.
    #[arg(long, value_name = "DIR")]
    attachments: Option<PathBuf>,

    /// Characters per simulated chunk.
    #[arg(long, default_value_t = 32)]
    chunk_size: usize,

    /// Milliseconds between chunks.
    #[arg(long, default_value_t = 20)]
    interval_ms: u64,

    /// Input file; `-` or nothing reads stdin.
    input: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging();

    let config = match &cli.config {
        Some(path) => StreamConfig::load(path)?,
        None => StreamConfig::default(),
    };

    match cli.command {
        Command::Parse(args) => run_parse(&config, args),
        Command::Replay(args) => run_replay(config, args).await,
    }
}

fn init_logging() {
    let default_level = "error";
    // Fall back to `default_level` when RUST_LOG is unset or invalid.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .or_else(|_| EnvFilter::try_new(default_level))
                .unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .try_init();
}

fn run_parse(config: &StreamConfig, args: ParseArgs) -> anyhow::Result<()> {
    let body = read_input(args.input.as_deref())?;
    let cache = AttachmentCache::new(config.cache_capacity);
    if let Some(dir) = &args.attachments {
        let store = DirStore::new(dir);
        let ids = extract_attachment_ids(&body);
        cache.prefetch(&ids, &store);
    }
    let elements = MessageParser::with_attachments(&cache).parse(&body);
    print_elements(&elements, args.json)
}

async fn run_replay(config: StreamConfig, args: ReplayArgs) -> anyhow::Result<()> {
    let body = read_input(args.input.as_deref())?;
    let session = match &args.attachments {
        Some(dir) => StreamSession::with_store(config, Arc::new(DirStore::new(dir))),
        None => StreamSession::new(config),
    };

    let deltas = chunk_by_chars(&body, args.chunk_size);
    let chunks = tokio_stream::iter(deltas).throttle(Duration::from_millis(args.interval_ms));
    tokio::pin!(chunks);

    drive(chunks, session, &StdoutSink).await;
    Ok(())
}

struct StdoutSink;

impl RenderSink for StdoutSink {
    fn replace(&self, elements: Vec<ContentElement>) {
        let summary: Vec<String> = elements.iter().map(describe).collect();
        println!("interim ({} elements): {}", elements.len(), summary.join(", "));
    }

    fn complete(&self, elements: Vec<ContentElement>) {
        println!("final:");
        for element in &elements {
            println!("  {}", describe(element));
        }
    }
}

fn read_input(path: Option<&Path>) -> anyhow::Result<String> {
    let force_stdin = matches!(path, Some(p) if p == Path::new("-"));
    match path {
        Some(p) if !force_stdin => {
            std::fs::read_to_string(p).with_context(|| format!("failed to read {}", p.display()))
        }
        _ => {
            if std::io::stdin().is_terminal() && !force_stdin {
                anyhow::bail!("no input file given and stdin is a terminal; pass a file or pipe a body");
            }
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("failed to read stdin")?;
            Ok(buffer)
        }
    }
}

fn print_elements(elements: &[ContentElement], json: bool) -> anyhow::Result<()> {
    if json {
        let rendered = serde_json::to_string_pretty(elements)?;
        println!("{rendered}");
    } else {
        for element in elements {
            println!("{}", describe(element));
        }
    }
    Ok(())
}

fn describe(element: &ContentElement) -> String {
    match element {
        ContentElement::Text { content } => format!("text: {} chars", content.chars().count()),
        ContentElement::Thinking { content, .. } => {
            format!("thinking: {} chars", content.chars().count())
        }
        ContentElement::Table { header, rows } => {
            format!("table: {} cols x {} rows", header.len(), rows.len())
        }
        ContentElement::Code { code, language, .. } => {
            let lines = code.lines().count();
            if language.is_empty() {
                format!("code: {lines} lines")
            } else {
                format!("code [{language}]: {lines} lines")
            }
        }
        ContentElement::Formula { latex } => format!("formula: {} chars", latex.chars().count()),
        ContentElement::Image { id } => format!("image: {id}"),
    }
}

fn chunk_by_chars(body: &str, size: usize) -> Vec<String> {
    let size = size.max(1);
    let chars: Vec<char> = body.chars().collect();
    chars.chunks(size).map(|c| c.iter().collect()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn chunking_respects_char_boundaries() {
        let chunks = chunk_by_chars("日本語だよ", 2);
        assert_eq!(chunks, vec!["日本".to_string(), "語だ".to_string(), "よ".to_string()]);
        assert_eq!(chunk_by_chars("", 4), Vec::<String>::new());
        assert_eq!(chunk_by_chars("ab", 0), vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn descriptions_are_stable() {
        let element = ContentElement::Code {
            code: "a\nb".to_string(),
            language: "sh".to_string(),
            indent: 0,
        };
        assert_eq!(describe(&element), "code [sh]: 2 lines");
        let plain = ContentElement::Code {
            code: "a".to_string(),
            language: String::new(),
            indent: 0,
        };
        assert_eq!(describe(&plain), "code: 1 lines");
    }
}
