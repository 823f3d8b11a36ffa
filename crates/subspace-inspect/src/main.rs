//! Inspect subspace envelopes.
//!
//! ```text
//! subspace-inspect derive-id --name modelgraph --ops post=1,vote=3 --rules 'energy>1000'
//! subspace-inspect sample --name demo > events.jsonl
//! subspace-inspect inspect events.jsonl --business
//! ```

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use subspace::model::builder::{CreateEventBuilder, JoinEventBuilder, OpEventBuilder};
use subspace::validate::business;
use subspace::{
    parse_event_with, Envelope, OpRegistry, ParseOptions, SubspaceEvent, SubspaceId,
    DEFAULT_SUBSPACE_OPS, OP_INVITE, OP_POST, OP_PROPOSE, OP_VOTE,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// How many rejected envelopes `inspect` prints in detail.
const MAX_REJECTIONS_SHOWN: usize = 20;

#[derive(Parser, Debug)]
#[command(name = "subspace-inspect")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Log level or filter directive (overrides RUST_LOG)
    #[arg(short, long)]
    log_level: Option<String>,

    /// Emit logs as JSON
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the subspace ID for a name, ops-spec and rules
    DeriveId {
        #[arg(long)]
        name: String,
        #[arg(long, default_value = DEFAULT_SUBSPACE_OPS)]
        ops: String,
        #[arg(long, default_value = "")]
        rules: String,
    },
    /// Print a JSONL stream of sample envelopes for a new subspace
    Sample {
        #[arg(long)]
        name: String,
        #[arg(long, default_value = DEFAULT_SUBSPACE_OPS)]
        ops: String,
        #[arg(long, default_value = "")]
        rules: String,
        #[arg(long, default_value = "sample subspace")]
        desc: String,
        /// Author identity written into every envelope
        #[arg(long, default_value = "sample-author")]
        pubkey: String,
    },
    /// Parse a JSONL file of envelopes (`-` for stdin) and summarize it
    Inspect {
        input: PathBuf,
        /// Also validate the business operations (model, data, ...)
        #[arg(long)]
        business: bool,
    },
}

fn init_logging(level: Option<&str>, json: bool) -> Result<()> {
    let filter = match level {
        Some(directive) => EnvFilter::try_new(directive)
            .with_context(|| format!("invalid log filter {directive:?}"))?,
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr);
    let installed = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    installed.map_err(|e| anyhow::anyhow!("failed to install log subscriber: {e}"))
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.log_level.as_deref(), args.json_logs)?;

    match args.command {
        Command::DeriveId { name, ops, rules } => {
            println!("{}", SubspaceId::derive(&name, &ops, &rules));
        }
        Command::Sample {
            name,
            ops,
            rules,
            desc,
            pubkey,
        } => sample(&name, &ops, &rules, &desc, &pubkey)?,
        Command::Inspect { input, business } => inspect(&input, business)?,
    }
    Ok(())
}

fn sample(name: &str, ops: &str, rules: &str, desc: &str, pubkey: &str) -> Result<()> {
    let create = CreateEventBuilder::new(name)
        .ops(ops)
        .rules(rules)
        .description(desc)
        .pubkey(pubkey)
        .build();
    let sid = create.subspace_id.clone();

    let events: Vec<SubspaceEvent> = vec![
        create.into(),
        JoinEventBuilder::new(&sid).pubkey(pubkey).build().into(),
        OpEventBuilder::new(&sid, OP_POST)
            .pubkey(pubkey)
            .content_type("markdown")
            .content("# Hello subspace")
            .build()
            .into(),
        OpEventBuilder::new(&sid, OP_PROPOSE)
            .pubkey(pubkey)
            .proposal("prop_001", rules)
            .content("Adopt the rules")
            .build()
            .into(),
        OpEventBuilder::new(&sid, OP_VOTE)
            .pubkey(pubkey)
            .vote("prop_001", "yes")
            .build()
            .into(),
        OpEventBuilder::new(&sid, OP_INVITE)
            .pubkey(pubkey)
            .invite("invitee-pubkey", rules)
            .build()
            .into(),
    ];

    let stdout = io::stdout();
    let mut out = stdout.lock();
    for event in events {
        let mut envelope = event.into_envelope();
        envelope.assign_id();
        writeln!(out, "{}", envelope.to_json())?;
    }
    info!(subspace = %sid, "wrote sample envelopes");
    Ok(())
}

#[derive(Debug, Default)]
struct Summary {
    lines: usize,
    unreadable: usize,
    by_kind: BTreeMap<&'static str, usize>,
    by_operation: BTreeMap<String, usize>,
    by_error: BTreeMap<&'static str, usize>,
    rejections: Vec<(usize, String)>,
}

fn inspect(input: &Path, with_business: bool) -> Result<()> {
    let reader: Box<dyn BufRead> = if input.as_os_str() == "-" {
        Box::new(BufReader::new(io::stdin()))
    } else {
        let file = File::open(input).with_context(|| format!("opening {}", input.display()))?;
        Box::new(BufReader::new(file))
    };

    let registry = if with_business {
        business::business_registry()
    } else {
        OpRegistry::basic()
    };
    let options = ParseOptions::with_registry(&registry);

    let mut summary = Summary::default();
    for (index, line) in reader.lines().enumerate() {
        let line_no = index + 1;
        let line = line.with_context(|| format!("reading line {line_no}"))?;
        if line.trim().is_empty() {
            continue;
        }
        summary.lines += 1;

        let envelope = match Envelope::from_json(&line) {
            Ok(envelope) => envelope,
            Err(err) => {
                warn!(line = line_no, error = %err, "unreadable envelope");
                summary.unreadable += 1;
                continue;
            }
        };

        match parse_event_with(&envelope, &options) {
            Ok(event) => {
                *summary.by_kind.entry(event.kind().name()).or_default() += 1;
                if let SubspaceEvent::Op(op) = &event {
                    *summary.by_operation.entry(op.operation.clone()).or_default() += 1;
                }
            }
            Err(err) => {
                *summary.by_error.entry(err.code().code()).or_default() += 1;
                if summary.rejections.len() < MAX_REJECTIONS_SHOWN {
                    summary.rejections.push((line_no, err.to_string()));
                }
            }
        }
    }

    print_summary(&summary);
    Ok(())
}

fn print_summary(summary: &Summary) {
    println!("=== Envelopes ({}) ===", summary.lines);
    println!("  unreadable: {}", summary.unreadable);
    for (kind, count) in &summary.by_kind {
        println!("  {kind}: {count}");
    }

    if !summary.by_operation.is_empty() {
        println!("\n=== Operations ===");
        for (op, count) in &summary.by_operation {
            println!("  {op}: {count}");
        }
    }

    if !summary.by_error.is_empty() {
        println!("\n=== Rejected ===");
        for (code, count) in &summary.by_error {
            println!("  {code}: {count}");
        }
        println!();
        for (line, err) in &summary.rejections {
            println!("  line {line}: {err}");
        }
    }
}
