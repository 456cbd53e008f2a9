//! Binary entry point for `ticket-triage`.
//!
//! Triages a single ticket given on the command line and prints the final
//! state as JSON.

use clap::Parser;
use opentelemetry::trace::TracerProvider;
use opentelemetry_otlp::{Protocol, WithExportConfig};
use ticket_triage::{
    base::{config::Config, types::Void},
    triage::{TriageOutcome, TriageState},
};
use tracing_subscriber::{Layer, fmt::format::FmtSpan, layer::SubscriberExt, util::SubscriberInitExt};

/// Ticket-triage – classify a support ticket and draft a reply.
///
/// Configuration can come from `config.toml` or `TICKET_TRIAGE_*` environment
/// variables.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// The ticket text.
    ticket: String,
    /// Order id, if known; otherwise it is extracted from the ticket text.
    #[arg(short, long)]
    order_id: Option<String>,
    /// Override the config file path (optional).
    ///
    /// By default, the config is read from `.hidden/config.toml` in the
    /// current directory, if present.
    #[arg(short, long)]
    config: Option<std::path::PathBuf>,
    /// Export spans over OTLP (HTTP).
    #[arg(long)]
    otlp: bool,
    /// Increase log verbosity (-v, -vv, etc.).
    ///
    /// - No flag: INFO level
    /// - -v: DEBUG level
    /// - -vv or more: TRACE level
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> Void {
    let args = Args::parse();

    // Construct the level filter.

    let level = match args.verbose {
        0 => tracing::Level::INFO,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    let level_filter = tracing_subscriber::filter::LevelFilter::from_level(level);

    // Prepare the log layer; logs go to stderr so stdout stays JSON.

    let stderr = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .without_time()
        .with_ansi(true)
        .with_level(true)
        .with_file(false)
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_span_events(FmtSpan::CLOSE);

    // Prepare the optional otlp layer.

    let otel = if args.otlp {
        let exporter = opentelemetry_otlp::SpanExporter::builder().with_http().with_protocol(Protocol::HttpBinary).build()?;
        let tracer = opentelemetry_sdk::trace::SdkTracerProvider::builder().with_simple_exporter(exporter).build().tracer("ticket-triage");
        Some(tracing_opentelemetry::layer().with_tracer(tracer).boxed())
    } else {
        None
    };

    tracing_subscriber::registry().with(otel).with(level_filter).with(stderr).init();

    let config = Config::load(args.config.as_deref())?;

    let thread_id = format!("ticket-{}", chrono::Utc::now().timestamp_millis());
    let mut state = TriageState::new(args.ticket);
    if let Some(order_id) = args.order_id {
        state = state.with_order_id(order_id);
    }

    let outcome = ticket_triage::start(config, &thread_id, state).await?;

    println!("{}", serde_json::to_string_pretty(outcome.state())?);

    match outcome {
        TriageOutcome::Drafted(_) => Ok(()),
        TriageOutcome::Unidentified(_) => {
            tracing::warn!("No order id found in the ticket; nothing to triage.");
            Ok(())
        }
        TriageOutcome::Failed { stage, error, .. } => Err(anyhow::anyhow!("Triage failed at `{stage}`: {error}")),
    }
}
