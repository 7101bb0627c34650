#![deny(warnings, clippy::all)]

use std::fs;
use std::path::PathBuf;

use lttng_relay_core::lifecycle::{
    CTFTrace, ChunkHandle, RelaySession, RelayStream, Registry, StreamId,
};
use lttng_relay_core::model::{
    Abi, ClockClass, EnvironmentValue, Field, FieldType, IntegerRole, IntegerType, StreamClass,
    StructureType, TraceClass,
};
use lttng_relay_core::reclaim::StrongRef;
use lttng_relay_core::tsdl::{emit_tsdl_document, StringSink};
use structopt::{clap, StructOpt};
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

/// lttng-relay-core demo
///
/// Builds a small sample trace class, opens a session/trace/stream against
/// it, and emits the resulting TSDL metadata document to stdout or a file.
#[derive(Debug, StructOpt)]
#[structopt(name = "lttng-relay-core-demo", verbatim_doc_comment)]
#[structopt(help_message = "Prints help information. Use --help for more details.")]
#[structopt(setting = clap::AppSettings::ColoredHelp)]
struct Opts {
    /// LTTng relayd session name
    #[structopt(short = "s", long, default_value = "demo-session")]
    session_name: String,

    /// Relay hostname. The system hostname is used if not provided.
    #[structopt(short = "H", long)]
    hostname: Option<String>,

    /// Write the generated TSDL metadata to this file instead of stdout
    #[structopt(short = "o", long, name = "metadata-file")]
    output: Option<PathBuf>,
}

#[derive(Debug, Error)]
enum HostnameError {
    #[error("the hostname '{0:?}' contains invalid data")]
    InvalidHostname(std::ffi::OsString),
    #[error("encountered an IO error while retrieving the hostname")]
    Io(#[from] std::io::Error),
}

impl Opts {
    fn hostname(&self) -> Result<String, HostnameError> {
        if let Some(n) = &self.hostname {
            Ok(n.clone())
        } else {
            let n = hostname::get()?;
            Ok(n.into_string().map_err(HostnameError::InvalidHostname)?)
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    match do_main() {
        Ok(()) => Ok(()),
        Err(e) => {
            tracing::error!("{}", e);
            Err(e)
        }
    }
}

fn do_main() -> Result<(), Box<dyn std::error::Error>> {
    let opts = Opts::from_args();
    try_init_tracing_subscriber()?;

    let hostname = opts.hostname()?;
    let registry = Registry::new();
    let trace_class = sample_trace_class()?;

    let session = StrongRef::new(RelaySession::new(opts.session_name.as_str(), &hostname, 100_000));
    session.set_current_trace_chunk(Some(ChunkHandle::new("chunk-0")));

    let trace = CTFTrace::get_by_path_or_create(&session, "ust/uid/1000/64-bit", &registry)?;
    info!(trace_id = ?trace.id, "opened trace");

    let stream = StrongRef::new(RelayStream::new(StreamId(0), trace.clone()));
    trace.attach_stream(&stream);
    stream.publish();
    stream.mark_ready();

    let mut sink = StringSink::new();
    emit_tsdl_document(&trace_class, &mut sink)?;
    let metadata = sink.into_inner();

    match opts.output {
        Some(path) => fs::write(path, metadata)?,
        None => print!("{}", metadata),
    }

    Ok(())
}

fn sample_trace_class() -> Result<TraceClass, Box<dyn std::error::Error>> {
    let clock = ClockClass::new("monotonic", 1_000_000_000).with_description("monotonic clock");

    let event_header = FieldType::Structure(StructureType::new(vec![
        Field::new(
            "id",
            FieldType::Integer(IntegerType::new(32, 32, false)),
        ),
        Field::new(
            "timestamp",
            FieldType::Integer(
                IntegerType::new(64, 8, false).with_role(IntegerRole::DefaultClockTimestamp),
            ),
        ),
    ])?);

    let stream_class = StreamClass::new(
        0,
        Some("monotonic".to_string()),
        Some(event_header),
        None,
        None,
        Vec::new(),
    )?;

    Ok(TraceClass::new(
        Abi::lp64_le(),
        Uuid::new_v4(),
        vec![
            ("tracer_name".to_string(), EnvironmentValue::from("lttng-ust")),
            ("domain".to_string(), EnvironmentValue::from("ust")),
        ],
        None,
        vec![clock],
        vec![stream_class],
    )?)
}

fn try_init_tracing_subscriber() -> Result<(), Box<dyn std::error::Error>> {
    let builder = tracing_subscriber::fmt::Subscriber::builder();
    let env_filter = std::env::var(tracing_subscriber::EnvFilter::DEFAULT_ENV)
        .map(tracing_subscriber::EnvFilter::new)
        .unwrap_or_else(|_| {
            tracing_subscriber::EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                tracing::Level::WARN
            ))
        });
    let builder = builder.with_env_filter(env_filter);
    let subscriber = builder.finish();
    use tracing_subscriber::util::SubscriberInitExt;
    subscriber.try_init()?;
    Ok(())
}
