use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{info, warn};
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::EnvFilter;

use s3scan_aws::{AwsProvider, S3Source};
use s3scan_core::{ConfigSource, ErrorPolicy, ScanOutcome, Scanner};
use s3scan_policy::ExclusionPolicy;
use s3scan_report::{write_report, DEFAULT_OUTPUT};

#[derive(Parser, Debug)]
#[command(author, version, about = "s3scan: snapshot the configuration of every S3 bucket in an account")]
struct Cli {
    /// Config file (YAML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Report path [default: bucket_info.json]
    #[arg(short, long)]
    output: Option<PathBuf>,

    #[arg(long)]
    region: Option<String>,

    #[arg(long)]
    profile: Option<String>,

    /// S3-compatible endpoint; switches to path-style addressing
    #[arg(long)]
    endpoint_url: Option<String>,

    /// Bucket to skip (repeatable, or comma-separated). Replaces EXCLUDED_BUCKETS.
    #[arg(long, value_delimiter = ',')]
    exclude: Vec<String>,

    /// Scan every bucket, ignoring all exclusion lists
    #[arg(long, default_value_t = false)]
    no_exclusions: bool,

    /// Abort on the first sub-resource read that fails
    #[arg(long, default_value_t = false)]
    fail_fast: bool,

    #[arg(long, value_enum, default_value_t = LogFormat::Json)]
    log_format: LogFormat,
}

#[derive(Copy, Clone, Eq, PartialEq, Debug, ValueEnum)]
enum LogFormat { Json, Text }

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct FileConfig {
    output: Option<PathBuf>,
    exclude: Option<Vec<String>>,
    apply_exclusions: Option<bool>,
    error_policy: Option<ErrorPolicy>,
    aws: AwsProvider,
}

/// Everything a run needs, after flags, config file and environment are merged.
#[derive(Debug)]
struct ScanOptions {
    output: PathBuf,
    exclusions: ExclusionPolicy,
    error_policy: ErrorPolicy,
    aws: AwsProvider,
}

impl ScanOptions {
    /// Flags beat the config file; the environment list is only consulted when
    /// neither names any exclusions.
    fn resolve(cli: &Cli, file: FileConfig, env: impl FnOnce() -> ExclusionPolicy) -> Self {
        let exclusions = if !cli.exclude.is_empty() {
            ExclusionPolicy::new(cli.exclude.iter().cloned())
        } else if let Some(names) = file.exclude {
            ExclusionPolicy::new(names)
        } else {
            env()
        };
        let enabled = !cli.no_exclusions && file.apply_exclusions.unwrap_or(true);

        let error_policy = if cli.fail_fast { ErrorPolicy::FailFast } else { file.error_policy.unwrap_or_default() };

        let flags = AwsProvider {
            region: cli.region.clone(),
            profile: cli.profile.clone(),
            endpoint_url: cli.endpoint_url.clone(),
        };

        ScanOptions {
            output: cli.output.clone().or(file.output).unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT)),
            exclusions: exclusions.with_enabled(enabled),
            error_policy,
            aws: file.aws.merge(flags),
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<FileConfig> {
    let Some(path) = path else { return Ok(FileConfig::default()) };
    let bytes = std::fs::read(path).with_context(|| format!("read config {}", path.display()))?;
    serde_yaml::from_slice(&bytes).with_context(|| format!("parse config {}", path.display()))
}

fn init_logging(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_span_events(FmtSpan::CLOSE);
    match format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Text => builder.init(),
    }
}

/// Scan `source` and write the report. Nothing is written when the scan
/// aborts.
async fn scan_to_file<S: ConfigSource + ?Sized>(source: &S, options: &ScanOptions) -> Result<ScanOutcome> {
    let outcome = Scanner::new(source, &options.exclusions, options.error_policy)
        .run()
        .await
        .context("bucket scan failed")?;
    write_report(&outcome.report, &options.output).context("write bucket information")?;
    Ok(outcome)
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(cli.log_format);

    let file = load_config(cli.config.as_deref())?;
    let options = ScanOptions::resolve(&cli, file, ExclusionPolicy::from_env);
    info!(
        output = %options.output.display(),
        exclusions = options.exclusions.excluded().count(),
        exclusions_enabled = options.exclusions.is_enabled(),
        error_policy = ?options.error_policy,
        "starting scan"
    );

    let client = options.aws.connect().await.context("configure AWS client")?;
    let outcome = scan_to_file(&S3Source::new(client), &options).await?;
    println!("Bucket information written to {}", options.output.display());

    if outcome.had_errors() {
        let unread: Vec<String> = outcome.failures.iter().map(ToString::to_string).collect();
        warn!(failures = unread.len(), unread = ?unread, "report is incomplete; some sub-resources could not be read");
        return Ok(ExitCode::from(2));
    }
    Ok(ExitCode::SUCCESS)
}
