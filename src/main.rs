use clap::Parser;
use owo_colors::OwoColorize;
use sbom_generator::adapters::outbound::console::StderrProgressReporter;
use sbom_generator::adapters::outbound::filesystem::AtomicFileWriter;
use sbom_generator::adapters::outbound::network::InventoryClient;
use sbom_generator::application::dto::SbomRequest;
use sbom_generator::application::pipeline::{PipelineError, PipelineStage};
use sbom_generator::application::use_cases::GenerateSbomUseCase;
use sbom_generator::cli::Args;
use sbom_generator::config::{load_extra_config, ExtraConfig};
use sbom_generator::ports::outbound::ProgressReporter;
use sbom_generator::shared::error::ExitCode;
use sbom_generator::shared::security::redact_secrets;
use sbom_generator::shared::telemetry;
use std::process;

/// How a run ended when it did not succeed
enum RunFailure {
    Failed(PipelineError),
    Interrupted,
}

impl RunFailure {
    fn exit_code(&self) -> ExitCode {
        match self {
            RunFailure::Failed(err) => err.exit_code(),
            RunFailure::Interrupted => ExitCode::Interrupted,
        }
    }
}

impl From<PipelineError> for RunFailure {
    fn from(err: PipelineError) -> Self {
        RunFailure::Failed(err)
    }
}

fn main() {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            // --help and --version are not errors
            let code = if e.use_stderr() {
                ExitCode::InvalidArguments
            } else {
                ExitCode::Success
            };
            let _ = e.print();
            process::exit(code.as_i32());
        }
    };

    telemetry::init_tracing(args.verbose);

    let code = match run(&args) {
        Ok(()) => ExitCode::Success,
        Err(failure) => {
            report_failure(&failure, &args.secrets());
            failure.exit_code()
        }
    };
    process::exit(code.as_i32());
}

fn run(args: &Args) -> std::result::Result<(), RunFailure> {
    let init_error = |e: anyhow::Error| PipelineError::new(PipelineStage::Init, e);

    // Argument validation happens before any network traffic
    let credentials = args.credentials().map_err(|e| init_error(e.into()))?;
    let format = args.output_format().map_err(|e| init_error(e.into()))?;
    let scopes = args.scope_tokens().map_err(|e| init_error(e.into()))?;

    let progress_reporter = StderrProgressReporter::new();
    let extra = match &args.extra {
        Some(path) => {
            let (config, warnings) = load_extra_config(path).map_err(init_error)?;
            for warning in &warnings {
                progress_reporter.report_warning(warning);
            }
            config
        }
        None => ExtraConfig::default(),
    };

    let client_config = args.client_config(&extra);
    tracing::debug!(
        endpoint = %client_config.base_url,
        timeout_secs = client_config.timeout.as_secs(),
        max_retries = client_config.max_retries,
        "inventory client configured"
    );
    let inventory_client = InventoryClient::new(credentials, client_config).map_err(init_error)?;
    let output_writer = AtomicFileWriter::new(args.output_dir.clone());

    let use_case = GenerateSbomUseCase::new(inventory_client, output_writer, progress_reporter);
    let request = SbomRequest::new(scopes, format)
        .with_all_projects(args.all_projects)
        .with_settings(extra.metadata_settings())
        .with_source_date_epoch(std::env::var("SOURCE_DATE_EPOCH").ok());

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| init_error(anyhow::anyhow!("Failed to start async runtime: {}", e)))?;

    runtime.block_on(async {
        tokio::select! {
            result = use_case.execute(request) => result.map(|_| ()).map_err(RunFailure::from),
            () = interrupted() => Err(RunFailure::Interrupted),
        }
    })
}

/// Resolves on Ctrl-C. Never resolves if the handler cannot be installed.
async fn interrupted() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "could not listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
}

/// Prints the failure to stderr with every secret scrubbed
fn report_failure(failure: &RunFailure, secrets: &[&str]) {
    match failure {
        RunFailure::Interrupted => {
            eprintln!("\n{}", "⚠️  Interrupted: no further documents were written.".yellow());
        }
        RunFailure::Failed(err) => {
            eprintln!(
                "\n{} {}\n",
                "❌ An error occurred".red().bold(),
                format!("({} stage, {})", err.stage, err.kind()).dimmed()
            );
            eprintln!("{}", redact_secrets(&err.source.to_string(), secrets));

            for cause in err.source.chain().skip(1) {
                eprintln!(
                    "\nCaused by: {}",
                    redact_secrets(&cause.to_string(), secrets)
                );
            }
            eprintln!();
        }
    }
}
