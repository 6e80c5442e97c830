use anyhow::Context;
use clap::Parser;
use data_converter::config::{Command, ConvertArgs};
use data_converter::utils::error::{ConvertError, ErrorCategory};
use data_converter::utils::{logger, validation::Validate};
use data_converter::{CliConfig, ConversionJob, JobConfig, JobReport, LocalStorage};
use std::path::Path;

fn main() {
    let config = CliConfig::parse();

    if config.json_logs {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(config.verbose);
    }
    tracing::debug!("CLI config: {:?}", config);

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        fail(&e.into());
    }

    if config.monitor {
        tracing::info!("🔍 System monitoring enabled");
    }

    let result = match &config.command {
        Command::Convert(args) => run_convert(args, config.monitor),
        Command::Run { config: path } => run_job_file(path, config.monitor),
    };

    match result {
        Ok(report) => tracing::info!(
            "✅ {}.{} wrote {} bytes to {}",
            report.resource,
            report.operation,
            report.bytes_written,
            report.output_path
        ),
        Err(e) => {
            tracing::error!("❌ Conversion failed: {:#}", e);
            fail(&e);
        }
    }
}

fn run_convert(args: &ConvertArgs, monitor: bool) -> anyhow::Result<JobReport> {
    let report =
        ConversionJob::new_with_monitoring(LocalStorage::default(), args.clone(), monitor).run()?;
    Ok(report)
}

fn run_job_file(path: &Path, monitor: bool) -> anyhow::Result<JobReport> {
    let job = JobConfig::from_file(path)
        .with_context(|| format!("loading job file {}", path.display()))?;
    job.validate()
        .with_context(|| format!("validating job '{}'", job.job.name))?;
    tracing::info!("Loaded job '{}' from {}", job.job.name, path.display());

    let storage = LocalStorage::new(job.base_dir().unwrap_or_else(|| Path::new(".")));
    let monitor = monitor || job.monitoring_enabled();
    let report = ConversionJob::new_with_monitoring(storage, job, monitor).run()?;
    Ok(report)
}

/// Exit code by category: 1 bad request, 2 bad input, 3 system failure.
fn fail(error: &anyhow::Error) -> ! {
    match error.downcast_ref::<ConvertError>() {
        Some(e) => {
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

            let exit_code = match e.category() {
                ErrorCategory::Request => 1,
                ErrorCategory::Input => 2,
                ErrorCategory::System => 3,
            };
            std::process::exit(exit_code);
        }
        None => {
            eprintln!("❌ {:#}", error);
            std::process::exit(3);
        }
    }
}
