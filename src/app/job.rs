use crate::adapters::storage::STDIO_PATH;
use crate::domain::model::{Output, Payload};
use crate::domain::ports::{JobProvider, Storage};
use crate::engine::dispatch::{execute, Request};
use crate::utils::error::Result;
use crate::utils::monitor::ResourceMonitor;
use tracing::{debug, info};

/// What a finished job wrote, and where.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobReport {
    pub resource: &'static str,
    pub operation: &'static str,
    pub output_path: String,
    pub bytes_written: usize,
}

/// Read the input, run one conversion, write the result.
pub struct ConversionJob<S: Storage, P: JobProvider> {
    storage: S,
    provider: P,
    monitoring: bool,
}

impl<S: Storage, P: JobProvider> ConversionJob<S, P> {
    pub fn new(storage: S, provider: P) -> Self {
        Self::new_with_monitoring(storage, provider, false)
    }

    pub fn new_with_monitoring(storage: S, provider: P, monitoring: bool) -> Self {
        Self {
            storage,
            provider,
            monitoring,
        }
    }

    /// Run the conversion without writing anything.
    pub fn convert(&self) -> Result<Output> {
        let request = self.provider.request()?;
        let mut monitor = ResourceMonitor::new(self.monitoring);
        self.convert_with(&request, &mut monitor)
    }

    fn convert_with(&self, request: &Request, monitor: &mut ResourceMonitor) -> Result<Output> {
        info!("Starting {}.{}", request.resource(), request.operation());
        monitor.log_stats("Start");

        let payload = self.provider.input_source().load(&self.storage)?;
        debug!("Read {} bytes of input", payload_len(&payload));
        monitor.log_stats("Read");

        let output = execute(request, payload)?;
        monitor.log_stats("Convert");
        Ok(output)
    }

    pub fn run(&self) -> Result<JobReport> {
        let request = self.provider.request()?;
        let mut monitor = ResourceMonitor::new(self.monitoring);
        let output = self.convert_with(&request, &mut monitor)?;

        let output_path = self.provider.output_path().unwrap_or(STDIO_PATH).to_string();
        let is_bytes = matches!(output, Output::Bytes(_));
        let mut data = output.into_bytes()?;
        if output_path == STDIO_PATH && !is_bytes && !data.ends_with(b"\n") {
            data.push(b'\n');
        }

        self.storage.write_file(&output_path, &data)?;
        info!("Wrote {} bytes to {}", data.len(), output_path);
        monitor.log_stats("Write");
        monitor.log_final_stats();

        Ok(JobReport {
            resource: request.resource(),
            operation: request.operation(),
            output_path,
            bytes_written: data.len(),
        })
    }
}

fn payload_len(payload: &Payload) -> usize {
    match payload {
        Payload::Text(text) => text.len(),
        Payload::Bytes(bytes) => bytes.len(),
        Payload::Structured(_) => 0,
    }
}
