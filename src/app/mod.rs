// Application layer: runs one conversion job against the domain ports.

pub mod job;

pub use job::{ConversionJob, JobReport};
