use crate::domain::model::Payload;
use crate::engine::dispatch::Request;
use crate::utils::error::Result;

/// Byte storage used by the job runner. The path `-` means stdin/stdout.
pub trait Storage {
    fn read_file(&self, path: &str) -> Result<Vec<u8>>;
    fn write_file(&self, path: &str, data: &[u8]) -> Result<()>;
}

/// Where the job's input comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    Inline(String),
    File(String),
}

/// Something that can describe one conversion job: the CLI flags or a TOML job file.
pub trait JobProvider {
    fn request(&self) -> Result<Request>;
    fn input_source(&self) -> InputSource;
    fn output_path(&self) -> Option<&str>;
}

impl InputSource {
    pub fn load<S: Storage>(&self, storage: &S) -> Result<Payload> {
        match self {
            Self::Inline(text) => Ok(Payload::Text(text.clone())),
            Self::File(path) => Ok(Payload::Bytes(storage.read_file(path)?)),
        }
    }
}
