//! Pure conversion functions, grouped by resource, plus the dispatcher that
//! routes a request to one of them. Nothing here performs I/O.

pub mod base64_codec;
pub mod binary;
pub mod dispatch;
pub mod encoding;
pub mod format;
pub mod html;
pub mod text;

pub use dispatch::{execute, Request};
