mod tesseract;
mod types;

pub use tesseract::{probe_version, TesseractCli};
pub use types::{ExtractionError, ImageSummary, TextExtractor};
