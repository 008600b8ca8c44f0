pub mod batch;
pub mod cli;
pub mod config;
pub mod error;
pub mod loader;
pub mod ocr;
pub mod pipeline;
pub mod render;
pub mod session;
pub mod upload;
