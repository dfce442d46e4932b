pub mod pipeline;

pub use pipeline::{detect_format, Format, ImportEngine, ImportSummary, Parsed, PipelineError};
