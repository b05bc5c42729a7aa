pub mod input;
pub mod output;

pub use input::{read_assessments, read_history, write_history};
pub use output::{create_writer, OutputFormat, OutputWriter};
