mod decode;
pub mod errors;
pub mod formats;
pub mod model;
mod registry;

pub use decode::decode_content;
pub use errors::{AttemptOutcome, ParserAttempt, ParserError};
pub use model::{Cell, Row, Table};
pub use registry::{parse_table_bytes, parse_table_file, parse_with_parsers, TableParser};
