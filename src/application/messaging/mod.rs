//! Message handling - Parsing, formatting and delivery of conversation text

pub mod dispatcher;
pub mod formatter;
pub mod paginator;
pub mod parser;

pub use dispatcher::MessageDispatcher;
pub use formatter::format_report;
pub use paginator::paginate;
pub use parser::{extract_inns, InnSelection, MessageParser};
