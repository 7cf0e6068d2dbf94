//! Replies printed for each command, in a redis-cli-like text form

use std::fmt;

/// Reply to a single command
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    /// Status line: OK
    Status(String),
    /// Error line: ERR message
    Error(String),
    /// Integer: (integer) 5
    Integer(usize),
    /// Single value, `None` on a miss: "value" / (nil)
    Bulk(Option<String>),
    /// Ordered values: 1) "a"
    Array(Vec<String>),
}

impl Reply {
    /// Shorthand for the `OK` status
    pub fn ok() -> Self {
        Reply::Status("OK".to_string())
    }

    /// Whether this reply reports a failed command
    pub fn is_error(&self) -> bool {
        matches!(self, Reply::Error(_))
    }
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reply::Status(s) => write!(f, "{}", s),
            Reply::Error(e) => write!(f, "ERR {}", e),
            Reply::Integer(i) => write!(f, "(integer) {}", i),
            Reply::Bulk(None) => write!(f, "(nil)"),
            Reply::Bulk(Some(data)) => write!(f, "{:?}", data),
            Reply::Array(items) if items.is_empty() => write!(f, "(empty array)"),
            Reply::Array(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        writeln!(f)?;
                    }
                    write!(f, "{}) {:?}", i + 1, item)?;
                }
                Ok(())
            }
        }
    }
}
