use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// Opaque job identifier. Servers hand out either integers or strings; the
/// wire form is preserved so it round-trips into `job_id` fields unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum JobId {
    Int(i64),
    Text(String),
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobId::Int(n) => write!(f, "{}", n),
            JobId::Text(s) => f.write_str(s),
        }
    }
}

impl FromStr for JobId {
    type Err = Infallible;

    /// Numeric text becomes `Int`, anything else is kept verbatim.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Ok(match s.parse::<i64>() {
            Ok(n) => JobId::Int(n),
            Err(_) => JobId::Text(s.to_string()),
        })
    }
}

impl From<i64> for JobId {
    fn from(n: i64) -> Self {
        JobId::Int(n)
    }
}

impl From<i32> for JobId {
    fn from(n: i32) -> Self {
        JobId::Int(i64::from(n))
    }
}

impl From<&str> for JobId {
    fn from(s: &str) -> Self {
        JobId::Text(s.to_string())
    }
}

impl From<String> for JobId {
    fn from(s: String) -> Self {
        JobId::Text(s)
    }
}
