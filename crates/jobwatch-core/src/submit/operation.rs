use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Server operations that may run as background jobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    ImportCsv,
    DetectTransfers,
    DetectRecurring,
    Recategorize,
}

impl Operation {
    /// Endpoint path relative to the server base URL.
    pub fn path(self) -> &'static str {
        match self {
            Operation::ImportCsv => "import/csv",
            Operation::DetectTransfers => "transfers/detect",
            Operation::DetectRecurring => "recurring/detect",
            Operation::Recategorize => "transactions/recategorize",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Operation::ImportCsv => "csv import",
            Operation::DetectTransfers => "transfer detection",
            Operation::DetectRecurring => "recurring detection",
            Operation::Recategorize => "recategorization",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// CSV upload. Column mapping keys are CSV headers, values are the
/// transaction fields they feed; the server applies the mapping.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImportCsvRequest {
    pub account_id: i64,
    pub file_name: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub column_mapping: BTreeMap<String, String>,
    #[serde(default)]
    pub skip_duplicates: bool,
}

/// Empty `account_ids` means all accounts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DetectTransfersRequest {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub account_ids: Vec<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_days_apart: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DetectRecurringRequest {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub account_ids: Vec<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_occurrences: Option<u32>,
}

/// Empty `transaction_ids` means every transaction the rules apply to.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecategorizeRequest {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub transaction_ids: Vec<i64>,
    #[serde(default)]
    pub only_uncategorized: bool,
}
