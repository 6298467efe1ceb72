use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Output schema produced by a run.
///
/// Both variants share the generation pipeline; they differ in file set,
/// column names and a handful of per-variant constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SchemaVariant {
    /// Flat tables imported by the dashboard application.
    #[default]
    App,
    /// Dimension/fact tables consumed by the BI layer.
    Bi,
}

impl SchemaVariant {
    pub const ALL: [SchemaVariant; 2] = [SchemaVariant::App, SchemaVariant::Bi];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::App => "app",
            Self::Bi => "bi",
        }
    }

    /// File names written by this variant, in write order.
    pub fn table_files(self) -> &'static [&'static str] {
        match self {
            Self::App => crate::output::app::TABLE_FILES,
            Self::Bi => crate::output::bi::TABLE_FILES,
        }
    }
}

impl fmt::Display for SchemaVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SchemaVariant {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "app" => Ok(Self::App),
            "bi" => Ok(Self::Bi),
            other => Err(format!("unknown schema variant '{other}' (expected app or bi)")),
        }
    }
}
