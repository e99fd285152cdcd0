//! Date window over which a case or policy figure is computed.

/// Either the provider's all-time figures or a start/end date pair.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DateScope {
    /// No window requested.
    #[default]
    Total,
    /// Inclusive `YYYY-MM-DD` dates, passed through to the provider as given.
    Range {
        /// First date of the window.
        start: String,
        /// Last date of the window.
        end: String,
    },
}

impl DateScope {
    /// Build a scope from optional dates. An empty date on either side means
    /// no window.
    pub fn from_dates(start: &str, end: &str) -> Self {
        if start.is_empty() || end.is_empty() {
            Self::Total
        } else {
            Self::Range {
                start: start.to_string(),
                end: end.to_string(),
            }
        }
    }

    /// Label reported in responses: `total` or `<start>-<end>`.
    pub fn label(&self) -> String {
        match self {
            Self::Total => "total".to_string(),
            Self::Range { start, end } => format!("{start}-{end}"),
        }
    }
}
