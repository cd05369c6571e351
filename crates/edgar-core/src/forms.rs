//! Filing form types and reporting period categories.
//!
//! This module defines [`FormType`] for the SEC form strings the pipeline
//! understands and [`PeriodType`] for selecting annual or quarterly series.

use serde::{Deserialize, Serialize};
use std::fmt;

/// SEC filing form types handled by the pipeline.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FormType {
    /// Annual report (10-K).
    TenK,
    /// Quarterly report (10-Q).
    TenQ,
    /// Definitive proxy statement (DEF 14A).
    Def14A,
}

impl FormType {
    /// Returns the exact form string as it appears in EDGAR filing metadata.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::TenK => "10-K",
            Self::TenQ => "10-Q",
            Self::Def14A => "DEF 14A",
        }
    }
}

impl fmt::Display for FormType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Period type for fundamental financial data.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PeriodType {
    /// Annual reporting period.
    #[default]
    Annual,
    /// Quarterly reporting period.
    Quarterly,
}

impl PeriodType {
    /// Returns the filing form type that carries this period's disclosures.
    #[must_use]
    pub const fn form_type(&self) -> FormType {
        match self {
            Self::Annual => FormType::TenK,
            Self::Quarterly => FormType::TenQ,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_form_strings_match_edgar() {
        assert_eq!(FormType::TenK.as_str(), "10-K");
        assert_eq!(FormType::TenQ.as_str(), "10-Q");
        assert_eq!(FormType::Def14A.as_str(), "DEF 14A");
    }

    #[test]
    fn test_period_to_form() {
        assert_eq!(PeriodType::Annual.form_type(), FormType::TenK);
        assert_eq!(PeriodType::Quarterly.form_type(), FormType::TenQ);
    }
}
