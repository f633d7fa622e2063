use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Target document type for a generated figure. Determines the minimum
/// acceptable quality score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocType {
    Journal,
    Conference,
    Poster,
    Presentation,
    Report,
    Grant,
    Thesis,
    Preprint,
    Default,
}

impl std::fmt::Display for DocType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            DocType::Journal => "journal",
            DocType::Conference => "conference",
            DocType::Poster => "poster",
            DocType::Presentation => "presentation",
            DocType::Report => "report",
            DocType::Grant => "grant",
            DocType::Thesis => "thesis",
            DocType::Preprint => "preprint",
            DocType::Default => "default",
        };
        write!(f, "{}", s)
    }
}

impl std::str::FromStr for DocType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "journal" => Ok(DocType::Journal),
            "conference" => Ok(DocType::Conference),
            "poster" => Ok(DocType::Poster),
            "presentation" => Ok(DocType::Presentation),
            "report" => Ok(DocType::Report),
            "grant" => Ok(DocType::Grant),
            "thesis" => Ok(DocType::Thesis),
            "preprint" => Ok(DocType::Preprint),
            "default" => Ok(DocType::Default),
            _ => Err(format!("Unknown document type: {}", s)),
        }
    }
}

/// Immutable quality thresholds by document type (score out of 10).
///
/// Built once per run and passed to whoever needs it; unknown types resolve
/// to the default threshold.
#[derive(Debug, Clone)]
pub struct QualityThresholds {
    map: HashMap<DocType, f64>,
    default: f64,
}

impl Default for QualityThresholds {
    fn default() -> Self {
        let map = HashMap::from([
            (DocType::Journal, 8.5),
            (DocType::Conference, 8.0),
            (DocType::Poster, 7.0),
            (DocType::Presentation, 6.5),
            (DocType::Report, 7.5),
            (DocType::Grant, 8.0),
            (DocType::Thesis, 8.0),
            (DocType::Preprint, 7.5),
        ]);
        Self { map, default: 7.5 }
    }
}

impl QualityThresholds {
    pub fn get(&self, doc_type: DocType) -> f64 {
        self.map.get(&doc_type).copied().unwrap_or(self.default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_thresholds() {
        let t = QualityThresholds::default();
        assert_eq!(t.get(DocType::Journal), 8.5);
        assert_eq!(t.get(DocType::Presentation), 6.5);
        assert_eq!(t.get(DocType::Default), 7.5);
    }

    #[test]
    fn test_doc_type_round_trip() {
        for s in [
            "journal",
            "conference",
            "poster",
            "presentation",
            "report",
            "grant",
            "thesis",
            "preprint",
            "default",
        ] {
            let dt: DocType = s.parse().unwrap();
            assert_eq!(dt.to_string(), s);
        }
        assert!("memo".parse::<DocType>().is_err());
    }
}
