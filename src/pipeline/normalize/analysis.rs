use crate::error::{PdpError, Result};
use crate::types::AnalysisRow;

/// What to do with a fragment that has no `)` to split on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnalysisPolicy {
    /// Skip the fragment and keep going
    #[default]
    Lenient,
    /// Fail the record, and with it the batch
    Strict,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedAnalysis {
    pub rows: Vec<AnalysisRow>,
    pub skipped: Vec<String>,
}

/// Parses a guaranteed analysis statement such as
/// `"Crude Protein (min) 26.0% Crude Fat (min) 15.0%"` into label/value rows.
///
/// The statement is cut on `%`; every non-blank piece gets its `%` back and is
/// split at its last `)`. The label keeps the parenthesis.
pub fn parse_guaranteed_analysis(statement: &str, policy: AnalysisPolicy) -> Result<ParsedAnalysis> {
    let mut parsed = ParsedAnalysis::default();

    for piece in statement.split('%') {
        let piece = piece.trim();
        if piece.is_empty() {
            continue;
        }
        let fragment = format!("{piece}%");

        match fragment.rfind(')') {
            Some(idx) => {
                let (label, value) = fragment.split_at(idx + 1);
                parsed.rows.push((label.trim().to_string(), value.trim().to_string()));
            }
            None => match policy {
                AnalysisPolicy::Strict => return Err(PdpError::MalformedAnalysis { fragment }),
                AnalysisPolicy::Lenient => parsed.skipped.push(fragment),
            },
        }
    }

    Ok(parsed)
}
