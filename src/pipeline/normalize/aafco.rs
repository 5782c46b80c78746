const PHRASE: &str = "is formulated";

/// Result of looking at a formulation statement
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AafcoStatement {
    /// `<b>subject</b> is formulated rest`
    Formatted(String),
    /// A statement was present but never says "is formulated"
    NoMatch,
    /// No product name or no statement
    Absent,
}

impl AafcoStatement {
    /// Text for the document; empty unless formatted.
    pub fn into_text(self) -> String {
        match self {
            AafcoStatement::Formatted(text) => text,
            AafcoStatement::NoMatch | AafcoStatement::Absent => String::new(),
        }
    }
}

/// Emphasizes the subject of the AAFCO statement. Only the text up to a second
/// "is formulated", if any, is kept.
pub fn format_aafco(product_name: Option<&str>, statement: Option<&str>) -> AafcoStatement {
    let (Some(_), Some(statement)) = (
        product_name.filter(|s| !s.is_empty()),
        statement.filter(|s| !s.is_empty()),
    ) else {
        return AafcoStatement::Absent;
    };

    let mut parts = statement.split(PHRASE);
    match (parts.next(), parts.next()) {
        (Some(subject), Some(rest)) => {
            AafcoStatement::Formatted(format!("<b>{}</b> {} {}", subject.trim(), PHRASE, rest.trim()))
        }
        _ => AafcoStatement::NoMatch,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subject_is_emphasized() {
        let got = format_aafco(
            Some("Pure Salmon"),
            Some("This food is formulated to meet AAFCO standards."),
        );
        assert_eq!(
            got,
            AafcoStatement::Formatted("<b>This food</b> is formulated to meet AAFCO standards.".to_string())
        );
    }

    #[test]
    fn test_missing_phrase_is_no_match() {
        let got = format_aafco(Some("Pure Salmon"), Some("Meets AAFCO nutrient profiles."));
        assert_eq!(got, AafcoStatement::NoMatch);
        assert_eq!(got.into_text(), "");
    }

    #[test]
    fn test_requires_name_and_statement() {
        assert_eq!(format_aafco(None, Some("X is formulated Y")), AafcoStatement::Absent);
        assert_eq!(format_aafco(Some(""), Some("X is formulated Y")), AafcoStatement::Absent);
        assert_eq!(format_aafco(Some("Name"), None), AafcoStatement::Absent);
        assert_eq!(format_aafco(Some("Name"), Some("")), AafcoStatement::Absent);
    }

    #[test]
    fn test_only_first_two_parts_are_used() {
        let got = format_aafco(Some("N"), Some("A is formulated B is formulated C"));
        assert_eq!(got.into_text(), "<b>A</b> is formulated B");
    }
}
