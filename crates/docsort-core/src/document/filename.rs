//! Deterministic filename rendering and parsing.

use chrono::NaiveDate;

use crate::models::{DateStyle, DocType, ExtractedFields, FilenameConfig};

use super::rules::patterns::CORPORATE_SUFFIX;

/// Rendered in place of a missing date.
pub const DATE_PLACEHOLDER: &str = "YYYY-MM-DD";

/// Rendered in place of a missing issuer or document type.
pub const UNKNOWN: &str = "Unknown";

const EXTENSION: &str = ".pdf";

/// Renders `<date><sep><Issuer><sep><TypeTag>.pdf`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilenameBuilder {
    separator: String,
    date_style: DateStyle,
}

impl FilenameBuilder {
    pub fn new(config: &FilenameConfig) -> Self {
        Self {
            separator: config.separator.clone(),
            date_style: config.date_style,
        }
    }

    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    pub fn with_date_style(mut self, style: DateStyle) -> Self {
        self.date_style = style;
        self
    }

    /// Render the filename for `fields`.
    pub fn build(&self, fields: &ExtractedFields) -> String {
        let date = fields
            .date_iso
            .as_deref()
            .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
            .map(|d| match self.date_style {
                DateStyle::Compact => d.format("%Y%m%d").to_string(),
                DateStyle::Iso => d.format("%Y-%m-%d").to_string(),
            })
            .unwrap_or_else(|| DATE_PLACEHOLDER.to_string());

        let issuer = render_issuer(fields.issuer.as_deref());
        let tag = fields.doc_type.map_or(UNKNOWN, DocType::filename_tag);

        format!(
            "{date}{sep}{issuer}{sep}{tag}{EXTENSION}",
            sep = self.separator
        )
    }

    /// Recover the fields a filename was rendered from.
    ///
    /// Accepts both date styles and the placeholders. Returns `None` when the
    /// name does not have the rendered shape.
    pub fn parse(&self, filename: &str) -> Option<ExtractedFields> {
        let stem = filename.strip_suffix(EXTENSION)?;

        // Issuer and tag never contain the separator; the date might.
        let mut parts = stem.rsplitn(3, self.separator.as_str());
        let tag = parts.next()?;
        let issuer = parts.next()?;
        let date = parts.next()?;

        let date_iso = if date == DATE_PLACEHOLDER {
            None
        } else {
            let parsed = if date.len() == 8 {
                NaiveDate::parse_from_str(date, "%Y%m%d").ok()
            } else {
                NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()
            };
            Some(parsed?.format("%Y-%m-%d").to_string())
        };

        if issuer.is_empty() || !issuer.chars().all(char::is_alphanumeric) {
            return None;
        }
        let issuer = (issuer != UNKNOWN).then(|| issuer.to_string());

        let doc_type = if tag == UNKNOWN {
            None
        } else {
            Some(DocType::from_filename_tag(tag)?)
        };

        Some(ExtractedFields {
            doc_type,
            issuer,
            date_iso,
            ..Default::default()
        })
    }

    /// Whether `filename` is exactly what this builder renders for its fields.
    pub fn is_canonical(&self, filename: &str) -> bool {
        self.parse(filename)
            .is_some_and(|fields| self.build(&fields) == filename)
    }
}

impl Default for FilenameBuilder {
    fn default() -> Self {
        Self::new(&FilenameConfig::default())
    }
}

/// Render an issuer as a single Pascal-like word without corporate suffixes.
///
/// Words that are entirely upper- or lower-case are capitalized; mixed-case
/// words keep their casing with the first letter raised. Rendering a
/// rendered name returns it unchanged.
pub fn render_issuer(issuer: Option<&str>) -> String {
    let Some(issuer) = issuer else {
        return UNKNOWN.to_string();
    };

    let stripped = CORPORATE_SUFFIX.replace_all(issuer, " ");
    let mut rendered: String = stripped
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(render_word)
        .collect();

    let letters = rendered.chars().filter(|c| c.is_alphabetic()).count();
    if letters >= 2 && !rendered.chars().any(char::is_lowercase) {
        rendered = capitalize(&rendered);
    }

    if rendered.is_empty() {
        UNKNOWN.to_string()
    } else {
        rendered
    }
}

fn render_word(word: &str) -> String {
    let has_upper = word.chars().any(char::is_uppercase);
    let has_lower = word.chars().any(char::is_lowercase);

    if has_upper && has_lower {
        let mut chars = word.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    } else {
        capitalize(word)
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn fields(doc_type: Option<DocType>, issuer: Option<&str>, date: Option<&str>) -> ExtractedFields {
        ExtractedFields {
            doc_type,
            issuer: issuer.map(String::from),
            date_iso: date.map(String::from),
            ..Default::default()
        }
    }

    #[test]
    fn test_build_compact() {
        let builder = FilenameBuilder::default();
        let f = fields(Some(DocType::BuyContract), Some("XYZ ETF"), Some("2025-11-13"));
        assert_eq!(builder.build(&f), "20251113_XyzEtf_BuyContract.pdf");
    }

    #[test]
    fn test_build_iso_and_separator() {
        let builder = FilenameBuilder::default()
            .with_date_style(DateStyle::Iso)
            .with_separator("-");
        let f = fields(
            Some(DocType::DistributionStatement),
            Some("Anacacia Capital Pty Ltd"),
            Some("2024-05-15"),
        );
        assert_eq!(builder.build(&f), "2024-05-15-AnacaciaCapital-DistributionStatement.pdf");
    }

    #[test]
    fn test_placeholders() {
        let builder = FilenameBuilder::default();
        assert_eq!(
            builder.build(&ExtractedFields::default()),
            "YYYY-MM-DD_Unknown_Unknown.pdf"
        );
    }

    #[test]
    fn test_call_and_distribution_tag() {
        let builder = FilenameBuilder::default();
        let f = fields(
            Some(DocType::CallAndDistributionStatement),
            Some("Ventures Fund III"),
            Some("2024-09-30"),
        );
        assert_eq!(
            builder.build(&f),
            "20240930_VenturesFundIii_DistributionAndCapitalCallStatement.pdf"
        );
    }

    #[test]
    fn test_render_issuer() {
        assert_eq!(render_issuer(Some("BRAMBLES LIMITED")), "Brambles");
        assert_eq!(render_issuer(Some("iShares")), "IShares");
        assert_eq!(render_issuer(Some("Highwest Global Offshore Fund, Ltd.")), "HighwestGlobalOffshoreFund");
        assert_eq!(render_issuer(Some("Russell 2000 Index")), "Russell2000Index");
        assert_eq!(render_issuer(Some("Pty Ltd")), "Unknown");
        assert_eq!(render_issuer(None), "Unknown");
    }

    #[test]
    fn test_render_issuer_is_idempotent() {
        for name in ["XYZ ETF", "A B C", "iShares Core", "MacQuarie Group", "3m co", "S&P 500"] {
            let once = render_issuer(Some(name));
            assert_eq!(render_issuer(Some(&once)), once, "{name}");
        }
    }

    #[test]
    fn test_parse_round_trip() {
        let builder = FilenameBuilder::default();
        let f = fields(Some(DocType::SellContract), Some("Brambles"), Some("2025-05-09"));
        let name = builder.build(&f);
        assert_eq!(builder.parse(&name), Some(f));
        assert!(builder.is_canonical(&name));
    }

    #[test]
    fn test_parse_placeholders_with_dash_separator() {
        let builder = FilenameBuilder::default().with_separator("-");
        let parsed = builder.parse("YYYY-MM-DD-Unknown-Unknown.pdf").unwrap();
        assert_eq!(parsed, ExtractedFields::default());
    }

    #[test]
    fn test_parse_rejects_foreign_names() {
        let builder = FilenameBuilder::default();
        assert_eq!(builder.parse("scan0001.pdf"), None);
        assert_eq!(builder.parse("20251113_Xyz_Invoice.pdf"), None);
        assert_eq!(builder.parse("20251113_Xyz Etf_BuyContract.pdf"), None);
        assert_eq!(builder.parse("20251113_Xyz_BuyContract.txt"), None);
        assert!(!builder.is_canonical("2025-11-13_XyzEtf_BuyContract.pdf"));
    }

    #[test]
    fn test_build_is_idempotent_through_parse() {
        let builder = FilenameBuilder::default();
        let f = fields(Some(DocType::TaxStatement), Some("VANECK australian ETF"), None);
        let name = builder.build(&f);
        let rebuilt = builder.build(&builder.parse(&name).unwrap());
        assert_eq!(rebuilt, name);
    }
}
