//! Export formats and content negotiation

use serde::{Deserialize, Serialize};

/// The three negotiable export formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// Row-oriented JSON, sparse encoding
    Json,
    /// Columnar JSON with schema header, dense encoding
    CJson,
    /// CSV with human-readable header row
    Csv,
}

/// Declaration order doubles as the tie-break preference.
const ALL_FORMATS: [ExportFormat; 3] = [ExportFormat::Json, ExportFormat::CJson, ExportFormat::Csv];

impl ExportFormat {
    /// Canonical MIME type.
    pub fn mime_type(&self) -> &'static str {
        match self {
            ExportFormat::Json => "application/json",
            ExportFormat::CJson => "application/json+x-socrata-cjson",
            ExportFormat::Csv => "text/csv",
        }
    }

    /// Charset-tagged Content-Type value.
    pub fn content_type(&self) -> String {
        format!("{}; charset=utf-8", self.mime_type())
    }

    /// Canonical lower-cased file extension.
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::CJson => "cjson",
            ExportFormat::Csv => "csv",
        }
    }

    /// Resolves a file extension, case-insensitively.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "json" => Some(ExportFormat::Json),
            "cjson" => Some(ExportFormat::CJson),
            "csv" => Some(ExportFormat::Csv),
            _ => None,
        }
    }
}

/// How specifically a media range names a format's MIME type.
///
/// Exact beats `type/*` beats `*/*`; a non-match is excluded entirely.
fn specificity(range: &str, mime: &str) -> Option<u8> {
    if range == mime {
        return Some(2);
    }
    let (range_type, range_subtype) = range.split_once('/')?;
    let (mime_type, _) = mime.split_once('/')?;
    if range_type == "*" && range_subtype == "*" {
        return Some(0);
    }
    if range_type == mime_type && range_subtype == "*" {
        return Some(1);
    }
    None
}

/// Parses one Accept entry into its media range and milli-q weight.
fn parse_entry(entry: &str) -> Option<(&str, i32)> {
    let mut parts = entry.split(';');
    let range = parts.next()?.trim();
    if range.is_empty() {
        return None;
    }
    let mut quality = 1000;
    for param in parts {
        let (key, value) = match param.split_once('=') {
            Some(kv) => kv,
            None => continue,
        };
        if key.trim().eq_ignore_ascii_case("q") {
            let q: f32 = value.trim().parse().ok()?;
            quality = (q.clamp(0.0, 1.0) * 1000.0) as i32;
        }
    }
    Some((range, quality))
}

/// Standard content negotiation over the three export MIME types.
///
/// The most specific matching range determines each format's weight; the
/// highest-weighted format wins, preferring the format listed earlier in
/// `ALL_FORMATS` on ties. Returns `None` when no format is acceptable.
pub fn negotiate(accept: &str) -> Option<ExportFormat> {
    // (milli-q, specificity) per format, best match so far.
    let mut weights: [Option<(i32, u8)>; 3] = [None; 3];
    for entry in accept.split(',') {
        let (range, quality) = match parse_entry(entry) {
            Some(parsed) => parsed,
            None => continue,
        };
        for (slot, format) in ALL_FORMATS.iter().enumerate() {
            if let Some(spec) = specificity(range, format.mime_type()) {
                let candidate = (quality, spec);
                // A more specific range overrides a wildcard's weight even
                // when the wildcard's q is higher.
                let replace = match weights[slot] {
                    None => true,
                    Some((_, held_spec)) => spec > held_spec,
                };
                if replace {
                    weights[slot] = Some(candidate);
                }
            }
        }
    }

    let mut best: Option<(i32, ExportFormat)> = None;
    for (slot, format) in ALL_FORMATS.iter().enumerate() {
        if let Some((quality, _)) = weights[slot] {
            if quality > 0 && best.map_or(true, |(held, _)| quality > held) {
                best = Some((quality, *format));
            }
        }
    }
    best.map(|(_, format)| format)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_match() {
        assert_eq!(negotiate("text/csv"), Some(ExportFormat::Csv));
        assert_eq!(
            negotiate("application/json+x-socrata-cjson"),
            Some(ExportFormat::CJson)
        );
    }

    #[test]
    fn test_json_does_not_capture_cjson() {
        // The cjson subtype is distinct; plain application/json must not
        // negotiate to it.
        assert_eq!(negotiate("application/json"), Some(ExportFormat::Json));
    }

    #[test]
    fn test_wildcards() {
        assert_eq!(negotiate("*/*"), Some(ExportFormat::Json));
        assert_eq!(negotiate("text/*"), Some(ExportFormat::Csv));
        assert_eq!(negotiate("application/*"), Some(ExportFormat::Json));
    }

    #[test]
    fn test_quality_ordering() {
        assert_eq!(
            negotiate("application/json;q=0.2, text/csv;q=0.9"),
            Some(ExportFormat::Csv)
        );
        // Specific zero-q excludes a format even under a wildcard.
        assert_eq!(negotiate("text/csv;q=0, */*;q=0.1"), Some(ExportFormat::Json));
    }

    #[test]
    fn test_no_acceptable_format() {
        assert_eq!(negotiate("image/png"), None);
        assert_eq!(negotiate("text/csv;q=0"), None);
    }

    #[test]
    fn test_extensions() {
        assert_eq!(ExportFormat::from_extension("CSV"), Some(ExportFormat::Csv));
        assert_eq!(ExportFormat::from_extension("cjson"), Some(ExportFormat::CJson));
        assert_eq!(ExportFormat::from_extension("xml"), None);
        assert_eq!(ExportFormat::Json.extension(), "json");
    }

    #[test]
    fn test_content_type_is_charset_tagged() {
        assert_eq!(ExportFormat::Csv.content_type(), "text/csv; charset=utf-8");
    }
}
