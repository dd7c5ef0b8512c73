//! Textual scanning for remote stylesheet and script references.
//!
//! Matching is deliberately regex based rather than a markup parser: only single-line tags
//! whose URL attribute is double quoted are recognised. Documents are scanned as raw bytes so
//! files in legacy encodings are handled as long as the URLs themselves are ASCII.

use std::sync::OnceLock;

use regex::bytes::Regex;

use crate::models::{AssetCategory, AssetReference};

fn asset_patterns() -> &'static [Regex] {
    static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
    PATTERNS
        .get_or_init(|| {
            vec![
                Regex::new(r#"(?-u)<link.*?href="(http[^"]+\.css)".*?>"#)
                    .expect("invalid stylesheet regex"),
                Regex::new(r#"(?-u)<script.*?src="(http[^"]+\.js)".*?>"#)
                    .expect("invalid script regex"),
            ]
        })
        .as_slice()
}

/// Collect the captured URLs of every stylesheet match followed by every script match.
///
/// Matches are returned in document order per pattern and are not de-duplicated. Captures that
/// are not valid UTF-8 are skipped.
pub fn extract_asset_urls(document: &[u8]) -> Vec<String> {
    asset_patterns()
        .iter()
        .flat_map(|pattern| {
            pattern.captures_iter(document).filter_map(|caps| {
                let url = caps.get(1)?;
                std::str::from_utf8(url.as_bytes()).ok().map(str::to_string)
            })
        })
        .collect()
}

/// Extract matches whose URL path maps to a known asset category.
pub fn extract_asset_references(document: &[u8]) -> Vec<AssetReference> {
    extract_asset_urls(document)
        .into_iter()
        .filter_map(|url| {
            let category = AssetCategory::from_url(&url)?;
            Some(AssetReference { url, category })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stylesheets_precede_scripts() {
        let text = r#"
      <script src="https://cdn.example.com/app.js"></script>
      <link rel="stylesheet" href="https://cdn.example.com/site.css">
    "#;
        assert_eq!(
            extract_asset_urls(text.as_bytes()),
            vec![
                "https://cdn.example.com/site.css".to_string(),
                "https://cdn.example.com/app.js".to_string(),
            ]
        );
    }

    #[test]
    fn keeps_duplicate_matches() {
        let text = concat!(
            r#"<link href="http://cdn.example.com/a.css">"#,
            "\n",
            r#"<link href="http://cdn.example.com/a.css">"#,
        );
        assert_eq!(extract_asset_urls(text.as_bytes()).len(), 2);
    }

    #[test]
    fn ignores_local_and_single_quoted_references() {
        let text = r#"
      <link href="./css/a.css">
      <link href='https://cdn.example.com/b.css'>
      <script src="/js/app.js"></script>
    "#;
        assert!(extract_asset_urls(text.as_bytes()).is_empty());
    }

    #[test]
    fn does_not_span_lines() {
        let text = "<link rel=\"stylesheet\"\n  href=\"https://cdn.example.com/a.css\">";
        assert!(extract_asset_urls(text.as_bytes()).is_empty());
    }

    #[test]
    fn scans_documents_in_legacy_encodings() {
        let mut document = b"<title>Caf\xe9</title>\n<script title=\"caf\xe9\" ".to_vec();
        document.extend_from_slice(br#"src="https://cdn.example.com/app.js"></script>"#);

        assert_eq!(
            extract_asset_urls(&document),
            vec!["https://cdn.example.com/app.js".to_string()]
        );
    }

    #[test]
    fn references_carry_categories() {
        let text = concat!(
            r#"<link href="https://cdn.example.com/a.css">"#,
            r#"<script defer src="https://cdn.example.com/b.js"></script>"#,
        );
        let references = extract_asset_references(text.as_bytes());
        assert_eq!(
            references,
            vec![
                AssetReference {
                    url: "https://cdn.example.com/a.css".into(),
                    category: AssetCategory::Stylesheet,
                },
                AssetReference {
                    url: "https://cdn.example.com/b.js".into(),
                    category: AssetCategory::Script,
                },
            ]
        );
    }

    #[test]
    fn drops_matches_whose_path_is_not_an_asset() {
        let text = br#"<link href="https://cdn.example.com/theme.php?file=x.css">"#;
        assert_eq!(extract_asset_urls(text).len(), 1);
        assert!(extract_asset_references(text).is_empty());
    }
}
