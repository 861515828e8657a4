use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;
use thiserror::Error;

/// Frontmatter split from a content file, still untyped.
#[derive(Debug)]
pub struct FrontmatterExtraction {
    /// Parsed frontmatter as a JSON value (always an object).
    pub value: JsonValue,
    /// Byte offset inside the original document where the markdown body begins.
    pub body_start: usize,
}

impl FrontmatterExtraction {
    fn empty() -> Self {
        Self {
            value: JsonValue::Object(Default::default()),
            body_start: 0,
        }
    }
}

/// Errors emitted while splitting or decoding frontmatter.
#[derive(Debug, Error)]
pub enum FrontmatterError {
    /// Opening `---` without a closing one.
    #[error("Unterminated YAML frontmatter block: expected closing '---'")]
    Unterminated,
    /// YAML failed to parse.
    #[error("Frontmatter parse error: {0}")]
    Parse(String),
    /// Top-level YAML node was not a mapping.
    #[error("Frontmatter must be a YAML mapping at the top level")]
    InvalidRootType,
    /// The mapping parsed but does not fit the requested schema.
    #[error("Frontmatter does not match the expected fields: {0}")]
    Schema(#[from] serde_json::Error),
}

/// Splits the leading `---` block off `input` and parses it as YAML.
///
/// Documents without a block yield an empty object and `body_start == 0`.
pub fn extract_frontmatter(input: &str) -> Result<FrontmatterExtraction, FrontmatterError> {
    match find_yaml_block(input)? {
        Some((block, body_start)) => {
            let value = parse_yaml_block(block)?;
            Ok(FrontmatterExtraction { value, body_start })
        }
        None => Ok(FrontmatterExtraction::empty()),
    }
}

/// Splits and decodes the frontmatter into the caller's schema `F`.
///
/// Returns the typed metadata and the markdown body that follows it.
pub fn parse_frontmatter<F: DeserializeOwned>(
    input: &str,
) -> Result<(F, &str), FrontmatterError> {
    let FrontmatterExtraction { value, body_start } = extract_frontmatter(input)?;
    let typed = serde_json::from_value(value)?;
    Ok((typed, &input[body_start..]))
}

fn parse_yaml_block(block: &str) -> Result<JsonValue, FrontmatterError> {
    if block.trim().is_empty() {
        return Ok(JsonValue::Object(Default::default()));
    }

    let yaml: serde_yaml::Value =
        serde_yaml::from_str(block).map_err(|err| FrontmatterError::Parse(err.to_string()))?;
    let json =
        serde_json::to_value(yaml).map_err(|err| FrontmatterError::Parse(err.to_string()))?;

    match json {
        JsonValue::Null => Ok(JsonValue::Object(Default::default())),
        JsonValue::Object(_) => Ok(json),
        _ => Err(FrontmatterError::InvalidRootType),
    }
}

/// Locates the YAML block; returns it with the byte offset of the body.
fn find_yaml_block(input: &str) -> Result<Option<(&str, usize)>, FrontmatterError> {
    let bom_len = if input.starts_with('\u{feff}') {
        '\u{feff}'.len_utf8()
    } else {
        0
    };
    let text = &input[bom_len..];

    let mut lines = LineCursor::new(text);
    let Some((first, _)) = lines.by_ref().find(|(line, _)| !line.trim().is_empty()) else {
        return Ok(None);
    };
    if !is_fence(first) {
        return Ok(None);
    }

    let block_start = lines.offset;
    for (line, line_start) in lines {
        if is_fence(line) {
            let block = text[block_start..line_start].trim_end_matches(['\r', '\n']);
            let body_start = (line_start + line.len() + 1).min(text.len());
            return Ok(Some((block, bom_len + body_start)));
        }
    }
    Err(FrontmatterError::Unterminated)
}

fn is_fence(line: &str) -> bool {
    line.trim_end_matches('\r') == "---"
}

/// Yields `(line, line_start)` pairs without the trailing `\n`.
struct LineCursor<'a> {
    text: &'a str,
    offset: usize,
}

impl<'a> LineCursor<'a> {
    fn new(text: &'a str) -> Self {
        Self { text, offset: 0 }
    }
}

impl<'a> Iterator for LineCursor<'a> {
    type Item = (&'a str, usize);

    fn next(&mut self) -> Option<Self::Item> {
        if self.offset >= self.text.len() {
            return None;
        }
        let start = self.offset;
        let rest = &self.text[start..];
        match rest.find('\n') {
            Some(pos) => {
                self.offset = start + pos + 1;
                Some((&rest[..pos], start))
            }
            None => {
                self.offset = self.text.len();
                Some((rest, start))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Page {
        title: String,
        #[serde(default)]
        description: String,
    }

    fn extract(input: &str) -> FrontmatterExtraction {
        extract_frontmatter(input).expect("frontmatter extraction should succeed")
    }

    #[test]
    fn returns_empty_when_no_frontmatter() {
        let result = extract("# Title\nBody");
        assert_eq!(result.body_start, 0);
        assert_eq!(result.value, JsonValue::Object(Default::default()));
    }

    #[test]
    fn parses_basic_yaml() {
        let input = "---\ntitle: Branching\ntags:\n  - git\n  - merge\n---\n# Content";
        let result = extract(input);
        assert_eq!(result.body_start, input.find("# Content").unwrap());
        assert_eq!(
            result.value.get("title").and_then(JsonValue::as_str),
            Some("Branching")
        );
    }

    #[test]
    fn handles_empty_block() {
        let input = "---\n---\n# Body";
        let result = extract(input);
        assert_eq!(result.value, JsonValue::Object(Default::default()));
        assert_eq!(result.body_start, input.find("# Body").unwrap());
    }

    #[test]
    fn skips_bom_and_leading_blank_lines() {
        let input = "\u{feff}\n   \n---\nfoo: bar\n---\nBody";
        let result = extract(input);
        assert_eq!(result.value.get("foo").and_then(JsonValue::as_str), Some("bar"));
        assert_eq!(result.body_start, input.find("Body").unwrap());
    }

    #[test]
    fn crlf_fences_are_recognised() {
        let input = "---\r\ntitle: Windows\r\n---\r\nBody";
        let result = extract(input);
        assert_eq!(result.value.get("title").and_then(JsonValue::as_str), Some("Windows"));
        assert_eq!(&input[result.body_start..], "Body");
    }

    #[test]
    fn errors_on_invalid_yaml() {
        let err = extract_frontmatter("---\ninvalid: [unterminated\n---\n").unwrap_err();
        assert!(matches!(err, FrontmatterError::Parse(_)), "{err:?}");
    }

    #[test]
    fn errors_on_unterminated_block() {
        let err = extract_frontmatter("---\ntitle: test").unwrap_err();
        assert!(matches!(err, FrontmatterError::Unterminated));
    }

    #[test]
    fn errors_on_scalar_root() {
        let err = extract_frontmatter("---\njust a string\n---\n").unwrap_err();
        assert!(matches!(err, FrontmatterError::InvalidRootType));
    }

    #[test]
    fn typed_parse_returns_body() {
        let input = "---\ntitle: Staging\ndescription: git add\n---\n## Index\n";
        let (page, body): (Page, &str) = parse_frontmatter(input).unwrap();
        assert_eq!(page.title, "Staging");
        assert_eq!(page.description, "git add");
        assert_eq!(body, "## Index\n");
    }

    #[test]
    fn typed_parse_reports_schema_mismatch() {
        let err = parse_frontmatter::<Page>("---\ndescription: no title\n---\n").unwrap_err();
        assert!(matches!(err, FrontmatterError::Schema(_)), "{err:?}");
    }
}
