use crate::hast::{NodeId, Properties, Tree, class_list};
use syntect::easy::ScopeRegionIterator;
use syntect::parsing::{ParseState, ScopeStack, SyntaxSet};
use syntect::util::LinesWithEndings;

const LANGUAGE_PREFIX: &str = "language-";

/// One highlighted token: its text and an optional token kind (`keyword`, `string`, ...).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// Source text covered by the token.
    pub text: String,
    /// Kind rendered as `token <kind>`; `None` leaves the text unwrapped.
    pub kind: Option<String>,
}

impl Token {
    /// Creates a token.
    pub fn new(text: impl Into<String>, kind: Option<&str>) -> Self {
        Self {
            text: text.into(),
            kind: kind.map(str::to_string),
        }
    }
}

/// Tokens of one source line, without the line ending.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HighlightedLine {
    /// Tokens in source order.
    pub tokens: Vec<Token>,
}

/// Turns source code into highlighted lines.
///
/// Returning `None` means the language is unknown or highlighting failed;
/// the code block is then left exactly as parsed.
pub trait Highlighter: Send + Sync {
    /// Highlights `code` written in `language`.
    fn highlight(&self, code: &str, language: &str) -> Option<Vec<HighlightedLine>>;
}

/// [`Highlighter`] backed by syntect's bundled grammars.
#[derive(Debug)]
pub struct SyntectHighlighter {
    syntaxes: SyntaxSet,
}

impl Default for SyntectHighlighter {
    fn default() -> Self {
        Self::new(SyntaxSet::load_defaults_newlines())
    }
}

impl SyntectHighlighter {
    /// Uses a caller-provided syntax set. Grammars must expect newline-terminated lines.
    pub fn new(syntaxes: SyntaxSet) -> Self {
        Self { syntaxes }
    }

    /// Whether a grammar is registered for `language` (a name or file extension).
    pub fn supports(&self, language: &str) -> bool {
        self.syntaxes.find_syntax_by_token(language).is_some()
    }
}

impl Highlighter for SyntectHighlighter {
    fn highlight(&self, code: &str, language: &str) -> Option<Vec<HighlightedLine>> {
        let syntax = self.syntaxes.find_syntax_by_token(language)?;
        let mut state = ParseState::new(syntax);
        let mut stack = ScopeStack::new();
        let mut lines = Vec::new();

        for line in LinesWithEndings::from(code) {
            let ops = match state.parse_line(line, &self.syntaxes) {
                Ok(ops) => ops,
                Err(err) => {
                    log::debug!("syntect failed on {language}: {err}");
                    return None;
                }
            };

            let mut tokens = Vec::new();
            for (text, op) in ScopeRegionIterator::new(&ops, line) {
                if stack.apply(op).is_err() {
                    return None;
                }
                let text = text.trim_end_matches(['\n', '\r']);
                if text.is_empty() {
                    continue;
                }
                tokens.push(Token {
                    text: text.to_string(),
                    kind: token_kind(&stack),
                });
            }
            lines.push(HighlightedLine { tokens });
        }

        Some(lines)
    }
}

// First atom of the innermost scope that is not a plain container scope.
fn token_kind(stack: &ScopeStack) -> Option<String> {
    stack.as_slice().iter().rev().find_map(|scope| {
        let name = scope.build_string();
        let atom = name.split('.').next()?;
        match atom {
            "source" | "text" | "meta" => None,
            _ => Some(atom.to_string()),
        }
    })
}

/// Replaces each `pre > code.language-X` body with highlighted line spans.
///
/// Every line becomes `span.code-line` followed by a `"\n"` text node; tokens
/// with a kind become `span.token.<kind>`, the rest stay plain text. The
/// `pre` receives the same `language-X` class. Blocks without a language, or
/// that the highlighter declines, are left untouched.
pub fn highlight_code_blocks(tree: &mut Tree, highlighter: &dyn Highlighter) {
    for pre in tree.elements_by_tag("pre") {
        let Some(&code) = tree.children(pre).first() else {
            continue;
        };
        let Some(language) = code_language(tree, code) else {
            continue;
        };

        let source = tree.text_content(code);
        let Some(lines) = highlighter.highlight(&source, &language) else {
            log::debug!("no highlighting for language `{language}`");
            continue;
        };

        let children = lines
            .into_iter()
            .flat_map(|line| {
                let span = tree.create_element("span", class_list(["code-line"]));
                for token in line.tokens {
                    match token.kind {
                        Some(kind) => {
                            let token_span =
                                tree.append_element(span, "span", class_list(["token".to_string(), kind]));
                            tree.append_text(token_span, token.text);
                        }
                        None => {
                            tree.append_text(span, token.text);
                        }
                    }
                }
                let newline = tree.create_text("\n");
                [span, newline]
            })
            .collect();
        tree.replace_children(code, children);

        if let Some(el) = tree.element_mut(pre) {
            let class = format!("{LANGUAGE_PREFIX}{language}");
            if !el.properties.has_class(&class) {
                let mut classes = el.properties.classes().to_vec();
                classes.push(class);
                el.properties.set_classes(classes);
            }
        }
    }
}

fn code_language(tree: &Tree, code: NodeId) -> Option<String> {
    let el = tree.element(code).filter(|el| el.tag == "code")?;
    language_of(&el.properties)
}

fn language_of(properties: &Properties) -> Option<String> {
    properties
        .classes()
        .iter()
        .find_map(|class| class.strip_prefix(LANGUAGE_PREFIX))
        .filter(|lang| !lang.is_empty())
        .map(str::to_string)
}
