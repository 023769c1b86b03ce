//! Repairs unescaped markup inside label and definition elements.
//!
//! Translated ontologies are often edited by hand and end up with text such as
//! `<rdfs:label xml:lang="zh">A & B</rdfs:label>`, which no XML parser accepts.
//! The cleaner rewrites the text content of the configured elements so that the
//! document becomes well-formed, and leaves every other byte untouched.

use std::{
    borrow::Cow,
    fs,
    path::{Path, PathBuf},
    sync::OnceLock,
};

use regex::{Captures, Regex};

/// Elements whose text content gets escaped by default.
pub const DEFAULT_ELEMENTS: &[&str] = &["rdfs:label", "obo:IAO_0000115"];

fn entity_reference() -> &'static Regex {
    static ENTITY: OnceLock<Regex> = OnceLock::new();
    ENTITY.get_or_init(|| {
        Regex::new(r"^&(?:amp|lt|gt|quot|apos|#[0-9]+|#x[0-9a-fA-F]+);")
            .unwrap_or_else(|err| unreachable!("entity pattern is valid: {err}"))
    })
}

/// Escapes `<`, `>` and bare `&` characters. Existing entity references are kept.
#[must_use]
pub fn escape_text(text: &str) -> Cow<'_, str> {
    if !text.contains(['<', '>', '&']) {
        return Cow::Borrowed(text);
    }
    let mut escaped = String::with_capacity(text.len() + 8);
    for (index, ch) in text.char_indices() {
        match ch {
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '&' if entity_reference().is_match(&text[index..]) => escaped.push('&'),
            '&' => escaped.push_str("&amp;"),
            _ => escaped.push(ch),
        }
    }
    Cow::Owned(escaped)
}

/// Reverses [`escape_text`] for the five predefined XML entities.
#[must_use]
pub fn unescape_text(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

/// Result of a cleaning pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanedMarkup {
    pub content: String,
    /// Number of element bodies that had to be rewritten.
    pub rewritten: usize,
}

#[derive(Debug, thiserror::Error)]
pub enum MarkupError {
    #[error("invalid element name `{0}`")]
    InvalidElement(String),
    #[error("failed to access `{path}`: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Escapes the text content of a fixed set of elements.
#[derive(Debug, Clone)]
pub struct MarkupCleaner {
    pattern: Regex,
}

impl MarkupCleaner {
    /// Creates a cleaner for the given qualified element names.
    ///
    /// # Errors
    /// Fails when `elements` is empty.
    pub fn new(elements: &[&str]) -> Result<Self, MarkupError> {
        if elements.is_empty() {
            return Err(MarkupError::InvalidElement(String::new()));
        }
        let names = elements
            .iter()
            .map(|name| regex::escape(name))
            .collect::<Vec<_>>()
            .join("|");
        let pattern = Regex::new(&format!(
            r#"(?s)<({names})((?:\s+xml:lang="[^"]*")?)>(.*?)</({names})>"#
        ))
        .map_err(|_| MarkupError::InvalidElement(elements.join(",")))?;
        Ok(Self { pattern })
    }

    /// Rewrites the text content of every matching element.
    #[must_use]
    pub fn clean(&self, content: &str) -> CleanedMarkup {
        let mut rewritten = 0;
        let cleaned = self.pattern.replace_all(content, |caps: &Captures<'_>| {
            let whole = &caps[0];
            if caps[1] != caps[4] {
                return whole.to_string();
            }
            let text = &caps[3];
            if text.trim_start().starts_with("<![CDATA[") {
                return whole.to_string();
            }
            match escape_text(text) {
                Cow::Borrowed(_) => whole.to_string(),
                Cow::Owned(escaped) => {
                    rewritten += 1;
                    tracing::debug!(
                        element = &caps[1],
                        original = text,
                        escaped = %escaped,
                        "ontology_markup_escaped"
                    );
                    format!("<{}{}>{}</{}>", &caps[1], &caps[2], escaped, &caps[4])
                }
            }
        });
        CleanedMarkup {
            content: cleaned.into_owned(),
            rewritten,
        }
    }

    /// Cleans `input` and writes the result to `output`, or next to the input
    /// as `<stem>_cleaned.owl` when no output is given.
    ///
    /// # Errors
    /// Fails when the input cannot be read or the output cannot be written.
    pub fn clean_file(
        &self,
        input: &Path,
        output: Option<&Path>,
    ) -> Result<(PathBuf, usize), MarkupError> {
        let content = fs::read_to_string(input).map_err(|source| MarkupError::Io {
            path: input.to_path_buf(),
            source,
        })?;
        let output = output.map_or_else(|| default_cleaned_path(input), Path::to_path_buf);
        let cleaned = self.clean(&content);
        fs::write(&output, cleaned.content).map_err(|source| MarkupError::Io {
            path: output.clone(),
            source,
        })?;
        tracing::info!(
            input = %input.display(),
            output = %output.display(),
            rewritten = cleaned.rewritten,
            "ontology_markup_cleaned"
        );
        Ok((output, cleaned.rewritten))
    }
}

impl Default for MarkupCleaner {
    fn default() -> Self {
        Self::new(DEFAULT_ELEMENTS)
            .unwrap_or_else(|err| unreachable!("default element names are valid: {err}"))
    }
}

fn default_cleaned_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map_or_else(|| "ontology".to_string(), |s| s.to_string_lossy().into_owned());
    input.with_file_name(format!("{stem}_cleaned.owl"))
}
