use serde::{Deserialize, Serialize};

/// A contiguous piece of rich text sharing one font treatment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextRun {
    pub text: String,
    #[serde(default)]
    pub underline: bool,
}

/// Cell text made of runs, some of them underlined
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RichText {
    pub runs: Vec<TextRun>,
}

/// Result of underlining substrings in a text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Underlined<'a> {
    pub text: RichText,
    /// Substrings that had no match after the previous match
    pub missing: Vec<&'a str>,
}

impl RichText {
    /// Plain text as a single run
    pub fn plain(text: impl Into<String>) -> Self {
        RichText {
            runs: vec![TextRun {
                text: text.into(),
                underline: false,
            }],
        }
    }

    /// Underline `substrings` of `text` in order.
    ///
    /// Each search starts where the previous match ended, so repeated
    /// substrings underline successive occurrences. Missing substrings leave
    /// the search position where it was.
    pub fn underline<'a, S: AsRef<str>>(text: &str, substrings: &'a [S]) -> Underlined<'a> {
        let mut runs = Vec::new();
        let mut missing = Vec::new();
        let mut pos = 0;

        for needle in substrings {
            let needle = needle.as_ref();
            if needle.is_empty() {
                continue;
            }
            let Some(offset) = text[pos..].find(needle) else {
                missing.push(needle);
                continue;
            };
            let start = pos + offset;
            let end = start + needle.len();
            if start > pos {
                runs.push(TextRun {
                    text: text[pos..start].to_string(),
                    underline: false,
                });
            }
            runs.push(TextRun {
                text: text[start..end].to_string(),
                underline: true,
            });
            pos = end;
        }

        if pos < text.len() || runs.is_empty() {
            runs.push(TextRun {
                text: text[pos..].to_string(),
                underline: false,
            });
        }

        Underlined {
            text: RichText { runs },
            missing,
        }
    }

    /// The full text with formatting removed
    pub fn to_plain_string(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }
}
