use std::path::{Path, PathBuf};

use crate::foundation::error::{InsigniaError, InsigniaResult};

/// Encoded output format, chosen by the output target's file extension.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum ImageKind {
    Jpeg,
    Png,
}

impl ImageKind {
    /// Resolve the format from an output path extension. Anything other
    /// than `jpg` or `png` is rejected before any rendering work begins.
    pub fn from_path(path: &Path) -> InsigniaResult<Self> {
        let ext = path.extension().and_then(|e| e.to_str()).ok_or_else(|| {
            InsigniaError::invalid_extension(format!(
                "output path '{}' is missing an extension, e.g. out.png",
                path.display()
            ))
        })?;
        match ext.to_ascii_lowercase().as_str() {
            "jpg" => Ok(Self::Jpeg),
            "png" => Ok(Self::Png),
            other => Err(InsigniaError::invalid_extension(format!(
                "output extension must be 'jpg' or 'png', got '{other}'"
            ))),
        }
    }
}

/// Where the encoded image goes: a file path, or an in-memory byte stream.
#[derive(Clone, Debug)]
pub enum OutputTarget {
    File(PathBuf),
    Stream(ImageKind),
}

impl OutputTarget {
    pub fn kind(&self) -> InsigniaResult<ImageKind> {
        match self {
            Self::File(path) => ImageKind::from_path(path),
            Self::Stream(kind) => Ok(*kind),
        }
    }
}

/// The two text sides of the mark, as supplied by the caller.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct TextPair {
    pub left: String,
    pub right: String,
}

/// Validated engine input: newline-stripped, side-trimmed, non-empty.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NormalizedText {
    pub left: String,
    pub right: String,
}

/// Remove every newline sequence entirely (`\r\n`, `\n\r`, `\r`, `\n`);
/// nothing is substituted in their place. Idempotent.
pub fn strip_newlines(s: &str) -> String {
    s.chars().filter(|c| *c != '\r' && *c != '\n').collect()
}

/// Normalize both sides and reject empty input, before any layout work.
///
/// Leading whitespace is stripped from the left text and trailing
/// whitespace from the right text; interior spacing is preserved.
pub fn normalize_pair(pair: &TextPair) -> InsigniaResult<NormalizedText> {
    if pair.left.is_empty() || pair.right.is_empty() {
        return Err(InsigniaError::empty_text(
            "both left and right text are required",
        ));
    }

    let left = strip_newlines(&pair.left).trim_start().to_string();
    let right = strip_newlines(&pair.right).trim_end().to_string();
    if left.is_empty() || right.is_empty() {
        return Err(InsigniaError::empty_text(
            "text is empty after newline stripping and trimming",
        ));
    }

    Ok(NormalizedText { left, right })
}
