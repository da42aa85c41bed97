//! Code extraction from completion text.
//!
//! Completions usually wrap code in Markdown fences. A marker tagged with the
//! wanted language is found on its own, whatever came before it. Otherwise the
//! scanner walks fence markers left to right and tracks whether it is outside a
//! fence, inside a fence tagged with the wanted language, or inside any other fence.

use crate::error::GenerationError;

const FENCE: &str = "```";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FenceKind {
    /// Opened with the wanted language tag.
    Tagged,
    /// Untagged, or tagged with some other language.
    Generic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FenceState {
    Outside,
    InsideTagged { body_start: usize, marker: usize },
    InsideGeneric { body_start: usize, marker: usize },
}

/// A fenced block found in the text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FencedBlock<'a> {
    pub kind: FenceKind,
    pub body: &'a str,
    pub closed: bool,
    /// Byte offset of the opening marker.
    pub marker: usize,
}

#[derive(Debug, Clone)]
pub struct FenceScanner {
    language: String,
}

impl FenceScanner {
    pub fn new(language: &str) -> Self {
        Self { language: language.to_ascii_lowercase() }
    }

    /// All fenced blocks in order of appearance. An unclosed fence runs to end of text.
    pub fn blocks<'a>(&self, text: &'a str) -> Vec<FencedBlock<'a>> {
        let mut blocks = Vec::new();
        let mut state = FenceState::Outside;
        let mut pos = 0;

        while let Some(found) = text[pos..].find(FENCE) {
            let marker = pos + found;
            let after = marker + FENCE.len();
            match state {
                FenceState::Outside => {
                    let (kind, body_start) = self.open_fence(text, after);
                    state = match kind {
                        FenceKind::Tagged => FenceState::InsideTagged { body_start, marker },
                        FenceKind::Generic => FenceState::InsideGeneric { body_start, marker },
                    };
                    pos = body_start;
                }
                FenceState::InsideTagged { body_start, marker: open }
                | FenceState::InsideGeneric { body_start, marker: open } => {
                    let kind = match state {
                        FenceState::InsideTagged { .. } => FenceKind::Tagged,
                        _ => FenceKind::Generic,
                    };
                    blocks.push(FencedBlock {
                        kind,
                        body: &text[body_start..marker],
                        closed: true,
                        marker: open,
                    });
                    state = FenceState::Outside;
                    pos = after;
                }
            }
        }

        match state {
            FenceState::Outside => {}
            FenceState::InsideTagged { body_start, marker } => blocks.push(FencedBlock {
                kind: FenceKind::Tagged,
                body: &text[body_start..],
                closed: false,
                marker,
            }),
            FenceState::InsideGeneric { body_start, marker } => blocks.push(FencedBlock {
                kind: FenceKind::Generic,
                body: &text[body_start..],
                closed: false,
                marker,
            }),
        }
        blocks
    }

    /// Classify an opening marker and find where its body starts.
    ///
    /// A tag equal to the wanted language always counts, even with code on the
    /// same line. Any other word is an info string only when it is alone on the
    /// opening line; otherwise it belongs to the body.
    fn open_fence(&self, text: &str, after: usize) -> (FenceKind, usize) {
        let rest = &text[after..];
        let tag_len = rest
            .find(|c: char| !(c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '+' | '.')))
            .unwrap_or(rest.len());
        let tag = &rest[..tag_len];
        if tag.is_empty() {
            return (FenceKind::Generic, after);
        }
        if tag.eq_ignore_ascii_case(&self.language) {
            return (FenceKind::Tagged, after + tag_len);
        }
        let line_rest = rest[tag_len..].split('\n').next().unwrap_or("");
        if line_rest.trim().is_empty() {
            (FenceKind::Generic, after + tag_len)
        } else {
            (FenceKind::Generic, after)
        }
    }

    /// First marker carrying the wanted tag, with its body up to the next marker.
    ///
    /// Markers are not paired here: a completion that closes the fence opened
    /// by the prompt shifts every later marker by one.
    pub fn tagged_block<'a>(&self, text: &'a str) -> Option<FencedBlock<'a>> {
        let mut pos = 0;
        while let Some(found) = text[pos..].find(FENCE) {
            let marker = pos + found;
            let after = marker + FENCE.len();
            if let (FenceKind::Tagged, body_start) = self.open_fence(text, after) {
                let (end, closed) = match text[body_start..].find(FENCE) {
                    Some(n) => (body_start + n, true),
                    None => (text.len(), false),
                };
                return Some(FencedBlock {
                    kind: FenceKind::Tagged,
                    body: &text[body_start..end],
                    closed,
                    marker,
                });
            }
            pos = after;
        }
        None
    }

    /// The code a completion carries, untrimmed.
    pub fn extract<'a>(&self, text: &'a str) -> &'a str {
        if let Some(tagged) = self.tagged_block(text) {
            return tagged.body;
        }
        let blocks = self.blocks(text);
        if let Some(generic) = blocks.first() {
            // The prompt opens a fence itself, so a single unpaired marker after
            // some text closes it and whatever follows is commentary.
            let before = &text[..generic.marker];
            if blocks.len() == 1 && !generic.closed && !before.trim().is_empty() {
                return before;
            }
            return generic.body;
        }
        text
    }
}

/// Extract and trim program text, rejecting degenerate results.
pub fn extract_program(text: &str, language: &str, min_len: usize) -> Result<String, GenerationError> {
    let code = FenceScanner::new(language).extract(text).trim();
    let len = code.chars().count();
    if code.is_empty() || len < min_len {
        return Err(GenerationError::TooShort { len });
    }
    Ok(code.to_string())
}
