//! Grammar extraction of question blocks from plain text.

mod fixed;
mod variable;
pub mod patterns;

pub use fixed::FixedChoiceExtractor;
pub use variable::VariableChoiceExtractor;

use regex::Regex;
use serde::Serialize;
use thiserror::Error;

use crate::models::question::{Category, QuestionRecord};

/// Trait for grammar-specific question extractors.
pub trait GrammarExtractor {
    /// Category every produced record belongs to.
    fn category(&self) -> Category;

    /// Extract one candidate record per matched block.
    ///
    /// Regions that do not fit the grammar are excluded from the candidates
    /// and reported as mismatches; extraction itself never fails.
    fn extract(&self, text: &str) -> Extraction;
}

/// Output of a grammar extractor over one text.
#[derive(Debug, Clone, Default)]
pub struct Extraction {
    /// Candidate records, in source order.
    pub candidates: Vec<QuestionRecord>,
    /// Regions that were excluded.
    pub mismatches: Vec<GrammarMismatch>,
}

/// Diagnostic for a region of text that did not fit the grammar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GrammarMismatch {
    /// Byte offset of the region in the source text.
    pub offset: usize,
    /// Code of the block, when one could be read.
    pub code: Option<String>,
    pub reason: MismatchReason,
}

/// Why a region was excluded.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MismatchReason {
    /// Non-blank text that precedes the first block.
    #[error("text outside any question block")]
    Unanchored,

    #[error("missing question code")]
    MissingCode,

    /// A required tag is absent (tags are expected in grammar order).
    #[error("missing {0} tag")]
    MissingTag(&'static str),

    #[error("invalid answer token {0:?}")]
    InvalidAnswer(String),

    /// Every tag is present but the block still does not fit.
    #[error("block does not match the grammar")]
    Malformed,
}

/// A slice of source text starting at an identifying tag.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Block<'a> {
    pub offset: usize,
    pub text: &'a str,
}

/// Cut `text` at every occurrence of the identifying tag.
///
/// Returns the non-blank text before the first tag (if any) and the blocks.
/// Each block runs up to the next tag or the end of input.
pub(crate) fn split_blocks<'a>(text: &'a str, tag: &Regex) -> (Option<Block<'a>>, Vec<Block<'a>>) {
    let starts: Vec<usize> = tag.find_iter(text).map(|m| m.start()).collect();

    let head_end = starts.first().copied().unwrap_or(text.len());
    let head = &text[..head_end];
    let leading = head
        .find(|c: char| !c.is_whitespace())
        .map(|offset| Block {
            offset,
            text: head[offset..].trim_end(),
        });

    let blocks = starts
        .iter()
        .enumerate()
        .map(|(i, &start)| {
            let end = starts.get(i + 1).copied().unwrap_or(text.len());
            Block {
                offset: start,
                text: &text[start..end],
            }
        })
        .collect();

    (leading, blocks)
}

/// Read the code token of a block, ignoring a tag sitting in its place.
pub(crate) fn block_code(block: &str, code_pattern: &Regex) -> Option<String> {
    code_pattern
        .captures(block)
        .map(|caps| caps[1].to_string())
        .filter(|code| !code.to_uppercase().starts_with("PREGUNTA:"))
}

/// Name the first tag of `sequence` that cannot be found in order.
pub(crate) fn first_missing_tag(block: &str, sequence: &[(&'static str, Regex)]) -> Option<&'static str> {
    let mut pos = 0;
    for (name, pattern) in sequence {
        match pattern.find_at(block, pos) {
            Some(m) => pos = m.end(),
            None => return Some(name),
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::patterns::FIXED_BLOCK_TAG;

    #[test]
    fn test_split_blocks() {
        let text = "header\n\nCOD: 1 first COD: 2 second";
        let (leading, blocks) = split_blocks(text, &FIXED_BLOCK_TAG);

        let leading = leading.unwrap();
        assert_eq!(leading.offset, 0);
        assert_eq!(leading.text, "header");

        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].text, "COD: 1 first ");
        assert_eq!(blocks[1].offset, 21);
        assert_eq!(blocks[1].text, "COD: 2 second");
    }

    #[test]
    fn test_split_blocks_blank_head() {
        let (leading, blocks) = split_blocks("  \n COD: 1", &FIXED_BLOCK_TAG);
        assert!(leading.is_none());
        assert_eq!(blocks.len(), 1);
    }

    #[test]
    fn test_split_blocks_without_tag() {
        let (leading, blocks) = split_blocks("  just prose", &FIXED_BLOCK_TAG);
        assert_eq!(leading.unwrap().offset, 2);
        assert!(blocks.is_empty());

        let (leading, blocks) = split_blocks("", &FIXED_BLOCK_TAG);
        assert!(leading.is_none());
        assert!(blocks.is_empty());
    }

    #[test]
    fn test_block_code_skips_tag() {
        let pattern = Regex::new(r"^COD:\s*(\S+)").unwrap();
        assert_eq!(block_code("COD: T9 PREGUNTA:", &pattern), Some("T9".to_string()));
        assert_eq!(block_code("COD: PREGUNTA: x", &pattern), None);
        assert_eq!(block_code("COD:   ", &pattern), None);
    }
}
