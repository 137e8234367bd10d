//! Variable-choice grammar: two to eight alternatives labeled A-H.
//!
//! Extraction runs in two phases. The block pattern captures the whole run
//! of `RESPUESTA <label>:` entries as one span; that span is then cut at
//! every alternative tag. Tag keywords match regardless of case, and so do
//! the label letters. Labels are kept as written unless label case
//! normalization is enabled.

use tracing::debug;

use crate::models::question::{Category, Options, QuestionRecord};

use super::patterns::{
    ALTERNATIVE_TAG, ANSWER_TAG, VARIABLE_ANSWER, VARIABLE_ANSWER_TOKEN, VARIABLE_BLOCK,
    VARIABLE_BLOCK_TAG, VARIABLE_CODE, VARIABLE_TAG_SEQUENCE,
};
use super::{
    block_code, first_missing_tag, split_blocks, Block, Extraction, GrammarExtractor,
    GrammarMismatch, MismatchReason,
};

/// Extractor for `COD: / PREGUNTA: / RESPUESTA X: ... / SOLUCION: / NORMA:` blocks.
#[derive(Debug, Clone, Default)]
pub struct VariableChoiceExtractor {
    /// Upper-case labels and the answer label.
    normalize_label_case: bool,
}

impl VariableChoiceExtractor {
    /// Create an extractor that keeps label letters verbatim.
    pub fn new() -> Self {
        Self {
            normalize_label_case: false,
        }
    }

    /// Set label case normalization.
    pub fn with_label_case_normalization(mut self, normalize: bool) -> Self {
        self.normalize_label_case = normalize;
        self
    }

    fn extract_block(&self, block: Block<'_>) -> Result<QuestionRecord, GrammarMismatch> {
        let Some(caps) = VARIABLE_BLOCK.captures(block.text) else {
            return Err(GrammarMismatch {
                offset: block.offset,
                code: block_code(block.text, &VARIABLE_CODE),
                reason: self.diagnose(block.text),
            });
        };

        let code = caps["code"].trim();
        let options = self.split_alternatives(code, &caps["responses"]);

        Ok(QuestionRecord::new(
            code,
            Category::VariableChoice,
            caps["question"].trim(),
            options,
            self.label(caps["correct"].trim()),
            caps["norma"].trim(),
        ))
    }

    /// Cut the alternatives span at each label tag.
    ///
    /// An entry ends at the next tag, at a stray answer tag, or at the end
    /// of the span.
    fn split_alternatives(&self, code: &str, span: &str) -> Options {
        let tags: Vec<(usize, usize, String)> = ALTERNATIVE_TAG
            .captures_iter(span)
            .filter_map(|caps| {
                let tag = caps.get(0)?;
                Some((tag.start(), tag.end(), caps[1].to_string()))
            })
            .collect();

        let mut options = Options::new();
        for (i, (_, body_start, label)) in tags.iter().enumerate() {
            let body_end = tags.get(i + 1).map(|(start, _, _)| *start).unwrap_or(span.len());
            let raw = &span[*body_start..body_end];
            let raw = ANSWER_TAG.find(raw).map_or(raw, |m| &raw[..m.start()]);
            let body = normalize_body(raw);

            if options.insert(self.label(label), body).is_some() {
                debug!("Block {} repeats label {}; keeping the last text", code, label);
            }
        }
        options
    }

    fn label(&self, label: &str) -> String {
        if self.normalize_label_case {
            label.to_uppercase()
        } else {
            label.to_string()
        }
    }

    fn diagnose(&self, block: &str) -> MismatchReason {
        if block_code(block, &VARIABLE_CODE).is_none() {
            return MismatchReason::MissingCode;
        }
        if let Some(tag) = first_missing_tag(block, &VARIABLE_TAG_SEQUENCE) {
            return MismatchReason::MissingTag(tag);
        }
        if let Some(caps) = VARIABLE_ANSWER_TOKEN.captures(block) {
            let token = caps[1].trim();
            if !VARIABLE_ANSWER.is_match(token) {
                return MismatchReason::InvalidAnswer(token.to_string());
            }
        }
        MismatchReason::Malformed
    }
}

/// Trim an alternative body and fold its line breaks into spaces.
fn normalize_body(body: &str) -> String {
    body.trim().replace("\r\n", " ").replace('\n', " ")
}

impl GrammarExtractor for VariableChoiceExtractor {
    fn category(&self) -> Category {
        Category::VariableChoice
    }

    fn extract(&self, text: &str) -> Extraction {
        let (leading, blocks) = split_blocks(text, &VARIABLE_BLOCK_TAG);
        let mut extraction = Extraction::default();

        if let Some(leading) = leading {
            extraction.mismatches.push(GrammarMismatch {
                offset: leading.offset,
                code: None,
                reason: MismatchReason::Unanchored,
            });
        }

        for block in blocks {
            match self.extract_block(block) {
                Ok(record) => {
                    debug!(
                        "Matched variable-choice block {} with {} alternatives",
                        record.code(),
                        record.options().len()
                    );
                    extraction.candidates.push(record);
                }
                Err(mismatch) => {
                    debug!("Variable-choice block at offset {} excluded: {}", mismatch.offset, mismatch.reason);
                    extraction.mismatches.push(mismatch);
                }
            }
        }

        extraction
    }
}
