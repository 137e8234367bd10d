//! Fixed-choice grammar: four alternatives A-D and a single-letter answer.

use tracing::debug;

use crate::models::question::{Category, Options, QuestionRecord};

use super::patterns::{
    FIXED_ANSWER, FIXED_ANSWER_TOKEN, FIXED_BLOCK, FIXED_BLOCK_TAG, FIXED_CODE, FIXED_TAG_SEQUENCE,
};
use super::{
    block_code, first_missing_tag, split_blocks, Block, Extraction, GrammarExtractor,
    GrammarMismatch, MismatchReason,
};

/// Extractor for `COD: / PREGUNTA: / A:..D: / SOLUCION: / NORMA:` blocks.
#[derive(Debug, Clone, Default)]
pub struct FixedChoiceExtractor;

impl FixedChoiceExtractor {
    pub fn new() -> Self {
        Self
    }

    fn extract_block(&self, block: Block<'_>) -> Result<QuestionRecord, GrammarMismatch> {
        let Some(caps) = FIXED_BLOCK.captures(block.text) else {
            return Err(GrammarMismatch {
                offset: block.offset,
                code: block_code(block.text, &FIXED_CODE),
                reason: self.diagnose(block.text),
            });
        };

        let options: Options = ["a", "b", "c", "d"]
            .iter()
            .map(|group| (group.to_uppercase(), caps[*group].trim().to_string()))
            .collect();

        Ok(QuestionRecord::new(
            caps["code"].trim(),
            Category::FixedChoice,
            caps["question"].trim(),
            options,
            caps["correct"].trim(),
            caps["norma"].trim(),
        ))
    }

    fn diagnose(&self, block: &str) -> MismatchReason {
        if block_code(block, &FIXED_CODE).is_none() {
            return MismatchReason::MissingCode;
        }
        if let Some(tag) = first_missing_tag(block, &FIXED_TAG_SEQUENCE) {
            return MismatchReason::MissingTag(tag);
        }
        if let Some(caps) = FIXED_ANSWER_TOKEN.captures(block) {
            let token = caps[1].trim();
            if !FIXED_ANSWER.is_match(token) {
                return MismatchReason::InvalidAnswer(token.to_string());
            }
        }
        MismatchReason::Malformed
    }
}

impl GrammarExtractor for FixedChoiceExtractor {
    fn category(&self) -> Category {
        Category::FixedChoice
    }

    fn extract(&self, text: &str) -> Extraction {
        let (leading, blocks) = split_blocks(text, &FIXED_BLOCK_TAG);
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
                    debug!("Matched fixed-choice block {} at offset {}", record.code(), block.offset);
                    extraction.candidates.push(record);
                }
                Err(mismatch) => {
                    debug!("Fixed-choice block at offset {} excluded: {}", mismatch.offset, mismatch.reason);
                    extraction.mismatches.push(mismatch);
                }
            }
        }

        extraction
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn block(code: &str, answer: &str) -> String {
        format!(
            "COD: {code}\nPREGUNTA: Question {code}?\nA: one\nB: two\nC: three\nD: four\nSOLUCION: {answer}\nNORMA: Rule {code}\n"
        )
    }

    #[test]
    fn test_inline_blocks() {
        let text = "COD: T001 PREGUNTA: 2+2? A: 3 B: 4 C: 5 D: 6 SOLUCION: B NORMA: Math COD: T002 ...";
        let extraction = FixedChoiceExtractor::new().extract(text);

        let expected = QuestionRecord::new(
            "T001",
            Category::FixedChoice,
            "2+2?",
            [("A", "3"), ("B", "4"), ("C", "5"), ("D", "6")].into_iter().collect(),
            "B",
            "Math",
        );
        assert_eq!(extraction.candidates, vec![expected]);

        assert_eq!(extraction.mismatches.len(), 1);
        assert_eq!(extraction.mismatches[0].code.as_deref(), Some("T002"));
        assert_eq!(extraction.mismatches[0].reason, MismatchReason::MissingTag("PREGUNTA:"));
    }

    #[test]
    fn test_multiline_blocks() {
        let text = format!("{}\n{}", block("T1", "A"), block("T2", "D"));
        let extraction = FixedChoiceExtractor::new().extract(&text);

        assert_eq!(extraction.candidates.len(), 2);
        assert!(extraction.mismatches.is_empty());

        for record in &extraction.candidates {
            let labels: Vec<&str> = record.options().labels().collect();
            assert_eq!(labels, vec!["A", "B", "C", "D"]);
            assert!(record.options().contains_label(record.correct_label()));
        }
        assert_eq!(extraction.candidates[1].code(), "T2");
        assert_eq!(extraction.candidates[1].correct_label(), "D");
        assert_eq!(extraction.candidates[1].citation(), "Rule T2");
    }

    #[test]
    fn test_fields_spanning_lines_are_trimmed() {
        let text = "COD: T7\nPREGUNTA:\n  Which rule\n  applies?\nA:  first  \nB: second\nC: third\nD: fourth\nSOLUCION: C\nNORMA:\n";
        let extraction = FixedChoiceExtractor::new().extract(text);

        let record = &extraction.candidates[0];
        assert_eq!(record.prompt(), "Which rule\n  applies?");
        assert_eq!(record.options().get("A"), Some("first"));
        assert_eq!(record.citation(), "");
    }

    #[test]
    fn test_missing_alternative_yields_nothing() {
        let text = "COD: T3 PREGUNTA: q? A: 1 B: 2 D: 4 SOLUCION: A NORMA: n";
        let extraction = FixedChoiceExtractor::new().extract(text);

        assert!(extraction.candidates.is_empty());
        assert_eq!(extraction.mismatches[0].reason, MismatchReason::MissingTag("C:"));
    }

    #[test]
    fn test_missing_first_alternative_is_named() {
        let text = "COD: T1 PREGUNTA: q B: 2 C: 3 D: 4 SOLUCION: A NORMA: n";
        let extraction = FixedChoiceExtractor::new().extract(text);

        assert!(extraction.candidates.is_empty());
        assert_eq!(extraction.mismatches[0].reason, MismatchReason::MissingTag("A:"));
    }

    #[test]
    fn test_invalid_answer_yields_nothing() {
        let text = format!("{}{}", block("T4", "E"), block("T5", "AB"));
        let extraction = FixedChoiceExtractor::new().extract(&text);

        assert!(extraction.candidates.is_empty());
        assert_eq!(
            extraction.mismatches.iter().map(|m| m.reason.clone()).collect::<Vec<_>>(),
            vec![
                MismatchReason::InvalidAnswer("E".to_string()),
                MismatchReason::InvalidAnswer("AB".to_string()),
            ]
        );
    }

    #[test]
    fn test_bad_block_does_not_swallow_next() {
        let text = format!("COD: T6 PREGUNTA: broken A: x\n{}", block("T8", "B"));
        let extraction = FixedChoiceExtractor::new().extract(&text);

        assert_eq!(extraction.candidates.len(), 1);
        assert_eq!(extraction.candidates[0].code(), "T8");
        assert_eq!(extraction.mismatches[0].code.as_deref(), Some("T6"));
    }

    #[test]
    fn test_lowercase_tags_do_not_match() {
        let text = "cod: T9 pregunta: q A: 1 B: 2 C: 3 D: 4 solucion: A norma: n";
        let extraction = FixedChoiceExtractor::new().extract(text);

        assert!(extraction.candidates.is_empty());
        assert_eq!(extraction.mismatches[0].reason, MismatchReason::Unanchored);
    }

    #[test]
    fn test_leading_text_is_reported() {
        let text = format!("Tema 1\n\n{}", block("T10", "A"));
        let extraction = FixedChoiceExtractor::new().extract(&text);

        assert_eq!(extraction.candidates.len(), 1);
        assert_eq!(extraction.mismatches[0].reason, MismatchReason::Unanchored);
        assert_eq!(extraction.mismatches[0].offset, 0);
    }

    #[test]
    fn test_missing_code() {
        let text = "COD: PREGUNTA: q A: 1 B: 2 C: 3 D: 4 SOLUCION: A NORMA: n";
        let extraction = FixedChoiceExtractor::new().extract(text);

        assert!(extraction.candidates.is_empty());
        assert_eq!(extraction.mismatches[0].reason, MismatchReason::MissingCode);
    }

    #[test]
    fn test_empty_input() {
        let extraction = FixedChoiceExtractor::new().extract("");
        assert!(extraction.candidates.is_empty());
        assert!(extraction.mismatches.is_empty());
    }
}
