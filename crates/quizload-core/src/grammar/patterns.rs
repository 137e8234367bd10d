//! Tag patterns for the two question grammars.
//!
//! The `regex` crate has no lookahead, so blocks are first cut at every
//! identifying tag and each block is then matched as a whole.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Fixed-choice grammar (tags are case-sensitive). Single-letter tags
    // need a word boundary so that `A:` never matches the end of `NORMA:`.
    pub static ref FIXED_BLOCK_TAG: Regex = Regex::new(r"COD:").unwrap();

    pub static ref FIXED_BLOCK: Regex = Regex::new(
        r"(?s)^COD:\s*(?P<code>\S+)\s*PREGUNTA:\s*(?P<question>.*?)\s*\bA:\s*(?P<a>.*?)\s*\bB:\s*(?P<b>.*?)\s*\bC:\s*(?P<c>.*?)\s*\bD:\s*(?P<d>.*?)\s*\bSOLUCION:\s*(?P<correct>[A-D])\s*NORMA:\s*(?P<norma>.*?)\s*$"
    ).unwrap();

    pub static ref FIXED_CODE: Regex = Regex::new(r"^COD:\s*(\S+)").unwrap();

    pub static ref FIXED_TAG_SEQUENCE: Vec<(&'static str, Regex)> = [
        "PREGUNTA:", "A:", "B:", "C:", "D:", "SOLUCION:", "NORMA:",
    ]
    .iter()
    .map(|tag| (*tag, Regex::new(&format!(r"\b{}", regex::escape(tag))).unwrap()))
    .collect();

    pub static ref FIXED_ANSWER_TOKEN: Regex = Regex::new(
        r"(?s)SOLUCION:\s*(.*?)\s*NORMA:"
    ).unwrap();

    pub static ref FIXED_ANSWER: Regex = Regex::new(r"^[A-D]$").unwrap();

    // Variable-choice grammar (the whole pattern is case-insensitive,
    // label letters included)
    pub static ref VARIABLE_BLOCK_TAG: Regex = Regex::new(r"(?i)COD:").unwrap();

    pub static ref VARIABLE_BLOCK: Regex = Regex::new(
        r"(?is)^COD:\s*(?P<code>\S+)\s*PREGUNTA:\s*(?P<question>.*?)\s*(?P<responses>(?:RESPUESTA\s+[A-H]:.*?)+)SOLUCION:\s*RESPUESTA\s+(?P<correct>[A-H])\s*NORMA:\s*(?P<norma>.*?)\s*$"
    ).unwrap();

    pub static ref VARIABLE_CODE: Regex = Regex::new(r"(?i)^COD:\s*(\S+)").unwrap();

    pub static ref ALTERNATIVE_TAG: Regex = Regex::new(
        r"(?i)RESPUESTA\s+([A-H]):"
    ).unwrap();

    // An alternative body also ends at the answer tag
    pub static ref ANSWER_TAG: Regex = Regex::new(r"(?i)SOLUCION:").unwrap();

    pub static ref VARIABLE_TAG_SEQUENCE: Vec<(&'static str, Regex)> = vec![
        ("PREGUNTA:", Regex::new(r"(?i)PREGUNTA:").unwrap()),
        ("RESPUESTA <label>:", (*ALTERNATIVE_TAG).clone()),
        ("SOLUCION:", Regex::new(r"(?i)SOLUCION:").unwrap()),
        ("NORMA:", Regex::new(r"(?i)NORMA:").unwrap()),
    ];

    pub static ref VARIABLE_ANSWER_TOKEN: Regex = Regex::new(
        r"(?is)SOLUCION:\s*(.*?)\s*NORMA:"
    ).unwrap();

    pub static ref VARIABLE_ANSWER: Regex = Regex::new(r"(?i)^RESPUESTA\s+[A-H]$").unwrap();
}
