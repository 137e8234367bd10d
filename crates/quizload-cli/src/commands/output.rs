//! Output formats for question listings.

use quizload_core::QuestionRecord;

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Plain text listing
    Text,
}

/// Render records in the requested format.
pub fn format_records(records: &[QuestionRecord], format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(records)?),
        OutputFormat::Csv => format_records_csv(records),
        OutputFormat::Text => Ok(format_records_text(records)),
    }
}

fn format_records_csv(records: &[QuestionRecord]) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record([
        "code",
        "category",
        "question",
        "options",
        "correct_option",
        "norma",
    ])?;

    for record in records {
        let options = serde_json::to_string(record.options())?;
        wtr.write_record([
            record.code(),
            record.category().as_str(),
            record.prompt(),
            options.as_str(),
            record.correct_label(),
            record.citation(),
        ])?;
    }

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_records_text(records: &[QuestionRecord]) -> String {
    let mut output = String::new();

    for record in records {
        output.push_str(&format!("[{}] {}\n", record.code(), record.prompt()));
        for (label, text) in record.options().iter() {
            let marker = if label == record.correct_label() { "*" } else { " " };
            output.push_str(&format!("  {} {}: {}\n", marker, label, text));
        }
        if !record.citation().is_empty() {
            output.push_str(&format!("  Norma: {}\n", record.citation()));
        }
        output.push('\n');
    }

    output
}
