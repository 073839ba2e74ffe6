use crate::core::{BatchSummary, Reporter, RosterRow, SendOutcome};
use crate::utils::error::Result;
use serde_json::json;
use std::io::{self, Write};

/// 每個事件輸出一行 JSON，給表單或其他程式讀取
pub struct JsonLinesReporter<W: Write> {
    writer: W,
}

impl JsonLinesReporter<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> JsonLinesReporter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    fn emit(&mut self, value: serde_json::Value) -> Result<()> {
        serde_json::to_writer(&mut self.writer, &value)?;
        writeln!(self.writer)?;
        self.writer.flush()?;
        Ok(())
    }
}

impl<W: Write> Reporter for JsonLinesReporter<W> {
    fn report_progress(&mut self, index: usize, total: usize, student: &RosterRow) -> Result<()> {
        self.emit(json!({
            "event": "progress",
            "index": index,
            "total": total,
            "name": student.name,
        }))
    }

    fn report_result(&mut self, student: &RosterRow, outcome: &SendOutcome) -> Result<()> {
        self.emit(json!({
            "event": "result",
            "name": student.name,
            "email": student.email,
            "outcome": outcome,
        }))
    }

    fn report_summary(&mut self, summary: &BatchSummary) -> Result<()> {
        self.emit(json!({
            "event": "summary",
            "summary": summary,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[test]
    fn test_result_events_carry_outcome() {
        let mut reporter = JsonLinesReporter::new(Vec::new());
        let bob = RosterRow::new("Bob", "b@x.com", Some(0.0));

        reporter.report_progress(1, 1, &bob).unwrap();
        reporter
            .report_result(&bob, &SendOutcome::Failure("timeout".to_string()))
            .unwrap();

        let output = String::from_utf8(reporter.into_inner()).unwrap();
        let events: Vec<Value> = output
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();

        assert_eq!(events.len(), 2);
        assert_eq!(events[0]["event"], "progress");
        assert_eq!(events[0]["index"], 1);
        assert_eq!(events[1]["event"], "result");
        assert_eq!(events[1]["outcome"]["status"], "failure");
        assert_eq!(events[1]["outcome"]["reason"], "timeout");
    }

    #[test]
    fn test_summary_event() {
        let mut reporter = JsonLinesReporter::new(Vec::new());
        let mut summary = BatchSummary::start(1);
        summary.record(&SendOutcome::Success);
        reporter.report_summary(&summary.finish()).unwrap();

        let output = String::from_utf8(reporter.into_inner()).unwrap();
        let event: Value = serde_json::from_str(output.trim()).unwrap();

        assert_eq!(event["summary"]["success_count"], 1);
        assert_eq!(event["summary"]["error_count"], 0);
        assert_eq!(event["summary"]["cancelled"], false);
    }
}
