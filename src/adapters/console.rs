use crate::core::{BatchSummary, Credential, InputProvider, Reporter, RosterRow, RosterSource, SendOutcome};
use crate::utils::error::Result;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

pub const CREDENTIAL_PROMPT: &str = "Enter your Gmail App Password: ";
pub const SOURCE_PROMPT: &str = "Enter the path to your Excel file: ";

/// 逐行提示輸入。已從命令列取得的值不會再詢問。
pub struct PromptInput<R: BufRead, W: Write> {
    reader: R,
    writer: W,
    credential: Option<String>,
    path: Option<String>,
}

impl PromptInput<io::StdinLock<'static>, io::Stdout> {
    pub fn stdio(credential: Option<String>, path: Option<String>) -> Self {
        Self::new(io::stdin().lock(), io::stdout(), credential, path)
    }
}

impl<R: BufRead, W: Write> PromptInput<R, W> {
    pub fn new(reader: R, writer: W, credential: Option<String>, path: Option<String>) -> Self {
        Self {
            reader,
            writer,
            credential,
            path,
        }
    }

    fn prompt(&mut self, question: &str) -> Result<String> {
        write!(self.writer, "{}", question)?;
        self.writer.flush()?;

        let mut line = String::new();
        self.reader.read_line(&mut line)?;
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }
}

impl<R: BufRead, W: Write> InputProvider for PromptInput<R, W> {
    fn read_credential(&mut self) -> Result<Credential> {
        let secret = match self.credential.take() {
            Some(secret) => secret,
            None => self.prompt(CREDENTIAL_PROMPT)?,
        };
        Ok(Credential::new(secret))
    }

    fn read_source(&mut self) -> Result<RosterSource> {
        let path = match self.path.take() {
            Some(path) => path,
            None => self.prompt(SOURCE_PROMPT)?.trim().to_string(),
        };

        Ok(RosterSource::Path(PathBuf::from(path)))
    }
}

/// 憑證與名冊都已事先設定好 (設定檔或上傳表單)
pub struct PresetInput {
    credential: Credential,
    source: RosterSource,
}

impl PresetInput {
    pub fn new(credential: Credential, source: RosterSource) -> Self {
        Self { credential, source }
    }
}

impl InputProvider for PresetInput {
    fn read_credential(&mut self) -> Result<Credential> {
        Ok(self.credential.clone())
    }

    fn read_source(&mut self) -> Result<RosterSource> {
        Ok(self.source.clone())
    }
}

/// 逐筆輸出處理進度與結果
pub struct ConsoleReporter<W: Write> {
    writer: W,
}

impl ConsoleReporter<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> ConsoleReporter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> Reporter for ConsoleReporter<W> {
    fn report_progress(&mut self, index: usize, total: usize, student: &RosterRow) -> Result<()> {
        writeln!(self.writer, "Processing {}/{}: {}", index, total, student.name)?;
        Ok(())
    }

    fn report_result(&mut self, student: &RosterRow, outcome: &SendOutcome) -> Result<()> {
        match outcome {
            SendOutcome::Success => writeln!(
                self.writer,
                "✅ Email sent to {} ({})",
                student.name, student.email
            )?,
            SendOutcome::Failure(reason) => writeln!(
                self.writer,
                "❌ Failed to send email to {}: {}",
                student.name, reason
            )?,
        }
        self.writer.flush()?;
        Ok(())
    }

    fn report_summary(&mut self, summary: &BatchSummary) -> Result<()> {
        if summary.selected == 0 {
            writeln!(self.writer, "No students with 0% completion found.")?;
            return Ok(());
        }

        writeln!(self.writer)?;
        if summary.success_count > 0 {
            writeln!(
                self.writer,
                "🎉 Successfully sent {} emails!",
                summary.success_count
            )?;
        }
        if summary.error_count > 0 {
            writeln!(self.writer, "⚠️ Failed to send {} emails.", summary.error_count)?;
        }
        if summary.cancelled {
            writeln!(
                self.writer,
                "⏹️ Cancelled after {}/{} students.",
                summary.attempted, summary.selected
            )?;
        }
        Ok(())
    }
}
