#![allow(dead_code)]

use async_trait::async_trait;
use roster_notify::core::{BatchSummary, Credential, MailTransport, OutgoingEmail, Reporter, RosterRow, SendOutcome};
use roster_notify::{NotifyError, Result};
use rust_xlsxwriter::Workbook;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// 依標題列建立 .xlsx；`Percentage` 為 `None` 時留空白
pub fn student_workbook(headers: &[&str], rows: &[(&str, &str, Option<f64>)]) -> Vec<u8> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    for (col, header) in headers.iter().enumerate() {
        worksheet.write_string(0, col as u16, *header).unwrap();
    }

    for (r, (name, email, percentage)) in rows.iter().enumerate() {
        let row = (r + 1) as u32;
        for (col, header) in headers.iter().enumerate() {
            let col = col as u16;
            match *header {
                "Name" => {
                    worksheet.write_string(row, col, *name).unwrap();
                }
                "Email" => {
                    worksheet.write_string(row, col, *email).unwrap();
                }
                "Percentage" => {
                    if let Some(value) = percentage {
                        worksheet.write_number(row, col, *value).unwrap();
                    }
                }
                _ => {
                    worksheet.write_string(row, col, "extra").unwrap();
                }
            }
        }
    }

    workbook.save_to_buffer().unwrap()
}

pub fn write_workbook(dir: &Path, file_name: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.join(file_name);
    std::fs::write(&path, bytes).unwrap();
    path
}

/// 記錄每次寄送；收件者在 `reject` 內的會回傳錯誤
#[derive(Default)]
pub struct MockTransport {
    pub delivered: Mutex<Vec<OutgoingEmail>>,
    pub reject: HashSet<String>,
}

impl MockTransport {
    pub fn rejecting(recipients: &[&str]) -> Self {
        Self {
            delivered: Mutex::new(Vec::new()),
            reject: recipients.iter().map(|r| r.to_string()).collect(),
        }
    }

    pub fn recipients(&self) -> Vec<String> {
        self.delivered
            .lock()
            .unwrap()
            .iter()
            .map(|email| email.to.clone())
            .collect()
    }
}

#[async_trait]
impl MailTransport for MockTransport {
    async fn deliver(&self, email: &OutgoingEmail, _credential: &Credential) -> Result<()> {
        self.delivered.lock().unwrap().push(email.clone());
        if self.reject.contains(&email.to) {
            return Err(NotifyError::Config {
                message: "550 mailbox unavailable".to_string(),
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Progress(usize, usize, String),
    Result(String, SendOutcome),
    Summary(usize, usize),
}

/// 依序記錄 reporter 收到的事件
#[derive(Default)]
pub struct RecordingReporter {
    pub events: Vec<Event>,
}

impl Reporter for RecordingReporter {
    fn report_progress(&mut self, index: usize, total: usize, student: &RosterRow) -> Result<()> {
        self.events
            .push(Event::Progress(index, total, student.name.clone()));
        Ok(())
    }

    fn report_result(&mut self, student: &RosterRow, outcome: &SendOutcome) -> Result<()> {
        self.events
            .push(Event::Result(student.name.clone(), outcome.clone()));
        Ok(())
    }

    fn report_summary(&mut self, summary: &BatchSummary) -> Result<()> {
        self.events
            .push(Event::Summary(summary.success_count, summary.error_count));
        Ok(())
    }
}
