use crate::domain::model::{BatchSummary, Credential, OutgoingEmail, RosterRow, RosterSource, SendOutcome};
use crate::utils::error::Result;
use async_trait::async_trait;

/// 通知流程所需的明確設定，不再有隱藏的預設寄件者
pub trait ConfigProvider: Send + Sync {
    fn sender_address(&self) -> &str;
    fn subject(&self) -> &str;
    fn template(&self) -> &str;
}

/// 一次 relay 連線：握手、登入、送出一封信、關閉
#[async_trait]
pub trait MailTransport: Send + Sync {
    async fn deliver(&self, email: &OutgoingEmail, credential: &Credential) -> Result<()>;
}

pub trait InputProvider {
    fn read_credential(&mut self) -> Result<Credential>;
    fn read_source(&mut self) -> Result<RosterSource>;
}

pub trait Reporter {
    fn report_progress(&mut self, index: usize, total: usize, student: &RosterRow) -> Result<()>;
    fn report_result(&mut self, student: &RosterRow, outcome: &SendOutcome) -> Result<()>;
    fn report_summary(&mut self, summary: &BatchSummary) -> Result<()>;
}
