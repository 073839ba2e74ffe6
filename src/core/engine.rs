use crate::core::notifier::{NotificationRequest, Notifier};
use crate::core::roster::select_zero_completion;
use crate::core::{
    BatchSummary, ConfigProvider, Credential, InputProvider, MailTransport, Reporter, RosterRow, RosterSource,
};
use crate::utils::error::Result;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// 只在兩筆寄送之間檢查；寄送中的那一封不會被中斷
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// 第一次 Ctrl-C 在下一筆之前停止，第二次直接結束程式
    pub fn cancel_on_ctrl_c(&self) {
        let flag = self.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_err() {
                return;
            }
            tracing::warn!("⏹️ Interrupt received, stopping after the current email (Ctrl-C again to abort)");
            flag.cancel();

            if tokio::signal::ctrl_c().await.is_ok() {
                std::process::exit(130);
            }
        });
    }
}

pub struct NotifyEngine<T: MailTransport, C: ConfigProvider> {
    notifier: Notifier<T>,
    config: C,
    cancel: CancelFlag,
}

impl<T: MailTransport, C: ConfigProvider> NotifyEngine<T, C> {
    pub fn new(transport: T, config: C) -> Self {
        Self {
            notifier: Notifier::new(transport),
            config,
            cancel: CancelFlag::default(),
        }
    }

    pub fn cancel_flag(&self) -> CancelFlag {
        self.cancel.clone()
    }

    pub fn config(&self) -> &C {
        &self.config
    }

    pub fn transport(&self) -> &T {
        self.notifier.transport()
    }

    /// 只讀取並篩選名冊，不寄信
    pub fn preview<I: InputProvider>(&self, input: &mut I) -> Result<Vec<RosterRow>> {
        let source = input.read_source()?;
        select_zero_completion(&source)
    }

    /// 依序取得憑證與名冊來源。提示輸入在這裡完成，之後才安裝 Ctrl-C 處理。
    pub fn collect_input<I: InputProvider>(&self, input: &mut I) -> Result<(Credential, RosterSource)> {
        let credential = input.read_credential()?;
        let source = input.read_source()?;
        Ok((credential, source))
    }

    /// 讀取憑證與名冊後寄送整批
    pub async fn run<I: InputProvider, R: Reporter>(
        &self,
        input: &mut I,
        reporter: &mut R,
    ) -> Result<BatchSummary> {
        let (credential, source) = self.collect_input(input)?;
        self.send_batch(&credential, &source, reporter).await
    }

    /// 依序通知每位完成度為 0 的學生。
    /// 名冊錯誤會在寄送前中止；單筆寄送失敗只計入統計。
    pub async fn send_batch<R: Reporter>(
        &self,
        credential: &Credential,
        source: &RosterSource,
        reporter: &mut R,
    ) -> Result<BatchSummary> {
        tracing::info!("📥 Loading roster from {}", source.display_name());
        let students = select_zero_completion(source)?;

        let total = students.len();
        let mut summary = BatchSummary::start(total);

        for (index, student) in students.iter().enumerate() {
            if self.cancel.is_cancelled() {
                tracing::warn!("⏹️ Run cancelled after {}/{} students", summary.attempted, total);
                summary.cancelled = true;
                break;
            }

            reporter.report_progress(index + 1, total, student)?;

            let request = NotificationRequest {
                sender: self.config.sender_address(),
                credential,
                recipient: &student.email,
                display_name: &student.name,
                subject: self.config.subject(),
                template: self.config.template(),
            };
            let outcome = self.notifier.notify(&request).await;

            summary.record(&outcome);
            reporter.report_result(student, &outcome)?;
        }

        let summary = summary.finish();
        tracing::info!(
            "📊 Finished: {} sent, {} failed, {} selected",
            summary.success_count,
            summary.error_count,
            summary.selected
        );
        reporter.report_summary(&summary)?;

        Ok(summary)
    }
}
