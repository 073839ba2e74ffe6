use clap::Parser;
use roster_notify::utils::{logger, validation::Validate};
use roster_notify::{CliConfig, ConsoleReporter, NotifyEngine, NotifyError, PromptInput, SmtpRelay};

fn fail(e: &NotifyError) -> ! {
    tracing::error!(
        "❌ Run failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());
    std::process::exit(e.exit_code().max(1));
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();

    logger::init_cli_logger(config.verbose);
    tracing::info!("Starting roster-notify");

    let settings = match config.to_settings() {
        Ok(settings) => settings,
        Err(e) => fail(&e),
    };
    if let Err(e) = settings.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        fail(&e);
    }

    let transport = SmtpRelay::new(settings.relay.clone());
    let engine = NotifyEngine::new(transport, settings);
    let mut input = PromptInput::stdio(config.credential.clone(), config.input.clone());

    if config.dry_run {
        let students = match engine.preview(&mut input) {
            Ok(students) => students,
            Err(e) => fail(&e),
        };
        if students.is_empty() {
            println!("No students with 0% completion found.");
        }
        for (i, student) in students.iter().enumerate() {
            println!("{}. {} <{}>", i + 1, student.name, student.email);
        }
        return Ok(());
    }

    // 提示輸入時保留預設的 Ctrl-C 行為，輸入完成後才改為逐筆取消
    let (credential, source) = match engine.collect_input(&mut input) {
        Ok(collected) => collected,
        Err(e) => fail(&e),
    };
    drop(input);
    engine.cancel_flag().cancel_on_ctrl_c();

    let mut reporter = ConsoleReporter::stdout();
    match engine.send_batch(&credential, &source, &mut reporter).await {
        Ok(summary) if summary.error_count > 0 => std::process::exit(2),
        Ok(_) => Ok(()),
        Err(e) => fail(&e),
    }
}
