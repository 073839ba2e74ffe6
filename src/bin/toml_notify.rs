use clap::Parser;
use roster_notify::config::toml_config::ReportFormat;
use roster_notify::core::Credential;
use roster_notify::utils::{logger, validation::Validate};
use roster_notify::{
    ConsoleReporter, JsonLinesReporter, NotifyEngine, NotifyError, PresetInput, SmtpRelay, TomlConfig,
};

#[derive(Parser)]
#[command(name = "toml-notify")]
#[command(about = "Send completion reminders using a TOML configuration file")]
struct Args {
    /// Path to the notifier configuration file
    #[arg(short, long, default_value = "notify.toml")]
    config: String,

    /// Override the report format from config (text or json)
    #[arg(long, value_enum)]
    format: Option<ReportFormat>,

    /// Dry run - list the selected students without sending
    #[arg(long)]
    dry_run: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

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
    let args = Args::parse();

    // 先解析設定才知道要用哪種日誌格式
    let config = TomlConfig::from_file(&args.config);
    let format = match (&args.format, &config) {
        (Some(format), _) => *format,
        (None, Ok(config)) => config.report_format(),
        (None, Err(_)) => ReportFormat::Text,
    };
    match format {
        ReportFormat::Text => logger::init_cli_logger(args.verbose),
        ReportFormat::Json => logger::init_json_logger(args.verbose),
    }

    tracing::info!("📁 Loading notifier configuration from: {}", args.config);
    let config = match config {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", args.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        fail(&e);
    }

    let source = config.roster_source();
    let credential = match config.credential() {
        Ok(credential) => credential,
        Err(e) if args.dry_run => {
            tracing::debug!("No credential needed for a dry run: {}", e);
            Credential::new("")
        }
        Err(e) => fail(&e),
    };
    let mut input = PresetInput::new(credential, source);

    let transport = SmtpRelay::new(config.relay.clone());
    let engine = NotifyEngine::new(transport, config);

    if args.dry_run {
        let students = match engine.preview(&mut input) {
            Ok(students) => students,
            Err(e) => fail(&e),
        };
        match format {
            ReportFormat::Json => println!("{}", serde_json::to_string(&students)?),
            ReportFormat::Text => {
                if students.is_empty() {
                    println!("No students with 0% completion found.");
                }
                for (i, student) in students.iter().enumerate() {
                    println!("{}. {} <{}>", i + 1, student.name, student.email);
                }
            }
        }
        return Ok(());
    }

    engine.cancel_flag().cancel_on_ctrl_c();

    let result = match format {
        ReportFormat::Text => engine.run(&mut input, &mut ConsoleReporter::stdout()).await,
        ReportFormat::Json => engine.run(&mut input, &mut JsonLinesReporter::stdout()).await,
    };

    match result {
        Ok(summary) if summary.error_count > 0 => std::process::exit(2),
        Ok(_) => Ok(()),
        Err(e) => fail(&e),
    }
}
