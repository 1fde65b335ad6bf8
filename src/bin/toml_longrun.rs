use clap::Parser;
use longrun_etl::core::ConfigProvider;
use longrun_etl::utils::error::EtlError;
use longrun_etl::utils::{logger, validation::Validate};
use longrun_etl::{build_source, EtlEngine, LocalStorage, LongRunPipeline, TomlConfig};

#[derive(Parser)]
#[command(name = "toml-longrun")]
#[command(about = "Long-run analysis driven by a TOML configuration file")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "longrun.toml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Override the session key from config
    #[arg(long)]
    session_key: Option<u32>,

    /// Dry run - show what would be processed without executing
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // 載入 TOML 配置
    let mut config = match TomlConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", args.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    // 初始化日誌：啟用監控時輸出 JSON
    if config.monitoring_enabled() {
        logger::init_service_logger(config.log_level());
    } else {
        logger::init_cli_logger(args.verbose);
    }

    tracing::info!("🚀 Starting TOML-based long-run analysis");
    tracing::info!("📁 Configuration loaded from: {}", args.config);

    // 應用命令列覆蓋設定
    if let Some(session_key) = args.session_key {
        config.source.session_key = Some(session_key);
        tracing::info!("🔧 Session key overridden to: {}", session_key);
    }

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    display_config_summary(&config, &args);

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - No actual processing will occur");
        return Ok(());
    }

    let source = match build_source(&config) {
        Ok(source) => source,
        Err(e) => {
            report_failure(&e);
            std::process::exit(e.exit_code());
        }
    };
    let storage = LocalStorage::new(config.output_path().to_string());
    let pipeline = LongRunPipeline::new(source, storage, config);
    let engine = EtlEngine::new(pipeline);

    match engine.run_with_summary().await {
        Ok(summary) => {
            tracing::info!(
                "✅ {} laps from {} drivers -> {} runs, {} teams",
                summary.laps_extracted,
                summary.drivers_extracted,
                summary.runs_emitted,
                summary.teams_emitted
            );
            println!("✅ Long-run analysis completed successfully!");
            println!("📁 Output saved to: {}", summary.output_path);
        }
        Err(e) => {
            report_failure(&e);

            // 根據錯誤嚴重程度決定退出碼
            let code = e.exit_code();
            if code > 0 {
                std::process::exit(code);
            }
        }
    }

    Ok(())
}

fn report_failure(e: &EtlError) {
    // 記錄詳細錯誤信息
    tracing::error!(
        "❌ Long-run analysis failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
    eprintln!("❌ {}", e.user_friendly_message());
}

fn display_config_summary(config: &TomlConfig, args: &Args) {
    println!("📋 Configuration Summary:");
    println!(
        "  Pipeline: {} v{}",
        config.pipeline.name,
        config.pipeline.version.as_deref().unwrap_or("-")
    );
    println!("  Source: {:?}", config.source_kind());
    match config.session_key() {
        Some(key) => println!("  Session: {} @ {}", key, config.api_base()),
        None => println!("  Fixture: {}", config.fixture_path()),
    }
    println!("  Output: {}", config.output_path());
    println!("  Formats: {}", config.output_formats().join(", "));
    if config.compress_output() {
        println!("  Compression: {} (ZIP)", config.archive_name());
    }
    println!("  Analysis timeout: {}s", config.analysis_timeout_seconds());

    if args.dry_run {
        println!("  🔍 DRY RUN MODE ENABLED");
    }

    println!();
}
