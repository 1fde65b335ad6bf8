use clap::Parser;
use longrun_etl::utils::error::EtlError;
use longrun_etl::utils::{logger, validation::Validate};
use longrun_etl::{build_source, CliConfig, EtlEngine, LocalStorage, LongRunPipeline};

fn report_failure(e: &EtlError) {
    tracing::error!(
        "❌ Long-run analysis failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();

    // 初始化日誌
    logger::init_cli_logger(config.verbose);

    tracing::info!("Starting longrun-etl CLI");
    tracing::debug!("CLI config: {:?}", config);

    // 驗證配置
    if let Err(e) = config.validate() {
        report_failure(&e);
        std::process::exit(1);
    }

    let source = match build_source(&config) {
        Ok(source) => source,
        Err(e) => {
            report_failure(&e);
            std::process::exit(e.exit_code());
        }
    };

    // 創建存儲和管道
    let storage = LocalStorage::new(config.output_path.clone());
    let pipeline = LongRunPipeline::new(source, storage, config);
    let engine = EtlEngine::new(pipeline);

    match engine.run_with_summary().await {
        Ok(summary) => {
            println!(
                "✅ Analysis done ({} runs, {} teams)",
                summary.runs_emitted, summary.teams_emitted
            );
            println!("📁 Output saved to: {}", summary.output_path);
        }
        Err(e) => {
            report_failure(&e);
            let code = e.exit_code();
            if code > 0 {
                std::process::exit(code);
            }
        }
    }

    Ok(())
}
