use clap::Parser;
use life_code_matrix::config::cli::OutputFormat;
use life_code_matrix::core::ConfigProvider;
use life_code_matrix::domain::model::Language;
use life_code_matrix::render::render_report;
use life_code_matrix::utils::error::{ErrorSeverity, LifeCodeError, Result};
use life_code_matrix::utils::{logger, validation::Validate};
use life_code_matrix::{CliConfig, GeminiClient, LifeCodeEngine, TomlConfig};

fn build_engine(
    config: &CliConfig,
) -> Result<(LifeCodeEngine<GeminiClient>, Language)> {
    // 配置檔優先於命令列的敘述參數
    let file_config = match &config.config {
        Some(path) => {
            tracing::info!("📄 Loading configuration from {}", path);
            let file_config = TomlConfig::from_file(path)?;
            file_config.validate()?;
            Some(file_config)
        }
        None => None,
    };

    let default_language = file_config
        .as_ref()
        .map(TomlConfig::default_language)
        .unwrap_or_default();
    let provider: &dyn ConfigProvider = match &file_config {
        Some(file_config) => file_config,
        None => config,
    };

    if config.no_narrative || !provider.narrative_enabled() {
        tracing::info!("Narrative disabled");
        return Ok((LifeCodeEngine::numeric_only(), default_language));
    }

    let client = GeminiClient::from_config(provider)?;
    let engine = LifeCodeEngine::new(client).with_narrative_budget(provider.narrative_budget());
    Ok((engine, default_language))
}

fn exit_with(e: &LifeCodeError) -> ! {
    tracing::error!(
        "❌ Analysis failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());

    let exit_code = match e.severity() {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    };
    std::process::exit(exit_code);
}

#[tokio::main]
async fn main() {
    let config = CliConfig::parse().with_env_api_key();

    logger::init_cli_logger(config.verbose);
    tracing::info!("Starting life-code CLI");

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        exit_with(&e);
    }

    let (engine, default_language) = match build_engine(&config) {
        Ok(built) => built,
        Err(e) => exit_with(&e),
    };

    let request = config.to_request(default_language);
    let report = match engine.run(&request).await {
        Ok(report) => report,
        Err(e) => exit_with(&e),
    };

    if let Some(error) = &report.narrative_error {
        eprintln!("⚠️ Narrative unavailable: {}", error);
    }

    match config.format {
        OutputFormat::Json => match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{}", json),
            Err(e) => exit_with(&e.into()),
        },
        OutputFormat::Board => print!("{}", render_report(&report, request.language)),
    }
}
