#[cfg(feature = "lambda")]
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
#[cfg(feature = "lambda")]
use life_code_matrix::core::ConfigProvider;
#[cfg(feature = "lambda")]
use life_code_matrix::utils::{logger, validation::Validate};
#[cfg(feature = "lambda")]
use life_code_matrix::{AnalysisReport, AnalysisRequest, EnvConfig, GeminiClient, LifeCodeEngine};
#[cfg(feature = "lambda")]
use std::sync::Arc;

#[cfg(feature = "lambda")]
async fn function_handler(
    engine: Arc<LifeCodeEngine<GeminiClient>>,
    event: LambdaEvent<AnalysisRequest>,
) -> Result<AnalysisReport, Error> {
    tracing::info!("Starting life code Lambda function");

    let report = engine
        .run(&event.payload)
        .await
        .map_err(|e| Box::new(e) as Box<dyn std::error::Error + Send + Sync>)?;

    tracing::info!("Life code Lambda function completed successfully");
    Ok(report)
}

#[cfg(feature = "lambda")]
#[tokio::main]
async fn main() -> Result<(), Error> {
    logger::init_service_logger(None, true);

    // 從環境變數建立配置
    let config = EnvConfig::from_env()?;
    config.validate()?;

    let engine = if config.narrative_enabled() {
        LifeCodeEngine::new(GeminiClient::from_config(&config)?)
            .with_narrative_budget(config.narrative_budget())
    } else {
        LifeCodeEngine::numeric_only()
    };
    let engine = Arc::new(engine);

    run(service_fn(move |event| {
        let engine = Arc::clone(&engine);
        async move { function_handler(engine, event).await }
    }))
    .await
}
