use crate::core::{calendar, prompt, world};
use crate::domain::model::{AnalysisReport, AnalysisRequest, WorldAnalysis};
use crate::domain::ports::{NarrativeRequest, NarrativeService};
use crate::utils::error::{LifeCodeError, Result};
use std::time::Duration;

pub const DEFAULT_NARRATIVE_BUDGET: Duration = Duration::from_secs(120);

pub struct LifeCodeEngine<N: NarrativeService> {
    narrative: Option<N>,
    narrative_budget: Duration,
}

impl<N: NarrativeService> LifeCodeEngine<N> {
    pub fn new(narrative: N) -> Self {
        Self {
            narrative: Some(narrative),
            narrative_budget: DEFAULT_NARRATIVE_BUDGET,
        }
    }

    /// Numbers only; `ai_analysis` stays empty.
    pub fn numeric_only() -> Self {
        Self {
            narrative: None,
            narrative_budget: DEFAULT_NARRATIVE_BUDGET,
        }
    }

    pub fn with_narrative_budget(mut self, budget: Duration) -> Self {
        self.narrative_budget = budget;
        self
    }

    /// Date and conversion errors abort the request. Narrative errors are
    /// reported in `narrative_error` next to the numeric results.
    pub async fn run(&self, request: &AnalysisRequest) -> Result<AnalysisReport> {
        tracing::info!("🔢 Starting life code analysis");

        // Resolve
        let dates = calendar::resolve_dates(request)?;
        tracing::info!(
            "📅 Inner world {} / outer world {}",
            dates.thai,
            dates.lunar
        );

        // Analyse
        let (inner_world, outer_world) = world::analyze_pair(&dates);

        // Narrate
        let (ai_analysis, narrative_error) = match &self.narrative {
            Some(service) => {
                match self
                    .narrate(service, &inner_world, &outer_world, request)
                    .await
                {
                    Ok(text) => (text, None),
                    Err(e) => {
                        tracing::warn!("⚠️ Narrative unavailable: {}", e);
                        (String::new(), Some(e.to_string()))
                    }
                }
            }
            None => {
                tracing::debug!("Narrative disabled, returning numbers only");
                (String::new(), None)
            }
        };

        tracing::info!("✅ Analysis completed");
        Ok(AnalysisReport {
            inner_world,
            outer_world,
            ai_analysis,
            narrative_error,
        })
    }

    async fn narrate(
        &self,
        service: &N,
        inner: &WorldAnalysis,
        outer: &WorldAnalysis,
        request: &AnalysisRequest,
    ) -> Result<String> {
        let narrative_request = NarrativeRequest {
            prompt: prompt::build_prompt(inner, outer, request.language),
            api_key: request.api_key.clone(),
        };

        tracing::debug!(
            "Requesting narrative ({} chars, budget {:?})",
            narrative_request.prompt.len(),
            self.narrative_budget
        );

        match tokio::time::timeout(self.narrative_budget, service.generate(&narrative_request))
            .await
        {
            Ok(result) => result,
            Err(_) => Err(LifeCodeError::narrative(format!(
                "no response within {} seconds",
                self.narrative_budget.as_secs()
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct FixedNarrative {
        reply: Result<String>,
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl NarrativeService for FixedNarrative {
        async fn generate(&self, request: &NarrativeRequest) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            assert!(request.prompt.contains("Gift number: 30"));
            match &self.reply {
                Ok(text) => Ok(text.clone()),
                Err(e) => Err(LifeCodeError::narrative(e.to_string())),
            }
        }
    }

    struct SlowNarrative;

    #[async_trait]
    impl NarrativeService for SlowNarrative {
        async fn generate(&self, _request: &NarrativeRequest) -> Result<String> {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok("too late".to_string())
        }
    }

    fn english_request() -> AnalysisRequest {
        AnalysisRequest {
            language: crate::domain::model::Language::En,
            ..AnalysisRequest::for_birth_date("1990-05-15")
        }
    }

    #[tokio::test]
    async fn test_run_with_narrative() {
        let calls = Arc::new(AtomicUsize::new(0));
        let engine = LifeCodeEngine::new(FixedNarrative {
            reply: Ok("destiny".to_string()),
            calls: calls.clone(),
        });

        let report = engine.run(&english_request()).await.unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(report.ai_analysis, "destiny");
        assert!(report.narrative_error.is_none());
        assert_eq!(report.inner_world.gift_number.value(), 30);
    }

    #[tokio::test]
    async fn test_narrative_failure_keeps_numbers() {
        let engine = LifeCodeEngine::new(FixedNarrative {
            reply: Err(LifeCodeError::narrative("quota exceeded")),
            calls: Arc::new(AtomicUsize::new(0)),
        });

        let report = engine.run(&english_request()).await.unwrap();

        assert!(report.ai_analysis.is_empty());
        assert!(report.narrative_error.unwrap().contains("quota exceeded"));
        assert_eq!(report.outer_world.life_code.value(), 8);
    }

    #[tokio::test]
    async fn test_narrative_budget_is_enforced() {
        let engine =
            LifeCodeEngine::new(SlowNarrative).with_narrative_budget(Duration::from_millis(50));

        let report = engine.run(&english_request()).await.unwrap();

        assert!(report.ai_analysis.is_empty());
        assert!(report.narrative_error.unwrap().contains("no response"));
    }

    #[tokio::test]
    async fn test_invalid_date_fails_before_narrative() {
        let calls = Arc::new(AtomicUsize::new(0));
        let engine = LifeCodeEngine::new(FixedNarrative {
            reply: Ok("unused".to_string()),
            calls: calls.clone(),
        });

        let err = engine
            .run(&AnalysisRequest::for_birth_date("1990-02-30"))
            .await
            .unwrap_err();

        assert!(matches!(err, LifeCodeError::InvalidDate { .. }));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_numeric_only_engine() {
        let engine = LifeCodeEngine::<SlowNarrative>::numeric_only();
        assert!(engine.narrative.is_none());
        let report = tokio_test::block_on(engine.run(&english_request())).unwrap();
        assert!(report.ai_analysis.is_empty());
        assert!(report.narrative_error.is_none());
    }
}
