use std::path::Path;
use tracing::{debug, info, warn};

use crate::ai::{AiAnalyzer, AiAssessment};
use crate::core::{AnalysisReport, ScanOutcome};
use crate::db::{NewAnalysis, SharedDatabase};
use crate::engine::RiskEngine;
use crate::ocr::TextExtractor;

/// Full analysis flow: OCR text assembly, rule scan, AI consult when it can
/// still change the result, blend, persistence.
pub struct AnalysisPipeline {
    engine: RiskEngine,
    ai: Box<dyn AiAnalyzer>,
    ocr: Box<dyn TextExtractor>,
    db: Option<SharedDatabase>,
}

/// One completed submission.
pub struct AnalysisOutcome {
    pub report: AnalysisReport,
    pub record_id: Option<i64>,
    pub extracted_text_len: usize,
}

impl AnalysisPipeline {
    pub fn new(
        ai: Box<dyn AiAnalyzer>,
        ocr: Box<dyn TextExtractor>,
        db: Option<SharedDatabase>,
    ) -> Self {
        Self {
            engine: RiskEngine::new(),
            ai,
            ocr,
            db,
        }
    }

    pub async fn analyze_submission(
        &self,
        owner: &str,
        job_text: &str,
        image: Option<&Path>,
    ) -> AnalysisOutcome {
        let extracted = match image {
            Some(path) => {
                let text = self.ocr.extract_text(path).await;
                debug!("Extracted {} chars of text from {}", text.chars().count(), path.display());
                text
            }
            None => String::new(),
        };

        let combined = format!("{job_text}\n{extracted}");
        let combined = combined.trim();

        let (outcome, trace) = self.engine.scan(combined);

        let ai = match &outcome {
            ScanOutcome::Completed(_) => self.ai.analyze(combined).await,
            // A critical hit or blank input makes the AI result irrelevant;
            // skip the call instead of discarding its answer.
            ScanOutcome::CriticalHit(_) | ScanOutcome::Blank => {
                debug!("Skipping AI analysis: {}", match &outcome {
                    ScanOutcome::CriticalHit(_) => "critical rule already decided the verdict",
                    _ => "no text to analyze",
                });
                AiAssessment::none()
            }
        };

        let result = self.engine.assemble(&outcome, &ai);

        for event in &trace {
            debug!(?event, "scan decision");
        }
        info!(
            score = result.score,
            status = %result.status,
            critical = result.has_critical_flags,
            "analysis complete"
        );

        let record_id = match &self.db {
            Some(db) => {
                let new = NewAnalysis {
                    owner,
                    job_text,
                    extracted_text: &extracted,
                    image_path: image.and_then(|p| p.to_str()),
                    result: &result,
                };
                match db.save_analysis(&new) {
                    Ok(id) => Some(id),
                    Err(e) => {
                        warn!("Failed to persist analysis: {e}");
                        None
                    }
                }
            }
            None => None,
        };

        AnalysisOutcome {
            report: AnalysisReport { result, trace },
            record_id,
            extracted_text_len: extracted.chars().count(),
        }
    }
}
