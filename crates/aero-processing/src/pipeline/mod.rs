//! Pipeline orchestration.
//!
//! Wires the components together in their only sensible order:
//! load -> missingness report -> impute -> feature build. Each stage is a
//! pure function over its input; the pipeline just sequences them and
//! collects an audit trail. Errors from any stage propagate unchanged.

use crate::config::PrepConfig;
use crate::error::Result;
use crate::features::FeatureBuilder;
use crate::imputers::Imputer;
use crate::loader::RecordLoader;
use crate::profiler::MissingnessAnalyzer;
use crate::types::PipelineResult;
use tracing::info;

/// End-to-end preparation pipeline.
pub struct PrepPipeline {
    config: PrepConfig,
}

impl PrepPipeline {
    /// Create a pipeline from a validated configuration.
    pub fn new(config: PrepConfig) -> Result<Self> {
        config
            .validate()
            .map_err(|e| crate::error::PrepError::InvalidArgument(e.to_string()))?;
        Ok(Self { config })
    }

    /// Run the full pipeline.
    ///
    /// The missingness report is computed on the raw table, before
    /// imputation, so it reflects the source data.
    pub fn run(&self) -> Result<PipelineResult> {
        info!("Starting preparation pipeline for '{}'", self.config.source);
        let mut steps = Vec::new();

        let table = RecordLoader::load(&self.config.source)?;
        steps.push(format!(
            "Loaded {} rows from '{}'",
            table.height(),
            self.config.source
        ));

        let missingness = MissingnessAnalyzer::report_missing(&table);
        steps.push(format!(
            "{} of 14 columns contain missing values",
            missingness.len()
        ));

        let fill_columns = self.config.effective_fill_columns();
        let filled = Imputer::fill(
            &table,
            self.config.fill_strategy,
            Some(&fill_columns),
            self.config.fill_constant.as_ref(),
        )?;
        steps.push(format!(
            "Filled {:?} using {} strategy",
            fill_columns,
            self.config.fill_strategy.as_str()
        ));

        let features = FeatureBuilder::prepare(filled.as_df(), self.config.top_countries)?;
        steps.push(format!(
            "Prepared {} feature columns for {} rows",
            features.matrix.width(),
            features.len()
        ));

        info!("Pipeline finished: {} rows prepared", features.len());
        Ok(PipelineResult {
            table: filled,
            missingness,
            features,
            processing_steps: steps,
            completed_at: chrono::Utc::now().to_rfc3339(),
        })
    }
}

static_assertions::assert_impl_all!(PrepPipeline: Send, Sync);
