use std::path::PathBuf;
use std::time::Instant;

use tracing::{info, warn};

use crate::config::SimulationConfig;
use crate::dataset::{Dataset, generate_dataset};
use crate::errors::GenerationError;
use crate::model::{GenerateOptions, GenerationReport};
use crate::output::{app, bi};
use crate::variant::SchemaVariant;

pub const REPORT_FILE: &str = "generation_report.json";

/// Result of a generation run.
#[derive(Debug, Clone)]
pub struct GenerationResult {
    pub out_dir: PathBuf,
    pub report: GenerationReport,
}

/// Entry point for generating the full dataset and writing it to disk.
#[derive(Debug, Clone)]
pub struct GenerationEngine {
    options: GenerateOptions,
    config: SimulationConfig,
}

impl GenerationEngine {
    /// Engine using the embedded constants of the selected variant.
    pub fn new(options: GenerateOptions) -> Self {
        let config = SimulationConfig::for_variant(options.variant);
        Self { options, config }
    }

    /// Engine with caller-supplied constants. `run` rejects a config built for
    /// another variant than `options.variant`.
    pub fn with_config(options: GenerateOptions, config: SimulationConfig) -> Self {
        Self { options, config }
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn run(&self) -> Result<GenerationResult, GenerationError> {
        let start = Instant::now();
        let variant = self.options.variant;
        let out_dir = self.options.out_dir.clone();

        info!(
            variant = %variant,
            seed = self.config.seed,
            population = self.config.population,
            out_dir = %out_dir.display(),
            "generation started"
        );

        let outcome = (|| -> Result<GenerationReport, GenerationError> {
            if self.config.variant != variant {
                return Err(GenerationError::InvalidConfig(format!(
                    "config is for the {} variant, run requested {variant}",
                    self.config.variant
                )));
            }
            self.config.validate()?;
            std::fs::create_dir_all(&out_dir)?;
            let dataset = generate_dataset(&self.config)?;
            let report = write_dataset(&dataset, &self.config, &out_dir)?;
            std::fs::write(
                out_dir.join(REPORT_FILE),
                serde_json::to_vec_pretty(&report)?,
            )?;
            Ok(report)
        })();

        match outcome {
            Ok(report) => {
                info!(
                    variant = %variant,
                    tables = report.tables.len(),
                    rows_total = report.rows_total,
                    bytes_written = report.bytes_written,
                    duration_ms = start.elapsed().as_millis() as u64,
                    "generation completed"
                );
                Ok(GenerationResult { out_dir, report })
            }
            Err(err) => {
                warn!(variant = %variant, error = %err, "generation failed");
                Err(err)
            }
        }
    }
}

fn write_dataset(
    dataset: &Dataset,
    config: &SimulationConfig,
    out_dir: &std::path::Path,
) -> Result<GenerationReport, GenerationError> {
    let tables = match dataset.variant {
        SchemaVariant::App => app::write_dataset(dataset, out_dir)?,
        SchemaVariant::Bi => bi::write_dataset(dataset, out_dir)?,
    };

    let mut report = GenerationReport::new(dataset.variant, config.seed, config.population);
    for table in tables {
        report.record_table(table);
    }
    Ok(report)
}
