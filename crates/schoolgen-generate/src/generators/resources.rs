use rand::Rng;

use crate::calendar::month_starts;
use crate::config::{Rounding, Sampling, SimulationConfig};
use crate::errors::GenerationError;
use crate::generators::{next_uuid, pick_required, round_to};
use crate::records::{MetricSample, MetricValue};

/// One sample per (month, unit, metric) across the whole window.
pub fn generate_metrics(
    config: &SimulationConfig,
    rng: &mut impl Rng,
) -> Result<Vec<MetricSample>, GenerationError> {
    let months = month_starts(config.window_start, config.cutoff);
    let mut samples = Vec::with_capacity(months.len() * config.units.len() * config.metrics.len());

    for month in months {
        for unit in &config.units {
            for spec in &config.metrics {
                let raw = match &spec.sampling {
                    Sampling::Continuous(range) => rng.random_range(range.min..=range.max),
                    Sampling::Discrete { min, max } => rng.random_range(*min..=*max) as f64,
                    Sampling::OneOf(values) => {
                        *pick_required(values, spec.kind.code(), rng)?
                    }
                };
                let scaled = if spec.scaled {
                    raw * unit.size_factor
                } else {
                    raw
                };
                let value = match spec.rounding {
                    Rounding::Decimals(decimals) => MetricValue::Measure(round_to(scaled, decimals)),
                    Rounding::Truncate => MetricValue::Count(scaled.trunc() as i64),
                };

                samples.push(MetricSample {
                    id: next_uuid(rng),
                    unit: unit.name,
                    month,
                    kind: spec.kind,
                    value,
                });
            }
        }
    }
    Ok(samples)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generators::stage_rng;
    use crate::records::MetricKind;
    use crate::variant::SchemaVariant;

    #[test]
    fn truncated_metrics_are_counts() {
        let config = SimulationConfig::for_variant(SchemaVariant::App);
        let samples = generate_metrics(&config, &mut stage_rng(5, "resources")).expect("metrics");

        for sample in &samples {
            match sample.kind {
                MetricKind::Nps | MetricKind::MealsServed => {
                    assert!(matches!(sample.value, MetricValue::Count(_)), "{:?}", sample.kind);
                }
                _ => assert!(matches!(sample.value, MetricValue::Measure(_))),
            }
        }
        let nps: Vec<f64> = samples
            .iter()
            .filter(|sample| sample.kind == MetricKind::Nps)
            .map(|sample| sample.value.as_f64())
            .collect();
        assert!(nps.iter().all(|value| (70.0..=95.0).contains(value)));
    }
}
