use rand::Rng;
use rand::distr::Distribution;
use rand::distr::weighted::WeightedIndex;
use rand_distr::Normal;

use crate::config::SurveyConfig;
use crate::errors::GenerationError;
use crate::generators::next_uuid;
use crate::records::{EnrollmentStatus, Student, SurveyResponse};

/// Satisfaction survey answers for every enrolled family.
pub fn generate_surveys(
    config: &SurveyConfig,
    students: &[Student],
    rng: &mut impl Rng,
) -> Result<Vec<SurveyResponse>, GenerationError> {
    let scores = WeightedIndex::new(config.score_weights.iter().map(|(_, weight)| *weight))
        .map_err(|err| GenerationError::InvalidConfig(format!("survey score weights: {err}")))?;
    let noise = Normal::new(0.0, config.health_std_dev)
        .map_err(|err| GenerationError::InvalidConfig(format!("survey health score: {err}")))?;

    let mut responses = Vec::new();
    for student in students.iter().filter(|student| !student.is_withdrawn()) {
        let baseline = if student.status == EnrollmentStatus::Delinquent {
            config.health_baseline - config.delinquent_penalty
        } else {
            config.health_baseline
        };

        for &surveyed_on in &config.dates {
            let score = config.score_weights[scores.sample(rng)].0;
            let family_health = ((baseline + noise.sample(rng)) as i64).clamp(0, 100) as u8;
            let comment = if score > config.promoter_threshold {
                config.promoter_comment
            } else {
                config.detractor_comment
            };

            responses.push(SurveyResponse {
                id: next_uuid(rng),
                student_id: student.id,
                surveyed_on,
                score,
                family_health,
                comment,
            });
        }
    }
    Ok(responses)
}
