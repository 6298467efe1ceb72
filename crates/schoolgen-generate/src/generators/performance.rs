use rand::Rng;

use crate::config::{PerformanceConfig, ProfileRanges, SimulationConfig};
use crate::generators::{next_uuid, round_to, sample};
use crate::records::{AcademicProfile, PerformanceRecord, Student};

/// Per-subject, per-period grade records.
///
/// Students who never withdrew get every period that started by the cutoff.
/// A withdrawn student gets a short run of one or two periods, never past the
/// last period that had started by the withdrawal date.
pub fn generate_performance(
    simulation: &SimulationConfig,
    students: &[Student],
    rng: &mut impl Rng,
) -> Vec<PerformanceRecord> {
    let config = &simulation.performance;
    let cutoff = simulation.cutoff;
    let decimals = config.decimals;
    let open_periods = config
        .periods
        .iter()
        .take_while(|period| period.starts_on <= cutoff)
        .count();
    let (min_periods, max_periods) = config.withdrawn_periods;

    let mut records = Vec::new();
    for student in students {
        let period_count = match student.last_active_period(&config.periods) {
            Some(last_active) => rng
                .random_range(min_periods..=max_periods)
                .min(last_active)
                .min(open_periods),
            None => open_periods,
        };
        let ranges = profile_ranges(config, student.profile);

        for (period_index, period) in config.periods.iter().enumerate().take(period_count) {
            for &subject in student.segment.subjects(simulation.variant) {
                let grade = round_to(sample(ranges.grade, rng), decimals);
                let attendance = round_to(sample(ranges.attendance, rng), decimals);
                let completion = round_to(sample(ranges.completion, rng), decimals);
                records.push(PerformanceRecord {
                    id: next_uuid(rng),
                    student_id: student.id,
                    subject,
                    period_index,
                    period: *period,
                    grade,
                    attendance,
                    completion,
                    absences: absences_for(attendance),
                });
            }
        }
    }
    records
}

pub fn profile_ranges(config: &PerformanceConfig, profile: AcademicProfile) -> &ProfileRanges {
    match profile {
        AcademicProfile::Studious => &config.studious,
        AcademicProfile::Struggling => &config.struggling,
    }
}

/// Roughly one absence per two points of missed attendance.
pub fn absences_for(attendance: f64) -> u32 {
    ((100.0 - attendance).max(0.0) / 2.0).floor() as u32
}
