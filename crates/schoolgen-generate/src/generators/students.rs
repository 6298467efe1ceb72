use fake::Fake;
use fake::faker::address::pt_br::ZipCode;
use fake::faker::name::pt_br::LastName;
use rand::Rng;
use rand::distr::Distribution;
use rand::distr::weighted::WeightedIndex;
use uuid::Uuid;

use crate::calendar::{random_date, years_before};
use crate::config::SimulationConfig;
use crate::errors::GenerationError;
use crate::generators::{next_uuid, pick, pick_required};
use crate::records::{
    AcademicProfile, EnrollmentStatus, Ethnicity, Gender, HomeAddress, IncomeBracket, Segment,
    Student,
};

const ETHNICITY_WEIGHTS: [f64; 5] = [0.40, 0.40, 0.15, 0.04, 0.01];
const INCOME_WEIGHTS: [f64; 4] = [0.20, 0.40, 0.30, 0.10];

const MIN_AGE_YEARS: u32 = 4;
const MAX_AGE_YEARS: u32 = 18;

const HOME_CITY: &str = "São Paulo";

/// Produce the root population.
///
/// Every draw is unconditional, so the stream consumed per student has a fixed
/// shape apart from the faker calls.
pub fn generate_students(
    config: &SimulationConfig,
    school_id: Option<Uuid>,
    rng: &mut impl Rng,
) -> Result<Vec<Student>, GenerationError> {
    let ethnicity_dist = WeightedIndex::new(ETHNICITY_WEIGHTS)
        .map_err(|err| GenerationError::InvalidConfig(format!("ethnicity weights: {err}")))?;
    let income_dist = WeightedIndex::new(INCOME_WEIGHTS)
        .map_err(|err| GenerationError::InvalidConfig(format!("income weights: {err}")))?;
    let oldest = years_before(config.cutoff, MAX_AGE_YEARS);
    let youngest = years_before(config.cutoff, MIN_AGE_YEARS);
    let (enroll_from, enroll_to) = config.enrollment_window;
    let jitter = config.coordinate_jitter.abs();

    let mut students = Vec::with_capacity(config.population);
    for _ in 0..config.population {
        let id = next_uuid(rng);
        let unit = pick_required(&config.units, "unit", rng)?;
        let segment = *pick_required(&Segment::ALL, "segment", rng)?;
        let class_section = *pick_required(segment.class_sections(), "class section", rng)?;

        let gender = if rng.random_bool(0.5) {
            Gender::Male
        } else {
            Gender::Female
        };
        let full_name = full_name(gender, rng);
        let ethnicity = Ethnicity::ALL[ethnicity_dist.sample(rng)];
        let income = IncomeBracket::ALL[income_dist.sample(rng)];
        let birth_date = random_date(rng, oldest, youngest);

        let enrolled_on = random_date(rng, enroll_from, enroll_to);
        let (status, withdrawn_on) = draw_status(config, enrolled_on, rng);

        let scholarship = rng.random_bool(config.scholarship_rate);
        let has_siblings = rng.random_bool(config.sibling_rate);
        let profile = if rng.random_bool(config.studious_rate) {
            AcademicProfile::Studious
        } else {
            AcademicProfile::Struggling
        };

        let address = HomeAddress {
            city: HOME_CITY,
            neighborhood: pick(NEIGHBORHOODS, rng).copied().unwrap_or(HOME_CITY),
            postal_code: ZipCode().fake_with_rng(rng),
            latitude: unit.latitude + rng.random_range(-jitter..=jitter),
            longitude: unit.longitude + rng.random_range(-jitter..=jitter),
        };

        students.push(Student {
            id,
            school_id,
            full_name,
            birth_date,
            gender,
            ethnicity,
            unit: unit.name,
            segment,
            class_section,
            status,
            enrolled_on,
            withdrawn_on,
            scholarship,
            has_siblings,
            income,
            address,
            profile,
        });
    }

    Ok(students)
}

fn draw_status(
    config: &SimulationConfig,
    enrolled_on: chrono::NaiveDate,
    rng: &mut impl Rng,
) -> (EnrollmentStatus, Option<chrono::NaiveDate>) {
    let roll: f64 = rng.random();
    if roll < config.status_split.withdrawn {
        // Withdrawal happens once classes are under way.
        let earliest = enrolled_on.max(config.window_start);
        let withdrawn_on = random_date(rng, earliest, config.cutoff.max(earliest));
        (EnrollmentStatus::Withdrawn, Some(withdrawn_on))
    } else if roll < config.status_split.delinquent {
        (EnrollmentStatus::Delinquent, None)
    } else {
        (EnrollmentStatus::Active, None)
    }
}

fn full_name(gender: Gender, rng: &mut impl Rng) -> String {
    let first_names = match gender {
        Gender::Male => MALE_FIRST_NAMES,
        Gender::Female => FEMALE_FIRST_NAMES,
    };
    let first = pick(first_names, rng).copied().unwrap_or("Aluno");
    let middle: String = LastName().fake_with_rng(rng);
    let last: String = LastName().fake_with_rng(rng);
    format!("{first} {middle} {last}")
}

const MALE_FIRST_NAMES: &[&str] = &[
    "Miguel", "Arthur", "Gael", "Heitor", "Bernardo", "Gabriel", "Davi", "Pedro", "João", "Lucas",
    "Matheus", "Nicolas", "Guilherme", "Gustavo", "Felipe", "Samuel", "Enzo", "Lorenzo", "Theo",
    "Rafael",
];

const FEMALE_FIRST_NAMES: &[&str] = &[
    "Helena", "Alice", "Laura", "Maria", "Sophia", "Julia", "Beatriz", "Mariana", "Ana", "Lívia",
    "Isabela", "Camila", "Larissa", "Gabriela", "Bianca", "Letícia", "Melissa", "Yasmin",
    "Nicole", "Valentina",
];

const NEIGHBORHOODS: &[&str] = &[
    "Centro",
    "Jardins",
    "Vila Mariana",
    "Moema",
    "Pinheiros",
    "Perdizes",
    "Santana",
    "Tatuapé",
    "Mooca",
    "Lapa",
    "Barra Funda",
    "Liberdade",
    "Aclimação",
    "Ipiranga",
    "Saúde",
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generators::stage_rng;
    use crate::variant::SchemaVariant;

    #[test]
    fn produces_exact_population_with_consistent_withdrawals() {
        let config = SimulationConfig::for_variant(SchemaVariant::Bi);
        let mut rng = stage_rng(config.seed, "students");
        let students = generate_students(&config, None, &mut rng).expect("students");
        assert_eq!(students.len(), config.population);

        for student in &students {
            assert_eq!(student.withdrawn_on.is_some(), student.is_withdrawn());
            if let Some(withdrawn_on) = student.withdrawn_on {
                assert!(withdrawn_on >= student.enrolled_on);
                assert!(withdrawn_on >= config.window_start);
                assert!(withdrawn_on <= config.cutoff);
            }
            assert!(student.segment.class_sections().contains(&student.class_section));
        }
    }

    #[test]
    fn coordinates_stay_near_the_unit_center() {
        let config = SimulationConfig::for_variant(SchemaVariant::App);
        let mut rng = stage_rng(7, "students");
        let students = generate_students(&config, None, &mut rng).expect("students");
        for student in &students {
            let unit = config
                .units
                .iter()
                .find(|unit| unit.name == student.unit)
                .expect("known unit");
            assert!((student.address.latitude - unit.latitude).abs() <= config.coordinate_jitter);
            assert!((student.address.longitude - unit.longitude).abs() <= config.coordinate_jitter);
        }
    }
}
