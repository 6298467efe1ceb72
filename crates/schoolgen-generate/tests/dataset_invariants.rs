use std::collections::{HashMap, HashSet};

use chrono::Datelike;
use uuid::Uuid;

use schoolgen_generate::calendar::{first_of_month, midnight, month_starts};
use schoolgen_generate::config::ExpenseLabel;
use schoolgen_generate::generators::performance::{absences_for, profile_ranges};
use schoolgen_generate::output::bi::pivot_resources;
use schoolgen_generate::records::{EnrollmentStatus, PaymentStatus, Student, TicketStatus};
use schoolgen_generate::{Dataset, SchemaVariant, SimulationConfig, generate_dataset};

fn generate(variant: SchemaVariant) -> (SimulationConfig, Dataset) {
    let config = SimulationConfig::for_variant(variant);
    let dataset = generate_dataset(&config).expect("generate dataset");
    (config, dataset)
}

fn students_by_id(dataset: &Dataset) -> HashMap<Uuid, &Student> {
    dataset
        .students
        .iter()
        .map(|student| (student.id, student))
        .collect()
}

#[test]
fn withdrawal_dates_are_consistent_with_status() {
    for variant in SchemaVariant::ALL {
        let (config, dataset) = generate(variant);
        assert_eq!(dataset.students.len(), config.population);

        for student in &dataset.students {
            match student.withdrawn_on {
                Some(withdrawn_on) => {
                    assert_eq!(student.status, EnrollmentStatus::Withdrawn);
                    assert!(withdrawn_on >= student.enrolled_on, "{}", student.id);
                    assert!(withdrawn_on >= config.window_start, "{}", student.id);
                    assert!(withdrawn_on <= config.cutoff, "{}", student.id);
                }
                None => assert_ne!(student.status, EnrollmentStatus::Withdrawn),
            }
            assert!(student.enrolled_on >= config.enrollment_window.0);
            assert!(student.enrolled_on <= config.enrollment_window.1);
            assert!(student.segment.class_sections().contains(&student.class_section));
        }
    }
}

#[test]
fn students_belong_to_the_school_only_in_the_app_schema() {
    let (_, app) = generate(SchemaVariant::App);
    let school_id = app.schools.first().map(|school| school.id);
    assert_eq!(app.schools.len(), 1);
    assert!(app.students.iter().all(|student| student.school_id == school_id));

    let (_, bi) = generate(SchemaVariant::Bi);
    assert!(bi.schools.is_empty());
    assert!(bi.students.iter().all(|student| student.school_id.is_none()));
}

#[test]
fn status_proportions_match_the_split() {
    let mut active_share = 0.0;
    let mut withdrawn_share = 0.0;
    let seeds = 1..=20_u64;
    let runs = seeds.clone().count() as f64;

    for seed in seeds {
        let mut config = SimulationConfig::for_variant(SchemaVariant::Bi);
        config.seed = seed;
        let dataset = generate_dataset(&config).expect("generate dataset");
        let total = dataset.students.len() as f64;
        let count = |status| {
            dataset
                .students
                .iter()
                .filter(|student| student.status == status)
                .count() as f64
        };
        active_share += count(EnrollmentStatus::Active) / total;
        withdrawn_share += count(EnrollmentStatus::Withdrawn) / total;
    }

    let active_share = active_share / runs;
    let withdrawn_share = withdrawn_share / runs;
    assert!((active_share - 0.66).abs() < 0.03, "active share {active_share}");
    assert!((withdrawn_share - 0.20).abs() < 0.03, "withdrawn share {withdrawn_share}");
}

#[test]
fn performance_stops_at_the_withdrawal_period() {
    for variant in SchemaVariant::ALL {
        let (config, dataset) = generate(variant);
        let students = students_by_id(&dataset);
        let open_periods = config
            .performance
            .periods
            .iter()
            .filter(|period| period.starts_on <= config.cutoff)
            .count();

        let mut periods_seen: HashMap<Uuid, HashSet<usize>> = HashMap::new();
        for record in &dataset.performance {
            let student = students[&record.student_id];
            assert!(record.period_index < open_periods);
            if let Some(last_active) = student.last_active_period(&config.performance.periods) {
                assert!(
                    record.period_index < last_active,
                    "student {} has a record after withdrawing",
                    student.id
                );
            }
            assert!(student.segment.subjects(variant).contains(&record.subject));
            periods_seen
                .entry(record.student_id)
                .or_default()
                .insert(record.period_index);
        }

        let (_, max_withdrawn) = config.performance.withdrawn_periods;
        for student in &dataset.students {
            let seen = periods_seen.get(&student.id).map_or(0, HashSet::len);
            if student.is_withdrawn() {
                assert!(seen <= max_withdrawn);
            } else {
                assert_eq!(seen, open_periods, "{}", student.id);
            }
        }
    }
}

#[test]
fn performance_values_follow_the_student_profile() {
    for variant in SchemaVariant::ALL {
        let (config, dataset) = generate(variant);
        let students = students_by_id(&dataset);

        for record in &dataset.performance {
            let ranges = profile_ranges(&config.performance, students[&record.student_id].profile);
            assert!(ranges.grade.contains(record.grade), "grade {}", record.grade);
            assert!(ranges.attendance.contains(record.attendance));
            assert!(ranges.completion.contains(record.completion));
            assert_eq!(record.absences, absences_for(record.attendance));
        }
    }
}

#[test]
fn revenue_respects_scholarships_and_withdrawals() {
    for variant in SchemaVariant::ALL {
        let (config, dataset) = generate(variant);
        let students = students_by_id(&dataset);
        let months = month_starts(config.window_start, config.cutoff);
        let current_month = first_of_month(config.cutoff);

        let mut billed: HashMap<Uuid, usize> = HashMap::new();
        for record in &dataset.finance.revenue {
            let student = students[&record.student_id];
            assert!(!student.scholarship, "scholarship student billed");
            if let Some(withdrawn_on) = student.withdrawn_on {
                assert!(record.reference_month <= first_of_month(withdrawn_on));
            }
            assert_eq!(record.due_date.day(), config.billing.due_day);
            match record.status {
                PaymentStatus::Paid => {
                    let paid_on = record.payment_date.expect("paid rows carry a date");
                    assert!(paid_on <= config.cutoff);
                }
                PaymentStatus::Late | PaymentStatus::Pending => {
                    assert!(record.payment_date.is_none())
                }
            }
            if config.billing.pending_current_month {
                assert_eq!(
                    record.status == PaymentStatus::Pending,
                    record.reference_month == current_month
                );
            } else {
                assert_ne!(record.status, PaymentStatus::Pending);
            }
            *billed.entry(record.student_id).or_default() += 1;
        }

        for student in dataset.students.iter().filter(|student| !student.scholarship) {
            if student.withdrawn_on.is_none() {
                assert_eq!(billed.get(&student.id), Some(&months.len()));
            }
        }
    }
}

#[test]
fn delinquent_families_pay_late_more_often() {
    let (_, dataset) = generate(SchemaVariant::Bi);
    let students = students_by_id(&dataset);
    let late_share = |status: EnrollmentStatus| {
        let rows: Vec<_> = dataset
            .finance
            .revenue
            .iter()
            .filter(|record| students[&record.student_id].status == status)
            .collect();
        let late = rows
            .iter()
            .filter(|record| record.status == PaymentStatus::Late)
            .count();
        late as f64 / rows.len() as f64
    };

    assert!(late_share(EnrollmentStatus::Delinquent) > 0.5);
    assert!(late_share(EnrollmentStatus::Active) < 0.1);
}

#[test]
fn expenses_after_the_cutoff_stay_pending() {
    for variant in SchemaVariant::ALL {
        let (config, dataset) = generate(variant);
        assert!(!dataset.finance.expenses.is_empty());
        for expense in &dataset.finance.expenses {
            assert!(config.expenses.categories.contains(&expense.category));
            assert!(config.expenses.amount.contains(expense.amount));
            assert_eq!(first_of_month(expense.due_date), expense.reference_month);
            let label = match config.expenses.label {
                ExpenseLabel::Monthly => format!("Despesa mensal referente a {}", expense.category),
                ExpenseLabel::Numbered => format!("Despesa {} - ", expense.category),
            };
            assert!(expense.description.starts_with(&label), "{}", expense.description);
            if expense.due_date > config.cutoff {
                assert_eq!(expense.status, PaymentStatus::Pending);
                assert!(expense.payment_date.is_none());
            } else {
                assert_eq!(expense.status, PaymentStatus::Paid);
                assert_eq!(expense.payment_date, Some(expense.due_date));
            }
        }
    }
}

#[test]
fn tickets_resolve_only_before_the_cutoff() {
    for variant in SchemaVariant::ALL {
        let (config, dataset) = generate(variant);
        let cutoff = midnight(config.cutoff);
        assert_eq!(dataset.tickets.len(), config.tickets.count);
        assert!(
            dataset
                .tickets
                .iter()
                .all(|ticket| config.tickets.subjects.contains(&ticket.subject))
        );

        for ticket in &dataset.tickets {
            assert!(ticket.opened_at >= midnight(config.window_start));
            assert!(ticket.opened_at < cutoff);
            let lands_after_cutoff = ticket.opened_at + ticket.sampled_duration > cutoff;
            match ticket.resolved_at {
                Some(resolved_at) => {
                    assert_eq!(ticket.status, TicketStatus::Resolved);
                    assert!(!lands_after_cutoff);
                    assert!(resolved_at > ticket.opened_at);
                    assert!(ticket.elapsed_hours() > 0.0);
                }
                None => {
                    assert_eq!(ticket.status, TicketStatus::Open);
                    assert!(lands_after_cutoff);
                    assert_eq!(ticket.elapsed_hours(), 0.0);
                }
            }
        }
    }
}

#[test]
fn metrics_cover_every_unit_month_and_kind() {
    for variant in SchemaVariant::ALL {
        let (config, dataset) = generate(variant);
        let months = month_starts(config.window_start, config.cutoff);
        assert_eq!(
            dataset.metrics.len(),
            months.len() * config.units.len() * config.metrics.len()
        );

        let keys: HashSet<_> = dataset
            .metrics
            .iter()
            .map(|sample| (sample.month, sample.unit, sample.kind))
            .collect();
        assert_eq!(keys.len(), dataset.metrics.len());
    }

    let (config, dataset) = generate(SchemaVariant::Bi);
    let rows = pivot_resources(&dataset.metrics);
    let months = month_starts(config.window_start, config.cutoff);
    assert_eq!(rows.len(), months.len() * config.units.len());
    assert!(rows.iter().all(|row| {
        row.consumo_energia_kwh.is_some()
            && row.refeicoes_servidas.is_some()
            && row.absenteismo_docente.is_some()
    }));
}

#[test]
fn surveys_skip_withdrawn_families() {
    let (config, dataset) = generate(SchemaVariant::Bi);
    let survey = config.survey.as_ref().expect("bi survey config");
    let students = students_by_id(&dataset);
    let enrolled = dataset
        .students
        .iter()
        .filter(|student| !student.is_withdrawn())
        .count();
    assert_eq!(dataset.surveys.len(), enrolled * survey.dates.len());

    let allowed_scores: HashSet<u8> = survey.score_weights.iter().map(|(score, _)| *score).collect();
    for response in &dataset.surveys {
        assert!(!students[&response.student_id].is_withdrawn());
        assert!(survey.dates.contains(&response.surveyed_on));
        assert!(allowed_scores.contains(&response.score));
        assert!(response.family_health <= 100);
        let expected_comment = if response.score > survey.promoter_threshold {
            survey.promoter_comment
        } else {
            survey.detractor_comment
        };
        assert_eq!(response.comment, expected_comment);
    }

    let (_, app) = generate(SchemaVariant::App);
    assert!(app.surveys.is_empty());
}

#[test]
fn delinquent_families_report_lower_health() {
    let (config, dataset) = generate(SchemaVariant::Bi);
    let survey = config.survey.as_ref().expect("bi survey config");
    let students = students_by_id(&dataset);
    let mean_health = |status: EnrollmentStatus| {
        let scores: Vec<f64> = dataset
            .surveys
            .iter()
            .filter(|response| students[&response.student_id].status == status)
            .map(|response| f64::from(response.family_health))
            .collect();
        assert!(!scores.is_empty());
        scores.iter().sum::<f64>() / scores.len() as f64
    };

    let delinquent = mean_health(EnrollmentStatus::Delinquent);
    let active = mean_health(EnrollmentStatus::Active);
    assert!(
        active - delinquent > survey.delinquent_penalty / 2.0,
        "delinquent={delinquent} active={active}"
    );
    assert!((active - survey.health_baseline).abs() < 5.0, "active={active}");
}

#[test]
fn active_families_get_every_period_of_the_variant() {
    for variant in SchemaVariant::ALL {
        let (_, dataset) = generate(variant);
        let student = dataset
            .students
            .iter()
            .find(|student| student.status == EnrollmentStatus::Active)
            .expect("an active student");
        let periods: HashSet<(i32, u8)> = dataset
            .performance
            .iter()
            .filter(|record| record.student_id == student.id)
            .map(|record| (record.period.year, record.period.bimester))
            .collect();
        assert_eq!(periods.len(), 4, "{variant}");
        let expected_last = match variant {
            SchemaVariant::App => (2026, 1),
            SchemaVariant::Bi => (2025, 4),
        };
        assert!(periods.contains(&expected_last));
    }
}

#[test]
fn stages_keep_their_draws_when_another_stage_changes() {
    let base = SimulationConfig::for_variant(SchemaVariant::Bi);
    let mut more_tickets = base.clone();
    more_tickets.tickets.count += 50;

    let a = generate_dataset(&base).expect("base dataset");
    let b = generate_dataset(&more_tickets).expect("changed dataset");
    assert_eq!(a.students, b.students);
    assert_eq!(a.metrics, b.metrics);
    assert_eq!(b.tickets.len(), a.tickets.len() + 50);
    assert_eq!(a.tickets[..], b.tickets[..a.tickets.len()]);
}
