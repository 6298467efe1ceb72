//! Embedded simulation constants.
//!
//! Nothing here is read from the environment: a run is fully described by
//! [`SimulationConfig::for_variant`], which keeps reruns reproducible.

use chrono::NaiveDate;
use serde::Serialize;

use crate::errors::GenerationError;
use crate::records::MetricKind;
use crate::variant::SchemaVariant;

pub const DEFAULT_SEED: u64 = 42;
pub const DEFAULT_POPULATION: usize = 480;

/// Physical campus with its map center and relative size.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnitSpec {
    pub name: &'static str,
    pub latitude: f64,
    pub longitude: f64,
    /// Multiplier applied to size-dependent metrics.
    pub size_factor: f64,
}

/// Cumulative thresholds on a single uniform draw.
///
/// `[0, withdrawn)` is Withdrawn, `[withdrawn, delinquent)` is Delinquent and
/// the rest is Active.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StatusSplit {
    pub withdrawn: f64,
    pub delinquent: f64,
}

/// A grading period (bimester) and the date it starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AcademicPeriod {
    pub year: i32,
    pub bimester: u8,
    pub starts_on: NaiveDate,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ValueRange {
    pub min: f64,
    pub max: f64,
}

impl ValueRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProfileRanges {
    pub grade: ValueRange,
    pub attendance: ValueRange,
    pub completion: ValueRange,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PerformanceConfig {
    pub periods: Vec<AcademicPeriod>,
    /// Inclusive bounds on the periods a withdrawn student attends.
    pub withdrawn_periods: (usize, usize),
    pub studious: ProfileRanges,
    pub struggling: ProfileRanges,
    /// Precision applied to grade, attendance and completion when drawn.
    pub decimals: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BillingConfig {
    pub monthly_fee: f64,
    pub due_day: u32,
    /// Paid rows settle within this many days either side of the due date.
    pub payment_jitter_days: i64,
    pub delinquent_late_rate: f64,
    pub regular_late_rate: f64,
    /// Bill the cutoff month as pending instead of drawing a status.
    pub pending_current_month: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum ExpenseDay {
    Fixed(u32),
    /// Uniform offset of 0..=27 days from the first of the month.
    Random,
}

/// How an expense row is described.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum ExpenseLabel {
    /// "Despesa mensal referente a <categoria>".
    Monthly,
    /// "Despesa <categoria> - <n>" with n drawn from 1..=100.
    Numbered,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExpenseConfig {
    pub categories: Vec<&'static str>,
    pub rows_per_category: (u32, u32),
    pub amount: ValueRange,
    pub day: ExpenseDay,
    pub label: ExpenseLabel,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TicketConfig {
    pub count: usize,
    pub sectors: Vec<&'static str>,
    pub priorities: Vec<&'static str>,
    pub mean_days: f64,
    pub std_dev_days: f64,
    pub min_days: f64,
    /// Subject lines, one drawn per ticket.
    pub subjects: Vec<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Sampling {
    Continuous(ValueRange),
    Discrete { min: i64, max: i64 },
    OneOf(Vec<f64>),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum Rounding {
    Decimals(u32),
    Truncate,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricSpec {
    pub kind: MetricKind,
    pub sampling: Sampling,
    /// Multiply by the unit's size factor before rounding.
    pub scaled: bool,
    pub rounding: Rounding,
}

impl MetricSpec {
    fn continuous(kind: MetricKind, min: f64, max: f64, scaled: bool, decimals: u32) -> Self {
        Self {
            kind,
            sampling: Sampling::Continuous(ValueRange::new(min, max)),
            scaled,
            rounding: Rounding::Decimals(decimals),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SurveyConfig {
    pub dates: Vec<NaiveDate>,
    pub score_weights: Vec<(u8, f64)>,
    pub health_baseline: f64,
    pub delinquent_penalty: f64,
    pub health_std_dev: f64,
    /// Scores strictly above this get the positive comment.
    pub promoter_threshold: u8,
    pub promoter_comment: &'static str,
    pub detractor_comment: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationConfig {
    pub variant: SchemaVariant,
    pub seed: u64,
    pub population: usize,
    pub window_start: NaiveDate,
    /// "Today" for the simulation; nothing is dated after it.
    pub cutoff: NaiveDate,
    pub enrollment_window: (NaiveDate, NaiveDate),
    pub units: Vec<UnitSpec>,
    pub coordinate_jitter: f64,
    pub status_split: StatusSplit,
    pub scholarship_rate: f64,
    pub sibling_rate: f64,
    pub studious_rate: f64,
    pub performance: PerformanceConfig,
    pub billing: BillingConfig,
    pub expenses: ExpenseConfig,
    pub tickets: TicketConfig,
    pub metrics: Vec<MetricSpec>,
    pub survey: Option<SurveyConfig>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self::for_variant(SchemaVariant::default())
    }
}

impl SimulationConfig {
    pub fn for_variant(variant: SchemaVariant) -> Self {
        let (sul, norte) = match variant {
            SchemaVariant::App => (0.8, 0.6),
            SchemaVariant::Bi => (0.7, 0.7),
        };
        let units = vec![
            UnitSpec {
                name: "Centro",
                latitude: -23.5505,
                longitude: -46.6333,
                size_factor: 1.0,
            },
            UnitSpec {
                name: "Sul",
                latitude: -23.6505,
                longitude: -46.7000,
                size_factor: sul,
            },
            UnitSpec {
                name: "Norte",
                latitude: -23.4805,
                longitude: -46.6000,
                size_factor: norte,
            },
        ];

        let periods = match variant {
            SchemaVariant::App => vec![
                period(2025, 1, date(2025, 2, 1)),
                period(2025, 2, date(2025, 4, 15)),
                period(2025, 3, date(2025, 8, 1)),
                period(2026, 1, date(2026, 2, 2)),
            ],
            SchemaVariant::Bi => vec![
                period(2025, 1, date(2025, 2, 1)),
                period(2025, 2, date(2025, 4, 15)),
                period(2025, 3, date(2025, 8, 1)),
                period(2025, 4, date(2025, 10, 1)),
            ],
        };

        let base = Self {
            variant,
            seed: DEFAULT_SEED,
            population: DEFAULT_POPULATION,
            window_start: date(2025, 2, 1),
            cutoff: date(2026, 2, 15),
            enrollment_window: (date(2024, 11, 1), date(2025, 1, 31)),
            units,
            coordinate_jitter: 0.02,
            status_split: StatusSplit {
                withdrawn: 0.20,
                delinquent: 0.34,
            },
            scholarship_rate: 0.15,
            sibling_rate: 0.30,
            studious_rate: 0.70,
            performance: PerformanceConfig {
                periods,
                withdrawn_periods: (1, 2),
                studious: ProfileRanges {
                    grade: ValueRange::new(6.5, 10.0),
                    attendance: ValueRange::new(75.0, 100.0),
                    completion: ValueRange::new(80.0, 100.0),
                },
                struggling: ProfileRanges {
                    grade: ValueRange::new(2.0, 7.0),
                    attendance: ValueRange::new(50.0, 80.0),
                    completion: ValueRange::new(40.0, 80.0),
                },
                decimals: 2,
            },
            billing: BillingConfig {
                monthly_fee: 1500.0,
                due_day: 10,
                payment_jitter_days: 5,
                delinquent_late_rate: 0.6,
                regular_late_rate: 0.05,
                pending_current_month: false,
            },
            expenses: ExpenseConfig {
                categories: vec![
                    "Energia",
                    "Água",
                    "Salários",
                    "Manutenção",
                    "Marketing",
                    "Materiais",
                ],
                rows_per_category: (1, 1),
                amount: ValueRange::new(5000.0, 50000.0),
                day: ExpenseDay::Fixed(20),
                label: ExpenseLabel::Monthly,
            },
            tickets: TicketConfig {
                count: 300,
                sectors: vec!["TI", "Manutenção", "Secretaria", "Segurança", "Limpeza"],
                priorities: vec!["Baixa", "Média", "Alta"],
                mean_days: 1.8,
                std_dev_days: 1.0,
                min_days: 0.1,
                subjects: vec!["Solicitação de serviço padrão"],
            },
            metrics: bi_metrics(),
            survey: Some(SurveyConfig {
                dates: vec![date(2025, 6, 15), date(2025, 11, 15)],
                score_weights: vec![
                    (9, 0.40),
                    (10, 0.30),
                    (7, 0.10),
                    (8, 0.10),
                    (5, 0.05),
                    (6, 0.03),
                    (0, 0.01),
                    (4, 0.01),
                ],
                health_baseline: 90.0,
                delinquent_penalty: 30.0,
                health_std_dev: 10.0,
                promoter_threshold: 8,
                promoter_comment: "Gosto muito da escola",
                detractor_comment: "Pode melhorar",
            }),
        };

        match variant {
            SchemaVariant::Bi => base,
            SchemaVariant::App => Self {
                performance: PerformanceConfig {
                    studious: ProfileRanges {
                        grade: ValueRange::new(6.0, 10.0),
                        attendance: ValueRange::new(85.0, 100.0),
                        completion: ValueRange::new(90.0, 100.0),
                    },
                    struggling: ProfileRanges {
                        grade: ValueRange::new(2.0, 7.5),
                        attendance: ValueRange::new(60.0, 90.0),
                        completion: ValueRange::new(40.0, 85.0),
                    },
                    decimals: 1,
                    ..base.performance
                },
                billing: BillingConfig {
                    delinquent_late_rate: 0.7,
                    regular_late_rate: 0.0,
                    pending_current_month: true,
                    ..base.billing
                },
                expenses: ExpenseConfig {
                    categories: vec![
                        "Pessoal",
                        "Infraestrutura",
                        "Tecnologia",
                        "Marketing",
                        "Alimentação",
                    ],
                    rows_per_category: (2, 4),
                    amount: ValueRange::new(100.0, 5000.0),
                    day: ExpenseDay::Random,
                    label: ExpenseLabel::Numbered,
                },
                tickets: TicketConfig {
                    count: 200,
                    sectors: vec!["Manutenção", "TI", "Limpeza", "Secretaria"],
                    subjects: APP_TICKET_SUBJECTS.to_vec(),
                    ..base.tickets
                },
                metrics: app_metrics(),
                survey: None,
                ..base
            },
        }
    }

    /// Reject constants that would make a stage panic or loop.
    pub fn validate(&self) -> Result<(), GenerationError> {
        if self.units.is_empty() {
            return invalid("at least one unit is required");
        }
        if self.cutoff < self.window_start {
            return invalid("cutoff must not precede the window start");
        }
        if self.enrollment_window.0 > self.enrollment_window.1 {
            return invalid("enrollment window start must be <= end");
        }
        let split = self.status_split;
        if !(0.0..=1.0).contains(&split.withdrawn)
            || !(0.0..=1.0).contains(&split.delinquent)
            || split.withdrawn > split.delinquent
        {
            return invalid("status split must satisfy 0 <= withdrawn <= delinquent <= 1");
        }
        for (name, rate) in [
            ("scholarship_rate", self.scholarship_rate),
            ("sibling_rate", self.sibling_rate),
            ("studious_rate", self.studious_rate),
            ("billing.delinquent_late_rate", self.billing.delinquent_late_rate),
            ("billing.regular_late_rate", self.billing.regular_late_rate),
        ] {
            if !(0.0..=1.0).contains(&rate) {
                return invalid(&format!("{name} must be within [0, 1]"));
            }
        }

        let performance = &self.performance;
        if performance.periods.is_empty() {
            return invalid("at least one academic period is required");
        }
        if performance
            .periods
            .windows(2)
            .any(|pair| pair[0].starts_on > pair[1].starts_on)
        {
            return invalid("academic periods must be ordered by start date");
        }
        let (min_periods, max_periods) = performance.withdrawn_periods;
        if min_periods > max_periods {
            return invalid("withdrawn_periods min must be <= max");
        }
        for ranges in [&performance.studious, &performance.struggling] {
            for range in [ranges.grade, ranges.attendance, ranges.completion] {
                check_range("performance range", range)?;
            }
        }

        check_range("expenses.amount", self.expenses.amount)?;
        if self.expenses.rows_per_category.0 > self.expenses.rows_per_category.1 {
            return invalid("expenses.rows_per_category min must be <= max");
        }
        if self.tickets.sectors.is_empty() || self.tickets.priorities.is_empty() {
            return invalid("tickets need at least one sector and one priority");
        }
        if self.tickets.subjects.is_empty() {
            return invalid("tickets need at least one subject line");
        }
        if self.tickets.std_dev_days < 0.0 || self.tickets.min_days <= 0.0 {
            return invalid("tickets need std_dev_days >= 0 and min_days > 0");
        }

        for metric in &self.metrics {
            match &metric.sampling {
                Sampling::Continuous(range) => check_range(metric.kind.code(), *range)?,
                Sampling::Discrete { min, max } if min > max => {
                    return invalid(&format!("{}: min must be <= max", metric.kind.code()));
                }
                Sampling::OneOf(values) if values.is_empty() => {
                    return invalid(&format!("{}: value list is empty", metric.kind.code()));
                }
                _ => {}
            }
        }

        match (self.variant, &self.survey) {
            (SchemaVariant::Bi, None) => {
                return invalid("the bi variant needs a survey model");
            }
            (SchemaVariant::App, Some(_)) => {
                return invalid("the app variant has no survey table");
            }
            _ => {}
        }
        if let Some(survey) = &self.survey {
            if survey.score_weights.iter().all(|(_, weight)| *weight <= 0.0)
                || survey.score_weights.iter().any(|(_, weight)| *weight < 0.0)
            {
                return invalid("survey score weights must be non-negative with a positive total");
            }
            if survey.health_std_dev < 0.0 {
                return invalid("survey.health_std_dev must be >= 0");
            }
        }

        Ok(())
    }
}

const APP_TICKET_SUBJECTS: &[&str] = &[
    "Solicitação de suporte técnico ou manutenção",
    "Ar-condicionado sem funcionar na sala de aula",
    "Projetor não liga",
    "Troca de lâmpadas no corredor",
    "Acesso ao sistema acadêmico bloqueado",
    "Vazamento no banheiro",
    "Emissão de declaração de matrícula",
    "Limpeza extra após evento",
    "Impressora sem toner",
    "Internet instável no laboratório",
];

fn app_metrics() -> Vec<MetricSpec> {
    use MetricKind::*;

    vec![
        MetricSpec {
            kind: Nps,
            sampling: Sampling::Discrete { min: 70, max: 95 },
            scaled: false,
            rounding: Rounding::Truncate,
        },
        MetricSpec::continuous(HealthScore, 7.5, 9.8, false, 1),
        MetricSpec::continuous(EnergyConsumption, 2000.0, 3000.0, true, 2),
        MetricSpec::continuous(TeacherAbsenteeism, 1.0, 4.0, false, 1),
        MetricSpec::continuous(FoodWasteRate, 2.0, 5.0, false, 1),
        MetricSpec {
            kind: MealsServed,
            sampling: Sampling::Continuous(ValueRange::new(2500.0, 4000.0)),
            scaled: true,
            rounding: Rounding::Truncate,
        },
        MetricSpec::continuous(MealCost, 12.5, 16.0, false, 2),
        MetricSpec {
            kind: Uptime,
            sampling: Sampling::OneOf(vec![99.9, 99.5, 100.0]),
            scaled: false,
            rounding: Rounding::Decimals(1),
        },
    ]
}

fn bi_metrics() -> Vec<MetricSpec> {
    use MetricKind::*;

    vec![
        MetricSpec::continuous(PrintingCost, 500.0, 1500.0, true, 2),
        MetricSpec::continuous(EnergyConsumption, 2000.0, 4000.0, true, 2),
        MetricSpec::continuous(WaterConsumption, 100.0, 300.0, true, 2),
        MetricSpec::continuous(FoodWasteRate, 1.0, 5.0, false, 2),
        MetricSpec {
            kind: MealsServed,
            sampling: Sampling::Continuous(ValueRange::new(3000.0, 5000.0)),
            scaled: true,
            rounding: Rounding::Truncate,
        },
        MetricSpec::continuous(MealCost, 10.0, 15.0, false, 2),
        MetricSpec::continuous(TeacherAbsenteeism, 0.0, 5.0, false, 2),
    ]
}

fn check_range(name: &str, range: ValueRange) -> Result<(), GenerationError> {
    if !range.min.is_finite() || !range.max.is_finite() || range.min > range.max {
        return invalid(&format!("{name}: min must be <= max"));
    }
    Ok(())
}

fn invalid(message: &str) -> Result<(), GenerationError> {
    Err(GenerationError::InvalidConfig(message.to_string()))
}

fn period(year: i32, bimester: u8, starts_on: NaiveDate) -> AcademicPeriod {
    AcademicPeriod {
        year,
        bimester,
        starts_on,
    }
}

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}
