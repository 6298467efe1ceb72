//! In-memory rows produced by the generation stages.
//!
//! Records are created once by their stage and only read afterwards; the
//! schema variants in [`crate::output`] decide how each one is rendered.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::Serialize;
use uuid::Uuid;

use crate::config::AcademicPeriod;
use crate::variant::SchemaVariant;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EnrollmentStatus {
    Active,
    Withdrawn,
    Delinquent,
}

impl EnrollmentStatus {
    pub fn label(self) -> &'static str {
        match self {
            Self::Active => "Ativo",
            Self::Withdrawn => "Evadido",
            Self::Delinquent => "Inadimplente",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub fn label(self) -> &'static str {
        match self {
            Self::Male => "M",
            Self::Female => "F",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Ethnicity {
    Branca,
    Parda,
    Preta,
    Amarela,
    Indigena,
}

impl Ethnicity {
    pub const ALL: [Ethnicity; 5] = [
        Self::Branca,
        Self::Parda,
        Self::Preta,
        Self::Amarela,
        Self::Indigena,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Branca => "Branca",
            Self::Parda => "Parda",
            Self::Preta => "Preta",
            Self::Amarela => "Amarela",
            Self::Indigena => "Indígena",
        }
    }
}

/// Household income in minimum wages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum IncomeBracket {
    UpTo3,
    From3To6,
    From6To10,
    Above10,
}

impl IncomeBracket {
    pub const ALL: [IncomeBracket; 4] = [
        Self::UpTo3,
        Self::From3To6,
        Self::From6To10,
        Self::Above10,
    ];

    pub fn label(self, variant: SchemaVariant) -> &'static str {
        match (variant, self) {
            (SchemaVariant::App, Self::UpTo3) => "Até 3 SM",
            (SchemaVariant::App, Self::From3To6) => "3-6 SM",
            (SchemaVariant::App, Self::From6To10) => "6-10 SM",
            (SchemaVariant::App, Self::Above10) => "Acima de 10 SM",
            (SchemaVariant::Bi, Self::UpTo3) => "Até 3",
            (SchemaVariant::Bi, Self::From3To6) => "3-6",
            (SchemaVariant::Bi, Self::From6To10) => "6-10",
            (SchemaVariant::Bi, Self::Above10) => "Acima de 10",
        }
    }
}

/// Grade band; fixes the class sections and the subject list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Segment {
    Infantil,
    FundamentalI,
    FundamentalII,
    EnsinoMedio,
}

impl Segment {
    pub const ALL: [Segment; 4] = [
        Self::Infantil,
        Self::FundamentalI,
        Self::FundamentalII,
        Self::EnsinoMedio,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Infantil => "Infantil",
            Self::FundamentalI => "Fundamental I",
            Self::FundamentalII => "Fundamental II",
            Self::EnsinoMedio => "Ensino Médio",
        }
    }

    pub fn class_sections(self) -> &'static [&'static str] {
        match self {
            Self::Infantil => &["G1", "G2", "G3"],
            Self::FundamentalI => &["1A", "1B", "2A", "2B", "3A", "4A", "5A"],
            Self::FundamentalII => &["6A", "6B", "7A", "7B", "8A", "9A"],
            Self::EnsinoMedio => &["1EM-A", "2EM-A", "3EM-A"],
        }
    }

    /// Subjects graded each period. Only the BI schema grades motor
    /// development for Infantil.
    pub fn subjects(self, variant: SchemaVariant) -> &'static [&'static str] {
        match self {
            Self::Infantil => match variant {
                SchemaVariant::App => &["Desenv. Cognitivo", "Socialização"],
                SchemaVariant::Bi => &["Desenv. Cognitivo", "Desenv. Motor", "Socialização"],
            },
            Self::FundamentalI => &["Português", "Matemática", "Ciências", "História", "Geografia"],
            Self::FundamentalII => &[
                "Português",
                "Matemática",
                "Ciências",
                "História",
                "Geografia",
                "Inglês",
                "Ed. Física",
            ],
            Self::EnsinoMedio => &[
                "Português",
                "Matemática",
                "Física",
                "Química",
                "Biologia",
                "História",
                "Sociologia",
                "Inglês",
            ],
        }
    }
}

/// Latent per-student trait that biases every performance record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AcademicProfile {
    Studious,
    Struggling,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HomeAddress {
    pub city: &'static str,
    pub neighborhood: &'static str,
    pub postal_code: String,
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct School {
    pub id: Uuid,
    pub name: &'static str,
    pub city: &'static str,
    pub state: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Student {
    pub id: Uuid,
    pub school_id: Option<Uuid>,
    pub full_name: String,
    pub birth_date: NaiveDate,
    pub gender: Gender,
    pub ethnicity: Ethnicity,
    pub unit: &'static str,
    pub segment: Segment,
    pub class_section: &'static str,
    pub status: EnrollmentStatus,
    pub enrolled_on: NaiveDate,
    pub withdrawn_on: Option<NaiveDate>,
    pub scholarship: bool,
    pub has_siblings: bool,
    pub income: IncomeBracket,
    pub address: HomeAddress,
    pub profile: AcademicProfile,
}

impl Student {
    pub fn is_withdrawn(&self) -> bool {
        self.status == EnrollmentStatus::Withdrawn
    }

    /// Number of leading periods that had started by the withdrawal date.
    ///
    /// `None` for students who never withdrew.
    pub fn last_active_period(&self, periods: &[AcademicPeriod]) -> Option<usize> {
        let withdrawn_on = self.withdrawn_on?;
        Some(
            periods
                .iter()
                .take_while(|period| period.starts_on <= withdrawn_on)
                .count(),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PerformanceRecord {
    pub id: Uuid,
    pub student_id: Uuid,
    pub subject: &'static str,
    /// Index into the configured period list.
    pub period_index: usize,
    pub period: AcademicPeriod,
    pub grade: f64,
    pub attendance: f64,
    pub completion: f64,
    pub absences: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PaymentStatus {
    Paid,
    Late,
    Pending,
}

impl PaymentStatus {
    pub fn label(self) -> &'static str {
        match self {
            Self::Paid => "Pago",
            Self::Late => "Atrasado",
            Self::Pending => "Pendente",
        }
    }
}

/// Monthly tuition owed by one student.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RevenueRecord {
    pub id: Uuid,
    pub student_id: Uuid,
    pub reference_month: NaiveDate,
    pub amount: f64,
    pub due_date: NaiveDate,
    pub payment_date: Option<NaiveDate>,
    pub status: PaymentStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExpenseRecord {
    pub id: Uuid,
    pub category: &'static str,
    pub description: String,
    pub amount: f64,
    pub reference_month: NaiveDate,
    pub due_date: NaiveDate,
    pub payment_date: Option<NaiveDate>,
    pub status: PaymentStatus,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FinanceLedger {
    pub revenue: Vec<RevenueRecord>,
    pub expenses: Vec<ExpenseRecord>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TicketStatus {
    Open,
    Resolved,
}

impl TicketStatus {
    pub fn label(self) -> &'static str {
        match self {
            Self::Open => "Aberto",
            Self::Resolved => "Resolvido",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Ticket {
    pub id: Uuid,
    pub unit: &'static str,
    pub sector: &'static str,
    pub subject: &'static str,
    pub priority: &'static str,
    pub status: TicketStatus,
    pub opened_at: NaiveDateTime,
    pub resolved_at: Option<NaiveDateTime>,
    /// Simulated time to resolution, kept even when the ticket is still open.
    #[serde(skip)]
    pub sampled_duration: Duration,
}

impl Ticket {
    pub fn elapsed_hours(&self) -> f64 {
        match self.resolved_at {
            Some(resolved_at) => {
                let seconds = (resolved_at - self.opened_at).num_seconds() as f64;
                crate::generators::round_to(seconds / 3600.0, 2)
            }
            None => 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum MetricKind {
    Nps,
    HealthScore,
    EnergyConsumption,
    WaterConsumption,
    PrintingCost,
    FoodWasteRate,
    MealsServed,
    MealCost,
    TeacherAbsenteeism,
    Uptime,
}

impl MetricKind {
    pub fn code(self) -> &'static str {
        match self {
            Self::Nps => "nps",
            Self::HealthScore => "health_score",
            Self::EnergyConsumption => "consumo_energia",
            Self::WaterConsumption => "consumo_agua",
            Self::PrintingCost => "custo_impressao",
            Self::FoodWasteRate => "taxa_desperdicio",
            Self::MealsServed => "refeicoes_servidas",
            Self::MealCost => "custo_refeicao",
            Self::TeacherAbsenteeism => "absenteismo_docentes",
            Self::Uptime => "uptime_ti",
        }
    }

    pub fn unit_tag(self) -> &'static str {
        match self {
            Self::Nps | Self::HealthScore => "score",
            Self::EnergyConsumption => "kwh",
            Self::WaterConsumption => "m3",
            Self::PrintingCost | Self::MealCost => "BRL",
            Self::FoodWasteRate | Self::TeacherAbsenteeism | Self::Uptime => "%",
            Self::MealsServed => "qtd",
        }
    }
}

/// A metric reading: counts are written without a fractional part.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MetricValue {
    Count(i64),
    Measure(f64),
}

impl MetricValue {
    pub fn as_f64(self) -> f64 {
        match self {
            Self::Count(value) => value as f64,
            Self::Measure(value) => value,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricSample {
    pub id: Uuid,
    pub unit: &'static str,
    pub month: NaiveDate,
    pub kind: MetricKind,
    pub value: MetricValue,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SurveyResponse {
    pub id: Uuid,
    pub student_id: Uuid,
    pub surveyed_on: NaiveDate,
    pub score: u8,
    pub family_health: u8,
    pub comment: &'static str,
}
