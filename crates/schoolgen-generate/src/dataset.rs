//! Runs the generation stages in dependency order and keeps the results in
//! memory until a schema variant writes them.

use tracing::{debug, info};

use crate::config::SimulationConfig;
use crate::errors::GenerationError;
use crate::generators::finance::generate_finance;
use crate::generators::operations::generate_tickets;
use crate::generators::performance::generate_performance;
use crate::generators::resources::generate_metrics;
use crate::generators::schools::generate_schools;
use crate::generators::stage_rng;
use crate::generators::students::generate_students;
use crate::generators::surveys::generate_surveys;
use crate::records::{
    FinanceLedger, MetricSample, PerformanceRecord, School, Student, SurveyResponse, Ticket,
};
use crate::variant::SchemaVariant;

#[derive(Debug, Clone)]
pub struct Dataset {
    pub variant: SchemaVariant,
    pub schools: Vec<School>,
    pub students: Vec<Student>,
    pub performance: Vec<PerformanceRecord>,
    pub finance: FinanceLedger,
    pub tickets: Vec<Ticket>,
    pub metrics: Vec<MetricSample>,
    pub surveys: Vec<SurveyResponse>,
}

pub fn generate_dataset(config: &SimulationConfig) -> Result<Dataset, GenerationError> {
    config.validate()?;
    let variant = config.variant;
    let seed = config.seed;

    let schools = match variant {
        SchemaVariant::App => generate_schools(&mut stage_rng(seed, "schools")),
        SchemaVariant::Bi => Vec::new(),
    };
    let school_id = schools.first().map(|school| school.id);

    let students = generate_students(config, school_id, &mut stage_rng(seed, "students"))?;
    let withdrawn = students.iter().filter(|student| student.is_withdrawn()).count();
    info!(stage = "students", rows = students.len(), withdrawn, "stage generated");

    let performance = generate_performance(config, &students, &mut stage_rng(seed, "performance"));
    info!(stage = "performance", rows = performance.len(), "stage generated");

    let finance = generate_finance(config, &students, &mut stage_rng(seed, "finance"));
    info!(
        stage = "finance",
        revenue_rows = finance.revenue.len(),
        expense_rows = finance.expenses.len(),
        "stage generated"
    );

    let tickets = generate_tickets(config, &mut stage_rng(seed, "operations"))?;
    let open = tickets.iter().filter(|ticket| ticket.resolved_at.is_none()).count();
    info!(stage = "operations", rows = tickets.len(), open, "stage generated");

    let metrics = generate_metrics(config, &mut stage_rng(seed, "resources"))?;
    info!(stage = "resources", rows = metrics.len(), "stage generated");

    let surveys = match &config.survey {
        Some(survey) => generate_surveys(survey, &students, &mut stage_rng(seed, "surveys"))?,
        None => {
            debug!(variant = %variant, "survey stage disabled");
            Vec::new()
        }
    };
    if !surveys.is_empty() {
        info!(stage = "surveys", rows = surveys.len(), "stage generated");
    }

    Ok(Dataset {
        variant,
        schools,
        students,
        performance,
        finance,
        tickets,
        metrics,
        surveys,
    })
}
