use std::env;

use schoolgen_generate::records::EnrollmentStatus;
use schoolgen_generate::{SchemaVariant, SimulationConfig, generate_dataset};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let mut args = env::args().skip(1);
    let mut variant = SchemaVariant::default();
    let mut seed: Option<u64> = None;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--variant" => variant = args.next().ok_or("missing --variant value")?.parse()?,
            "--seed" => seed = Some(args.next().ok_or("missing --seed value")?.parse()?),
            _ => return Err(format!("unexpected argument: {arg}").into()),
        }
    }

    let mut config = SimulationConfig::for_variant(variant);
    if let Some(seed) = seed {
        config.seed = seed;
    }
    let dataset = generate_dataset(&config)?;

    let count = |status| {
        dataset
            .students
            .iter()
            .filter(|student| student.status == status)
            .count()
    };
    println!("variant={variant} seed={}", config.seed);
    println!(
        "students={} active={} delinquent={} withdrawn={}",
        dataset.students.len(),
        count(EnrollmentStatus::Active),
        count(EnrollmentStatus::Delinquent),
        count(EnrollmentStatus::Withdrawn),
    );
    println!(
        "performance={} revenue={} expenses={} tickets={} metrics={} surveys={}",
        dataset.performance.len(),
        dataset.finance.revenue.len(),
        dataset.finance.expenses.len(),
        dataset.tickets.len(),
        dataset.metrics.len(),
        dataset.surveys.len(),
    );
    Ok(())
}
