use chrono::Duration;
use rand::Rng;

use crate::calendar::{first_of_month, month_starts, on_day};
use crate::config::{ExpenseDay, ExpenseLabel, SimulationConfig};
use crate::generators::{next_uuid, round_to, sample};
use crate::records::{
    EnrollmentStatus, ExpenseRecord, FinanceLedger, PaymentStatus, RevenueRecord, Student,
};

/// Monthly tuition for every paying student plus the school's expenses.
pub fn generate_finance(
    config: &SimulationConfig,
    students: &[Student],
    rng: &mut impl Rng,
) -> FinanceLedger {
    let months = month_starts(config.window_start, config.cutoff);
    FinanceLedger {
        revenue: generate_revenue(config, students, &months, rng),
        expenses: generate_expenses(config, &months, rng),
    }
}

fn generate_revenue(
    config: &SimulationConfig,
    students: &[Student],
    months: &[chrono::NaiveDate],
    rng: &mut impl Rng,
) -> Vec<RevenueRecord> {
    let billing = &config.billing;
    let current_month = first_of_month(config.cutoff);
    let jitter = billing.payment_jitter_days.abs();

    let mut revenue = Vec::new();
    for student in students.iter().filter(|student| !student.scholarship) {
        let late_rate = if student.status == EnrollmentStatus::Delinquent {
            billing.delinquent_late_rate
        } else {
            billing.regular_late_rate
        };

        for &month in months {
            if student
                .withdrawn_on
                .is_some_and(|withdrawn_on| withdrawn_on < month)
            {
                break;
            }

            let due_date = on_day(month, billing.due_day);
            let status = if billing.pending_current_month && month == current_month {
                PaymentStatus::Pending
            } else if rng.random_bool(late_rate) {
                PaymentStatus::Late
            } else {
                PaymentStatus::Paid
            };
            let payment_date = match status {
                PaymentStatus::Paid => {
                    let offset = rng.random_range(-jitter..=jitter);
                    Some((due_date + Duration::days(offset)).min(config.cutoff))
                }
                PaymentStatus::Late | PaymentStatus::Pending => None,
            };

            revenue.push(RevenueRecord {
                id: next_uuid(rng),
                student_id: student.id,
                reference_month: month,
                amount: billing.monthly_fee,
                due_date,
                payment_date,
                status,
            });
        }
    }
    revenue
}

fn generate_expenses(
    config: &SimulationConfig,
    months: &[chrono::NaiveDate],
    rng: &mut impl Rng,
) -> Vec<ExpenseRecord> {
    let plan = &config.expenses;
    let (min_rows, max_rows) = plan.rows_per_category;

    let mut expenses = Vec::new();
    for &month in months {
        for &category in &plan.categories {
            let rows = rng.random_range(min_rows..=max_rows);
            for _ in 0..rows {
                let amount = round_to(sample(plan.amount, rng), 2);
                let due_date = match plan.day {
                    ExpenseDay::Fixed(day) => on_day(month, day),
                    ExpenseDay::Random => {
                        month + Duration::days(rng.random_range(0..=27))
                    }
                };
                let description = match plan.label {
                    ExpenseLabel::Monthly => format!("Despesa mensal referente a {category}"),
                    ExpenseLabel::Numbered => {
                        format!("Despesa {category} - {}", rng.random_range(1..=100))
                    }
                };
                // Bills falling after the cutoff have not been settled yet.
                let (status, payment_date) = if due_date > config.cutoff {
                    (PaymentStatus::Pending, None)
                } else {
                    (PaymentStatus::Paid, Some(due_date))
                };

                expenses.push(ExpenseRecord {
                    id: next_uuid(rng),
                    category,
                    description,
                    amount,
                    reference_month: month,
                    due_date,
                    payment_date,
                    status,
                });
            }
        }
    }
    expenses
}
