use chrono::Duration;
use rand::Rng;
use rand::distr::Distribution;
use rand_distr::Normal;

use crate::calendar::{midnight, random_instant};
use crate::config::SimulationConfig;
use crate::errors::GenerationError;
use crate::generators::{next_uuid, pick_required};
use crate::records::{Ticket, TicketStatus};

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Service tickets opened uniformly across the window.
///
/// A ticket is resolved only when its simulated resolution instant is not
/// after the cutoff; otherwise it stays open with no resolution date.
pub fn generate_tickets(
    config: &SimulationConfig,
    rng: &mut impl Rng,
) -> Result<Vec<Ticket>, GenerationError> {
    let plan = &config.tickets;
    let duration_days = Normal::new(plan.mean_days, plan.std_dev_days)
        .map_err(|err| GenerationError::InvalidConfig(format!("ticket duration: {err}")))?;
    let cutoff = midnight(config.cutoff);

    let mut tickets = Vec::with_capacity(plan.count);
    for _ in 0..plan.count {
        let id = next_uuid(rng);
        let opened_at = random_instant(rng, config.window_start, config.cutoff);
        let days = duration_days.sample(rng).max(plan.min_days);
        let sampled_duration = Duration::seconds((days * SECONDS_PER_DAY).round() as i64);
        let resolution = opened_at + sampled_duration;
        let (status, resolved_at) = if resolution <= cutoff {
            (TicketStatus::Resolved, Some(resolution))
        } else {
            (TicketStatus::Open, None)
        };

        let unit = pick_required(&config.units, "unit", rng)?.name;
        let sector = *pick_required(&plan.sectors, "ticket sector", rng)?;
        let priority = *pick_required(&plan.priorities, "ticket priority", rng)?;
        let subject = *pick_required(&plan.subjects, "ticket subject", rng)?;

        tickets.push(Ticket {
            id,
            unit,
            sector,
            subject,
            priority,
            status,
            opened_at,
            resolved_at,
            sampled_duration,
        });
    }
    Ok(tickets)
}
