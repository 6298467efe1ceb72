use rand::RngCore;

use crate::generators::next_uuid;
use crate::records::School;

/// The single school every student row links to.
pub fn generate_schools(rng: &mut impl RngCore) -> Vec<School> {
    vec![School {
        id: next_uuid(rng),
        name: "Ensitec School",
        city: "São Paulo",
        state: "SP",
    }]
}
