use super::company_facts::{RawObservation, Taxonomy};

/// Pick the candidate concept the filer actually uses today.
///
/// Candidates are scored by how many observations fall in or after
/// `min_recent_year`. The highest score wins and ties go to the earlier
/// candidate. The first populated candidate is the baseline, so a filer whose
/// only concept has nothing recent still resolves to it.
pub fn resolve<'a>(
    candidates: &[&str],
    taxonomy: &'a Taxonomy,
    min_recent_year: i32,
) -> &'a [RawObservation] {
    let mut best: Option<(&'a [RawObservation], usize)> = None;

    for concept in candidates {
        let Some(observations) = taxonomy.usd_observations(concept) else {
            continue;
        };
        if observations.is_empty() {
            continue;
        }

        let recent = observations
            .iter()
            .filter(|o| o.fiscal_year.map_or(false, |fy| fy >= min_recent_year))
            .count();

        match best {
            Some((_, best_count)) if recent <= best_count => {}
            _ => best = Some((observations, recent)),
        }
    }

    best.map(|(observations, _)| observations).unwrap_or(&[])
}
