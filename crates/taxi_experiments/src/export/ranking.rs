use std::cmp::Ordering;

use crate::metrics::SimulationResult;

pub(crate) fn find_best_index(results: &[SimulationResult]) -> Option<usize> {
    results
        .iter()
        .enumerate()
        .filter(|(_, result)| result.assignments > 0)
        .min_by(|(_, a), (_, b)| {
            a.avg_assignment_wait
                .partial_cmp(&b.avg_assignment_wait)
                .unwrap_or(Ordering::Equal)
                .then(a.peak_fleet_size.cmp(&b.peak_fleet_size))
        })
        .map(|(idx, _)| idx)
}
