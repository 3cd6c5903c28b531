use taxi_core::scenario::ScenarioParams;

use super::{ParameterSpace, DEFAULT_DAYS};

/// One point of the grid, before seeds are applied.
#[derive(Debug, Clone)]
pub(super) struct ParameterCombination {
    pub(super) params: ScenarioParams,
    pub(super) days: u64,
}

/// Every dimension resolved to a non-empty list of values.
pub(super) struct ParameterVariations {
    base: ScenarioParams,
    initial_taxis: Vec<usize>,
    initial_residents: Vec<usize>,
    visit_chances: Vec<f64>,
    lower_wait_thresholds: Vec<f64>,
    upper_wait_thresholds: Vec<f64>,
    matching_algorithms: Vec<taxi_core::scenario::MatchingAlgorithmType>,
    days: Vec<u64>,
}

fn or_default<T: Clone>(values: &[T], default: T) -> Vec<T> {
    if values.is_empty() {
        vec![default]
    } else {
        values.to_vec()
    }
}

/// Replace each combination by one copy per value, applying `apply` to the copy.
fn expand<T: Copy>(
    combos: Vec<ParameterCombination>,
    values: &[T],
    apply: impl Fn(&mut ParameterCombination, T),
) -> Vec<ParameterCombination> {
    let apply = &apply;
    combos
        .into_iter()
        .flat_map(|combo| {
            values.iter().map(move |&value| {
                let mut next = combo.clone();
                apply(&mut next, value);
                next
            })
        })
        .collect()
}

impl ParameterVariations {
    pub(super) fn from_space(space: &ParameterSpace) -> Self {
        let base = &space.base;
        let base_days = base
            .simulation_end_tick
            .filter(|_| base.ticks_per_day > 0)
            .map(|end| end.div_ceil(base.ticks_per_day))
            .unwrap_or(DEFAULT_DAYS);

        Self {
            base: base.clone(),
            initial_taxis: or_default(&space.initial_taxis, base.initial_taxis),
            initial_residents: or_default(&space.initial_residents, base.initial_residents),
            visit_chances: or_default(&space.visit_chances, base.visit_chance),
            lower_wait_thresholds: or_default(
                &space.lower_wait_thresholds,
                base.lower_wait_threshold,
            ),
            upper_wait_thresholds: or_default(
                &space.upper_wait_thresholds,
                base.upper_wait_threshold,
            ),
            matching_algorithms: or_default(&space.matching_algorithms, base.matching_algorithm),
            days: or_default(&space.days, base_days),
        }
    }

    /// Cartesian product of all dimensions, built one dimension at a time.
    pub(super) fn combinations(&self) -> Vec<ParameterCombination> {
        let seed = vec![ParameterCombination {
            params: self.base.clone(),
            days: DEFAULT_DAYS,
        }];

        let combos = expand(seed, &self.initial_taxis, |c, v| c.params.initial_taxis = v);
        let combos = expand(combos, &self.initial_residents, |c, v| {
            c.params.initial_residents = v
        });
        let combos = expand(combos, &self.visit_chances, |c, v| c.params.visit_chance = v);
        let combos = expand(combos, &self.lower_wait_thresholds, |c, v| {
            c.params.lower_wait_threshold = v
        });
        let combos = expand(combos, &self.upper_wait_thresholds, |c, v| {
            c.params.upper_wait_threshold = v
        });
        let combos = expand(combos, &self.matching_algorithms, |c, v| {
            c.params.matching_algorithm = v
        });
        expand(combos, &self.days, |c, v| c.days = v)
    }
}
