use super::DomainId;
use crate::containers::KeyedVec;

/// The weight of every variable, bumped when a constraint over the variable fails.
///
/// Weights never influence propagation; they exist for weighted-degree style search heuristics.
#[derive(Clone, Debug, Default)]
pub struct VariableWeights {
    weights: KeyedVec<DomainId, u64>,
}

impl VariableWeights {
    pub(crate) fn grow(&mut self) {
        let _ = self.weights.push(1);
    }

    pub fn weight(&self, variable: DomainId) -> u64 {
        self.weights[variable]
    }

    pub fn increase(&mut self, variable: DomainId) {
        self.weights[variable] += 1;
    }
}
