mod domain_id;
mod variable_weights;

pub use domain_id::DomainId;
pub use variable_weights::VariableWeights;
