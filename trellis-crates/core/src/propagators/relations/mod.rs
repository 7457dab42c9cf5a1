//! Unary and binary relations, which are also the usual children of meta constraints.
mod relation;
mod x_in_domain;
mod x_rel_c;
mod x_rel_y;

pub use relation::Relation;
pub use x_in_domain::XinDomain;
pub use x_rel_c::XRelC;
pub use x_rel_y::XRelY;
