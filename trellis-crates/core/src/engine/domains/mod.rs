mod interval_domain;

pub use interval_domain::*;
