//! Constraints which order sequences of variables.
mod lex_order;

pub use lex_order::LexOrder;
pub use lex_order::LexOrderArgs;
