mod time_stamp;
mod trailed_values;

pub use time_stamp::*;
pub(crate) use trailed_values::TrailedInteger;
pub use trailed_values::TrailedValues;
