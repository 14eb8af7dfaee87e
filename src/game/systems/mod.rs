pub mod rules;
pub mod shift;

pub use rules::*;
pub use shift::*;
