pub mod quality;
pub mod rate;

pub use quality::*;
pub use rate::*;
