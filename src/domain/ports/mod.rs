pub mod light;
pub mod persistence;

pub use light::*;
pub use persistence::*;
