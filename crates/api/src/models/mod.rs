pub mod annotation;
pub mod class;
pub mod name;
pub mod types;

pub use annotation::*;
pub use class::*;
pub use name::*;
pub use types::*;
