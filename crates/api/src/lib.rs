pub mod error;
pub mod index;
pub mod models;
pub mod runtime;

// Re-export commonly used types
pub use error::{ApiError, ApiResult};
pub use index::{Index, IndexFile, IndexView};
pub use models::*;
pub use runtime::{NoRuntimeTypes, RuntimeType, RuntimeTypeTable, RuntimeTypes};
