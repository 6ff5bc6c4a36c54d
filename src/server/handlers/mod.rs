//! Handler module declarations and re-exports

pub mod finish;
pub mod pointer;
pub mod regions;
pub mod session;

// Re-export all handlers for convenient access
pub use finish::*;
pub use pointer::*;
pub use regions::*;
pub use session::*;
