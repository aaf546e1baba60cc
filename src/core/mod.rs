//! Core business logic abstractions

pub mod aggregate;
pub mod config;
pub mod error;
pub mod log;
pub mod model;
pub mod normalize;
pub mod render;

// Re-export main types for cleaner imports
pub use aggregate::{ExclusionReason, FundEstimate, aggregate};
pub use error::{PriceError, ScrapeError};
pub use model::{FundCatalog, FundSnapshot, Holding, PriceObservation};
pub use render::Renderer;
