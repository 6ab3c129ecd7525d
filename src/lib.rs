#![deny(clippy::all)]

pub mod config;
pub mod error;
pub mod guard;
pub mod linker;
pub mod logging;
pub mod observer;
pub mod recommend;
pub mod sanitize;
pub mod session;
pub mod store;
pub mod taxonomy;
pub mod types;

// 重新导出主要类型和函数
pub use config::{DriverConfig, LinkerConfig};
pub use error::{ClueError, Result};
pub use guard::SimilarityGuard;
pub use linker::TaxonomyLinker;
pub use observer::{LinkObserver, SilentObserver, TracingObserver};
pub use recommend::RecommendationEngine;
pub use session::{render_records, render_recommendations, ClueSession};
pub use store::WordCategoryStore;
pub use taxonomy::{InMemoryTaxonomy, Taxonomy, TaxonomyBuilder, TaxonomyDocument};
pub use types::*;
