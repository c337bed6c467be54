pub mod comparison;
pub mod config;
pub mod domain;
pub mod errors;
pub mod scoring;

pub use comparison::{compare_products, Comparison};
pub use domain::product::{
    Measurement, Product, ProductId, RecycledMaterials, SustainabilityProfile,
};
pub use errors::ServiceError;
pub use scoring::{score_profile, score_profile_with_trace, ScoreTrace, BASELINE_SCORE};
