pub mod composite;
pub mod dimension;

pub use composite::{
    composite_health_score, peer_growth_score, trajectory_score, ComponentsAvailable,
    CompositeHealthScore, DimensionSample,
};
pub use dimension::{dimension_css, with_css};
