//! # mtsim
//!
//! Similarity analysis for multivariate time series (MTS).
//!
//! Models collections of named, possibly irregularly sampled numeric
//! sequences sharing a logical subject, and computes similarity between
//! whole MTS objects: a pluggable per-variable metric (Euclidean, DTW,
//! MPdist) is evaluated over every pair in a population, the per-variable
//! matrices are combined into one weighted dissimilarity matrix, and that
//! matrix can be ranked for group separation or projected into 2D.

// Allow some clippy warnings for cleaner code in specific cases
#![allow(clippy::upper_case_acronyms)]
#![allow(clippy::too_many_arguments)]
#![allow(clippy::needless_range_loop)]

pub mod core;
pub mod distance;
pub mod error;
pub mod granularity;
pub mod projection;
pub mod ranking;
pub mod serialize;

pub use error::{MtsError, Result};

pub mod prelude {
    pub use crate::core::{DateSpec, DatesRange, MTSerie, MTSerieBuilder, TimeLength};
    pub use crate::distance::{
        distance_matrix, DistanceMatrices, Dtw, Euclidean, MatrixProfile, Metric,
    };
    pub use crate::error::{MtsError, Result};
    pub use crate::granularity::{allowed_downsample_rules, ResampleRule};
    pub use crate::projection::{mds_projection, MdsConfig};
    pub use crate::ranking::separation_scores;
    pub use crate::serialize::query_to_json_str;
}
