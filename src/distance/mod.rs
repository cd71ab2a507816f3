//! Pairwise distance measures and the population distance-matrix builder.

pub mod dtw;
pub mod matrix;
pub mod metric;
pub mod mpdist;

pub use dtw::{dtw_distance, dtw_distance_windowed, euclidean_distance};
pub use matrix::{distance_matrix, DistanceMatrices};
pub use metric::{Dtw, Euclidean, MatrixProfile, Metric};
pub use mpdist::mpdist;
