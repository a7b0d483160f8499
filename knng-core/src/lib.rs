//! Approximate k-nearest-neighbour graph construction with NN-Descent.
//!
//! Configure a run with [`KnnBuilder`], supply a [`SimilarityComputer`] and
//! a [`TerminationFlag`], and query the resulting [`KnnResult`].
#![cfg_attr(docsrs, feature(doc_cfg))]

mod builder;
mod context;
mod convergence;
mod error;
mod init;
mod join;
mod knn;
mod neighbour_list;
mod params;
mod partition;
mod result;
mod rng;
mod sampling;
mod similarity;
mod split;
mod termination;
#[cfg(test)]
mod test_utils;

pub use crate::{
    builder::KnnBuilder,
    convergence::{ConvergenceController, ConvergenceState},
    error::{KnnError, KnnErrorCode, Result},
    knn::Knn,
    neighbour_list::Neighbour,
    params::KnnParams,
    result::{KnnResult, SimilarityPair},
    similarity::{
        MetricError, MissingDataPolicy, ScalarSimilarity, SimilarityComputer, VectorKind,
        VectorMetric, VectorSimilarity, cosine_similarity, euclidean_similarity,
        pearson_similarity,
    },
    termination::{Phase, TerminationFlag},
};
