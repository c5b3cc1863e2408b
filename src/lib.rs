//! This library implements covariance functions (aka kernels) k(x, x') for
//! [Gaussian Process](https://en.wikipedia.org/wiki/Gaussian_process) regression.
//!
//! Covariance functions are parameterized by log-hyperparameters and expose
//! their value and gradient wrt those log-hyperparameters so that a GP engine
//! can optimize its marginal likelihood.
//!
//! Atomic covariance functions are defined in [atomic_models], they are combined with
//! [SumCov], [ProductCov] and [FilteredCov] into trees sharing the [CovarianceFunction] contract.
//! Such trees can also be built from a textual expression using [CovFactory].
//!
//! Sample paths of the zero-mean GP prior are drawn with [SampleGenerator].
//!
//! ```
//! use gpcov::{CovFactory, CovarianceFunction, SampleGenerator};
//! use ndarray::{array, Array2};
//! use rand_xoshiro::Xoshiro256Plus;
//! use ndarray_rand::rand::SeedableRng;
//!
//! let mut cov = CovFactory::<f64>::new()
//!     .create(1, "CovSum(CovSEiso, CovNoise)")
//!     .unwrap();
//! cov.set_loghyper(array![0., 0., -3.].view()).unwrap();
//!
//! let x = Array2::from_shape_fn((10, 1), |(i, _)| i as f64 / 10.);
//! let y = SampleGenerator::new()
//!     .with_rng(Xoshiro256Plus::seed_from_u64(42))
//!     .draw(cov.as_ref(), &x)
//!     .unwrap();
//! assert_eq!(y.len(), 10);
//! ```
#![warn(missing_docs)]
#![warn(rustdoc::broken_intra_doc_links)]
pub mod atomic_models;
mod compound_models;
mod covariance;
mod errors;
mod factory;
mod hyperparameters;
mod sampling;
mod utils;

pub use atomic_models::*;
pub use compound_models::*;
pub use covariance::{BoxedCov, CovarianceFunction};
pub use errors::*;
pub use factory::*;
pub use hyperparameters::LogHyper;
pub use sampling::*;
pub use utils::*;

/// Environment variable controlling log filtering in demos and benches
pub const GPCOV_LOG: &str = "GPCOV_LOG";
