//! The covariance function contract shared by atomic and compound kernels.

use crate::errors::Result;
use crate::sampling::{self, SamplingValidParams};
use linfa::Float;
use ndarray::{Array1, ArrayView1, ArrayView2};
use ndarray_rand::rand::RngCore;
use std::fmt;

/// A trait for covariance functions k(x, x') used in GP regression.
///
/// A kernel is built once through the constructor of its variant with a fixed input
/// dimension `input_dim` and a fixed number of log-hyperparameters `param_dim`.
/// Then the GP engine queries [`get`](CovarianceFunction::get) and
/// [`grad`](CovarianceFunction::grad) over pairs of inputs, while the optimizer
/// reads and writes hyperparameters through
/// [`loghyper`](CovarianceFunction::loghyper) and
/// [`set_loghyper`](CovarianceFunction::set_loghyper).
///
/// `get` and `grad` take `&self`: concurrent reads are fine as long as
/// hyperparameters writes are serialized by the caller.
pub trait CovarianceFunction<F: Float>: fmt::Display + fmt::Debug + Send + Sync {
    /// Dimension of the input vectors
    fn input_dim(&self) -> usize;

    /// Number of log-hyperparameters
    fn param_dim(&self) -> usize;

    /// Current log-hyperparameters (length `param_dim`)
    fn loghyper(&self) -> Array1<F>;

    /// Replace log-hyperparameters. `p` length has to be `param_dim`
    /// otherwise [`CovError::DimensionMismatch`](crate::CovError::DimensionMismatch)
    /// is returned and the kernel is left untouched.
    fn set_loghyper(&mut self, p: ArrayView1<F>) -> Result<()>;

    /// Whether hyperparameters were written since the last reset.
    /// Kernels only ever raise this flag, resetting is up to the caller.
    fn loghyper_changed(&self) -> bool;

    /// Acknowledge hyperparameters changes (eg. once cached factorizations are invalidated)
    fn reset_loghyper_changed(&mut self);

    /// Covariance of `x1` and `x2`, both of length `input_dim`
    fn get(&self, x1: ArrayView1<F>, x2: ArrayView1<F>) -> F;

    /// Gradient of `get(x1, x2)` wrt log-hyperparameters, ordered as `loghyper`
    fn grad(&self, x1: ArrayView1<F>, x2: ArrayView1<F>) -> Array1<F>;

    /// Clone into a boxed trait object
    fn clone_box(&self) -> Box<dyn CovarianceFunction<F>>;

    /// Same as [`set_loghyper`](CovarianceFunction::set_loghyper) from a raw slice
    fn set_loghyper_slice(&mut self, p: &[F]) -> Result<()> {
        self.set_loghyper(ArrayView1::from(p))
    }

    /// Draw a sample path of the zero-mean GP with this covariance at the `n` points
    /// given as a (n, input_dim) matrix, using default jitter settings.
    /// See [`SampleGenerator`](crate::SampleGenerator) to tune them.
    fn draw_random_sample(&self, x: ArrayView2<F>, rng: &mut dyn RngCore) -> Result<Array1<F>> {
        sampling::draw_random_sample(self, &x, &SamplingValidParams::default(), rng)
    }
}

/// An owning handle on a covariance function, as held by compound kernels
pub type BoxedCov<F> = Box<dyn CovarianceFunction<F>>;

impl<F: Float> Clone for Box<dyn CovarianceFunction<F>> {
    fn clone(&self) -> Box<dyn CovarianceFunction<F>> {
        self.clone_box()
    }
}

/// Implements the hyperparameters plumbing of an atomic kernel
/// having `input_dim: usize` and `hyper: LogHyper<F>` fields.
macro_rules! atomic_hyper_accessors {
    () => {
        fn input_dim(&self) -> usize {
            self.input_dim
        }

        fn param_dim(&self) -> usize {
            self.hyper.len()
        }

        fn loghyper(&self) -> ndarray::Array1<F> {
            self.hyper.values().to_owned()
        }

        fn set_loghyper(&mut self, p: ndarray::ArrayView1<F>) -> $crate::errors::Result<()> {
            self.hyper.set(p)
        }

        fn loghyper_changed(&self) -> bool {
            self.hyper.changed()
        }

        fn reset_loghyper_changed(&mut self) {
            self.hyper.reset_changed()
        }

        fn clone_box(&self) -> Box<dyn $crate::CovarianceFunction<F>> {
            Box::new(self.clone())
        }
    };
}
pub(crate) use atomic_hyper_accessors;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atomic_models::{NoiseCov, RationalQuadraticIsoCov};
    use crate::compound_models::SumCov;
    use crate::errors::CovError;
    use ndarray::array;

    #[test]
    fn test_set_loghyper_slice() {
        let mut cov = RationalQuadraticIsoCov::<f64>::new(2).unwrap();
        cov.set_loghyper_slice(&[0.1, -0.2, 0.3]).unwrap();
        assert!(cov.loghyper_changed());
        assert_eq!(cov.loghyper(), array![0.1, -0.2, 0.3]);

        let mut boxed: BoxedCov<f64> = Box::new(
            SumCov::new(2, Box::new(cov), Box::new(NoiseCov::new(2).unwrap())).unwrap(),
        );
        boxed.reset_loghyper_changed();
        boxed.set_loghyper_slice(&[1., 2., 3., 4.]).unwrap();
        assert!(boxed.loghyper_changed());
        assert_eq!(boxed.loghyper(), array![1., 2., 3., 4.]);
    }

    #[test]
    fn test_set_loghyper_slice_bad_length() {
        let mut cov = RationalQuadraticIsoCov::<f64>::new(1).unwrap();
        match cov.set_loghyper_slice(&[0.5, 0.5]) {
            Err(CovError::DimensionMismatch { expected, actual }) => {
                assert_eq!(expected, 3);
                assert_eq!(actual, 2);
            }
            res => panic!("unexpected {res:?}"),
        }
        assert!(!cov.loghyper_changed());
        assert_eq!(cov.loghyper(), array![0., 0., 0.]);
    }
}
