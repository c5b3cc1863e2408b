//! Storage of covariance function hyperparameters.
//!
//! Hyperparameters are held in log-space so that an optimizer can work over an
//! unconstrained real vector while positivity (length-scales, amplitudes, ...)
//! stays implicit. Every write goes through [`LogHyper::set`] which raises the
//! `changed` flag used by callers to invalidate cached kernel factorizations.

use crate::errors::{CovError, Result};
use linfa::Float;
use ndarray::{Array1, ArrayView1};

/// Log-hyperparameter vector of fixed length with its change flag
#[derive(Clone, Debug, PartialEq)]
pub struct LogHyper<F: Float> {
    values: Array1<F>,
    changed: bool,
}

impl<F: Float> LogHyper<F> {
    /// Constructor of a `param_dim` vector of zeros (ie unit hyperparameters)
    pub fn new(param_dim: usize) -> Self {
        LogHyper {
            values: Array1::zeros(param_dim),
            changed: false,
        }
    }

    /// Number of hyperparameters
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether there is no hyperparameter at all
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Current log-hyperparameters
    pub fn values(&self) -> &Array1<F> {
        &self.values
    }

    /// Hyperparameter at index `i` taken out of log-space
    pub fn exp(&self, i: usize) -> F {
        self.values[i].exp()
    }

    /// Replace the whole vector, `p` length has to match.
    pub fn set(&mut self, p: ArrayView1<F>) -> Result<()> {
        check_len(self.values.len(), p.len())?;
        self.values.assign(&p);
        self.changed = true;
        Ok(())
    }

    /// Whether values were written since the last [`LogHyper::reset_changed`]
    pub fn changed(&self) -> bool {
        self.changed
    }

    /// Acknowledge the last writes
    pub fn reset_changed(&mut self) {
        self.changed = false;
    }
}

/// Check a given hyperparameter vector length against the expected one
pub(crate) fn check_len(expected: usize, actual: usize) -> Result<()> {
    if expected != actual {
        return Err(CovError::DimensionMismatch { expected, actual });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_set_raises_flag() {
        let mut hyp = LogHyper::<f64>::new(2);
        assert!(!hyp.changed());
        assert_eq!(hyp.values(), &array![0., 0.]);

        hyp.set(array![0.5, -1.].view()).unwrap();
        assert!(hyp.changed());
        assert_eq!(hyp.values(), &array![0.5, -1.]);
        assert_eq!(hyp.exp(0), f64::exp(0.5));

        hyp.reset_changed();
        assert!(!hyp.changed());
    }

    #[test]
    fn test_set_bad_length() {
        let mut hyp = LogHyper::<f64>::new(2);
        match hyp.set(array![1., 2., 3.].view()) {
            Err(CovError::DimensionMismatch { expected, actual }) => {
                assert_eq!(expected, 2);
                assert_eq!(actual, 3);
            }
            res => panic!("unexpected {res:?}"),
        }
        assert!(!hyp.changed());
        assert_eq!(hyp.values(), &array![0., 0.]);
    }
}
