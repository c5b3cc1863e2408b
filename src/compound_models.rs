//! A module for compound covariance functions built from other covariance functions.
//!
//! * [`SumCov`]: k(x, x') = k1(x, x') + k2(x, x')
//! * [`ProductCov`]: k(x, x') = k1(x, x') * k2(x, x')
//! * [`FilteredCov`]: k(x, x') = k1(x_S, x'_S) where S is a subset of input dimensions
//!
//! Compound covariance functions exclusively own their children so that arbitrary
//! nesting (sum of products of filtered kernels, ...) forms a tree.
//! Their log-hyperparameters are the concatenation of their children's ones,
//! first child first.

use crate::covariance::{BoxedCov, CovarianceFunction};
use crate::errors::{CovError, Result};
use crate::hyperparameters::check_len;
use linfa::Float;
use log::debug;
use ndarray::{concatenate, s, Array1, ArrayView1, Axis};
use std::fmt;

fn check_child<F: Float>(name: &str, input_dim: usize, child: &BoxedCov<F>) -> Result<()> {
    if input_dim == 0 {
        return Err(CovError::InitError(format!(
            "{name} requires a positive input dimension"
        )));
    }
    if child.input_dim() != input_dim {
        return Err(CovError::InitError(format!(
            "{name} of input dimension {input_dim} cannot hold {child} of input dimension {}",
            child.input_dim()
        )));
    }
    Ok(())
}

/// Two children covariance functions with their hyperparameters laid out one after the other
#[derive(Clone, Debug)]
struct Pair<F: Float> {
    input_dim: usize,
    first: BoxedCov<F>,
    second: BoxedCov<F>,
    changed: bool,
}

impl<F: Float> Pair<F> {
    fn new(name: &str, input_dim: usize, first: BoxedCov<F>, second: BoxedCov<F>) -> Result<Self> {
        check_child(name, input_dim, &first)?;
        check_child(name, input_dim, &second)?;
        debug!("{name}({first}, {second}) built over {input_dim} dimensions");
        Ok(Pair {
            input_dim,
            first,
            second,
            changed: false,
        })
    }

    fn param_dim(&self) -> usize {
        self.first.param_dim() + self.second.param_dim()
    }

    fn loghyper(&self) -> Array1<F> {
        concatenate![Axis(0), self.first.loghyper(), self.second.loghyper()]
    }

    fn set_loghyper(&mut self, p: ArrayView1<F>) -> Result<()> {
        check_len(self.param_dim(), p.len())?;
        let n1 = self.first.param_dim();
        self.first.set_loghyper(p.slice(s![..n1]))?;
        self.second.set_loghyper(p.slice(s![n1..]))?;
        self.changed = true;
        Ok(())
    }

    fn reset_changed(&mut self) {
        self.first.reset_loghyper_changed();
        self.second.reset_loghyper_changed();
        self.changed = false;
    }
}

/// Sum of two covariance functions
///
/// Hyperparameters: `[first hyperparameters, second hyperparameters]`
#[derive(Clone, Debug)]
pub struct SumCov<F: Float>(Pair<F>);

impl<F: Float> SumCov<F> {
    /// Constructor given `input_dim` and two children defined on the same input dimension
    pub fn new(input_dim: usize, first: BoxedCov<F>, second: BoxedCov<F>) -> Result<Self> {
        Ok(SumCov(Pair::new("CovSum", input_dim, first, second)?))
    }

    /// First term of the sum
    pub fn first(&self) -> &dyn CovarianceFunction<F> {
        self.0.first.as_ref()
    }

    /// Second term of the sum
    pub fn second(&self) -> &dyn CovarianceFunction<F> {
        self.0.second.as_ref()
    }
}

impl<F: Float> CovarianceFunction<F> for SumCov<F> {
    fn input_dim(&self) -> usize {
        self.0.input_dim
    }

    fn param_dim(&self) -> usize {
        self.0.param_dim()
    }

    fn loghyper(&self) -> Array1<F> {
        self.0.loghyper()
    }

    fn set_loghyper(&mut self, p: ArrayView1<F>) -> Result<()> {
        self.0.set_loghyper(p)
    }

    fn loghyper_changed(&self) -> bool {
        self.0.changed
    }

    fn reset_loghyper_changed(&mut self) {
        self.0.reset_changed()
    }

    fn get(&self, x1: ArrayView1<F>, x2: ArrayView1<F>) -> F {
        self.0.first.get(x1, x2) + self.0.second.get(x1, x2)
    }

    fn grad(&self, x1: ArrayView1<F>, x2: ArrayView1<F>) -> Array1<F> {
        concatenate![
            Axis(0),
            self.0.first.grad(x1, x2),
            self.0.second.grad(x1, x2)
        ]
    }

    fn clone_box(&self) -> BoxedCov<F> {
        Box::new(self.clone())
    }
}

impl<F: Float> fmt::Display for SumCov<F> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "CovSum({}, {})", self.0.first, self.0.second)
    }
}

/// Product of two covariance functions
///
/// Hyperparameters: `[first hyperparameters, second hyperparameters]`
#[derive(Clone, Debug)]
pub struct ProductCov<F: Float>(Pair<F>);

impl<F: Float> ProductCov<F> {
    /// Constructor given `input_dim` and two children defined on the same input dimension
    pub fn new(input_dim: usize, first: BoxedCov<F>, second: BoxedCov<F>) -> Result<Self> {
        Ok(ProductCov(Pair::new("CovProd", input_dim, first, second)?))
    }

    /// First factor of the product
    pub fn first(&self) -> &dyn CovarianceFunction<F> {
        self.0.first.as_ref()
    }

    /// Second factor of the product
    pub fn second(&self) -> &dyn CovarianceFunction<F> {
        self.0.second.as_ref()
    }
}

impl<F: Float> CovarianceFunction<F> for ProductCov<F> {
    fn input_dim(&self) -> usize {
        self.0.input_dim
    }

    fn param_dim(&self) -> usize {
        self.0.param_dim()
    }

    fn loghyper(&self) -> Array1<F> {
        self.0.loghyper()
    }

    fn set_loghyper(&mut self, p: ArrayView1<F>) -> Result<()> {
        self.0.set_loghyper(p)
    }

    fn loghyper_changed(&self) -> bool {
        self.0.changed
    }

    fn reset_loghyper_changed(&mut self) {
        self.0.reset_changed()
    }

    fn get(&self, x1: ArrayView1<F>, x2: ArrayView1<F>) -> F {
        self.0.first.get(x1, x2) * self.0.second.get(x1, x2)
    }

    fn grad(&self, x1: ArrayView1<F>, x2: ArrayView1<F>) -> Array1<F> {
        let k1 = self.0.first.get(x1, x2);
        let k2 = self.0.second.get(x1, x2);
        concatenate![
            Axis(0),
            self.0.first.grad(x1, x2) * k2,
            self.0.second.grad(x1, x2) * k1
        ]
    }

    fn clone_box(&self) -> BoxedCov<F> {
        Box::new(self.clone())
    }
}

impl<F: Float> fmt::Display for ProductCov<F> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "CovProd({}, {})", self.0.first, self.0.second)
    }
}

/// Covariance function applied to a subset of the input dimensions
///
/// Inputs are projected on the selected dimensions, in the filter order,
/// before being handed to the child covariance function.
///
/// Hyperparameters: child hyperparameters
#[derive(Clone, Debug)]
pub struct FilteredCov<F: Float> {
    input_dim: usize,
    filter: Vec<usize>,
    child: BoxedCov<F>,
    changed: bool,
}

impl<F: Float> FilteredCov<F> {
    /// Constructor given `input_dim`, the selected dimensions `filter` and
    /// the `child` covariance function, which input dimension has to match
    /// the number of selected dimensions.
    pub fn new(input_dim: usize, filter: &[usize], child: BoxedCov<F>) -> Result<Self> {
        if filter.is_empty() {
            return Err(CovError::InitError(
                "CovFilter requires at least one selected dimension".to_string(),
            ));
        }
        if let Some(i) = filter.iter().find(|&&i| i >= input_dim) {
            return Err(CovError::InitError(format!(
                "CovFilter dimension {i} out of input dimension {input_dim}"
            )));
        }
        if filter
            .iter()
            .enumerate()
            .any(|(k, i)| filter[..k].contains(i))
        {
            return Err(CovError::InitError(format!(
                "CovFilter dimensions {filter:?} should be unique"
            )));
        }
        if filter.len() != child.input_dim() {
            return Err(CovError::InitError(format!(
                "CovFilter selects {} dimensions but {child} expects {}",
                filter.len(),
                child.input_dim()
            )));
        }
        debug!("CovFilter{filter:?}({child}) built over {input_dim} dimensions");
        Ok(FilteredCov {
            input_dim,
            filter: filter.to_vec(),
            child,
            changed: false,
        })
    }

    /// Selected input dimensions
    pub fn filter(&self) -> &[usize] {
        &self.filter
    }

    /// Covariance function applied to the selected dimensions
    pub fn child(&self) -> &dyn CovarianceFunction<F> {
        self.child.as_ref()
    }

    fn project(&self, x: ArrayView1<F>) -> Array1<F> {
        x.select(Axis(0), &self.filter)
    }
}

impl<F: Float> CovarianceFunction<F> for FilteredCov<F> {
    fn input_dim(&self) -> usize {
        self.input_dim
    }

    fn param_dim(&self) -> usize {
        self.child.param_dim()
    }

    fn loghyper(&self) -> Array1<F> {
        self.child.loghyper()
    }

    fn set_loghyper(&mut self, p: ArrayView1<F>) -> Result<()> {
        self.child.set_loghyper(p)?;
        self.changed = true;
        Ok(())
    }

    fn loghyper_changed(&self) -> bool {
        self.changed
    }

    fn reset_loghyper_changed(&mut self) {
        self.child.reset_loghyper_changed();
        self.changed = false;
    }

    fn get(&self, x1: ArrayView1<F>, x2: ArrayView1<F>) -> F {
        self.child
            .get(self.project(x1).view(), self.project(x2).view())
    }

    fn grad(&self, x1: ArrayView1<F>, x2: ArrayView1<F>) -> Array1<F> {
        self.child
            .grad(self.project(x1).view(), self.project(x2).view())
    }

    fn clone_box(&self) -> BoxedCov<F> {
        Box::new(self.clone())
    }
}

impl<F: Float> fmt::Display for FilteredCov<F> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "CovFilter{:?}({})", self.filter, self.child)
    }
}
