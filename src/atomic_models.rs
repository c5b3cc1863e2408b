//! A module for atomic covariance functions, the leaves of a kernel tree.
//!
//! The following covariance functions are implemented:
//! * squared exponential (isotropic and ARD),
//! * matern 3/2 and matern 5/2 (isotropic),
//! * rational quadratic (isotropic),
//! * linear (ARD and single scale),
//! * white noise,
//! * periodic (1-dimensional inputs only).
//!
//! All hyperparameters are given in log-space and default to 0 (ie unit values).
//! In the formulas below, `r` is the euclidean distance between x and x',
//! `ell` a length-scale and `sf2` the signal variance.

use crate::covariance::{atomic_hyper_accessors, CovarianceFunction};
use crate::errors::{CovError, Result};
use crate::hyperparameters::LogHyper;
use linfa::Float;
use ndarray::{Array1, ArrayView1, Zip};
use std::fmt;

fn check_input_dim(name: &str, input_dim: usize) -> Result<()> {
    if input_dim == 0 {
        return Err(CovError::InitError(format!(
            "{name} requires a positive input dimension"
        )));
    }
    Ok(())
}

fn sq_dist<F: Float>(x1: &ArrayView1<F>, x2: &ArrayView1<F>) -> F {
    let d = x1 - x2;
    d.dot(&d)
}

/// Squared exponential covariance with isotropic length-scale
///
/// k(x, x') = sf2 * exp( - r^2 / (2 * ell^2) )
///
/// Hyperparameters: `[log(ell), log(sf)]`
#[derive(Clone, Debug, PartialEq)]
pub struct SquaredExponentialIsoCov<F: Float> {
    input_dim: usize,
    hyper: LogHyper<F>,
}

impl<F: Float> SquaredExponentialIsoCov<F> {
    /// Constructor for `input_dim` dimensional inputs
    pub fn new(input_dim: usize) -> Result<Self> {
        check_input_dim("CovSEiso", input_dim)?;
        Ok(SquaredExponentialIsoCov {
            input_dim,
            hyper: LogHyper::new(2),
        })
    }
}

impl<F: Float> CovarianceFunction<F> for SquaredExponentialIsoCov<F> {
    atomic_hyper_accessors!();

    fn get(&self, x1: ArrayView1<F>, x2: ArrayView1<F>) -> F {
        let ell = self.hyper.exp(0);
        let sf2 = self.hyper.exp(1).powi(2);
        let z = sq_dist(&x1, &x2) / (ell * ell);
        sf2 * F::exp(F::cast(-0.5) * z)
    }

    fn grad(&self, x1: ArrayView1<F>, x2: ArrayView1<F>) -> Array1<F> {
        let ell = self.hyper.exp(0);
        let sf2 = self.hyper.exp(1).powi(2);
        let z = sq_dist(&x1, &x2) / (ell * ell);
        let k = sf2 * F::exp(F::cast(-0.5) * z);
        Array1::from(vec![k * z, F::cast(2.) * k])
    }
}

impl<F: Float> fmt::Display for SquaredExponentialIsoCov<F> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "CovSEiso")
    }
}

/// Squared exponential covariance with automatic relevance determination,
/// ie one length-scale per input dimension
///
/// k(x, x') = sf2 * exp( - sum_i (x_i - x'_i)^2 / (2 * ell_i^2) )
///
/// Hyperparameters: `[log(ell_1), ..., log(ell_d), log(sf)]`
#[derive(Clone, Debug, PartialEq)]
pub struct SquaredExponentialArdCov<F: Float> {
    input_dim: usize,
    hyper: LogHyper<F>,
}

impl<F: Float> SquaredExponentialArdCov<F> {
    /// Constructor for `input_dim` dimensional inputs
    pub fn new(input_dim: usize) -> Result<Self> {
        check_input_dim("CovSEard", input_dim)?;
        Ok(SquaredExponentialArdCov {
            input_dim,
            hyper: LogHyper::new(input_dim + 1),
        })
    }

    fn scaled_sq_diffs(&self, x1: &ArrayView1<F>, x2: &ArrayView1<F>) -> Array1<F> {
        let mut z = Array1::zeros(self.input_dim);
        Zip::from(&mut z)
            .and(x1)
            .and(x2)
            .and(self.hyper.values().slice(ndarray::s![..self.input_dim]))
            .for_each(|z_i, a, b, log_ell| {
                let d = (*a - *b) / log_ell.exp();
                *z_i = d * d;
            });
        z
    }
}

impl<F: Float> CovarianceFunction<F> for SquaredExponentialArdCov<F> {
    atomic_hyper_accessors!();

    fn get(&self, x1: ArrayView1<F>, x2: ArrayView1<F>) -> F {
        let sf2 = self.hyper.exp(self.input_dim).powi(2);
        let z = self.scaled_sq_diffs(&x1, &x2).sum();
        sf2 * F::exp(F::cast(-0.5) * z)
    }

    fn grad(&self, x1: ArrayView1<F>, x2: ArrayView1<F>) -> Array1<F> {
        let sf2 = self.hyper.exp(self.input_dim).powi(2);
        let z = self.scaled_sq_diffs(&x1, &x2);
        let k = sf2 * F::exp(F::cast(-0.5) * z.sum());
        let mut grad = Array1::zeros(self.input_dim + 1);
        grad.slice_mut(ndarray::s![..self.input_dim])
            .assign(&z.mapv(|z_i| k * z_i));
        grad[self.input_dim] = F::cast(2.) * k;
        grad
    }
}

impl<F: Float> fmt::Display for SquaredExponentialArdCov<F> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "CovSEard")
    }
}

/// Matern 3/2 covariance with isotropic length-scale
///
/// k(x, x') = sf2 * (1 + z) * exp(-z) with z = sqrt(3) * r / ell
///
/// Hyperparameters: `[log(ell), log(sf)]`
#[derive(Clone, Debug, PartialEq)]
pub struct Matern32IsoCov<F: Float> {
    input_dim: usize,
    hyper: LogHyper<F>,
}

impl<F: Float> Matern32IsoCov<F> {
    /// Constructor for `input_dim` dimensional inputs
    pub fn new(input_dim: usize) -> Result<Self> {
        check_input_dim("CovMatern3iso", input_dim)?;
        Ok(Matern32IsoCov {
            input_dim,
            hyper: LogHyper::new(2),
        })
    }

    fn z(&self, x1: &ArrayView1<F>, x2: &ArrayView1<F>) -> F {
        F::cast(3.).sqrt() * sq_dist(x1, x2).sqrt() / self.hyper.exp(0)
    }
}

impl<F: Float> CovarianceFunction<F> for Matern32IsoCov<F> {
    atomic_hyper_accessors!();

    fn get(&self, x1: ArrayView1<F>, x2: ArrayView1<F>) -> F {
        let sf2 = self.hyper.exp(1).powi(2);
        let z = self.z(&x1, &x2);
        sf2 * (F::one() + z) * F::exp(-z)
    }

    fn grad(&self, x1: ArrayView1<F>, x2: ArrayView1<F>) -> Array1<F> {
        let sf2 = self.hyper.exp(1).powi(2);
        let z = self.z(&x1, &x2);
        let e = F::exp(-z);
        let k = sf2 * (F::one() + z) * e;
        Array1::from(vec![sf2 * z * z * e, F::cast(2.) * k])
    }
}

impl<F: Float> fmt::Display for Matern32IsoCov<F> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "CovMatern3iso")
    }
}

/// Matern 5/2 covariance with isotropic length-scale
///
/// k(x, x') = sf2 * (1 + z + z^2 / 3) * exp(-z) with z = sqrt(5) * r / ell
///
/// Hyperparameters: `[log(ell), log(sf)]`
#[derive(Clone, Debug, PartialEq)]
pub struct Matern52IsoCov<F: Float> {
    input_dim: usize,
    hyper: LogHyper<F>,
}

impl<F: Float> Matern52IsoCov<F> {
    /// Constructor for `input_dim` dimensional inputs
    pub fn new(input_dim: usize) -> Result<Self> {
        check_input_dim("CovMatern5iso", input_dim)?;
        Ok(Matern52IsoCov {
            input_dim,
            hyper: LogHyper::new(2),
        })
    }

    fn z(&self, x1: &ArrayView1<F>, x2: &ArrayView1<F>) -> F {
        F::cast(5.).sqrt() * sq_dist(x1, x2).sqrt() / self.hyper.exp(0)
    }
}

impl<F: Float> CovarianceFunction<F> for Matern52IsoCov<F> {
    atomic_hyper_accessors!();

    fn get(&self, x1: ArrayView1<F>, x2: ArrayView1<F>) -> F {
        let sf2 = self.hyper.exp(1).powi(2);
        let z = self.z(&x1, &x2);
        sf2 * (F::one() + z + z * z / F::cast(3.)) * F::exp(-z)
    }

    fn grad(&self, x1: ArrayView1<F>, x2: ArrayView1<F>) -> Array1<F> {
        let sf2 = self.hyper.exp(1).powi(2);
        let z = self.z(&x1, &x2);
        let e = F::exp(-z);
        let k = sf2 * (F::one() + z + z * z / F::cast(3.)) * e;
        let dk_dlog_ell = sf2 * z * z * (F::one() + z) / F::cast(3.) * e;
        Array1::from(vec![dk_dlog_ell, F::cast(2.) * k])
    }
}

impl<F: Float> fmt::Display for Matern52IsoCov<F> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "CovMatern5iso")
    }
}

/// Rational quadratic covariance with isotropic length-scale
///
/// k(x, x') = sf2 * (1 + r^2 / (2 * alpha * ell^2))^(-alpha)
///
/// Hyperparameters: `[log(ell), log(sf), log(alpha)]`
#[derive(Clone, Debug, PartialEq)]
pub struct RationalQuadraticIsoCov<F: Float> {
    input_dim: usize,
    hyper: LogHyper<F>,
}

impl<F: Float> RationalQuadraticIsoCov<F> {
    /// Constructor for `input_dim` dimensional inputs
    pub fn new(input_dim: usize) -> Result<Self> {
        check_input_dim("CovRQiso", input_dim)?;
        Ok(RationalQuadraticIsoCov {
            input_dim,
            hyper: LogHyper::new(3),
        })
    }
}

impl<F: Float> CovarianceFunction<F> for RationalQuadraticIsoCov<F> {
    atomic_hyper_accessors!();

    fn get(&self, x1: ArrayView1<F>, x2: ArrayView1<F>) -> F {
        let ell = self.hyper.exp(0);
        let sf2 = self.hyper.exp(1).powi(2);
        let alpha = self.hyper.exp(2);
        let u = sq_dist(&x1, &x2) / (F::cast(2.) * alpha * ell * ell);
        sf2 * (F::one() + u).powf(-alpha)
    }

    fn grad(&self, x1: ArrayView1<F>, x2: ArrayView1<F>) -> Array1<F> {
        let ell = self.hyper.exp(0);
        let sf2 = self.hyper.exp(1).powi(2);
        let alpha = self.hyper.exp(2);
        let r2 = sq_dist(&x1, &x2) / (ell * ell);
        let u = r2 / (F::cast(2.) * alpha);
        let b = F::one() + u;
        let k = sf2 * b.powf(-alpha);
        Array1::from(vec![
            sf2 * r2 * b.powf(-alpha - F::one()),
            F::cast(2.) * k,
            k * alpha * (u / b - b.ln()),
        ])
    }
}

impl<F: Float> fmt::Display for RationalQuadraticIsoCov<F> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "CovRQiso")
    }
}

/// Linear covariance with automatic relevance determination
///
/// k(x, x') = sum_i x_i * x'_i / ell_i^2
///
/// Hyperparameters: `[log(ell_1), ..., log(ell_d)]`
#[derive(Clone, Debug, PartialEq)]
pub struct LinearArdCov<F: Float> {
    input_dim: usize,
    hyper: LogHyper<F>,
}

impl<F: Float> LinearArdCov<F> {
    /// Constructor for `input_dim` dimensional inputs
    pub fn new(input_dim: usize) -> Result<Self> {
        check_input_dim("CovLinearard", input_dim)?;
        Ok(LinearArdCov {
            input_dim,
            hyper: LogHyper::new(input_dim),
        })
    }

    fn terms(&self, x1: &ArrayView1<F>, x2: &ArrayView1<F>) -> Array1<F> {
        let inv_ell2 = self.hyper.values().mapv(|v| F::exp(F::cast(-2.) * v));
        x1 * x2 * inv_ell2
    }
}

impl<F: Float> CovarianceFunction<F> for LinearArdCov<F> {
    atomic_hyper_accessors!();

    fn get(&self, x1: ArrayView1<F>, x2: ArrayView1<F>) -> F {
        self.terms(&x1, &x2).sum()
    }

    fn grad(&self, x1: ArrayView1<F>, x2: ArrayView1<F>) -> Array1<F> {
        self.terms(&x1, &x2).mapv(|t| F::cast(-2.) * t)
    }
}

impl<F: Float> fmt::Display for LinearArdCov<F> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "CovLinearard")
    }
}

/// Linear covariance with a bias and a single scale
///
/// k(x, x') = (1 + x . x') / t^2
///
/// Hyperparameters: `[log(t)]`
#[derive(Clone, Debug, PartialEq)]
pub struct LinearOneCov<F: Float> {
    input_dim: usize,
    hyper: LogHyper<F>,
}

impl<F: Float> LinearOneCov<F> {
    /// Constructor for `input_dim` dimensional inputs
    pub fn new(input_dim: usize) -> Result<Self> {
        check_input_dim("CovLinearone", input_dim)?;
        Ok(LinearOneCov {
            input_dim,
            hyper: LogHyper::new(1),
        })
    }
}

impl<F: Float> CovarianceFunction<F> for LinearOneCov<F> {
    atomic_hyper_accessors!();

    fn get(&self, x1: ArrayView1<F>, x2: ArrayView1<F>) -> F {
        let it2 = F::exp(F::cast(-2.) * self.hyper.values()[0]);
        (F::one() + x1.dot(&x2)) * it2
    }

    fn grad(&self, x1: ArrayView1<F>, x2: ArrayView1<F>) -> Array1<F> {
        Array1::from(vec![F::cast(-2.) * self.get(x1, x2)])
    }
}

impl<F: Float> fmt::Display for LinearOneCov<F> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "CovLinearone")
    }
}

/// Independent white noise covariance
///
/// k(x, x') = s^2 if x == x' otherwise 0
///
/// Inputs are compared by value, so repeated input points are fully correlated.
///
/// Hyperparameters: `[log(s)]`
#[derive(Clone, Debug, PartialEq)]
pub struct NoiseCov<F: Float> {
    input_dim: usize,
    hyper: LogHyper<F>,
}

impl<F: Float> NoiseCov<F> {
    /// Constructor for `input_dim` dimensional inputs
    pub fn new(input_dim: usize) -> Result<Self> {
        check_input_dim("CovNoise", input_dim)?;
        Ok(NoiseCov {
            input_dim,
            hyper: LogHyper::new(1),
        })
    }
}

impl<F: Float> CovarianceFunction<F> for NoiseCov<F> {
    atomic_hyper_accessors!();

    fn get(&self, x1: ArrayView1<F>, x2: ArrayView1<F>) -> F {
        if x1 == x2 {
            self.hyper.exp(0).powi(2)
        } else {
            F::zero()
        }
    }

    fn grad(&self, x1: ArrayView1<F>, x2: ArrayView1<F>) -> Array1<F> {
        Array1::from(vec![F::cast(2.) * self.get(x1, x2)])
    }
}

impl<F: Float> fmt::Display for NoiseCov<F> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "CovNoise")
    }
}

/// Periodic covariance for 1-dimensional inputs
///
/// k(x, x') = sf2 * exp( -2 * sin^2(pi * r / p) / ell^2 )
///
/// Hyperparameters: `[log(ell), log(p), log(sf)]`
#[derive(Clone, Debug, PartialEq)]
pub struct PeriodicCov<F: Float> {
    input_dim: usize,
    hyper: LogHyper<F>,
}

impl<F: Float> PeriodicCov<F> {
    /// Constructor, `input_dim` has to be 1
    pub fn new(input_dim: usize) -> Result<Self> {
        if input_dim != 1 {
            return Err(CovError::InitError(format!(
                "CovPeriodic only handles 1-dimensional inputs, got {input_dim}"
            )));
        }
        Ok(PeriodicCov {
            input_dim,
            hyper: LogHyper::new(3),
        })
    }

    /// Returns (a, k) where a = pi * r / p
    fn phase_and_value(&self, x1: &ArrayView1<F>, x2: &ArrayView1<F>) -> (F, F) {
        let ell = self.hyper.exp(0);
        let p = self.hyper.exp(1);
        let sf2 = self.hyper.exp(2).powi(2);
        let a = F::cast(std::f64::consts::PI) * (x1[0] - x2[0]).abs() / p;
        let s = a.sin() / ell;
        (a, sf2 * F::exp(F::cast(-2.) * s * s))
    }
}

impl<F: Float> CovarianceFunction<F> for PeriodicCov<F> {
    atomic_hyper_accessors!();

    fn get(&self, x1: ArrayView1<F>, x2: ArrayView1<F>) -> F {
        self.phase_and_value(&x1, &x2).1
    }

    fn grad(&self, x1: ArrayView1<F>, x2: ArrayView1<F>) -> Array1<F> {
        let ell2 = self.hyper.exp(0).powi(2);
        let (a, k) = self.phase_and_value(&x1, &x2);
        let four = F::cast(4.);
        Array1::from(vec![
            four * k * a.sin().powi(2) / ell2,
            four * k * a.sin() * a.cos() * a / ell2,
            F::cast(2.) * k,
        ])
    }
}

impl<F: Float> fmt::Display for PeriodicCov<F> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "CovPeriodic")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::{array, Array1};
    use paste::paste;

    #[test]
    fn test_squared_exponential_iso() {
        let cov = SquaredExponentialIsoCov::<f64>::new(2).unwrap();
        assert_eq!(cov.param_dim(), 2);
        let k = cov.get(array![0., 1.].view(), array![1., 1.].view());
        assert_abs_diff_eq!(k, f64::exp(-0.5), epsilon = 1e-12);
        let k = cov.get(array![0., 1.].view(), array![0., 1.].view());
        assert_abs_diff_eq!(k, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_squared_exponential_ard_vs_iso() {
        let mut iso = SquaredExponentialIsoCov::<f64>::new(3).unwrap();
        let mut ard = SquaredExponentialArdCov::<f64>::new(3).unwrap();
        assert_eq!(ard.param_dim(), 4);
        iso.set_loghyper(array![0.3, -0.2].view()).unwrap();
        ard.set_loghyper(array![0.3, 0.3, 0.3, -0.2].view()).unwrap();
        let (x1, x2) = (array![0.1, 2., -1.], array![1.2, 0.4, -0.3]);
        assert_abs_diff_eq!(
            iso.get(x1.view(), x2.view()),
            ard.get(x1.view(), x2.view()),
            epsilon = 1e-12
        );
        let ard_grad = ard.grad(x1.view(), x2.view());
        let iso_grad = iso.grad(x1.view(), x2.view());
        assert_abs_diff_eq!(ard_grad.slice(ndarray::s![..3]).sum(), iso_grad[0], epsilon = 1e-12);
        assert_abs_diff_eq!(ard_grad[3], iso_grad[1], epsilon = 1e-12);
    }

    #[test]
    fn test_matern32_iso() {
        let cov = Matern32IsoCov::<f64>::new(1).unwrap();
        let k = cov.get(array![0.].view(), array![1.].view());
        let z = f64::sqrt(3.);
        assert_abs_diff_eq!(k, (1. + z) * f64::exp(-z), epsilon = 1e-12);
    }

    #[test]
    fn test_matern52_iso() {
        let cov = Matern52IsoCov::<f64>::new(1).unwrap();
        let k = cov.get(array![0.].view(), array![1.].view());
        let z = f64::sqrt(5.);
        assert_abs_diff_eq!(k, (1. + z + z * z / 3.) * f64::exp(-z), epsilon = 1e-12);
    }

    #[test]
    fn test_linear_ard() {
        let mut cov = LinearArdCov::<f64>::new(2).unwrap();
        cov.set_loghyper(array![0., f64::ln(2.)].view()).unwrap();
        let k = cov.get(array![1., 2.].view(), array![3., 4.].view());
        assert_abs_diff_eq!(k, 3. + 8. / 4., epsilon = 1e-12);
    }

    #[test]
    fn test_noise() {
        let mut cov = NoiseCov::<f64>::new(2).unwrap();
        cov.set_loghyper(array![f64::ln(0.1)].view()).unwrap();
        let x = array![1., 2.];
        assert_abs_diff_eq!(cov.get(x.view(), x.view()), 0.01, epsilon = 1e-12);
        assert_abs_diff_eq!(cov.grad(x.view(), x.view())[0], 0.02, epsilon = 1e-12);
        assert_eq!(cov.get(x.view(), array![1., 2.5].view()), 0.);
        assert_eq!(cov.grad(x.view(), array![1., 2.5].view())[0], 0.);
    }

    #[test]
    fn test_periodic() {
        let cov = PeriodicCov::<f64>::new(1).unwrap();
        // one full period apart
        let k = cov.get(array![0.5].view(), array![1.5].view());
        assert_abs_diff_eq!(k, 1.0, epsilon = 1e-12);
        assert!(PeriodicCov::<f64>::new(2).is_err());
    }

    #[test]
    fn test_bad_input_dim() {
        assert!(matches!(
            SquaredExponentialIsoCov::<f64>::new(0),
            Err(CovError::InitError(_))
        ));
        assert!(SquaredExponentialArdCov::<f64>::new(0).is_err());
        assert!(Matern32IsoCov::<f64>::new(0).is_err());
        assert!(Matern52IsoCov::<f64>::new(0).is_err());
        assert!(RationalQuadraticIsoCov::<f64>::new(0).is_err());
        assert!(LinearArdCov::<f64>::new(0).is_err());
        assert!(LinearOneCov::<f64>::new(0).is_err());
        assert!(NoiseCov::<f64>::new(0).is_err());
        assert!(PeriodicCov::<f64>::new(0).is_err());
    }

    macro_rules! test_atomic_cov {
        ($cov:ident, $dim:expr) => {
            paste! {
                #[test]
                fn [<test_cov_ $cov:snake _symmetry_and_gradient>]() {
                    let mut cov = [<$cov Cov>]::<f64>::new($dim).unwrap();
                    assert_eq!(cov.input_dim(), $dim);
                    assert_eq!(cov.loghyper().len(), cov.param_dim());

                    let p =
                        Array1::from_shape_fn(cov.param_dim(), |i| 0.1 * (i as f64 + 1.) - 0.25);
                    cov.set_loghyper(p.view()).unwrap();
                    assert!(cov.loghyper_changed());
                    assert_eq!(cov.loghyper(), p);

                    let x1 = Array1::from_shape_fn($dim, |i| 0.3 + 0.7 * i as f64);
                    let x2 = Array1::from_shape_fn($dim, |i| -0.2 + 0.4 * i as f64);
                    assert_abs_diff_eq!(
                        cov.get(x1.view(), x2.view()),
                        cov.get(x2.view(), x1.view()),
                        epsilon = 1e-12
                    );

                    let grad = cov.grad(x1.view(), x2.view());
                    assert_eq!(grad.len(), cov.param_dim());
                    let e = 1e-6;
                    for i in 0..cov.param_dim() {
                        let mut pp = p.clone();
                        pp[i] += e;
                        cov.set_loghyper(pp.view()).unwrap();
                        let fp = cov.get(x1.view(), x2.view());
                        let mut pm = p.clone();
                        pm[i] -= e;
                        cov.set_loghyper(pm.view()).unwrap();
                        let fm = cov.get(x1.view(), x2.view());
                        let fdiff = (fp - fm) / (2. * e);
                        assert_abs_diff_eq!(grad[i], fdiff, epsilon = 1e-6);
                    }

                    let bad = Array1::zeros(cov.param_dim() + 1);
                    assert!(matches!(
                        cov.set_loghyper(bad.view()),
                        Err(CovError::DimensionMismatch { .. })
                    ));
                }
            }
        };
    }

    test_atomic_cov!(SquaredExponentialIso, 2);
    test_atomic_cov!(SquaredExponentialArd, 3);
    test_atomic_cov!(Matern32Iso, 2);
    test_atomic_cov!(Matern52Iso, 3);
    test_atomic_cov!(RationalQuadraticIso, 2);
    test_atomic_cov!(LinearArd, 3);
    test_atomic_cov!(LinearOne, 2);
    test_atomic_cov!(Noise, 2);
    test_atomic_cov!(Periodic, 1);
}
