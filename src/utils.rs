//! Kernel matrices assembly from a covariance function.
//!
//! Entries are computed in parallel as [`CovarianceFunction::get`] and
//! [`CovarianceFunction::grad`] only read the covariance function.

use crate::covariance::CovarianceFunction;
use crate::errors::{CovError, Result};
use finitediff::FiniteDiff;
use linfa::Float;
use ndarray::{Array1, Array2, Array3, ArrayBase, ArrayView1, Axis, Data, Ix2, Zip};
use std::sync::Mutex;

/// Kernel matrix K(x, x) of the `n` points given as a (n, input_dim) matrix.
///
/// K is symmetric, only its lower triangle is evaluated.
pub fn kernel_matrix<F: Float, C: CovarianceFunction<F> + ?Sized>(
    cov: &C,
    x: &ArrayBase<impl Data<Elem = F>, Ix2>,
) -> Array2<F> {
    let x = x.view();
    let n = x.nrows();
    let mut k = Array2::zeros((n, n));
    Zip::indexed(&mut k).par_for_each(|(i, j), kij| {
        if j <= i {
            *kij = cov.get(x.row(i), x.row(j));
        }
    });
    for i in 0..n {
        for j in (i + 1)..n {
            k[[i, j]] = k[[j, i]];
        }
    }
    k
}

/// Cross kernel matrix K(x, y) of shape (n, m) given `x` as a (n, input_dim) matrix
/// and `y` as a (m, input_dim) matrix.
pub fn cross_kernel_matrix<F: Float, C: CovarianceFunction<F> + ?Sized>(
    cov: &C,
    x: &ArrayBase<impl Data<Elem = F>, Ix2>,
    y: &ArrayBase<impl Data<Elem = F>, Ix2>,
) -> Array2<F> {
    let (x, y) = (x.view(), y.view());
    let mut k = Array2::zeros((x.nrows(), y.nrows()));
    Zip::indexed(&mut k).par_for_each(|(i, j), kij| *kij = cov.get(x.row(i), y.row(j)));
    k
}

/// Derivatives of the kernel matrix K(x, x) wrt each log-hyperparameter
/// as a (param_dim, n, n) array where the ith slice is dK/dloghyper_i.
pub fn kernel_gradients<F: Float, C: CovarianceFunction<F> + ?Sized>(
    cov: &C,
    x: &ArrayBase<impl Data<Elem = F>, Ix2>,
) -> Array3<F> {
    let x = x.view();
    let n = x.nrows();
    let mut dk = Array3::zeros((cov.param_dim(), n, n));
    Zip::indexed(dk.lanes_mut(Axis(0))).par_for_each(|(i, j), mut dkij| {
        if j <= i {
            dkij.assign(&cov.grad(x.row(i), x.row(j)));
        }
    });
    for i in 0..n {
        for j in (i + 1)..n {
            let lower = dk.slice(ndarray::s![.., j, i]).to_owned();
            dk.slice_mut(ndarray::s![.., i, j]).assign(&lower);
        }
    }
    dk
}

/// Check analytic gradient of `cov` at (`x1`, `x2`) against central finite differences
/// of [`CovarianceFunction::get`] wrt log-hyperparameters.
/// Returns the max absolute difference.
pub fn check_grad<F: Float>(
    cov: &dyn CovarianceFunction<F>,
    x1: ArrayView1<F>,
    x2: ArrayView1<F>,
) -> Result<F> {
    let to_f64 = |v: &F| v.to_f64().unwrap_or(f64::NAN);
    let p0: Vec<f64> = cov.loghyper().iter().map(to_f64).collect();
    let shifted = Mutex::new(cov.clone_box());
    let f = |p: &Vec<f64>| -> f64 {
        let p = Array1::from_iter(p.iter().map(|v| F::cast(*v)));
        let Ok(mut c) = shifted.lock() else {
            return f64::NAN;
        };
        if c.set_loghyper(p.view()).is_err() {
            return f64::NAN;
        }
        to_f64(&c.get(x1, x2))
    };
    let numeric = p0.central_diff(&f);
    let analytic = cov.grad(x1, x2);
    if analytic.len() != numeric.len() {
        return Err(CovError::DimensionMismatch {
            expected: numeric.len(),
            actual: analytic.len(),
        });
    }
    let errors: Vec<f64> = analytic
        .iter()
        .zip(numeric.iter())
        .map(|(a, n)| (to_f64(a) - n).abs())
        .collect();
    if errors.iter().any(|e| e.is_nan()) {
        return Err(CovError::NumericalError(format!(
            "Gradient of {cov} cannot be checked at given points"
        )));
    }
    Ok(F::cast(errors.into_iter().fold(0., f64::max)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atomic_models::*;
    use crate::compound_models::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    fn sum_cov() -> SumCov<f64> {
        let mut cov = SumCov::new(
            2,
            Box::new(SquaredExponentialArdCov::new(2).unwrap()),
            Box::new(NoiseCov::new(2).unwrap()),
        )
        .unwrap();
        cov.set_loghyper(array![0.1, -0.3, 0.2, -1.].view()).unwrap();
        cov
    }

    #[test]
    fn test_kernel_matrix() {
        let cov = sum_cov();
        let x = array![[0., 1.], [2., 3.], [4., 5.], [0., 1.5]];
        let k = kernel_matrix(&cov, &x);
        assert_eq!(k.shape(), &[4, 4]);
        assert_abs_diff_eq!(k, k.t(), epsilon = 1e-15);
        for i in 0..4 {
            for j in 0..4 {
                assert_abs_diff_eq!(k[[i, j]], cov.get(x.row(i), x.row(j)), epsilon = 1e-15);
            }
        }
    }

    #[test]
    fn test_cross_kernel_matrix() {
        let cov = sum_cov();
        let x = array![[0., 1.], [2., 3.], [4., 5.]];
        let y = array![[0., 1.], [1., 1.]];
        let k = cross_kernel_matrix(&cov, &x, &y);
        assert_eq!(k.shape(), &[3, 2]);
        assert_abs_diff_eq!(k[[2, 1]], cov.get(x.row(2), y.row(1)), epsilon = 1e-15);
        let kx = kernel_matrix(&cov, &x);
        assert_abs_diff_eq!(
            k.slice(ndarray::s![.., 0..1]),
            kx.slice(ndarray::s![.., 0..1]),
            epsilon = 1e-15
        );
    }

    #[test]
    fn test_kernel_gradients() {
        let cov = sum_cov();
        let x = array![[0., 1.], [2., 3.], [0.5, -1.]];
        let dk = kernel_gradients(&cov, &x);
        assert_eq!(dk.shape(), &[4, 3, 3]);
        for i in 0..3 {
            for j in 0..3 {
                let g = cov.grad(x.row(i), x.row(j));
                assert_abs_diff_eq!(dk.slice(ndarray::s![.., i, j]), g, epsilon = 1e-15);
            }
        }
    }

    #[test]
    fn test_check_grad() {
        let cov = sum_cov();
        let err = check_grad(&cov, array![0., 1.].view(), array![0.5, 0.2].view()).unwrap();
        assert!(err < 1e-6, "gradient error = {err}");
        // hyperparameters of the checked kernel are left untouched
        assert_eq!(cov.loghyper(), array![0.1, -0.3, 0.2, -1.]);

        let filtered = FilteredCov::new(
            3,
            &[2, 0],
            Box::new(RationalQuadraticIsoCov::<f64>::new(2).unwrap()),
        )
        .unwrap();
        let err = check_grad(
            &filtered,
            array![0., 1., -2.].view(),
            array![0.5, 0.2, 1.].view(),
        )
        .unwrap();
        assert!(err < 1e-6, "gradient error = {err}");
    }

    /// A covariance with a wrong gradient, as a kernel author could write
    #[derive(Clone, Debug)]
    struct BadGradCov(crate::hyperparameters::LogHyper<f64>);

    impl CovarianceFunction<f64> for BadGradCov {
        fn input_dim(&self) -> usize {
            1
        }
        fn param_dim(&self) -> usize {
            1
        }
        fn loghyper(&self) -> Array1<f64> {
            self.0.values().to_owned()
        }
        fn set_loghyper(&mut self, p: ArrayView1<f64>) -> Result<()> {
            self.0.set(p)
        }
        fn loghyper_changed(&self) -> bool {
            self.0.changed()
        }
        fn reset_loghyper_changed(&mut self) {
            self.0.reset_changed()
        }
        fn get(&self, x1: ArrayView1<f64>, x2: ArrayView1<f64>) -> f64 {
            self.0.exp(0).powi(2) * x1[0] * x2[0]
        }
        fn grad(&self, x1: ArrayView1<f64>, x2: ArrayView1<f64>) -> Array1<f64> {
            array![self.get(x1, x2)]
        }
        fn clone_box(&self) -> Box<dyn CovarianceFunction<f64>> {
            Box::new(self.clone())
        }
    }

    impl std::fmt::Display for BadGradCov {
        fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
            write!(f, "BadGrad")
        }
    }

    #[test]
    fn test_check_grad_detects_error() {
        let cov = BadGradCov(crate::hyperparameters::LogHyper::new(1));
        let err = check_grad(&cov, array![1.].view(), array![2.].view()).unwrap();
        // analytic 2 vs exact 4
        assert_abs_diff_eq!(err, 2., epsilon = 1e-5);
    }
}
