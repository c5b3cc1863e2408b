//! Sampling of zero-mean gaussian process paths from a covariance function.
//!
//! The kernel matrix K of the sampling points is factorized as L.Lt using a cholesky
//! decomposition, then a path is drawn as L.z with z a vector of independent standard
//! normal values. When K is not numerically positive definite, an increasing jitter is
//! added to its diagonal (see [`SamplingParams`]).

use crate::covariance::CovarianceFunction;
use crate::errors::{CovError, Result};
use crate::utils::kernel_matrix;
use linfa::{Float, ParamGuard};
use linfa_linalg::cholesky::*;
use linfa_linalg::LinalgError;
use log::{debug, warn};
use ndarray::{Array1, Array2, ArrayBase, Data, Ix2};
use ndarray_rand::rand::{Rng, SeedableRng};
use ndarray_rand::rand_distr::StandardNormal;
use ndarray_rand::RandomExt;
use rand_xoshiro::Xoshiro256Plus;
use std::sync::{Arc, RwLock};

/// Default jitter added to the kernel matrix diagonal at first retry
pub const DEFAULT_JITTER: f64 = 1e-10;
/// Default factor applied to the jitter between two retries
pub const DEFAULT_JITTER_GROWTH: f64 = 10.;
/// Default number of jittered factorization retries
pub const DEFAULT_MAX_JITTER_ATTEMPTS: usize = 10;

/// A set of validated sampling parameters.
#[derive(Clone, Debug, PartialEq)]
pub struct SamplingValidParams<F: Float> {
    /// Jitter added to the diagonal at first retry, relative to the diagonal scale
    pub(crate) jitter: F,
    /// Factor applied to the jitter after each failed retry
    pub(crate) jitter_growth: F,
    /// Max number of jittered retries before giving up
    pub(crate) max_jitter_attempts: usize,
}

impl<F: Float> Default for SamplingValidParams<F> {
    fn default() -> SamplingValidParams<F> {
        SamplingValidParams {
            jitter: F::cast(DEFAULT_JITTER),
            jitter_growth: F::cast(DEFAULT_JITTER_GROWTH),
            max_jitter_attempts: DEFAULT_MAX_JITTER_ATTEMPTS,
        }
    }
}

impl<F: Float> SamplingValidParams<F> {
    /// Get initial jitter
    pub fn jitter(&self) -> F {
        self.jitter
    }

    /// Get jitter growth factor
    pub fn jitter_growth(&self) -> F {
        self.jitter_growth
    }

    /// Get max number of jittered retries
    pub fn max_jitter_attempts(&self) -> usize {
        self.max_jitter_attempts
    }
}

/// The set of parameters controlling kernel matrix stabilization
/// before its factorization.
///
/// The factorization is first tried on K, then on K + jitter.s.I where s is the
/// mean magnitude of K diagonal, with jitter multiplied by `jitter_growth` after
/// each failure, for at most `max_jitter_attempts` retries.
#[derive(Clone, Debug, Default)]
pub struct SamplingParams<F: Float>(SamplingValidParams<F>);

impl<F: Float> SamplingParams<F> {
    /// Constructor with default values
    pub fn new() -> SamplingParams<F> {
        Self(SamplingValidParams::default())
    }

    /// Set initial jitter, has to be strictly positive
    pub fn jitter(mut self, jitter: F) -> Self {
        self.0.jitter = jitter;
        self
    }

    /// Set jitter growth factor, has to be greater than 1
    pub fn jitter_growth(mut self, jitter_growth: F) -> Self {
        self.0.jitter_growth = jitter_growth;
        self
    }

    /// Set max number of jittered retries, has to be at least 1
    pub fn max_jitter_attempts(mut self, max_jitter_attempts: usize) -> Self {
        self.0.max_jitter_attempts = max_jitter_attempts;
        self
    }
}

impl<F: Float> From<SamplingValidParams<F>> for SamplingParams<F> {
    fn from(valid: SamplingValidParams<F>) -> Self {
        SamplingParams(valid)
    }
}

impl<F: Float> ParamGuard for SamplingParams<F> {
    type Checked = SamplingValidParams<F>;
    type Error = CovError;

    fn check_ref(&self) -> Result<&Self::Checked> {
        if !(self.0.jitter > F::zero()) {
            return Err(CovError::InvalidValueError(format!(
                "`jitter` should be strictly positive, got {}",
                self.0.jitter
            )));
        }
        if !(self.0.jitter_growth > F::one()) {
            return Err(CovError::InvalidValueError(format!(
                "`jitter_growth` should be greater than 1, got {}",
                self.0.jitter_growth
            )));
        }
        if self.0.max_jitter_attempts == 0 {
            return Err(CovError::InvalidValueError(
                "`max_jitter_attempts` cannot be 0!".to_string(),
            ));
        }
        Ok(&self.0)
    }

    fn check(self) -> Result<Self::Checked> {
        self.check_ref()?;
        Ok(self.0)
    }
}

/// Cholesky factor of `k` when `k` is numerically positive definite
fn try_cholesky<F: Float>(k: &ArrayBase<impl Data<Elem = F>, Ix2>) -> Result<Option<Array2<F>>> {
    match k.cholesky() {
        Ok(l) => {
            let valid = l.diag().iter().all(|v| *v > F::zero()) && l.iter().all(|v| v.is_finite());
            Ok(valid.then_some(l))
        }
        Err(LinalgError::NotPositiveDefinite) => Ok(None),
        Err(err) => Err(err.into()),
    }
}

/// Mean magnitude of the diagonal, 1 when it vanishes
fn diagonal_scale<F: Float>(k: &ArrayBase<impl Data<Elem = F>, Ix2>) -> F {
    match k.diag().mapv(|v| v.abs()).mean() {
        Some(s) if s > F::zero() && s.is_finite() => s,
        _ => F::one(),
    }
}

/// Lower triangular cholesky factor L of `k` such that L.Lt = `k` + jitter.s.I
/// where s is the mean magnitude of `k` diagonal and jitter is 0 when `k` is
/// already numerically positive definite, otherwise escalated as set by `params`.
pub fn stabilized_cholesky<F: Float>(
    k: &ArrayBase<impl Data<Elem = F>, Ix2>,
    params: &SamplingValidParams<F>,
) -> Result<Array2<F>> {
    if let Some(l) = try_cholesky(k)? {
        return Ok(l);
    }
    let scale = diagonal_scale(k);
    let mut jitter = params.jitter();
    for attempt in 1..=params.max_jitter_attempts() {
        warn!("Kernel matrix not positive definite, retry {attempt} with jitter = {jitter}");
        let nugget = jitter * scale;
        let mut kj = k.to_owned();
        kj.diag_mut().mapv_inplace(|v| v + nugget);
        if let Some(l) = try_cholesky(&kj)? {
            debug!("Kernel matrix factorized with jitter = {jitter}");
            return Ok(l);
        }
        jitter *= params.jitter_growth();
    }
    Err(CovError::NumericalError(format!(
        "Kernel matrix ({}x{}) still not positive definite after {} jittered retries",
        k.nrows(),
        k.ncols(),
        params.max_jitter_attempts()
    )))
}

fn check_points<F: Float, C: CovarianceFunction<F> + ?Sized>(
    cov: &C,
    x: &ArrayBase<impl Data<Elem = F>, Ix2>,
) -> Result<()> {
    if x.ncols() != cov.input_dim() {
        return Err(CovError::InvalidValueError(format!(
            "Sampling points of dimension {} given to {cov} of input dimension {}",
            x.ncols(),
            cov.input_dim()
        )));
    }
    Ok(())
}

/// Draw a sample path of the zero-mean GP with covariance `cov` at the `n` points
/// given as a (n, input_dim) matrix `x`, using `rng` as source of randomness.
pub fn draw_random_sample<F, C, R>(
    cov: &C,
    x: &ArrayBase<impl Data<Elem = F>, Ix2>,
    params: &SamplingValidParams<F>,
    rng: &mut R,
) -> Result<Array1<F>>
where
    F: Float,
    C: CovarianceFunction<F> + ?Sized,
    R: Rng + ?Sized,
{
    check_points(cov, x)?;
    let n = x.nrows();
    if n == 0 {
        return Ok(Array1::zeros(0));
    }
    let k = kernel_matrix(cov, x);
    let l = stabilized_cholesky(&k, params)?;
    let z = Array1::<f64>::random_using(n, StandardNormal, rng).mapv(|v| F::cast(v));
    Ok(l.dot(&z))
}

type RngRef<R> = Arc<RwLock<R>>;

/// A generator of GP sample paths owning its random generator and sampling settings.
///
/// ```
/// use gpcov::{SampleGenerator, SquaredExponentialIsoCov};
/// use ndarray::Array;
/// use ndarray_rand::rand::SeedableRng;
/// use rand_xoshiro::Xoshiro256Plus;
///
/// let cov = SquaredExponentialIsoCov::<f64>::new(1).unwrap();
/// let x = Array::linspace(0., 5., 50).into_shape((50, 1)).unwrap();
/// let path = SampleGenerator::new()
///     .with_rng(Xoshiro256Plus::seed_from_u64(42))
///     .draw(&cov, &x)
///     .unwrap();
/// assert_eq!(path.len(), 50);
/// ```
#[derive(Clone, Debug)]
pub struct SampleGenerator<F: Float, R: Rng> {
    params: SamplingValidParams<F>,
    rng: RngRef<R>,
}

/// Sample generator with default random generator
impl<F: Float> SampleGenerator<F, Xoshiro256Plus> {
    /// Constructor with default settings and a random generator seeded from entropy
    pub fn new() -> Self {
        Self::new_with_rng(Xoshiro256Plus::from_entropy())
    }
}

impl<F: Float> Default for SampleGenerator<F, Xoshiro256Plus> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: Float, R: Rng> SampleGenerator<F, R> {
    /// Constructor with default settings and the given random generator
    pub fn new_with_rng(rng: R) -> Self {
        SampleGenerator {
            params: SamplingValidParams::default(),
            rng: Arc::new(RwLock::new(rng)),
        }
    }

    /// Set the random generator used for the next draws
    pub fn with_rng<R2: Rng>(self, rng: R2) -> SampleGenerator<F, R2> {
        SampleGenerator {
            params: self.params,
            rng: Arc::new(RwLock::new(rng)),
        }
    }

    /// Set the sampling settings once validated
    pub fn with_params(mut self, params: SamplingParams<F>) -> Result<Self> {
        self.params = params.check()?;
        Ok(self)
    }

    /// Sampling settings
    pub fn params(&self) -> &SamplingValidParams<F> {
        &self.params
    }

    /// Draw a sample path of the zero-mean GP with covariance `cov`
    /// at the `n` points given as a (n, input_dim) matrix `x`
    pub fn draw<C: CovarianceFunction<F> + ?Sized>(
        &self,
        cov: &C,
        x: &ArrayBase<impl Data<Elem = F>, Ix2>,
    ) -> Result<Array1<F>> {
        let mut rng = self
            .rng
            .write()
            .map_err(|_| CovError::InvalidValueError("Random generator poisoned".to_string()))?;
        draw_random_sample(cov, x, &self.params, &mut *rng)
    }

    /// Draw `n_traj` sample paths as columns of a (n, `n_traj`) matrix,
    /// the kernel matrix is factorized once.
    pub fn draw_n<C: CovarianceFunction<F> + ?Sized>(
        &self,
        cov: &C,
        x: &ArrayBase<impl Data<Elem = F>, Ix2>,
        n_traj: usize,
    ) -> Result<Array2<F>> {
        check_points(cov, x)?;
        let n = x.nrows();
        if n == 0 {
            return Ok(Array2::zeros((0, n_traj)));
        }
        let k = kernel_matrix(cov, x);
        let l = stabilized_cholesky(&k, &self.params)?;
        let mut rng = self
            .rng
            .write()
            .map_err(|_| CovError::InvalidValueError("Random generator poisoned".to_string()))?;
        let z = Array2::<f64>::random_using((n, n_traj), StandardNormal, &mut *rng)
            .mapv(|v| F::cast(v));
        Ok(l.dot(&z))
    }
}
