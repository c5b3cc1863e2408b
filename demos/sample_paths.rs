use env_logger::{Builder, Env};
use gpcov::{CovFactory, SampleGenerator, SamplingParams, GPCOV_LOG};
use ndarray::{array, concatenate, Array, Axis};
use ndarray_rand::rand::SeedableRng;
use rand_xoshiro::Xoshiro256Plus;

fn main() {
    let env = Env::new().filter_or(GPCOV_LOG, "info");
    let mut builder = Builder::from_env(env);
    let builder = builder.target(env_logger::Target::Stdout);
    builder.try_init().ok();

    let expr = "CovSum(CovProd(CovPeriodic, CovSEiso), CovNoise)";
    let mut cov = CovFactory::<f64>::new()
        .create(1, expr)
        .expect("Covariance function creation");
    // periodic: ell, period, sf / SE: ell, sf / noise: s
    cov.set_loghyper(array![0., 0.5, 0., 1.5, 0., -3.].view())
        .expect("Hyperparameters setting");

    let x = Array::linspace(0., 10., 41).insert_axis(Axis(1));
    let paths = SampleGenerator::new()
        .with_rng(Xoshiro256Plus::seed_from_u64(42))
        .with_params(SamplingParams::default().jitter(1e-8))
        .expect("Valid sampling settings")
        .draw_n(cov.as_ref(), &x, 3)
        .expect("GP sampling");

    println!("Draw 3 sample paths of {cov} (x, y1(x), y2(x), y3(x))");
    println!("{}", concatenate![Axis(1), x, paths]);
}
