//! A factory building covariance function trees from textual expressions.
//!
//! ```text
//! expr := NAME
//!       | "CovSum" "(" expr "," expr ")"
//!       | "CovProd" "(" expr "," expr ")"
//!       | "CovFilter" "[" index ("," index)* "]" "(" expr ")"
//! ```
//!
//! where NAME is a registered atomic covariance function (see [`CovFactory::list`]).
//! Whitespaces are ignored. For instance:
//!
//! ```
//! use gpcov::{CovFactory, CovarianceFunction};
//!
//! let factory = CovFactory::<f64>::new();
//! let cov = factory
//!     .create(3, "CovSum(CovSEard, CovFilter[0, 2](CovNoise))")
//!     .unwrap();
//! assert_eq!(cov.param_dim(), 5);
//! ```

use crate::atomic_models::*;
use crate::compound_models::{FilteredCov, ProductCov, SumCov};
use crate::covariance::{BoxedCov, CovarianceFunction};
use crate::errors::{CovError, Result};
use linfa::Float;
use log::debug;
use std::collections::BTreeMap;

/// Constructor of an atomic covariance function given its input dimension
pub type CovConstructor<F> = fn(usize) -> Result<BoxedCov<F>>;

const SUM: &str = "CovSum";
const PROD: &str = "CovProd";
const FILTER: &str = "CovFilter";

fn boxed<F: Float, C: CovarianceFunction<F> + 'static>(cov: Result<C>) -> Result<BoxedCov<F>> {
    Ok(Box::new(cov?))
}

/// A registry of atomic covariance functions able to build compound ones
#[derive(Clone, Debug)]
pub struct CovFactory<F: Float> {
    registry: BTreeMap<String, CovConstructor<F>>,
}

impl<F: Float> Default for CovFactory<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: Float> CovFactory<F> {
    /// Constructor of a factory knowing all atomic covariance functions of this crate
    pub fn new() -> Self {
        let mut registry: BTreeMap<String, CovConstructor<F>> = BTreeMap::new();
        registry.insert("CovSEiso".to_string(), |d| {
            boxed(SquaredExponentialIsoCov::new(d))
        });
        registry.insert("CovSEard".to_string(), |d| {
            boxed(SquaredExponentialArdCov::new(d))
        });
        registry.insert("CovMatern3iso".to_string(), |d| boxed(Matern32IsoCov::new(d)));
        registry.insert("CovMatern5iso".to_string(), |d| boxed(Matern52IsoCov::new(d)));
        registry.insert("CovRQiso".to_string(), |d| {
            boxed(RationalQuadraticIsoCov::new(d))
        });
        registry.insert("CovLinearard".to_string(), |d| boxed(LinearArdCov::new(d)));
        registry.insert("CovLinearone".to_string(), |d| boxed(LinearOneCov::new(d)));
        registry.insert("CovNoise".to_string(), |d| boxed(NoiseCov::new(d)));
        registry.insert("CovPeriodic".to_string(), |d| boxed(PeriodicCov::new(d)));
        CovFactory { registry }
    }

    /// Register an atomic covariance function constructor under `name`,
    /// replacing any previous one. Compound names cannot be registered.
    pub fn register(&mut self, name: &str, constructor: CovConstructor<F>) -> Result<()> {
        let valid = name.starts_with(|c: char| c.is_ascii_alphabetic() || c == '_')
            && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
        if !valid || [SUM, PROD, FILTER].contains(&name) {
            return Err(CovError::InvalidValueError(format!(
                "Cannot register covariance function as '{name}'"
            )));
        }
        self.registry.insert(name.to_string(), constructor);
        Ok(())
    }

    /// Names of the covariance functions known by the factory
    pub fn list(&self) -> Vec<String> {
        let mut names: Vec<String> = [SUM, PROD, FILTER].iter().map(|s| s.to_string()).collect();
        names.extend(self.registry.keys().cloned());
        names
    }

    /// Build the covariance function described by `expr` over `input_dim` dimensional inputs
    pub fn create(&self, input_dim: usize, expr: &str) -> Result<BoxedCov<F>> {
        let mut parser = Parser {
            registry: &self.registry,
            tokens: tokenize(expr)?,
            pos: 0,
        };
        let cov = parser.expr(input_dim)?;
        if let Some(token) = parser.tokens.get(parser.pos) {
            return Err(CovError::ParseError(format!(
                "Unexpected {token:?} after {cov} in '{expr}'"
            )));
        }
        debug!("Create {cov} with {} hyperparameters", cov.param_dim());
        Ok(cov)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum Token {
    Name(String),
    Index(usize),
    Open,
    Close,
    OpenBracket,
    CloseBracket,
    Comma,
}

fn tokenize(expr: &str) -> Result<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut chars = expr.char_indices().peekable();
    while let Some((start, c)) = chars.next() {
        let token = match c {
            c if c.is_whitespace() => continue,
            '(' => Token::Open,
            ')' => Token::Close,
            '[' => Token::OpenBracket,
            ']' => Token::CloseBracket,
            ',' => Token::Comma,
            c if c.is_ascii_alphanumeric() || c == '_' => {
                let mut end = start + c.len_utf8();
                while let Some((i, c)) = chars.peek() {
                    if !(c.is_ascii_alphanumeric() || *c == '_') {
                        break;
                    }
                    end = i + c.len_utf8();
                    chars.next();
                }
                let word = &expr[start..end];
                if c.is_ascii_digit() {
                    let index = word.parse().map_err(|_| {
                        CovError::ParseError(format!("Bad dimension index '{word}' in '{expr}'"))
                    })?;
                    Token::Index(index)
                } else {
                    Token::Name(word.to_string())
                }
            }
            c => {
                return Err(CovError::ParseError(format!(
                    "Unexpected character '{c}' in '{expr}'"
                )))
            }
        };
        tokens.push(token);
    }
    Ok(tokens)
}

struct Parser<'a, F: Float> {
    registry: &'a BTreeMap<String, CovConstructor<F>>,
    tokens: Vec<Token>,
    pos: usize,
}

impl<F: Float> Parser<'_, F> {
    fn next(&mut self) -> Result<Token> {
        let token = self
            .tokens
            .get(self.pos)
            .cloned()
            .ok_or_else(|| CovError::ParseError("Unexpected end of expression".to_string()))?;
        self.pos += 1;
        Ok(token)
    }

    fn expect(&mut self, expected: Token) -> Result<()> {
        let token = self.next()?;
        if token != expected {
            return Err(CovError::ParseError(format!(
                "Expected {expected:?}, got {token:?}"
            )));
        }
        Ok(())
    }

    fn expr(&mut self, input_dim: usize) -> Result<BoxedCov<F>> {
        let name = match self.next()? {
            Token::Name(name) => name,
            token => {
                return Err(CovError::ParseError(format!(
                    "Expected a covariance function name, got {token:?}"
                )))
            }
        };
        match name.as_str() {
            SUM | PROD => {
                self.expect(Token::Open)?;
                let first = self.expr(input_dim)?;
                self.expect(Token::Comma)?;
                let second = self.expr(input_dim)?;
                self.expect(Token::Close)?;
                if name == SUM {
                    boxed(SumCov::new(input_dim, first, second))
                } else {
                    boxed(ProductCov::new(input_dim, first, second))
                }
            }
            FILTER => {
                self.expect(Token::OpenBracket)?;
                let filter = self.indices()?;
                self.expect(Token::Open)?;
                let child = self.expr(filter.len())?;
                self.expect(Token::Close)?;
                boxed(FilteredCov::new(input_dim, &filter, child))
            }
            _ => match self.registry.get(&name) {
                Some(constructor) => constructor(input_dim),
                None => Err(CovError::ParseError(format!(
                    "Unknown covariance function '{name}'"
                ))),
            },
        }
    }

    /// Comma separated indices up to the closing bracket
    fn indices(&mut self) -> Result<Vec<usize>> {
        let mut indices = Vec::new();
        loop {
            match self.next()? {
                Token::Index(i) => indices.push(i),
                token => {
                    return Err(CovError::ParseError(format!(
                        "Expected a dimension index, got {token:?}"
                    )))
                }
            }
            match self.next()? {
                Token::Comma => continue,
                Token::CloseBracket => return Ok(indices),
                token => {
                    return Err(CovError::ParseError(format!(
                        "Expected ',' or ']', got {token:?}"
                    )))
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    #[test]
    fn test_create_atomic() {
        let factory = CovFactory::<f64>::new();
        for name in factory.list() {
            if [SUM, PROD, FILTER].contains(&name.as_str()) {
                continue;
            }
            let cov = factory.create(1, &name).unwrap();
            assert_eq!(cov.to_string(), name);
            assert_eq!(cov.input_dim(), 1);
        }
    }

    #[test]
    fn test_create_sum() {
        let factory = CovFactory::<f64>::new();
        let cov = factory.create(2, "CovSum ( CovSEiso, CovNoise)").unwrap();
        assert_eq!(cov.param_dim(), 3);
        assert_eq!(cov.to_string(), "CovSum(CovSEiso, CovNoise)");

        let x = array![0.2, 0.4];
        assert_abs_diff_eq!(cov.get(x.view(), x.view()), 2., epsilon = 1e-12);
    }

    #[test]
    fn test_create_nested() {
        let factory = CovFactory::<f64>::new();
        let cov = factory
            .create(
                3,
                "CovProd(CovFilter[2](CovPeriodic), CovSum(CovLinearard, CovMatern5iso))",
            )
            .unwrap();
        assert_eq!(cov.input_dim(), 3);
        assert_eq!(cov.param_dim(), 3 + 3 + 2);
        assert_eq!(
            cov.to_string(),
            "CovProd(CovFilter[2](CovPeriodic), CovSum(CovLinearard, CovMatern5iso))"
        );
    }

    #[test]
    fn test_create_errors() {
        let factory = CovFactory::<f64>::new();
        let parse_error =
            |expr: &str| matches!(factory.create(2, expr), Err(CovError::ParseError(_)));
        assert!(parse_error(""));
        assert!(parse_error("CovUnknown"));
        assert!(parse_error("CovSum(CovSEiso)"));
        assert!(parse_error("CovSum(CovSEiso, CovNoise"));
        assert!(parse_error("CovSEiso CovNoise"));
        assert!(parse_error("CovFilter[](CovSEiso)"));
        assert!(parse_error("CovFilter[0 1](CovSEiso)"));
        assert!(parse_error("CovSum(CovSEiso; CovNoise)"));
        assert!(parse_error("CovSum(2, CovNoise)"));

        assert!(matches!(
            factory.create(2, "CovPeriodic"),
            Err(CovError::InitError(_))
        ));
        assert!(matches!(
            factory.create(2, "CovFilter[0, 2](CovSEard)"),
            Err(CovError::InitError(_))
        ));
    }

    #[test]
    fn test_register() {
        let mut factory = CovFactory::<f64>::new();
        factory
            .register("MyNoise", |d| boxed(NoiseCov::new(d)))
            .unwrap();
        assert!(factory.list().contains(&"MyNoise".to_string()));
        let cov = factory.create(2, "CovSum(CovSEiso, MyNoise)").unwrap();
        assert_eq!(cov.param_dim(), 3);

        assert!(factory.register("CovSum", |d| boxed(NoiseCov::new(d))).is_err());
        assert!(factory.register("My Noise", |d| boxed(NoiseCov::new(d))).is_err());
        assert!(factory.register("2Noise", |d| boxed(NoiseCov::new(d))).is_err());
    }
}
