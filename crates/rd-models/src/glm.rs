//! Generalized linear models
//!
//! Only the binomial family with the logit link is provided. It is fitted
//! by Newton-Raphson, which for the canonical link coincides with IRLS.

pub mod logit;


pub use logit::{sigmoid, LogisticModel};
