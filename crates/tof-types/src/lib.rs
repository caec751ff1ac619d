//! # tof-types
//!
//! Core type definitions for the ToF-Kernel time-of-flight signal-processing
//! workspace.
//!
//! This crate provides the foundational value types used by the numerical
//! core:
//! - Uniform 1-D sample domains with periodic extension
//! - Batched signal tensors with a designated signal axis
//! - Scalar-or-batch pulse parameter abstraction

pub mod domain;
pub mod error;
pub mod params;
pub mod tensor;

pub use domain::TimeDomain;
pub use error::TypeError;
pub use params::{ExpGaussianParams, GaussianParams, Param};
pub use tensor::{Axis, SignalTensor};
