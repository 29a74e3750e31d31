//! Shared support for the framegrab workspace: a stdout backend for the
//! `log` facade and the `Tensor` frame container.

pub mod logging;
pub mod tensor;

pub use logging::{StdoutLogger, init_stdout_logger};
pub use tensor::{Tensor, TensorError};

// Re-export log crate so downstream crates can use framegrab_base::log::*
pub use log;
