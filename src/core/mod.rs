//! Core document model: types, builders, validation, and the access key.

mod builder;
pub mod chave;
mod error;
mod types;
pub mod validation;

pub use builder::{DceBuilder, EnderecoBuilder, ItemBuilder};
pub use chave::{CHAVE_LEN, ChaveAcesso, calcular_dv};
pub use error::{DfeError, ValidationError};
pub(crate) use error::validation_failure;
pub use types::*;
pub use validation::validar;
