//! catencode - categorical feature encoding for tabular data
//!
//! Two transformations over a column of a table:
//! - label encoding, mapping each category to a dense integer `0..n-1`
//! - one-hot encoding, expanding an integer label into indicator columns
//!
//! # Modules
//!
//! - [`preprocessing`] - Label and one-hot encoders and the pipeline composing them
//! - [`utils`] - Table loading and saving
//! - [`cli`] - Command-line interface

// Core error handling
pub mod error;

pub mod preprocessing;
pub mod utils;

pub mod cli;

pub use error::{EncodeError, Result};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::error::{EncodeError, Result};

    pub use crate::preprocessing::{
        CategoricalPipeline, EncodingConfig, HandleUnknown, LabelEncoder, OneHotEncoder,
        PipelineState, SparseOneHot, SparseVector,
    };

    pub use crate::utils::{DataLoader, DataSaver};
}
