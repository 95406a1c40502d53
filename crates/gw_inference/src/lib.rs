pub mod models;

pub use models::{create_model, ModelConfig};

pub mod prelude {
    pub use crate::models::{create_model, ModelConfig};
    pub use gw_core::{Generator, GenerationOptions, Result};
}
