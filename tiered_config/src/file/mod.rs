//! Reading configuration files into layers.
//!
//! The extension picks the decoder: `.json` for JSON, `.yaml`/`.yml` for
//! YAML and `.env` for dotenv files. A missing or empty file is not an error;
//! it simply contributes no layer.

mod error;
mod loader;
mod parser;
mod yaml;

pub use loader::{FileLayer, load_config_file, load_into};
pub use yaml::SaphyrYaml;
