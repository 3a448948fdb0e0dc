//! Configuration management for the peaceable queens solver

pub mod settings;

pub use settings::{
    CliOverrides, EncodingConfig, OutputConfig, OutputFormat, Settings, SolverBackend, SolverConfig,
};
