//! Descriptor loading and saving functionality
//!
//! Provides high-level operations for reading and writing deployment
//! descriptors using storage backends.

pub mod loader;
pub mod saver;

pub use loader::DescriptorLoader;
pub use saver::{DescriptorSaver, serialize};
