//! Directory and settings configuration.
//!
//! This module loads the external collaborators the core needs resolved at
//! runtime: worker profiles (name, email, hourly rate), building and
//! work-order metadata, and engine settings, all from a YAML directory.
//!
//! # Example
//!
//! ```no_run
//! use fieldops_engine::config::DirectoryLoader;
//!
//! let directory = DirectoryLoader::load("./config/fieldops").unwrap();
//! let worker = directory.worker("w_001").unwrap();
//! println!("{} earns ${}/h", worker.name, worker.hourly_rate);
//! ```

mod loader;
mod types;

pub use loader::DirectoryLoader;
pub use types::{Building, Directory, Settings, WorkOrder, WorkerProfile};
