pub mod plan;
pub mod process;

pub use plan::{compose, LaunchOptions, LaunchPlan, DEFAULT_MAX_MEMORY};
pub use process::{java_exe, locate_java_binary, JavaProcess, ProcessSpawner};
