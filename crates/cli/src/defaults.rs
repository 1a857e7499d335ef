//! Shared default values for the command line.
//! Model and batch defaults live in `phylodyn_sim::simulation::Configuration`.

pub const OUTPUT_DIR: &str = "output";
pub const SELECTION: &str = "extant-extinct";

pub const PROGRESS_TEMPLATE: &str =
    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {per_sec}";
pub const PROGRESS_CHARS: &str = "#>-";
