pub mod config_file;
pub mod manifest;
pub mod overrides;
pub mod spec;

pub use config_file::{load_config_from_path, render_config, ConfigFormat};
pub use manifest::{load_manifest, materialize_scenarios, write_manifest, ScenarioArtifact};
pub use overrides::{apply_overrides, ParameterOverrides};
pub use spec::{
    load_spec_from_path, resolve_scenarios, validate, ResolvedScenario, ScenarioDefaults,
    ScenarioSet, ScenarioSpec,
};
