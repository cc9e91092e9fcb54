use std::path::Path;

use anyhow::{anyhow, Result};
use lcep_core::{Diagnostics, PlanningConfig};
use lcep_scenarios::load_config_from_path;
use rayon::ThreadPoolBuilder;
use tracing::{info, warn};

/// Parse a thread spec: "auto" means one per CPU.
pub fn parse_threads(spec: &str) -> Result<usize> {
    if spec.eq_ignore_ascii_case("auto") {
        return Ok(num_cpus::get());
    }
    match spec.parse::<usize>() {
        Ok(0) => Ok(num_cpus::get()),
        Ok(n) => Ok(n),
        Err(_) => Err(anyhow!("invalid thread count '{spec}'; use 'auto' or a number")),
    }
}

pub fn configure_threads(spec: &str) -> Result<usize> {
    let count = parse_threads(spec)?;
    // Fails only if the global pool was already built, which is harmless
    let _ = ThreadPoolBuilder::new().num_threads(count).build_global();
    Ok(count)
}

/// The configuration at `path`, or the validated defaults.
pub fn load_config(path: Option<&Path>) -> Result<PlanningConfig> {
    match path {
        Some(path) => {
            let config = load_config_from_path(path)?;
            info!(config = %path.display(), "loaded planning config");
            Ok(config)
        }
        None => {
            let config = PlanningConfig::default();
            config.validate()?;
            info!("using default planning config");
            Ok(config)
        }
    }
}

pub fn log_diagnostics(diagnostics: &Diagnostics) {
    for issue in &diagnostics.issues {
        warn!("{issue}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thread_specs() {
        assert_eq!(parse_threads("3").unwrap(), 3);
        assert_eq!(parse_threads("auto").unwrap(), num_cpus::get());
        assert_eq!(parse_threads("0").unwrap(), num_cpus::get());
        assert!(parse_threads("many").is_err());
    }
}
