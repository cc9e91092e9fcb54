use anyhow::Result;
use lcep_cli::cli::ConfigCommands;
use lcep_core::PlanningConfig;
use lcep_scenarios::{load_config_from_path, render_config};

pub fn handle(command: &ConfigCommands) -> Result<()> {
    match command {
        ConfigCommands::Defaults { format } => {
            let text = render_config(&PlanningConfig::default(), (*format).into())?;
            println!("{text}");
            Ok(())
        }
        ConfigCommands::Validate { file } => {
            let config = load_config_from_path(file)?;
            println!(
                "{} is valid ({} anchor rules, {} SHS kits, {}-year horizon)",
                file.display(),
                config.anchors.rules.len(),
                config.shs.kits.len(),
                config.planning.horizon_years
            );
            Ok(())
        }
    }
}
