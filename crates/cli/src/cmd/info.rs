use chrono::Local;
use obsidian_core::config::ResolvedConfig;
use obsidian_core::info::VaultInfo;

use crate::InfoArgs;
use crate::error::CliError;

pub fn run(config: &ResolvedConfig, args: &InfoArgs) -> Result<(), CliError> {
    let info = VaultInfo::gather(config, Local::now().date_naive())?;
    if args.json {
        let json = serde_json::to_string_pretty(&info)
            .map_err(|e| CliError::Failed(format!("failed to encode vault info: {e}")))?;
        println!("{json}");
    } else {
        println!("{}", info.to_text());
    }
    Ok(())
}
