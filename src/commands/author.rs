use serde_json::json;

use crate::config::{self, Config};
use crate::error::CodestampError;

/// Show or persist the author display name used in stamps.
pub fn handle_author(name: Option<&str>) -> Result<(), CodestampError> {
    match name {
        Some(new_name) => {
            let new_name = new_name.trim();
            if new_name.is_empty() {
                return Err(CodestampError::Generic(
                    "author name must not be empty".to_string(),
                ));
            }
            let mut file_cfg = config::load_file_config_or_default();
            file_cfg.author_name = Some(new_name.to_string());
            config::save_file_config(&file_cfg)?;
            println!("codestamp author name updated to: {}", new_name);
        }
        None => {
            println!("{}", Config::get().author_name());
        }
    }
    Ok(())
}

/// Print the resolved configuration as formatted JSON.
pub fn handle_config() -> Result<(), CodestampError> {
    let config = Config::get();
    let resolved = json!({
        "author_name": config.author_name(),
        "git_path": config.git_cmd(),
        "revert_detection": config.revert_detection(),
        "config_file": config::config_file_path().map(|p| p.to_string_lossy().to_string()),
    });
    println!("{}", serde_json::to_string_pretty(&resolved)?);
    Ok(())
}
