use notely_core::config::normalize_base_url;

use crate::cli::ConfigCommands;
use crate::config_profiles::{
    default_config_path, normalize_text_option, resolve_api_config, CliProfilesConfig,
};
use crate::error::CliError;

pub fn run_config(
    command: ConfigCommands,
    global_profile: Option<&str>,
    flag_url: Option<String>,
) -> Result<(), CliError> {
    match command {
        ConfigCommands::Init {
            api_base_url,
            timeout_secs,
            no_activate,
        } => run_config_init(global_profile, api_base_url, timeout_secs, no_activate),
        ConfigCommands::Show => run_config_show(global_profile, flag_url),
    }
}

pub fn run_config_init(
    profile_name: Option<&str>,
    api_base_url: Option<String>,
    timeout_secs: Option<u64>,
    no_activate: bool,
) -> Result<(), CliError> {
    let mut config = CliProfilesConfig::load().map_err(CliError::Config)?;
    let profile_name = config.resolve_profile_name(profile_name);

    let api_base_url = normalize_text_option(api_base_url)
        .map(|url| normalize_base_url(&url))
        .transpose()?;
    if timeout_secs == Some(0) {
        return Err(CliError::Config(
            "timeout must be a positive number of seconds".to_string(),
        ));
    }

    let profile = config.profile_mut_or_default(&profile_name);
    if let Some(url) = api_base_url {
        profile.api_base_url = Some(url);
    }
    if let Some(secs) = timeout_secs {
        profile.timeout_secs = Some(secs);
    }

    if !no_activate {
        config.active_profile = Some(profile_name.clone());
    }

    let path = config.save().map_err(CliError::Config)?;
    println!("Profile '{}' initialized at {}", profile_name, path.display());

    let profile = config
        .profile(&profile_name)
        .ok_or_else(|| CliError::Config("Failed to persist profile".to_string()))?;
    match profile.api_base_url() {
        Some(url) => println!("  api_base_url: {url}"),
        None => println!("  api_base_url: (not set, using default)"),
    }
    if let Some(secs) = profile.timeout_secs {
        println!("  timeout_secs: {secs}");
    }
    Ok(())
}

pub fn run_config_show(
    profile_name: Option<&str>,
    flag_url: Option<String>,
) -> Result<(), CliError> {
    let config = CliProfilesConfig::load().map_err(CliError::Config)?;
    let resolved_profile = config.resolve_profile_name(profile_name);
    let (api_config, source) =
        resolve_api_config(flag_url, profile_name).map_err(CliError::Config)?;

    println!(
        "config file: {}",
        default_config_path().map_err(CliError::Config)?.display()
    );
    println!("profile:     {resolved_profile}");
    println!("base url:    {} ({})", api_config.base_url, source.label());
    println!("timeout:     {}s", api_config.timeout_secs);
    Ok(())
}
