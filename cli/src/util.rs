use std::{path::PathBuf, process::exit};

use cpb_core::config::{Config, EnvOverrides};

use crate::cmd::GlobalArgs;

pub fn current_dir() -> PathBuf {
    std::env::current_dir().unwrap_or_else(|e| {
        eprintln!("Failed to get current dir: {}", e);
        exit(1);
    })
}

/// `cpb.toml` found above the current dir, then `CPB_*` env vars, then global flags.
pub fn load_config(global_args: &GlobalArgs) -> anyhow::Result<Config> {
    let mut cfg = Config::load_or_default(current_dir())?.with_env(&EnvOverrides::from_env()?);
    if global_args.no_color {
        cfg.test.color = false;
    }
    Ok(cfg)
}
