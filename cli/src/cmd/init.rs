use std::path::PathBuf;

use colored::Colorize as _;
use cpb_core::action;

use super::{GlobalArgs, SubcmdResult};

#[derive(Debug, clap::Args)]
pub struct Args {
    #[arg(default_value = "./")]
    dir: PathBuf,
}

pub fn exec(args: &Args, _: &GlobalArgs) -> SubcmdResult {
    let path = action::init_config(&args.dir)?;
    println!(
        "{}",
        format!("Successfully created {}", path.to_string_lossy()).green()
    );
    Ok(())
}
