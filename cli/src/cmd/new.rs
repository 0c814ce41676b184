use std::path::PathBuf;

use cpb_core::action;

use super::{GlobalArgs, SubcmdResult};

/// Create a source file named after a problem title
#[derive(Debug, clap::Args)]
pub struct Args {
    #[arg()] // positional argument
    pub title: String,

    #[arg(short, long, default_value = "cpp")]
    pub ext: String,

    #[arg(short, long, default_value = "./")]
    pub dir: PathBuf,
}

pub fn exec(args: &Args, _: &GlobalArgs) -> SubcmdResult {
    let path = action::create_source_file(&args.dir, &args.title, &args.ext)?;
    println!("{}", path.to_string_lossy());
    Ok(())
}
