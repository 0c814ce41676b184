use std::path::PathBuf;

use cpb_core::action;

use super::{GlobalArgs, SubcmdResult};

/// Create the next empty input/answer pair for a source file
#[derive(Debug, clap::Args)]
pub struct Args {
    #[arg()] // positional argument
    pub source: PathBuf,
}

pub fn exec(args: &Args, _: &GlobalArgs) -> SubcmdResult {
    let paths = action::add_testcase(&args.source)?;
    println!("{}", paths.input.to_string_lossy());
    println!("{}", paths.answer.to_string_lossy());
    Ok(())
}
