use std::path::PathBuf;

use cpb_core::action;
use cpb_core::fixture::TestId;
use cpb_core::style::Palette;

use super::{GlobalArgs, SubcmdResult};
use crate::util;

/// Run once without a time limit, either on one testcase or with manual input
#[derive(Debug, clap::Args)]
pub struct Args {
    #[arg()] // positional argument
    pub source: PathBuf,

    /// Feed this testcase's input; without it, stdin is the terminal
    #[arg(short = 't', long = "test-id")]
    pub test_id: Option<TestId>,

    #[arg(last = true)]
    pub command: Vec<String>,
}

pub async fn exec(args: &Args, global_args: &GlobalArgs) -> SubcmdResult {
    let cfg = util::load_config(global_args)?;

    let explicit = (!args.command.is_empty()).then_some(args.command.as_slice());
    let inv = action::resolve_invocation(&args.source, explicit, &cfg.test, true)?;
    log::info!("Running: {}", inv);

    let palette = Palette::detect(cfg.test.color);
    let status = action::do_debug(&args.source, &inv, args.test_id, &palette).await?;
    if status != Some(0) {
        log::warn!("Process exited abnormally (status: {:?})", status);
    }
    Ok(())
}
