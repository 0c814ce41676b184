pub mod add;
pub mod debug;
pub mod init;
pub mod new;

#[derive(Debug, clap::Parser)]
#[command(author, version, about, long_about = None)]
pub struct GlobalArgs {
    #[command(subcommand)]
    pub subcmd: Subcommand,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Debug, clap::Subcommand)]
pub enum Subcommand {
    Add(add::Args),

    #[command(alias("d"))]
    Debug(debug::Args),

    Init(init::Args),
    New(new::Args),

    #[command(alias("t"))]
    Test(test::Args),
}

pub type SubcmdResult = anyhow::Result<()>;

impl GlobalArgs {
    pub async fn exec_subcmd(&self) -> SubcmdResult {
        use Subcommand::*;
        match &self.subcmd {
            Add(args) => add::exec(args, self),
            Debug(args) => debug::exec(args, self).await,
            Init(args) => init::exec(args, self),
            New(args) => new::exec(args, self),
            Test(args) => test::exec(args, self).await,
        }
    }
}
