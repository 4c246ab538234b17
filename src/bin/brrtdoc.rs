use brrtdoc::cli::{run_cli, Cli};
use brrtdoc::logging::init_logging;
use clap::Parser;

fn main() -> anyhow::Result<()> {
    let _logging = init_logging()?;
    run_cli(Cli::parse())
}
