use anyhow::Result;

mod cli;
mod runtime;

fn main() -> Result<()> {
    env_logger::init();
    let options = cli::parse()?;
    runtime::execute(options)
}
