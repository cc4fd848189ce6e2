mod cli;
mod paths;
mod reload;
mod run;
mod speech;
mod table;

use anyhow::Result;

fn main() -> Result<()> {
    let cli = cli::parse();
    run::run(cli)
}
