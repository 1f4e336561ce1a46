use clap::Parser;

use marksrc_tool::{run, Opt};

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let opt = Opt::parse();
    run(opt, &mut std::io::stdout().lock())
}
