use clap::Parser;
use tupl_cli::args::CliArgs;

fn main() -> anyhow::Result<()> {
    tupl_common::tracing_config::init_tracing();

    let args = CliArgs::parse();
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    tupl_cli::driver::run(args, &mut out)
}
