mod cli;
#[cfg(feature = "instrumentation")]
mod instrumentation;

use cli::commands::Command;
use cli::Gomoku;
use structopt::StructOpt;

fn main() {
    env_logger::init();
    #[cfg(feature = "instrumentation")]
    let timings = instrumentation::init_tracing();

    Gomoku::from_args().execute();

    #[cfg(feature = "instrumentation")]
    timings.print();
}
