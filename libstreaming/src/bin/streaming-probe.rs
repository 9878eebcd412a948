extern crate error_chain;
extern crate hadoop_streaming;

use error_chain::ChainedError;

use hadoop_streaming::{logging, runner, Environment};

fn main() {
    if let Err(ref err) = logging::init_logger() {
        eprintln!("{}", err.display_chain());
        ::std::process::exit(1);
    }

    let matches = runner::parse_command_line();
    let command = matches.subcommand_name().unwrap_or("streaming-probe");
    let env = Environment::from_process();

    if let Err(ref err) = runner::run(&matches, &env) {
        logging::output_error(command, err);
        ::std::process::exit(1);
    }
}
