use std::env;

use env_logger::Builder;
use error_chain::ChainedError;

use errors::*;

// Warnings only by default. Standard error also carries the diagnostic and reporter lines that
// Hadoop reads, so info logging has to be asked for through RUST_LOG.
const DEFAULT_LOG_CONFIG: &str = "warn";

pub fn init_logger() -> Result<()> {
    let mut builder = Builder::new();
    match env::var("RUST_LOG") {
        Ok(log_config) => builder.parse(&log_config),
        Err(_) => builder.parse(DEFAULT_LOG_CONFIG),
    };

    builder
        .try_init()
        .chain_err(|| "Failed to build env_logger")?;
    Ok(())
}

/// Logs why the payload `command` failed: the error, each cause, then the backtrace if any.
pub fn output_error<E: ChainedError>(command: &str, err: &E) {
    for line in failure_report(command, err) {
        error!("{}", line);
    }
}

fn failure_report<E: ChainedError>(command: &str, err: &E) -> Vec<String> {
    let mut lines = vec![format!("payload command '{}' failed: {}", command, err)];
    lines.extend(err.iter().skip(1).map(|cause| format!("caused by: {}", cause)));
    if let Some(backtrace) = err.backtrace() {
        lines.push(format!("backtrace: {:?}", backtrace));
    }
    lines
}
