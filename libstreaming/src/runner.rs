use std::io::{self, Write};

use clap::{App, Arg, ArgMatches, SubCommand};

use context::JobContext;
use counter::CounterSink;
use env::{EnvReader, Environment};
use errors::*;

/// `build_app` describes the command line understood by a streaming payload.
pub fn build_app<'a, 'b>() -> App<'a, 'b> {
    App::new("streaming-probe")
        .version(crate_version!())
        .about("Inspect the Hadoop Streaming environment of a task and report counters")
        .subcommand(SubCommand::with_name("sanity-check").about("Check the payload runs"))
        .subcommand(
            SubCommand::with_name("context")
                .about("Print the job context read from the environment as JSON"),
        )
        .subcommand(
            SubCommand::with_name("count")
                .about("Increment a counter and report it")
                .arg(
                    Arg::with_name("group")
                        .long("group")
                        .short("g")
                        .help("Counter group")
                        .takes_value(true)
                        .required(true),
                )
                .arg(
                    Arg::with_name("name")
                        .long("name")
                        .short("n")
                        .help("Counter name")
                        .takes_value(true)
                        .required(true),
                )
                .arg(
                    Arg::with_name("amount")
                        .long("amount")
                        .short("a")
                        .help("Amount added per increment")
                        .takes_value(true)
                        .allow_hyphen_values(true)
                        .default_value("1"),
                )
                .arg(
                    Arg::with_name("times")
                        .long("times")
                        .short("t")
                        .help("Number of increments")
                        .takes_value(true)
                        .default_value("1"),
                )
                .arg(
                    Arg::with_name("status")
                        .long("status")
                        .short("s")
                        .help("Status message reported after counting, optional")
                        .takes_value(true)
                        .required(false),
                ),
        )
}

/// `parse_command_line` uses `clap` to parse the command-line arguments passed to the payload.
pub fn parse_command_line<'a>() -> ArgMatches<'a> {
    build_app().get_matches()
}

/// `run` executes the subcommand chosen on the command line against `env`.
///
/// Diagnostics and reporter lines go to standard error, `context` prints its JSON to standard
/// output.
pub fn run(matches: &ArgMatches, env: &Environment) -> Result<()> {
    match matches.subcommand() {
        ("sanity-check", _) => {
            run_sanity_check();
            Ok(())
        }
        ("context", _) => run_context(env, &mut io::stdout(), io::stderr()),
        ("count", Some(sub)) => {
            run_count(sub, env, io::stderr())?;
            Ok(())
        }
        _ => {
            eprintln!("{}", matches.usage());
            Ok(())
        }
    }
}

fn run_sanity_check() {
    println!("sanity located");
}

fn run_context<O, W>(env: &Environment, out: &mut O, diagnostics: W) -> Result<()>
where
    O: Write,
    W: Write,
{
    let context = JobContext::read(&mut EnvReader::new(env, diagnostics));
    info!(
        "Read job context, running under scheduler: {}",
        context.is_running_under_scheduler()
    );

    writeln!(out, "{}", context.to_json()?).chain_err(|| "Error writing job context.")?;
    Ok(())
}

fn run_count<W: Write>(matches: &ArgMatches, env: &Environment, sink: W) -> Result<W> {
    let group = matches
        .value_of("group")
        .chain_err(|| "Counter group must be specified")?;
    let name = matches
        .value_of("name")
        .chain_err(|| "Counter name must be specified")?;
    let amount = value_t!(matches, "amount", i64)?;
    let times = value_t!(matches, "times", u64)?;

    let mut counters = CounterSink::new(env, sink);
    for _ in 0..times {
        counters.increment(group, name, amount)?;
    }
    if let Some(status) = matches.value_of("status") {
        counters.report_status(status)?;
    }
    counters.flush()?;

    Ok(counters.into_inner())
}
