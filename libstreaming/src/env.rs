use std::collections::HashMap;
use std::fmt;
use std::io::{self, Stderr, Write};
use std::iter::FromIterator;
use std::str::FromStr;

/// `Environment` is an explicit snapshot of the environment variables a task was started with.
///
/// Everything in this crate reads from an `Environment` rather than from the process directly,
/// so tests can build one from plain pairs without touching the real process environment.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Environment {
    vars: HashMap<String, String>,
}

impl Environment {
    pub fn new() -> Self {
        Default::default()
    }

    /// Captures the current process environment. Variables whose name or value is not valid
    /// UTF-8 are skipped.
    pub fn from_process() -> Self {
        ::std::env::vars_os()
            .filter_map(|(key, value)| match (key.into_string(), value.into_string()) {
                (Ok(key), Ok(value)) => Some((key, value)),
                (key, _) => {
                    debug!("Skipping non UTF-8 environment variable {:?}", key);
                    None
                }
            })
            .collect()
    }

    pub fn set<K: Into<String>, V: Into<String>>(&mut self, key: K, value: V) {
        self.vars.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.vars.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Environment {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Environment {
            vars: iter.into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }
}

/// Where the value of a `Selection` came from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Source {
    /// The variable was set and its value was used.
    Environment,
    /// The variable was not set, the default was used.
    Missing,
    /// The variable was set but could not be parsed, the default was used. Holds the raw text.
    Unparsable(String),
}

/// `Selection` is the outcome of reading one environment variable.
///
/// A lookup never fails: when the variable is missing or unparsable the caller's default is
/// used, and `source` records which of the cases happened.
///
/// The `Display` implementation renders the diagnostic line written for the lookup.
#[derive(Clone, Debug, PartialEq)]
pub struct Selection<T> {
    key: String,
    value: T,
    source: Source,
}

impl<T> Selection<T> {
    fn new<S: Into<String>>(key: S, value: T, source: Source) -> Self {
        Selection {
            key: key.into(),
            value,
            source,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn value(&self) -> &T {
        &self.value
    }

    pub fn into_value(self) -> T {
        self.value
    }

    pub fn source(&self) -> &Source {
        &self.source
    }

    pub fn used_default(&self) -> bool {
        self.source != Source::Environment
    }
}

impl<T: fmt::Display> fmt::Display for Selection<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.source {
            Source::Environment => write!(
                f,
                "select env [{}] success! value: [{}]!",
                self.key,
                self.value
            ),
            Source::Missing => write!(
                f,
                "select env [{}] failed! use [{}] as default!",
                self.key,
                self.value
            ),
            Source::Unparsable(ref raw) => write!(
                f,
                "parse env [{}][{}] failed! use [{}] as default!",
                self.key,
                raw,
                self.value
            ),
        }
    }
}

/// `EnvReader` looks up variables in an `Environment` with typed defaults.
///
/// Every lookup writes exactly one diagnostic line to `diagnostics`, which is standard error
/// when the reader is built with `EnvReader::stderr`.
pub struct EnvReader<'a, W: Write> {
    env: &'a Environment,
    diagnostics: W,
}

impl<'a> EnvReader<'a, Stderr> {
    pub fn stderr(env: &'a Environment) -> Self {
        EnvReader::new(env, io::stderr())
    }
}

impl<'a, W: Write> EnvReader<'a, W> {
    /// Constructs a new `EnvReader`.
    ///
    /// # Arguments
    ///
    /// * `env` - The environment to read variables from.
    /// * `diagnostics` - The sink receiving one diagnostic line per lookup.
    pub fn new(env: &'a Environment, diagnostics: W) -> Self {
        EnvReader { env, diagnostics }
    }

    pub fn read_string<S: Into<String>>(&mut self, key: &str, default: S) -> Selection<String> {
        let selection = match self.env.get(key) {
            Some(value) => Selection::new(key, value.to_owned(), Source::Environment),
            None => Selection::new(key, default.into(), Source::Missing),
        };
        self.report(&selection);
        selection
    }

    pub fn read_int(&mut self, key: &str, default: i64) -> Selection<i64> {
        self.read_parsed(key, default)
    }

    /// Reads and parses a variable with `FromStr`, ignoring surrounding whitespace.
    ///
    /// A value that fails to parse is replaced by `default`; the failure only shows up in the
    /// diagnostic line and in the returned `Source`.
    pub fn read_parsed<T>(&mut self, key: &str, default: T) -> Selection<T>
    where
        T: FromStr + fmt::Display,
    {
        let selection = match self.env.get(key) {
            Some(raw) => match raw.trim().parse::<T>() {
                Ok(value) => Selection::new(key, value, Source::Environment),
                Err(_) => Selection::new(key, default, Source::Unparsable(raw.to_owned())),
            },
            None => Selection::new(key, default, Source::Missing),
        };
        self.report(&selection);
        selection
    }

    pub fn into_inner(self) -> W {
        self.diagnostics
    }

    fn report<T: fmt::Display>(&mut self, selection: &Selection<T>) {
        if let Err(err) = writeln!(self.diagnostics, "{}", selection) {
            warn!(
                "Unable to write diagnostic for env [{}]: {}",
                selection.key(),
                err
            );
        }
    }
}
