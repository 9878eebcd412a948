use std::collections::BTreeMap;
use std::io::{self, Stderr, Write};

use context::TASK_ID_VAR;
use env::Environment;
use errors::*;
use reporter::{CounterReport, StatusReport};

/// `CounterSink` reports Hadoop counters from a streaming task.
///
/// Under Hadoop every increment is written to the sink straight away as a counter report and the
/// framework does the summing. Run standalone, increments are summed locally per
/// `(group, name)` and only written when `flush` is called, so a local test run prints one total
/// per counter instead of one line per increment.
pub struct CounterSink<W: Write> {
    running_under_scheduler: bool,
    counters: BTreeMap<(String, String), i64>,
    sink: W,
}

impl CounterSink<Stderr> {
    pub fn stderr(env: &Environment) -> Self {
        CounterSink::new(env, io::stderr())
    }
}

impl<W: Write> CounterSink<W> {
    /// Constructs a new `CounterSink`.
    ///
    /// # Arguments
    ///
    /// * `env` - The task environment. The sink runs in scheduler mode iff `mapred_task_id` is set.
    /// * `sink` - Where counter reports are written, normally standard error.
    pub fn new(env: &Environment, sink: W) -> Self {
        let running_under_scheduler = env.contains(TASK_ID_VAR);
        debug!(
            "Creating counter sink, running under scheduler: {}",
            running_under_scheduler
        );
        CounterSink {
            running_under_scheduler,
            counters: BTreeMap::new(),
            sink,
        }
    }

    pub fn is_running_under_scheduler(&self) -> bool {
        self.running_under_scheduler
    }

    pub fn increment(&mut self, group: &str, name: &str, amount: i64) -> Result<()> {
        if self.running_under_scheduler {
            writeln!(self.sink, "{}", CounterReport::new(group, name, amount))
                .chain_err(|| format!("Error reporting counter {},{}.", group, name))?;
            return Ok(());
        }

        let total = self.counters
            .entry((group.to_owned(), name.to_owned()))
            .or_insert(0);
        *total = total.saturating_add(amount);
        Ok(())
    }

    pub fn increment_one(&mut self, group: &str, name: &str) -> Result<()> {
        self.increment(group, name, 1)
    }

    /// Writes one counter report per locally accumulated counter, ordered by group then name.
    ///
    /// The totals are kept, so calling `flush` again reports the same values again.
    pub fn flush(&mut self) -> Result<()> {
        for (&(ref group, ref name), &amount) in &self.counters {
            writeln!(self.sink, "{}", CounterReport::new(group, name, amount))
                .chain_err(|| format!("Error flushing counter {},{}.", group, name))?;
        }
        self.sink
            .flush()
            .chain_err(|| "Error flushing counter sink.")?;
        Ok(())
    }

    /// Writes a status report immediately, whether or not the task runs under Hadoop.
    pub fn report_status(&mut self, message: &str) -> Result<()> {
        writeln!(self.sink, "{}", StatusReport::new(message))
            .chain_err(|| "Error reporting task status.")?;
        Ok(())
    }

    /// Returns the locally accumulated total of a counter.
    pub fn get(&self, group: &str, name: &str) -> Option<i64> {
        self.counters
            .get(&(group.to_owned(), name.to_owned()))
            .cloned()
    }

    pub fn is_empty(&self) -> bool {
        self.counters.is_empty()
    }

    pub fn into_inner(self) -> W {
        self.sink
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn local_sink() -> CounterSink<Vec<u8>> {
        CounterSink::new(&Environment::new(), Vec::new())
    }

    fn scheduled_sink() -> CounterSink<Vec<u8>> {
        let env: Environment = vec![("mapred_task_id", "task_1")].into_iter().collect();
        CounterSink::new(&env, Vec::new())
    }

    fn output(counters: CounterSink<Vec<u8>>) -> String {
        String::from_utf8(counters.into_inner()).unwrap()
    }

    #[test]
    fn local_increments_are_summed_on_flush() {
        let mut counters = local_sink();
        assert!(!counters.is_running_under_scheduler());

        counters.increment("G", "N", 3).unwrap();
        counters.increment("G", "N", 3).unwrap();
        counters.flush().unwrap();

        assert_eq!(Some(6), counters.get("G", "N"));
        assert_eq!("reporter:counter:G,N,6\n", output(counters));
    }

    #[test]
    fn local_increment_writes_nothing_until_flush() {
        let mut counters = local_sink();

        counters.increment_one("G", "N").unwrap();

        assert_eq!(Some(1), counters.get("G", "N"));
        assert_eq!("", output(counters));
    }

    #[test]
    fn flush_is_ordered_and_repeatable() {
        let mut counters = local_sink();
        counters.increment("words", "total", 10).unwrap();
        counters.increment("errors", "parse", 1).unwrap();
        counters.increment("words", "empty", 2).unwrap();

        counters.flush().unwrap();
        counters.flush().unwrap();

        let expected = "reporter:counter:errors,parse,1\n\
                        reporter:counter:words,empty,2\n\
                        reporter:counter:words,total,10\n";
        assert_eq!(format!("{}{}", expected, expected), output(counters));
    }

    #[test]
    fn groups_and_names_are_independent() {
        let mut counters = local_sink();

        counters.increment("a", "x", 1).unwrap();
        counters.increment("b", "x", 2).unwrap();
        counters.increment("a", "y", 4).unwrap();

        assert_eq!(Some(1), counters.get("a", "x"));
        assert_eq!(Some(2), counters.get("b", "x"));
        assert_eq!(Some(4), counters.get("a", "y"));
        assert_eq!(None, counters.get("b", "y"));
    }

    #[test]
    fn local_totals_saturate() {
        let mut counters = local_sink();

        counters.increment("G", "N", i64::max_value()).unwrap();
        counters.increment("G", "N", 1).unwrap();

        assert_eq!(Some(i64::max_value()), counters.get("G", "N"));
    }

    #[test]
    fn scheduled_increment_is_reported_immediately() {
        let mut counters = scheduled_sink();
        assert!(counters.is_running_under_scheduler());

        counters.increment("G", "N", 3).unwrap();

        assert!(counters.is_empty());
        assert_eq!(None, counters.get("G", "N"));
        assert_eq!("reporter:counter:G,N,3\n", output(counters));
    }

    #[test]
    fn scheduled_flush_is_a_no_op() {
        let mut counters = scheduled_sink();
        counters.increment("G", "N", 3).unwrap();
        counters.increment("G", "N", 3).unwrap();

        counters.flush().unwrap();

        assert_eq!(
            "reporter:counter:G,N,3\nreporter:counter:G,N,3\n",
            output(counters)
        );
    }

    #[test]
    fn empty_task_id_still_counts_as_scheduled() {
        let env: Environment = vec![("mapred_task_id", "")].into_iter().collect();

        let counters = CounterSink::new(&env, Vec::new());

        assert!(counters.is_running_under_scheduler());
    }

    #[test]
    fn status_is_reported_in_both_modes() {
        let mut local = local_sink();
        let mut scheduled = scheduled_sink();

        local.report_status("halfway").unwrap();
        scheduled.report_status("halfway").unwrap();

        assert_eq!("reporter:status:halfway\n", output(local));
        assert_eq!("reporter:status:halfway\n", output(scheduled));
    }

    struct BrokenSink;

    impl Write for BrokenSink {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn write_failures_are_returned() {
        let env: Environment = vec![("mapred_task_id", "task_1")].into_iter().collect();
        let mut counters = CounterSink::new(&env, BrokenSink);

        assert!(counters.increment("G", "N", 1).is_err());
    }

    #[test]
    fn flush_failures_are_returned() {
        let mut counters = CounterSink::new(&Environment::new(), BrokenSink);
        counters.increment("G", "N", 1).unwrap();

        assert!(counters.flush().is_err());
        assert_eq!(Some(1), counters.get("G", "N"));
    }
}
