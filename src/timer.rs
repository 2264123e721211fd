use std::io::{self, Write};

use serde::Serialize;
use tracing::{debug, error};

use crate::{
    clock::{Clock, SystemClock},
    error::{Error, Result},
    stats::{Snapshot, Stats},
};

/// A named checkpoint recorded by [`Timer::mark`].
///
/// All values are in seconds. For the first mark after `start`,
/// `since_last_mark` equals `since_start`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Mark {
    pub id: String,
    pub timestamp: f64,
    pub since_start: f64,
    pub since_last_mark: f64,
}

/// Records a start time, named marks, and a stop time for one timing session.
///
/// Misuse (starting twice, marking before start, ...) never panics: the
/// operation returns an [`Error`], and ordering mistakes are also kept in
/// [`Timer::errors`] and reported through `tracing`. The error list survives
/// [`Timer::reset`].
#[derive(Debug)]
pub struct Timer<C = SystemClock> {
    clock: C,
    start: Option<f64>,
    stop: Option<f64>,
    marks: Vec<Mark>,
    errors: Vec<String>,
}

impl Timer {
    pub fn new() -> Timer {
        Timer::with_clock(SystemClock)
    }
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> Timer<C> {
    pub fn with_clock(clock: C) -> Timer<C> {
        Self {
            clock,
            start: None,
            stop: None,
            marks: Vec::new(),
            errors: Vec::new(),
        }
    }

    pub fn start(&mut self) -> Result<()> {
        if self.start.is_some() {
            return Err(self.log_error(Error::AlreadyStarted));
        }
        let now = self.clock.now();
        self.start = Some(now);
        debug!(start = now, "timer started");
        Ok(())
    }

    /// Stops the timer and returns the seconds elapsed since `start`.
    pub fn stop(&mut self) -> Result<f64> {
        if self.stop.is_some() {
            return Err(self.log_error(Error::AlreadyStopped));
        }
        let Some(start) = self.start else {
            return Err(self.log_error(Error::NotStarted { operation: "stop()" }));
        };
        let now = self.clock.now();
        self.stop = Some(now);
        let elapsed = now - start;
        debug!(elapsed, "timer stopped");
        Ok(elapsed)
    }

    /// Clears start, stop and marks. Logged errors are kept.
    pub fn reset(&mut self) {
        self.marks.clear();
        self.start = None;
        self.stop = None;
        debug!("timer reset");
    }

    /// Records a mark and returns the seconds since the previous one (or
    /// since `start` for the first mark).
    pub fn mark(&mut self, id: impl Into<String>) -> Result<f64> {
        let id = id.into();
        let Some(start) = self.start else {
            return Err(self.log_error(Error::MarkBeforeStart { id }));
        };
        let timestamp = self.clock.now();
        let since_start = timestamp - start;
        let since_last_mark = match self.marks.last() {
            Some(last) => timestamp - last.timestamp,
            None => since_start,
        };
        debug!(%id, since_start, since_last_mark, "mark");
        self.marks.push(Mark {
            id,
            timestamp,
            since_start,
            since_last_mark,
        });
        Ok(since_last_mark)
    }

    pub fn marks(&self) -> &[Mark] {
        &self.marks
    }

    /// First mark recorded with `id`.
    pub fn mark_by_id(&self, id: &str) -> Result<&Mark> {
        self.marks
            .iter()
            .find(|mark| mark.id == id)
            .ok_or_else(|| Error::MarkNotFound { id: id.to_string() })
    }

    /// Mean of `since_last_mark` over all marks.
    pub fn mark_average(&self) -> Result<f64> {
        if self.marks.is_empty() {
            return Err(Error::NoMarks);
        }
        let sum: f64 = self.marks.iter().map(|mark| mark.since_last_mark).sum();
        Ok(sum / self.marks.len() as f64)
    }

    pub fn longest_mark(&self) -> Result<&Mark> {
        self.extreme_mark(|mark, best| mark.since_last_mark > best.since_last_mark)
    }

    pub fn shortest_mark(&self) -> Result<&Mark> {
        self.extreme_mark(|mark, best| mark.since_last_mark < best.since_last_mark)
    }

    // Only a strictly better mark replaces the current one, so the first of
    // several equal marks wins.
    fn extreme_mark(&self, better: impl Fn(&Mark, &Mark) -> bool) -> Result<&Mark> {
        let mut marks = self.marks.iter();
        let first = marks.next().ok_or(Error::NoMarks)?;
        Ok(marks.fold(first, |best, mark| if better(mark, best) { mark } else { best }))
    }

    pub fn last_mark(&self) -> Result<&Mark> {
        self.marks.last().ok_or(Error::NoMarks)
    }

    pub fn elapsed_since_mark(&self, id: &str) -> Result<f64> {
        let mark = self.mark_by_id(id)?;
        Ok(self.clock.now() - mark.timestamp)
    }

    pub fn elapsed_since_last_mark(&self) -> Result<f64> {
        let mark = self.last_mark()?;
        Ok(self.clock.now() - mark.timestamp)
    }

    /// Seconds between `start` and `stop`, or between `start` and now while
    /// the timer is still running.
    pub fn elapsed(&mut self) -> Result<f64> {
        let Some(start) = self.start else {
            return Err(self.log_error(Error::NotStarted { operation: "elapsed()" }));
        };
        let end = match self.stop {
            Some(stop) => stop,
            None => self.clock.now(),
        };
        Ok(end - start)
    }

    /// Absolute seconds between two marks.
    ///
    /// Every missing id is logged; the error for the first one is returned.
    pub fn elapsed_between(&mut self, from: &str, to: &str) -> Result<f64> {
        if self.start.is_none() {
            return Err(self.log_error(Error::NotStarted {
                operation: "elapsed_between()",
            }));
        }
        let from = self.mark_by_id(from).map(|mark| mark.timestamp);
        let to = self.mark_by_id(to).map(|mark| mark.timestamp);
        match (from, to) {
            (Ok(from), Ok(to)) => Ok((to - from).abs()),
            (Err(missing), Ok(_)) | (Ok(_), Err(missing)) => Err(self.log_error(missing)),
            (Err(from), Err(to)) => {
                let from = self.log_error(from);
                self.log_error(to);
                Err(from)
            }
        }
    }

    pub fn stats(&mut self) -> Result<Stats> {
        let Some(start) = self.start else {
            return Err(self.log_error(Error::NotStarted { operation: "stats()" }));
        };
        let elapsed = self.elapsed()?;
        Ok(Stats {
            start,
            stop: self.stop,
            elapsed,
            mark_average: self.mark_average().ok(),
            mark_shortest: self.shortest_mark().ok().cloned(),
            mark_longest: self.longest_mark().ok().cloned(),
        })
    }

    /// Statistics, marks and errors at this instant.
    pub fn snapshot(&mut self) -> Snapshot {
        let statistics = self.stats().ok();
        Snapshot {
            statistics,
            marks: self.marks.clone(),
            errors: self.errors.clone(),
        }
    }

    /// Writes [`Timer::snapshot`] to `writer` as pretty-printed JSON.
    pub fn dump_to<W: Write>(&mut self, mut writer: W) -> Result<()> {
        let snapshot = self.snapshot();
        serde_json::to_writer_pretty(&mut writer, &snapshot)?;
        writeln!(writer)?;
        Ok(())
    }

    /// Dumps to stdout, then exits the process with status 0 if `exit` is set.
    ///
    /// The process exits even when writing the dump failed.
    pub fn dump(&mut self, exit: bool) -> Result<()> {
        let result = self.dump_to(io::stdout().lock());
        if exit {
            std::process::exit(0);
        }
        result
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    pub fn start_time(&self) -> Option<f64> {
        self.start
    }

    pub fn stop_time(&self) -> Option<f64> {
        self.stop
    }

    fn log_error(&mut self, err: Error) -> Error {
        let message = err.to_string();
        error!(target: "marktimer", "{}", message);
        self.errors.push(message);
        err
    }
}
