pub mod logger;

pub mod logging_defs;
#[macro_use]
pub mod macros;

use logger::{Listener, PerfListener, PerfLogger};
use logging_defs::*;
use std::rc::Rc;
use std::time::Duration;
use std::time::Instant;

/// A [`PerfLogger`] reporting to [`PerfConsoleListener`].
pub fn console_perf_logger() -> PerfLogger {
    let listeners = vec![Listener::new(Rc::new(PerfConsoleListener {}))];
    PerfLogger::new(listeners)
}

/// A [`PerfListener`] that forwards every span event to the `log` facade at
/// `trace` level.  Spans are only recorded when `log::Level::Trace` is
/// enabled for this crate.
pub struct PerfConsoleListener;

impl PerfListener for PerfConsoleListener {
    fn is_interested_in_span(&self, _span_id: u64) -> bool {
        log::log_enabled!(log::Level::Trace)
    }

    fn on_span_start(&self, span_id: u64, _start_time: Instant) {
        log::trace!("Start of span: {}", name(span_id));
    }

    fn on_check_point(
        &self,
        span_id: u64,
        _point_time: Instant,
        duration_since_last_checkpoint: Duration,
        point_label: &str,
    ) {
        log::trace!(
            "Span: \"{}\" point: \"{}\": {} seconds",
            name(span_id),
            point_label,
            duration_since_last_checkpoint.as_secs_f64()
        );
    }

    fn on_annotate(&self, span_id: u64, annotation: &str) {
        log::trace!("Span: \"{}\" annotation: \"{}\"", name(span_id), annotation);
    }

    fn on_span_end(&self, span_id: u64, span_duration: Duration) {
        log::trace!(
            "Span ended: \"{}\": {} seconds",
            name(span_id),
            span_duration.as_secs_f64()
        );
    }
}
