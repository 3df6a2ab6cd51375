use bitflags::bitflags;
use std::cell::RefCell;
use std::collections::HashMap;
use std::ops::Deref;
use std::rc::Rc;
use std::time::Duration;
use std::time::Instant;

bitflags! {
    /// Which pipeline stages emit `log::debug!` diagnostics when
    /// [`ChunkOptions::debug`][crate::ChunkOptions::debug] is on.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct DebugLogsCategories: u32 {
        const NONE                     = 0;
        const TOKENIZER                = 1 << 1;
        const SENTENCES                = 1 << 2;
        const PACKER                   = 1 << 3;
        const RECONCILER               = 1 << 4;
        const ASSEMBLER                = 1 << 5;
        const PLACEMENT                = 1 << 6;
        const ALL                      = u32::MAX;
    }
}

impl Default for DebugLogsCategories {
    fn default() -> Self {
        DebugLogsCategories::ALL
    }
}

/// Observer interface for performance-span events.  Implement this trait
/// and wrap it in a [`Listener`] to receive timing data from the chunking
/// pipeline.
///
/// All methods are called synchronously from the pipeline; keep them
/// lightweight.
pub trait PerfListener {
    /// Return whether this listener cares about the given span.  If `false`,
    /// none of the other callbacks will fire for that span.
    fn is_interested_in_span(&self, span_id: u64) -> bool;
    /// Called when a span begins.
    fn on_span_start(&self, span_id: u64, start_time: Instant);
    /// Called at each checkpoint within a span, with the wall-clock duration
    /// since the previous checkpoint (or span start).
    fn on_check_point(
        &self,
        span_id: u64,
        point_time: Instant,
        duration_since_last_checkpoint: Duration,
        label: &str,
    );
    /// Called when a free-text annotation is attached to a span.
    fn on_annotate(&self, span_id: u64, annotation: &str);
    /// Called when a span ends, with its total duration.
    fn on_span_end(&self, span_id: u64, span_duration: Duration);
}

/// A clonable, reference-counted wrapper around a [`PerfListener`].
#[derive(Clone)]
pub struct Listener {
    inner_impl: Rc<dyn PerfListener>,
}

impl Listener {
    /// Wrap a [`PerfListener`] implementation for use with [`PerfLogger`].
    pub fn new(listener: Rc<dyn PerfListener>) -> Listener {
        Listener {
            inner_impl: listener,
        }
    }
}

impl Deref for Listener {
    type Target = dyn PerfListener;
    fn deref(&self) -> &Self::Target {
        &*self.inner_impl
    }
}

struct PerfCheckPoint {
    pub label: String,
    pub time: Instant,
}

struct PerfEvent {
    pub span_id: u64,
    pub start_time: Instant,
    pub last_point: Option<Instant>,
    pub listeners: Vec<Listener>,
}

impl PerfEvent {
    pub fn point(&mut self, point: PerfCheckPoint) {
        let since = point
            .time
            .duration_since(self.last_point.unwrap_or(self.start_time));
        self.listeners.iter().for_each(|l| {
            l.on_check_point(self.span_id, point.time, since, point.label.as_str())
        });
        self.last_point = Some(point.time);
    }

    pub fn annotate(&self, annotation: &str) {
        self.listeners
            .iter()
            .for_each(|l| l.on_annotate(self.span_id, annotation));
    }
}

/// Tracks in-flight performance spans and fans events out to registered
/// [`Listener`]s.
///
/// **Not `Send` or `Sync`**: the internal event map uses `RefCell`.  Each
/// pipeline run creates its own `PerfLogger`.
pub struct PerfLogger {
    events: RefCell<HashMap<u64, PerfEvent>>,
    listeners: Vec<Listener>,
}

impl PerfLogger {
    /// Create a new logger with the given set of listeners.  Pass an empty
    /// `Vec` to disable all perf logging.
    pub fn new(listeners: Vec<Listener>) -> PerfLogger {
        PerfLogger {
            events: RefCell::new(HashMap::new()),
            listeners,
        }
    }

    /// Begin a new span identified by `span_id`.
    pub fn start(&self, span_id: u64) {
        let event_listeners = self
            .listeners
            .iter()
            .filter(|l| l.is_interested_in_span(span_id))
            .cloned()
            .collect::<Vec<_>>();
        if !event_listeners.is_empty() {
            let start_time = Instant::now();
            event_listeners
                .iter()
                .for_each(|l| l.on_span_start(span_id, start_time));
            let event = PerfEvent {
                span_id,
                start_time,
                last_point: None,
                listeners: event_listeners,
            };
            self.events.borrow_mut().insert(span_id, event);
        }
    }

    /// Record a checkpoint with a `&str` label inside the given span.
    pub fn check_point_str(&self, span_id: u64, label: &str) {
        self.check_point(span_id, String::from(label));
    }

    /// Record a checkpoint with an owned `String` label inside the given span.
    pub fn check_point(&self, span_id: u64, label: String) {
        if let Some(event) = self.events.borrow_mut().get_mut(&span_id) {
            let point = PerfCheckPoint {
                label,
                time: Instant::now(),
            };
            event.point(point);
        }
    }

    /// Attach a free-text annotation to the given span.
    pub fn annotate(&self, span_id: u64, annotation: String) {
        if let Some(event) = self.events.borrow().get(&span_id) {
            event.annotate(annotation.as_str());
        }
    }

    /// End the span, notify listeners with the total duration, and remove
    /// it from the active-events map.
    pub fn end(&self, span_id: u64) {
        if let Some(event) = self.events.borrow_mut().remove(&span_id) {
            let duration = Instant::now().duration_since(event.start_time);
            event.listeners.iter().for_each(|l| {
                l.on_span_end(span_id, duration);
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::logging_defs::*;

    #[derive(Default)]
    struct Recorder {
        seen: RefCell<Vec<String>>,
    }

    impl PerfListener for Recorder {
        fn is_interested_in_span(&self, span_id: u64) -> bool {
            span_id == PACK_PARAGRAPHS
        }

        fn on_span_start(&self, span_id: u64, _start_time: Instant) {
            self.seen.borrow_mut().push(format!("start {}", name(span_id)));
        }

        fn on_check_point(&self, _span_id: u64, _t: Instant, _d: Duration, label: &str) {
            self.seen.borrow_mut().push(format!("point {}", label));
        }

        fn on_annotate(&self, _span_id: u64, annotation: &str) {
            self.seen.borrow_mut().push(format!("note {}", annotation));
        }

        fn on_span_end(&self, span_id: u64, _span_duration: Duration) {
            self.seen.borrow_mut().push(format!("end {}", name(span_id)));
        }
    }

    #[test]
    fn only_interesting_spans_reach_the_listener() {
        let recorder = Rc::new(Recorder::default());
        let logger = PerfLogger::new(vec![Listener::new(recorder.clone())]);

        logger.start(TOKENIZE);
        logger.check_point_str(TOKENIZE, "ignored");
        logger.end(TOKENIZE);

        logger.start(PACK_PARAGRAPHS);
        logger.check_point_str(PACK_PARAGRAPHS, "paragraph 0");
        logger.annotate(PACK_PARAGRAPHS, "3 sentences".to_string());
        logger.end(PACK_PARAGRAPHS);
        // a second end is a no-op
        logger.end(PACK_PARAGRAPHS);

        assert_eq!(
            *recorder.seen.borrow(),
            vec![
                "start PACK_PARAGRAPHS",
                "point paragraph 0",
                "note 3 sentences",
                "end PACK_PARAGRAPHS",
            ]
        );
    }
}
