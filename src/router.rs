use crate::{
    level::{RecordLevel, Threshold},
    sinks::LogSink,
};

/// A sink together with the threshold that gates it.
pub struct Route {
    sink: Box<dyn LogSink>,
    threshold: Threshold,
}

impl Route {
    pub fn new(sink: Box<dyn LogSink>, threshold: Threshold) -> Self {
        Self { sink, threshold }
    }

    pub fn threshold(&self) -> Threshold {
        self.threshold
    }

    pub fn accepts(&self, level: RecordLevel) -> bool {
        level.passes(self.threshold)
    }
}

/// Decides per sink whether a record is written. The file and console
/// decisions are independent of each other.
#[derive(Default)]
pub struct Router {
    file: Option<Route>,
    console: Option<Route>,
}

impl Router {
    pub fn new(file: Option<Route>, console: Option<Route>) -> Self {
        Self { file, console }
    }

    pub fn file(&self) -> Option<&Route> {
        self.file.as_ref()
    }

    pub fn console(&self) -> Option<&Route> {
        self.console.as_ref()
    }

    fn routes(&self) -> impl Iterator<Item = (&'static str, &Route)> {
        self.file
            .iter()
            .map(|route| ("file", route))
            .chain(self.console.iter().map(|route| ("console", route)))
    }

    /// True when at least one sink would take a record at `level`.
    pub fn wants(&self, level: RecordLevel) -> bool {
        self.routes().any(|(_, route)| route.accepts(level))
    }

    /// Writes `line` to every accepting sink. Failures are reported, not
    /// returned.
    pub fn dispatch(&self, level: RecordLevel, line: &str) {
        for (name, route) in self.routes() {
            if !route.accepts(level) {
                continue;
            }

            if let Err(err) = route.sink.write_line(level, line) {
                tracing::warn!(sink = name, level = level.name(), "failed writing log record: {}", err);
            }
        }
    }

    pub fn flush(&self) {
        for (_, route) in self.routes() {
            route.sink.flush();
        }
    }
}
