use std::{
    fs::File,
    io::{self, IsTerminal, LineWriter, Write},
    path::{Path, PathBuf},
    sync::Arc,
};

use parking_lot::Mutex;
use serde::Deserialize;
use yansi::{Paint, Style};

use crate::{
    level::{RecordLevel, Severity},
    rotation::{self, RotatingWriter, RotationConfig},
};

pub trait LogSink: Sync + Send {
    fn write_line(&self, level: RecordLevel, line: &str) -> io::Result<()>;
    fn flush(&self);
}

/// When the console sink paints its output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    /// Paint only when stdout is a terminal.
    #[default]
    Auto,
    Always,
    Never,
}

impl ColorMode {
    pub fn enabled(self) -> bool {
        match self {
            ColorMode::Auto => io::stdout().is_terminal(),
            ColorMode::Always => true,
            ColorMode::Never => false,
        }
    }
}

pub fn style_for(level: RecordLevel) -> Option<Style> {
    let style = match level {
        RecordLevel::Severity(Severity::Trace) => Style::new().cyan(),
        RecordLevel::Severity(Severity::Debug) => Style::new().blue(),
        RecordLevel::Severity(Severity::Info) => Style::new().green(),
        RecordLevel::Severity(Severity::Warning) => Style::new().yellow(),
        RecordLevel::Severity(Severity::Error) => Style::new().red(),
        RecordLevel::Severity(Severity::Fatal) => Style::new().bright_red(),
        RecordLevel::Print => return None,
    };
    Some(style)
}

pub struct ConsoleSink {
    writer: Mutex<Box<dyn Write + Send>>,
    colorize: bool,
}

impl ConsoleSink {
    pub fn stdout(colorize: bool) -> Self {
        Self::with_writer(Box::new(io::stdout()), colorize)
    }

    pub fn with_writer(writer: Box<dyn Write + Send>, colorize: bool) -> Self {
        Self {
            writer: Mutex::new(writer),
            colorize,
        }
    }
}

impl LogSink for ConsoleSink {
    fn write_line(&self, level: RecordLevel, line: &str) -> io::Result<()> {
        let painted = match style_for(level) {
            Some(style) if self.colorize => line.paint(style).to_string(),
            _ => line.to_string(),
        };

        let mut writer = self.writer.lock();
        writeln!(writer, "{}", painted)?;
        writer.flush()
    }

    fn flush(&self) {
        if let Err(err) = self.writer.lock().flush() {
            tracing::warn!("failed flushing console sink: {}", err);
        }
    }
}

/// Append-only file handle opened once at construction.
pub struct FileSink {
    file: Mutex<LineWriter<File>>,
    file_path: PathBuf,
}

impl FileSink {
    pub fn open(path: impl Into<PathBuf>) -> io::Result<Self> {
        let file_path = path.into();
        let file = rotation::open_append(&file_path)?;

        Ok(Self {
            file: Mutex::new(LineWriter::new(file)),
            file_path,
        })
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }
}

impl LogSink for FileSink {
    fn write_line(&self, _level: RecordLevel, line: &str) -> io::Result<()> {
        let mut file = self.file.lock();
        writeln!(file, "{}", line)?;
        file.flush()
    }

    fn flush(&self) {
        if let Err(err) = self.file.lock().flush() {
            tracing::warn!(path = %self.file_path.display(), "failed flushing log file: {}", err);
        }
    }
}

pub struct RotatingFileSink {
    writer: Mutex<RotatingWriter>,
}

impl RotatingFileSink {
    pub fn open(path: impl Into<PathBuf>, policy: RotationConfig) -> io::Result<Self> {
        Ok(Self {
            writer: Mutex::new(RotatingWriter::open(path, policy)?),
        })
    }
}

impl LogSink for RotatingFileSink {
    fn write_line(&self, _level: RecordLevel, line: &str) -> io::Result<()> {
        let mut writer = self.writer.lock();
        // One write per record so a record never straddles two files.
        writer.write_all(format!("{}\n", line).as_bytes())?;
        writer.flush()
    }

    fn flush(&self) {
        let mut writer = self.writer.lock();
        if let Err(err) = writer.flush() {
            tracing::warn!(path = %writer.path().display(), "failed flushing log file: {}", err);
        }
    }
}

/// A cloneable in-memory writer, handy as a console replacement when the
/// output has to be inspected.
#[derive(Debug, Clone, Default)]
pub struct MemoryWriter {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl MemoryWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.buffer.lock()).into_owned()
    }

    pub fn lines(&self) -> Vec<String> {
        self.contents().lines().map(str::to_string).collect()
    }

    pub fn clear(&self) {
        self.buffer.lock().clear();
    }
}

impl Write for MemoryWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
