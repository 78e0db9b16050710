use std::fmt::Display;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::NaiveTime;

type SharedFile = Arc<Mutex<BufWriter<File>>>;

/// Log file that mirrors every line to standard output.
///
/// Owned by `main` for the whole run and closed explicitly, so the file is
/// flushed on every exit path, failures included. The logger backend writes
/// through a [`ConsoleLogWriter`] handed out by [`ConsoleLog::writer`].
pub struct ConsoleLog {
    file: SharedFile,
}

impl ConsoleLog {
    /// Creates the log file, truncating any previous content.
    pub fn create(path: impl AsRef<Path>) -> io::Result<Self> {
        let file = File::create(path)?;

        Ok(ConsoleLog {
            file: Arc::new(Mutex::new(BufWriter::new(file))),
        })
    }

    pub fn writer(&self) -> ConsoleLogWriter {
        ConsoleLogWriter {
            file: Arc::clone(&self.file),
            echo: true,
        }
    }

    pub fn close(self) -> io::Result<()> {
        lock(&self.file)?.flush()
    }
}

impl Drop for ConsoleLog {
    fn drop(&mut self) {
        if let Ok(mut file) = self.file.lock() {
            let _ = file.flush();
        }
    }
}

pub struct ConsoleLogWriter {
    file: SharedFile,
    echo: bool,
}

impl ConsoleLogWriter {
    #[cfg(test)]
    fn silent(log: &ConsoleLog) -> Self {
        ConsoleLogWriter {
            file: Arc::clone(&log.file),
            echo: false,
        }
    }
}

impl Write for ConsoleLogWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        {
            let mut file = lock(&self.file)?;
            file.write_all(buf)?;
            file.flush()?;
        }

        if self.echo {
            let mut stdout = io::stdout().lock();
            stdout.write_all(buf)?;
            stdout.flush()?;
        }

        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        lock(&self.file)?.flush()?;
        io::stdout().flush()
    }
}

fn lock(file: &SharedFile) -> io::Result<MutexGuard<'_, BufWriter<File>>> {
    file.lock()
        .map_err(|_| io::Error::new(io::ErrorKind::Other, "Console log lock poisoned"))
}

/// Formats a log line as `<time-of-day> : <message>`.
pub fn format_line(time: NaiveTime, message: impl Display) -> String {
    format!("{} : {}", time.format("%H:%M:%S%.6f"), message)
}
