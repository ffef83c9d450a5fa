use std::{
    fs::{self, File, OpenOptions},
    io::{self, BufReader, Write},
    path::{Path, PathBuf},
    time::{Duration, SystemTime},
};

use chrono::{Local, NaiveDateTime};
use flate2::{write::GzEncoder, Compression};
use serde::Deserialize;

use crate::config::parent_dir;

const MEGABYTE: u64 = 1024 * 1024;
const DAY: Duration = Duration::from_secs(24 * 60 * 60);

const BACKUP_TIME_FORMAT: &str = "%Y-%m-%dT%H-%M-%S%.3f";
const BACKUP_TIME_LEN: usize = "2024-01-01T00-00-00.000".len();

pub const DEFAULT_MAX_SIZE_MB: u64 = 10;
pub const DEFAULT_MAX_BACKUPS: usize = 7;
pub const DEFAULT_MAX_AGE_DAYS: u64 = 30;

/// Rotation settings for the file sink. Zero values are replaced by the
/// defaults when the logger is built.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RotationConfig {
    pub max_size_mb: u64,
    pub max_backups: usize,
    pub max_age_days: u64,
    pub compress: bool,
}

impl RotationConfig {
    pub fn with_defaults(self) -> Self {
        Self {
            max_size_mb: non_zero_or(self.max_size_mb, DEFAULT_MAX_SIZE_MB),
            max_backups: if self.max_backups == 0 {
                DEFAULT_MAX_BACKUPS
            } else {
                self.max_backups
            },
            max_age_days: non_zero_or(self.max_age_days, DEFAULT_MAX_AGE_DAYS),
            compress: self.compress,
        }
    }
}

fn non_zero_or(value: u64, default: u64) -> u64 {
    if value == 0 {
        default
    } else {
        value
    }
}

pub(crate) fn open_append(path: &Path) -> io::Result<File> {
    OpenOptions::new()
        .create(true)
        .write(true)
        .append(true)
        .open(path)
}

/// Append-only file writer that moves the file aside once it would grow past
/// `max_size_mb`.
///
/// Backups live next to the file as `<stem>-<timestamp>.<ext>`, gzipped to
/// `<stem>-<timestamp>.<ext>.gz` when compression is on. After each rotation
/// backups beyond `max_backups` or older than `max_age_days` are removed.
/// Only names carrying a backup timestamp count as backups; other files next
/// to the log are never touched.
///
/// A single record larger than `max_size_mb` is still written whole, into a
/// fresh file, and reported through `tracing::warn!`.
#[derive(Debug)]
pub struct RotatingWriter {
    path: PathBuf,
    file: File,
    size: u64,
    policy: RotationConfig,
}

impl RotatingWriter {
    pub fn open(path: impl Into<PathBuf>, policy: RotationConfig) -> io::Result<Self> {
        let path = path.into();
        let file = open_append(&path)?;
        let size = file.metadata()?.len();

        Ok(Self {
            path,
            file,
            size,
            policy: policy.with_defaults(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn max_bytes(&self) -> u64 {
        self.policy.max_size_mb.saturating_mul(MEGABYTE)
    }

    fn rotate(&mut self) -> io::Result<()> {
        self.file.flush()?;

        let backup = self.backup_path();
        fs::rename(&self.path, &backup)?;
        self.file = open_append(&self.path)?;
        self.size = 0;

        tracing::debug!(
            path = %self.path.display(),
            backup = %backup.display(),
            "rotated log file"
        );

        if self.policy.compress {
            if let Err(err) = compress(&backup) {
                tracing::warn!(backup = %backup.display(), "failed compressing log backup: {}", err);
            }
        }

        self.prune();
        Ok(())
    }

    fn file_name_parts(&self) -> (String, Option<String>) {
        let stem = self
            .path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| "log".to_string());
        let extension = self
            .path
            .extension()
            .map(|ext| ext.to_string_lossy().into_owned());
        (stem, extension)
    }

    fn backup_path(&self) -> PathBuf {
        let (stem, extension) = self.file_name_parts();
        let timestamp = Local::now().format(BACKUP_TIME_FORMAT);
        let suffix = extension.map(|ext| format!(".{}", ext)).unwrap_or_default();

        let mut candidate = self.path.with_file_name(format!("{}-{}{}", stem, timestamp, suffix));
        let mut counter = 1;
        while candidate.exists() || gz_path(&candidate).exists() {
            candidate = self
                .path
                .with_file_name(format!("{}-{}-{}{}", stem, timestamp, counter, suffix));
            counter += 1;
        }

        candidate
    }

    /// Backups of this file, newest first.
    pub fn backups(&self) -> io::Result<Vec<PathBuf>> {
        let (stem, extension) = self.file_name_parts();
        let suffix = extension.map(|ext| format!(".{}", ext)).unwrap_or_default();

        let mut backups = Vec::new();
        for entry in fs::read_dir(parent_dir(&self.path))? {
            let entry = entry?;
            let name = entry.file_name().to_string_lossy().into_owned();
            if backup_time(&name, &stem, &suffix).is_none() || !entry.file_type()?.is_file() {
                continue;
            }

            let modified = entry.metadata()?.modified()?;
            backups.push((modified, entry.path()));
        }

        backups.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| b.1.cmp(&a.1)));
        Ok(backups.into_iter().map(|(_, path)| path).collect())
    }

    fn prune(&self) {
        let backups = match self.backups() {
            Ok(backups) => backups,
            Err(err) => {
                tracing::warn!(path = %self.path.display(), "failed listing log backups: {}", err);
                return;
            }
        };

        let max_age = DAY.saturating_mul(u32::try_from(self.policy.max_age_days).unwrap_or(u32::MAX));
        let cutoff = SystemTime::now().checked_sub(max_age);

        for (index, backup) in backups.iter().enumerate() {
            let too_many = index >= self.policy.max_backups;
            let too_old = match (cutoff, fs::metadata(backup).and_then(|md| md.modified())) {
                (Some(cutoff), Ok(modified)) => modified < cutoff,
                _ => false,
            };

            if too_many || too_old {
                tracing::debug!(backup = %backup.display(), "removing old log backup");
                if let Err(err) = fs::remove_file(backup) {
                    tracing::warn!(backup = %backup.display(), "failed removing log backup: {}", err);
                }
            }
        }
    }
}

impl Write for RotatingWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let len = buf.len() as u64;
        if self.size > 0 && self.size + len > self.max_bytes() {
            self.rotate()?;
        }
        if len > self.max_bytes() {
            tracing::warn!(
                path = %self.path.display(),
                bytes = len,
                max_size_mb = self.policy.max_size_mb,
                "log record exceeds the rotation size limit"
            );
        }

        self.file.write_all(buf)?;
        self.size += len;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()
    }
}

/// Timestamp embedded in a backup name of the form
/// `<stem>-<timestamp>[-<n>]<suffix>[.gz]`, or `None` for any other name.
fn backup_time(name: &str, stem: &str, suffix: &str) -> Option<NaiveDateTime> {
    let rest = name.strip_prefix(stem)?.strip_prefix('-')?;
    let rest = rest.strip_suffix(".gz").unwrap_or(rest);
    let middle = rest.strip_suffix(suffix)?;

    let stamp = middle.get(..BACKUP_TIME_LEN)?;
    let counter = middle.get(BACKUP_TIME_LEN..)?;
    if !counter.is_empty() {
        let digits = counter.strip_prefix('-')?;
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
    }

    NaiveDateTime::parse_from_str(stamp, BACKUP_TIME_FORMAT).ok()
}

fn gz_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(".gz");
    PathBuf::from(name)
}

fn compress(path: &Path) -> io::Result<()> {
    let target = gz_path(path);
    let mut source = BufReader::new(File::open(path)?);
    let mut encoder = GzEncoder::new(File::create(&target)?, Compression::default());
    io::copy(&mut source, &mut encoder)?;
    encoder.finish()?.sync_all()?;
    fs::remove_file(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    use flate2::read::GzDecoder;

    fn policy(compress: bool, max_backups: usize) -> RotationConfig {
        RotationConfig {
            max_size_mb: 1,
            max_backups,
            max_age_days: 1,
            compress,
        }
    }

    fn fill(writer: &mut RotatingWriter, chunks: usize) {
        let chunk = format!("{}\n", "A".repeat(10 * 1024));
        for _ in 0..chunks {
            writer.write_all(chunk.as_bytes()).unwrap();
        }
    }

    #[test]
    fn zero_values_take_defaults() {
        let policy = RotationConfig::default().with_defaults();
        assert_eq!(policy.max_size_mb, 10);
        assert_eq!(policy.max_backups, 7);
        assert_eq!(policy.max_age_days, 30);
        assert!(!policy.compress);
    }

    #[test]
    fn stays_in_one_file_below_limit() {
        let dir = tempfile::tempdir().unwrap();
        let mut writer = RotatingWriter::open(dir.path().join("app.log"), policy(false, 2)).unwrap();
        fill(&mut writer, 50);

        assert!(writer.backups().unwrap().is_empty());
    }

    #[test]
    fn rotates_past_limit() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("app.log");
        let mut writer = RotatingWriter::open(&path, policy(false, 2)).unwrap();
        fill(&mut writer, 110);

        let backups = writer.backups().unwrap();
        assert_eq!(backups.len(), 1);
        let name = backups[0].file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("app-") && name.ends_with(".log"), "{}", name);
        assert!(fs::metadata(&path).unwrap().len() < MEGABYTE);
    }

    #[test]
    fn compressed_backup_holds_original_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let mut writer = RotatingWriter::open(dir.path().join("app.log"), policy(true, 2)).unwrap();
        fill(&mut writer, 110);

        let backups = writer.backups().unwrap();
        assert_eq!(backups.len(), 1);
        assert_eq!(backups[0].extension().unwrap(), "gz");

        let mut contents = String::new();
        GzDecoder::new(File::open(&backups[0]).unwrap())
            .read_to_string(&mut contents)
            .unwrap();
        assert!(contents.len() as u64 <= MEGABYTE);
        assert!(contents.lines().all(|line| line.len() == 10 * 1024));
    }

    #[test]
    fn keeps_at_most_max_backups() {
        let dir = tempfile::tempdir().unwrap();
        let mut writer = RotatingWriter::open(dir.path().join("app.log"), policy(false, 2)).unwrap();
        fill(&mut writer, 450);

        assert_eq!(writer.backups().unwrap().len(), 2);
    }

    #[test]
    fn resumes_size_of_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("app.log");
        fs::write(&path, vec![b'x'; MEGABYTE as usize]).unwrap();

        let mut writer = RotatingWriter::open(&path, policy(false, 2)).unwrap();
        writer.write_all(b"next\n").unwrap();

        assert_eq!(writer.backups().unwrap().len(), 1);
        assert_eq!(fs::read_to_string(&path).unwrap(), "next\n");
    }

    #[test]
    fn recognizes_only_timestamped_names() {
        let stamp = "2024-05-01T10-20-30.123";
        assert!(backup_time(&format!("app-{}.log", stamp), "app", ".log").is_some());
        assert!(backup_time(&format!("app-{}-2.log", stamp), "app", ".log").is_some());
        assert!(backup_time(&format!("app-{}.log.gz", stamp), "app", ".log").is_some());
        assert!(backup_time(&format!("app-{}", stamp), "app", "").is_some());

        assert!(backup_time("app.log", "app", ".log").is_none());
        assert!(backup_time("app-server.log", "app", ".log").is_none());
        assert!(backup_time("app-server.log.gz", "app", ".log").is_none());
        assert!(backup_time(&format!("app-{}-.log", stamp), "app", ".log").is_none());
        assert!(backup_time(&format!("app-{}-x1.log", stamp), "app", ".log").is_none());
        assert!(backup_time(&format!("other-{}.log", stamp), "app", ".log").is_none());
        assert!(backup_time("app-2024-13-01T10-20-30.123.log", "app", ".log").is_none());
    }

    #[test]
    fn pruning_leaves_unrelated_siblings_alone() {
        let dir = tempfile::tempdir().unwrap();
        let sibling = dir.path().join("app-server.log");
        let archive = dir.path().join("app-server.log.gz");
        fs::write(&sibling, "other service\n").unwrap();
        fs::write(&archive, "not gzip").unwrap();

        let mut writer = RotatingWriter::open(dir.path().join("app.log"), policy(false, 1)).unwrap();
        fill(&mut writer, 250);

        assert!(sibling.exists());
        assert!(archive.exists());
        assert_eq!(fs::read_to_string(&sibling).unwrap(), "other service\n");

        let backups = writer.backups().unwrap();
        assert_eq!(backups.len(), 1);
        assert!(!backups.contains(&sibling));
    }

    #[test]
    fn prunes_backups_past_max_age() {
        let dir = tempfile::tempdir().unwrap();
        let mut writer = RotatingWriter::open(dir.path().join("app.log"), policy(false, 3)).unwrap();
        fill(&mut writer, 110);

        let stale = writer.backups().unwrap();
        assert_eq!(stale.len(), 1);
        File::options()
            .write(true)
            .open(&stale[0])
            .unwrap()
            .set_modified(SystemTime::now() - 2 * DAY)
            .unwrap();

        // One more rotation runs the pruning pass.
        fill(&mut writer, 100);

        let backups = writer.backups().unwrap();
        assert_eq!(backups.len(), 1);
        assert!(!stale[0].exists());
        assert_ne!(backups[0], stale[0]);
    }

    #[test]
    fn oversized_record_lands_whole_in_a_fresh_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("app.log");
        let mut writer = RotatingWriter::open(&path, policy(false, 2)).unwrap();
        writer.write_all(b"small\n").unwrap();

        let record = vec![b'B'; 2 * MEGABYTE as usize];
        writer.write_all(&record).unwrap();

        assert_eq!(writer.backups().unwrap().len(), 1);
        assert_eq!(fs::metadata(&path).unwrap().len(), record.len() as u64);

        writer.write_all(b"after\n").unwrap();
        assert_eq!(writer.backups().unwrap().len(), 2);
        assert_eq!(fs::read_to_string(&path).unwrap(), "after\n");
    }
}
