//! Per-packet filename generation.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, TimeZone};
use rand::Rng;

/// `YYYYMMDDHHMMSS`, 14 characters.
const TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S";

/// Number of distinct disambiguator values (`000`..=`999`).
const SUFFIX_SPACE: u16 = 1000;

/// Generates `<dir>/<timestamp><suffix>.<ext>` paths.
///
/// The three-digit suffix starts at a random value drawn once per generator
/// and advances by one on every call, so up to 1000 names generated within
/// the same second are distinct.
#[derive(Debug)]
pub struct FilenameGenerator {
    dir: PathBuf,
    extension: String,
    next_suffix: u16,
}

impl FilenameGenerator {
    /// Create a generator with a randomly chosen starting suffix.
    pub fn new(dir: impl Into<PathBuf>, extension: impl Into<String>) -> Self {
        let start = rand::rng().random_range(0..SUFFIX_SPACE);
        Self::with_start_suffix(dir, extension, start)
    }

    /// Create a generator whose first suffix is `start` (taken modulo 1000).
    pub fn with_start_suffix(
        dir: impl Into<PathBuf>,
        extension: impl Into<String>,
        start: u16,
    ) -> Self {
        Self {
            dir: dir.into(),
            extension: extension.into(),
            next_suffix: start % SUFFIX_SPACE,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Generate a path stamped with the current local time.
    pub fn generate(&mut self) -> PathBuf {
        self.generate_at(&Local::now())
    }

    /// Generate a path stamped with `now`.
    pub fn generate_at<Tz>(&mut self, now: &DateTime<Tz>) -> PathBuf
    where
        Tz: TimeZone,
        Tz::Offset: std::fmt::Display,
    {
        let suffix = self.next_suffix;
        self.next_suffix = (self.next_suffix + 1) % SUFFIX_SPACE;

        let name = format!(
            "{}{:03}.{}",
            now.format(TIMESTAMP_FORMAT),
            suffix,
            self.extension
        );
        self.dir.join(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::collections::HashSet;

    /// Split a generated file name into (timestamp, suffix, extension).
    fn parts(path: &Path) -> (String, String, String) {
        let name = path.file_name().unwrap().to_str().unwrap();
        let (stem, ext) = name.rsplit_once('.').unwrap();
        assert_eq!(stem.len(), 17, "unexpected stem {stem}");
        assert!(stem.chars().all(|c| c.is_ascii_digit()));
        (stem[..14].to_string(), stem[14..].to_string(), ext.to_string())
    }

    #[test]
    fn test_pattern() {
        let mut generator = FilenameGenerator::new("./packets", "bin");
        let path = generator.generate();

        assert_eq!(path.parent(), Some(Path::new("./packets")));
        let (timestamp, suffix, ext) = parts(&path);
        assert_eq!(timestamp.len(), 14);
        assert_eq!(suffix.len(), 3);
        assert_eq!(ext, "bin");
    }

    #[test]
    fn test_fixed_time() {
        let now = Utc.with_ymd_and_hms(2024, 3, 9, 7, 5, 1).unwrap();
        let mut generator = FilenameGenerator::with_start_suffix("/tmp/out", "bin", 7);

        assert_eq!(
            generator.generate_at(&now),
            PathBuf::from("/tmp/out/20240309070501007.bin")
        );
        assert_eq!(
            generator.generate_at(&now),
            PathBuf::from("/tmp/out/20240309070501008.bin")
        );
    }

    #[test]
    fn test_suffix_wraps() {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let mut generator = FilenameGenerator::with_start_suffix("d", "bin", 999);

        let (_, first, _) = parts(&generator.generate_at(&now));
        let (_, second, _) = parts(&generator.generate_at(&now));
        assert_eq!(first, "999");
        assert_eq!(second, "000");
    }

    #[test]
    fn test_unique_within_one_second() {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
        let mut generator = FilenameGenerator::new("d", "bin");

        let names: HashSet<PathBuf> = (0..1000).map(|_| generator.generate_at(&now)).collect();
        assert_eq!(names.len(), 1000);
    }

    #[test]
    fn test_timestamps_non_decreasing() {
        let mut generator = FilenameGenerator::new("d", "bin");
        let mut previous = String::new();

        for _ in 0..50 {
            let (timestamp, _, _) = parts(&generator.generate());
            assert!(timestamp >= previous);
            previous = timestamp;
        }
    }
}
