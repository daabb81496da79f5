//! Auto-incrementing filename allocation

use super::PathProbe;
use std::path::{Path, PathBuf};

/// File name for counter value `counter`, e.g. `qrcode_3.png`
pub fn file_name(base_name: &str, counter: u64, extension: &str) -> String {
    let extension = extension.trim_start_matches('.');
    if extension.is_empty() {
        format!("{base_name}{counter}")
    } else {
        format!("{base_name}{counter}.{extension}")
    }
}

/// Candidate path `dir/{base_name}{counter}.{extension}`
pub fn candidate_path(dir: &Path, base_name: &str, counter: u64, extension: &str) -> PathBuf {
    dir.join(file_name(base_name, counter, extension))
}

/// First `dir/{base_name}{N}.{extension}` (N = 1, 2, ...) that does not exist.
///
/// Scans sequentially from 1 and stops at the first free slot, so gaps
/// below the highest taken number are reused. Not safe against other
/// processes writing into `dir` between the check and the write.
pub fn next_available_path(
    probe: &impl PathProbe,
    dir: &Path,
    base_name: &str,
    extension: &str,
) -> PathBuf {
    let mut counter: u64 = 1;
    loop {
        let candidate = candidate_path(dir, base_name, counter, extension);
        if !probe.exists(&candidate) {
            tracing::trace!(counter, path = %candidate.display(), "Allocated filename");
            return candidate;
        }
        counter += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;
    use std::collections::HashSet;

    fn taken(paths: &[&str]) -> HashSet<PathBuf> {
        paths.iter().map(PathBuf::from).collect()
    }

    #[test]
    fn test_empty_directory_starts_at_one() {
        let existing = taken(&[]);
        let path = next_available_path(
            &|p: &Path| existing.contains(p),
            Path::new("/qr"),
            "qrcode_",
            "png",
        );
        assert!(path.ends_with("qrcode_1.png"));
    }

    #[test]
    fn test_continues_after_contiguous_run() {
        let existing = taken(&["/qr/output1.png", "/qr/output2.png"]);
        let path = next_available_path(
            &|p: &Path| existing.contains(p),
            Path::new("/qr"),
            "output",
            "png",
        );
        assert_eq!(path, PathBuf::from("/qr/output3.png"));
    }

    #[test]
    fn test_fills_first_gap() {
        let existing = taken(&["/qr/output2.png", "/qr/output3.png"]);
        let path = next_available_path(
            &|p: &Path| existing.contains(p),
            Path::new("/qr"),
            "output",
            "png",
        );
        assert_eq!(path, PathBuf::from("/qr/output1.png"));
    }

    #[test]
    fn test_other_extensions_do_not_collide() {
        let existing = taken(&["/qr/qrcode_1.jpg", "/qr/qrcode_1"]);
        let path = next_available_path(
            &|p: &Path| existing.contains(p),
            Path::new("/qr"),
            "qrcode_",
            "png",
        );
        assert_eq!(path, PathBuf::from("/qr/qrcode_1.png"));
    }

    #[test]
    fn test_sequence_of_saves_counts_up() {
        let existing = RefCell::new(HashSet::new());
        let probe = |p: &Path| existing.borrow().contains(p);

        for expected in 1..=25u64 {
            let path = next_available_path(&probe, Path::new("/qr"), "qrcode_", "png");
            assert_eq!(path, candidate_path(Path::new("/qr"), "qrcode_", expected, "png"));
            assert!(!probe(&path));
            existing.borrow_mut().insert(path);
        }
    }

    #[test]
    fn test_real_directory_probe() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("qrcode_1.png"), b"x").unwrap();
        std::fs::create_dir(dir.path().join("qrcode_2.png")).unwrap();

        let path = next_available_path(
            &|p: &Path| p.exists(),
            dir.path(),
            "qrcode_",
            "png",
        );
        assert_eq!(path, dir.path().join("qrcode_3.png"));
    }

    #[test]
    fn test_file_name_formats() {
        assert_eq!(file_name("qrcode_", 12, "png"), "qrcode_12.png");
        assert_eq!(file_name("output", 1, ".jpg"), "output1.jpg");
        assert_eq!(file_name("raw", 4, ""), "raw4");
    }
}
