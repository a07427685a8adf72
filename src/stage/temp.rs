//! Unique staging-file names.
//! Always a sibling of the final path so the eventual rename stays within
//! one directory on one filesystem.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

static COUNTER: AtomicU64 = AtomicU64::new(0);

/// Hidden sibling name for one creation attempt.
/// Pattern: .<name>.<pid>.<nanos>.<seq>.stage
pub(super) fn staging_sibling(target: &Path) -> PathBuf {
    let pid = std::process::id();
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or(0);
    let seq = COUNTER.fetch_add(1, Ordering::Relaxed);
    let name = target
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "stage".into());
    let tmp = format!(".{name}.{pid}.{nanos}.{seq}.stage");
    target.parent().unwrap_or_else(|| Path::new(".")).join(tmp)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::thread;

    #[test]
    fn uniqueness_concurrent() {
        let target = Path::new("table.idx");
        let mut handles = Vec::new();
        for _ in 0..32 {
            let t = target.to_path_buf();
            handles.push(thread::spawn(move || staging_sibling(&t)));
        }
        let mut set = HashSet::new();
        for h in handles {
            let p = h.join().unwrap();
            assert!(set.insert(p));
        }
        assert_eq!(set.len(), 32);
    }

    #[test]
    fn sibling_stays_in_target_directory() {
        let p = staging_sibling(Path::new("/var/lib/app/table.idx"));
        assert_eq!(p.parent().unwrap(), Path::new("/var/lib/app"));
        let name = p.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with(".table.idx."));
        assert!(name.ends_with(".stage"));
    }
}
