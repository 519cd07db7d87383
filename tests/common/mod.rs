//! Shared fixtures: a small journal of daily notes written to a temp dir

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use tempfile::TempDir;

pub const MARCH_01: &str = "\
# Friday
Work was busy.

## Health Log
**Foods:**
- 8am coffee
- oatmeal
**Symptoms:**
- 10am headache (mild)
Supplements: Magnesium 400mg

## Tasks
- buy coffee
";

pub const MARCH_02: &str = "\
## Health Log
- Drank coffee then headache
- walked 30 min
";

pub const MARCH_03: &str = "\
## Health Log
- Ate coffee and toast — nausea
";

pub const MARCH_04: &str = "\
# Saturday
No health notes today.
";

pub const MARCH_05: &str = "\
## Health Log
### Evening
";

/// A journal directory on disk.
pub struct Journal {
    dir: TempDir,
}

impl Journal {
    /// The standard five-day journal plus a non-daily note.
    pub fn standard() -> Self {
        let journal = Self::empty();
        journal.write("2024-03-01.md", MARCH_01);
        journal.write("2024-03-02.md", MARCH_02);
        journal.write("nested/2024-03-03.md", MARCH_03);
        journal.write("2024-03-04.md", MARCH_04);
        journal.write("2024-03-05.md", MARCH_05);
        journal.write("notes.md", "## Health Log\n- Ate cake — nausea\n");
        journal
    }

    pub fn empty() -> Self {
        Self {
            dir: tempfile::tempdir().expect("create temp dir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn write(&self, relative: &str, text: &str) -> PathBuf {
        let path = self.dir.path().join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create note dir");
        }
        std::fs::write(&path, text).expect("write note");
        path
    }

    /// Move a note's modification time forward without changing it.
    pub fn touch(&self, relative: &str) {
        let file = std::fs::File::options()
            .write(true)
            .open(self.dir.path().join(relative))
            .expect("open note");
        file.set_modified(SystemTime::now() + Duration::from_secs(3600))
            .expect("set mtime");
    }
}
