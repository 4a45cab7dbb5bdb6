use std::cell::RefCell;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Storage seam for one record file. Each store owns exactly one backing;
/// no locking — the caller guarantees a single writer per file.
pub trait Backing {
    /// Whole-file contents, or `None` if the file does not exist yet.
    fn read(&self) -> io::Result<Option<String>>;
    /// Replace the whole file.
    fn write(&self, contents: &str) -> io::Result<()>;
    /// Add one record line at the end.
    fn append(&self, line: &str) -> io::Result<()>;
}

/// Flat file on disk. Rewrites go through a sibling temp file and a rename,
/// so a crash mid-write leaves the previous snapshot intact.
#[derive(Debug, Clone)]
pub struct FileBacking {
    path: PathBuf,
}

impl FileBacking {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn ensure_parent(&self) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }
        Ok(())
    }
}

impl Backing for FileBacking {
    fn read(&self) -> io::Result<Option<String>> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn write(&self, contents: &str) -> io::Result<()> {
        self.ensure_parent()?;
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, contents)?;
        fs::rename(&tmp, &self.path)
    }

    fn append(&self, line: &str) -> io::Result<()> {
        use std::io::Write as _;

        self.ensure_parent()?;
        let mut file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{}", line)
    }
}

/// In-memory backing, so tests and embedders can run a store without
/// touching disk. Same record format as the file backing.
#[derive(Debug, Default)]
pub struct MemBacking {
    contents: RefCell<Option<String>>,
}

impl MemBacking {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Backing for MemBacking {
    fn read(&self) -> io::Result<Option<String>> {
        Ok(self.contents.borrow().clone())
    }

    fn write(&self, contents: &str) -> io::Result<()> {
        *self.contents.borrow_mut() = Some(contents.to_string());
        Ok(())
    }

    fn append(&self, line: &str) -> io::Result<()> {
        let mut contents = self.contents.borrow_mut();
        let buf = contents.get_or_insert_with(String::new);
        buf.push_str(line);
        buf.push('\n');
        Ok(())
    }
}
