use std::ffi::OsString;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

const TEMP_SUFFIX: &str = ".tmp";
const TEMP_ATTEMPTS: u32 = 64;

static NEXT_TEMP: AtomicU64 = AtomicU64::new(0);

/// Reads a whole file into memory.
pub fn read_all(path: &Path) -> io::Result<Vec<u8>> {
    fs::read(path)
}

/// Data written to a fresh temporary sibling of `dest`, waiting to be
/// renamed over it. Dropped without `commit`, the temporary is removed.
#[derive(Debug)]
pub struct StagedFile {
    temp: PathBuf,
    dest: PathBuf,
    committed: bool,
}

impl StagedFile {
    /// Writes `data` next to `dest` under a name nothing else owns. The
    /// temporary is created with `create_new`, so an existing file is
    /// never opened for writing.
    pub fn stage(dest: &Path, data: &[u8]) -> io::Result<Self> {
        let (temp, mut file) = create_temp_sibling(dest)?;
        let staged = Self {
            temp,
            dest: dest.to_path_buf(),
            committed: false,
        };
        file.write_all(data)?;
        file.sync_all()?;
        Ok(staged)
    }

    pub fn temp_path(&self) -> &Path {
        &self.temp
    }

    pub fn commit(mut self) -> io::Result<()> {
        fs::rename(&self.temp, &self.dest)?;
        self.committed = true;
        Ok(())
    }
}

impl Drop for StagedFile {
    fn drop(&mut self) {
        if !self.committed {
            let _ = fs::remove_file(&self.temp);
        }
    }
}

fn create_temp_sibling(dest: &Path) -> io::Result<(PathBuf, File)> {
    for _ in 0..TEMP_ATTEMPTS {
        let temp = with_suffix(
            dest,
            &format!(
                ".{}.{}{}",
                std::process::id(),
                NEXT_TEMP.fetch_add(1, Ordering::Relaxed),
                TEMP_SUFFIX
            ),
        );
        match OpenOptions::new().write(true).create_new(true).open(&temp) {
            Ok(file) => return Ok((temp, file)),
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => continue,
            Err(e) => return Err(e),
        }
    }
    Err(io::Error::new(
        io::ErrorKind::AlreadyExists,
        format!("no free temporary name next to {}", dest.display()),
    ))
}

/// Writes through a temporary sibling and renames it into place.
pub fn write_atomic(path: &Path, data: &[u8]) -> io::Result<()> {
    StagedFile::stage(path, data)?.commit()
}

/// `path` with `suffix` appended to its final component.
pub fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name: OsString = path.as_os_str().to_owned();
    name.push(suffix);
    PathBuf::from(name)
}

/// Refuses to clobber an existing file unless `overwrite` is set.
pub fn ensure_writable(path: &Path, overwrite: bool) -> io::Result<()> {
    if !overwrite && path.exists() {
        return Err(io::Error::new(
            io::ErrorKind::AlreadyExists,
            format!("{} already exists", path.display()),
        ));
    }
    Ok(())
}
