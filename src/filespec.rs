//! Functions to read and write text files. Allows use of "-" as a way to
//! specify stdin or stdout.

use std::fmt;
use std::fs::File;
use std::io::{stdin, stdout, ErrorKind, Read, Write};
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Error, Result};
use encoding_rs_io::DecodeReaderBytesBuilder;

/// Specifies a file to read from to write to (depending on context).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FileSpec {
    /// Read from stdin or write to stdout.
    Stdio,
    /// Read from or write to the file at the given path.
    Path(PathBuf),
}

impl fmt::Display for FileSpec {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        use FileSpec::*;
        match self {
            Stdio => f.write_str("<stdio>"),
            Path(path) => write!(f, "{:?}", path),
        }
    }
}

impl FileSpec {
    pub fn reader(&self) -> Result<Box<dyn Read>> {
        use FileSpec::*;
        Ok(match self {
            Stdio => Box::new(stdin()),
            Path(path) => Box::new(
                File::open(path).with_context(|| format!("opening {:?} for reading", path))?,
            ),
        })
    }

    /// Like `reader`, but a file that does not exist is `Ok(None)` rather
    /// than an error.
    fn optional_reader(&self) -> Result<Option<Box<dyn Read>>> {
        use FileSpec::*;
        match self {
            Stdio => Ok(Some(Box::new(stdin()))),
            Path(path) => match File::open(path) {
                Ok(f) => Ok(Some(Box::new(f))),
                Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
                Err(e) => {
                    Err(Error::new(e).context(format!("opening {:?} for reading", path)))
                }
            },
        }
    }
}

impl FromStr for FileSpec {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        use FileSpec::*;
        if s == "-" {
            Ok(Stdio)
        } else {
            Ok(Path(s.into()))
        }
    }
}

fn decode_to_string(reader: Box<dyn Read>, file_spec: &FileSpec) -> Result<String> {
    // Pages saved by some browsers start with a BOM, possibly for UTF-16.
    let mut decoder = DecodeReaderBytesBuilder::new()
        .strip_bom(true)
        .build(reader);
    let mut content = String::new();
    decoder
        .read_to_string(&mut content)
        .with_context(|| format!("reading {}", file_spec))?;
    Ok(content)
}

/// Reads the whole file, returning `Ok(None)` if it does not exist.
pub fn read_optional_file(file_spec: &FileSpec) -> Result<Option<String>> {
    file_spec
        .optional_reader()?
        .map(|reader| decode_to_string(reader, file_spec))
        .transpose()
}

/// Calls `write_content` with a writer for the file. A file on disk is only
/// replaced once `write_content` has returned successfully.
pub fn write_with<F>(file_spec: &FileSpec, write_content: F) -> Result<()>
where
    F: FnOnce(&mut dyn Write) -> Result<()>,
{
    use FileSpec::*;
    match file_spec {
        Stdio => {
            let mut out = stdout().lock();
            write_content(&mut out)?;
            out.flush()?;
        }
        Path(path) => {
            let dir = match path.parent() {
                Some(parent) if !parent.as_os_str().is_empty() => parent,
                _ => std::path::Path::new("."),
            };
            // A replaced file keeps its permissions, a new one gets the same
            // as `File::create` would give it.
            let existing = std::fs::metadata(path).ok().map(|m| m.permissions());
            let mut builder = tempfile::Builder::new();
            if existing.is_none() {
                creation_permissions(&mut builder);
            }
            let mut tmp = builder
                .tempfile_in(dir)
                .with_context(|| format!("creating temporary file in {:?}", dir))?;
            if let Some(permissions) = existing {
                tmp.as_file()
                    .set_permissions(permissions)
                    .with_context(|| format!("setting permissions for {:?}", path))?;
            }
            write_content(tmp.as_file_mut())?;
            tmp.as_file_mut().flush()?;
            tmp.persist(path)
                .with_context(|| format!("opening {:?} for writing", path))?;
        }
    }
    Ok(())
}

/// Temporary files are otherwise created readable by the owner only.
#[cfg(unix)]
fn creation_permissions(builder: &mut tempfile::Builder<'_, '_>) {
    use std::os::unix::fs::PermissionsExt;
    // Subject to the umask, as for `File::create`.
    builder.permissions(std::fs::Permissions::from_mode(0o666));
}

#[cfg(not(unix))]
fn creation_permissions(_builder: &mut tempfile::Builder<'_, '_>) {}
