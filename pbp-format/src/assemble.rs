use std::fs;
use std::io;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;

/// The first line of a file which lists other files instead of containing proof steps.
pub const META_MARKER: &str = "*META";

/// The errors that can be encountered when assembling a proof from its parts.
#[derive(Debug, thiserror::Error)]
pub enum AssembleError {
    #[error("failed to access {path}: {source}")]
    Io { path: PathBuf, source: io::Error },

    #[error("the meta file {0} includes itself")]
    Cycle(PathBuf),
}

/// Concatenate a proof into `sink`.
///
/// If the first line of `source` is [`META_MARKER`], every following non-empty line that is not a
/// comment names a file (relative to the directory of `source`) which is assembled in turn, in the
/// order of listing. Otherwise the contents of `source` are copied verbatim.
pub fn assemble(source: &Path, sink: &mut impl Write) -> Result<(), AssembleError> {
    let mut stack = Vec::new();
    assemble_into(source, sink, &mut stack)
}

fn assemble_into(
    source: &Path,
    sink: &mut impl Write,
    stack: &mut Vec<PathBuf>,
) -> Result<(), AssembleError> {
    if stack.iter().any(|visited| visited == source) {
        return Err(AssembleError::Cycle(source.to_path_buf()));
    }

    let io_error = |error| AssembleError::Io {
        path: source.to_path_buf(),
        source: error,
    };

    let contents = fs::read_to_string(source).map_err(io_error)?;

    let mut lines = contents.lines();
    if lines.next().map(str::trim) == Some(META_MARKER) {
        let directory = source.parent().unwrap_or(Path::new("."));

        stack.push(source.to_path_buf());
        for line in lines.map(str::trim) {
            if line.is_empty() || line.starts_with('*') {
                continue;
            }

            assemble_into(&directory.join(line), sink, stack)?;
        }
        let _ = stack.pop();

        return Ok(());
    }

    sink.write_all(contents.as_bytes()).map_err(io_error)?;
    if !contents.is_empty() && !contents.ends_with('\n') {
        sink.write_all(b"\n").map_err(io_error)?;
    }

    Ok(())
}
