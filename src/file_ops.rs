//! Single-file operations exposed next to the index.
//!
//! None of these read or write the project index; an index built before an
//! edit keeps describing the old state until the next analyze.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{DevMindError, Result};

/// Write `content` to `path`, creating missing parent directories.
/// Returns the number of bytes written.
pub fn create_file(path: &Path, content: &str) -> Result<usize> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| DevMindError::file_op("create directory", parent, e))?;
    }
    fs::write(path, content).map_err(|e| DevMindError::file_op("create", path, e))?;
    debug!("Created {}", path.display());
    Ok(content.len())
}

pub fn delete_file(path: &Path) -> Result<()> {
    if path.is_dir() {
        return Err(DevMindError::InvalidInput(format!(
            "{} is a directory, not a file",
            path.display()
        )));
    }
    fs::remove_file(path).map_err(|e| DevMindError::file_op("delete", path, e))?;
    debug!("Deleted {}", path.display());
    Ok(())
}

/// Move `source` to `destination`. If `destination` is an existing directory
/// the file keeps its name inside it.
pub fn move_file(source: &Path, destination: &Path) -> Result<PathBuf> {
    if !source.exists() {
        return Err(DevMindError::file_op(
            "move",
            source,
            std::io::Error::new(std::io::ErrorKind::NotFound, "source does not exist"),
        ));
    }

    let target = match (destination.is_dir(), source.file_name()) {
        (true, Some(name)) => destination.join(name),
        _ => destination.to_path_buf(),
    };

    if let Some(parent) = target.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| DevMindError::file_op("create directory", parent, e))?;
    }
    fs::rename(source, &target).map_err(|e| DevMindError::file_op("move", source, e))?;
    debug!("Moved {} to {}", source.display(), target.display());
    Ok(target)
}

/// Rename a file within its own directory.
pub fn rename_file(path: &Path, new_name: &str) -> Result<PathBuf> {
    if new_name.is_empty() || new_name.contains(['/', '\\']) {
        return Err(DevMindError::InvalidInput(format!(
            "new name must be a bare file name, got {:?}",
            new_name
        )));
    }
    let target = path.with_file_name(new_name);
    fs::rename(path, &target).map_err(|e| DevMindError::file_op("rename", path, e))?;
    Ok(target)
}

/// Append `content` to an existing file. Returns the number of bytes appended.
pub fn append_to_file(path: &Path, content: &str) -> Result<usize> {
    let mut file = OpenOptions::new()
        .append(true)
        .open(path)
        .map_err(|e| DevMindError::file_op("open", path, e))?;
    file.write_all(content.as_bytes())
        .map_err(|e| DevMindError::file_op("append to", path, e))?;
    Ok(content.len())
}

/// Replace `old_text` with `new_text`, either the first or every occurrence.
/// Returns how many occurrences were replaced.
pub fn replace_in_file(path: &Path, old_text: &str, new_text: &str, replace_all: bool) -> Result<usize> {
    if old_text.is_empty() {
        return Err(DevMindError::InvalidInput("old_text must not be empty".to_string()));
    }

    let content = read_text(path)?;
    let found = content.matches(old_text).count();
    if found == 0 {
        return Ok(0);
    }

    let (updated, replaced) = if replace_all {
        (content.replace(old_text, new_text), found)
    } else {
        (content.replacen(old_text, new_text, 1), 1)
    };
    fs::write(path, updated).map_err(|e| DevMindError::file_op("write", path, e))?;
    Ok(replaced)
}

/// Replace the 1-based line `line_number` with `new_line`, keeping the file's
/// line endings and trailing newline.
pub fn edit_line(path: &Path, line_number: usize, new_line: &str) -> Result<()> {
    let content = read_text(path)?;
    let mut lines: Vec<&str> = content.split_inclusive('\n').collect();

    let index = line_number
        .checked_sub(1)
        .filter(|&i| i < lines.len())
        .ok_or_else(|| {
            DevMindError::InvalidInput(format!(
                "line {} is out of range, file has {} lines",
                line_number,
                lines.len()
            ))
        })?;

    let ending = if lines[index].ends_with("\r\n") {
        "\r\n"
    } else if lines[index].ends_with('\n') {
        "\n"
    } else {
        ""
    };
    let replacement = format!("{}{}", new_line, ending);
    lines[index] = &replacement;

    fs::write(path, lines.concat()).map_err(|e| DevMindError::file_op("write", path, e))
}

fn read_text(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|source| DevMindError::ReadError {
        path: path.to_path_buf(),
        source,
    })
}
