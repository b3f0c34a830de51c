use std::fs;
use std::path::{Path, PathBuf};

const BOM: char = '\u{FEFF}';

#[derive(Debug, thiserror::Error)]
pub enum IoError {
    #[error("File not found: {0}")]
    NotFound(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid corpus directory: {0}")]
    InvalidCorpusDir(String),
}

/// Read an XML file as UTF-8, without a leading byte order mark.
///
/// Offsets reported by the renderer are relative to the returned string.
pub fn read_xml_file(path: &Path) -> Result<String, IoError> {
    if !path.exists() {
        return Err(IoError::NotFound(path.to_path_buf()));
    }
    let mut content = fs::read_to_string(path).map_err(IoError::Io)?;
    if content.starts_with(BOM) {
        content.drain(..BOM.len_utf8());
    }
    log::debug!("read {} ({} bytes)", path.display(), content.len());
    Ok(content)
}

/// Collect the XML volume files under a corpus root, sorted by path.
///
/// Hidden directories (a `.git` checkout of the corpus, editor state) are
/// not descended into.
pub fn scan_xml_files(corpus_root: &Path) -> Result<Vec<PathBuf>, IoError> {
    validate_corpus_dir(corpus_root)?;

    let mut files = Vec::new();
    collect_xml_files(corpus_root, &mut files)?;
    files.sort();
    log::debug!(
        "found {} XML files under {}",
        files.len(),
        corpus_root.display()
    );
    Ok(files)
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.starts_with('.'))
}

fn collect_xml_files(dir: &Path, files: &mut Vec<PathBuf>) -> Result<(), IoError> {
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            if !is_hidden(&path) {
                collect_xml_files(&path, files)?;
            }
        } else if path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("xml"))
        {
            files.push(path);
        }
    }
    Ok(())
}

/// Check that `path` can serve as a corpus root.
pub fn validate_corpus_dir(path: &Path) -> Result<(), IoError> {
    if !path.exists() {
        return Err(IoError::InvalidCorpusDir(format!(
            "{} does not exist",
            path.display()
        )));
    }
    if !path.is_dir() {
        return Err(IoError::InvalidCorpusDir(format!(
            "{} is not a directory",
            path.display()
        )));
    }
    Ok(())
}
