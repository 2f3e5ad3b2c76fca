//! File search for the batch and retrain file pickers.
//!
//! Walks the working directory with the `ignore` crate (so `.gitignore`d
//! and hidden entries are skipped) and ranks paths with `nucleo-matcher`.
//! Delimited-text files are what the service accepts, so they rank above
//! everything else.

use ignore::WalkBuilder;
use nucleo_matcher::pattern::{Atom, AtomKind, CaseMatching, Normalization};
use nucleo_matcher::{Config, Matcher, Utf32Str};
use std::path::{Path, PathBuf};

/// Maximum number of file matches to return.
pub const MAX_FILE_MATCHES: usize = 8;

/// Score boost applied to delimited-text files.
const DATA_FILE_SCORE_BOOST: u32 = 50;

/// Extensions treated as delimited-text data files.
pub const DATA_EXTENSIONS: &[&str] = &["csv", "tsv", "txt"];

/// A single file match from a search operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileMatch {
    /// The relative path from the working directory.
    pub path: PathBuf,
    /// The fuzzy match score (higher is better).
    pub score: u32,
    /// Whether the file has one of [`DATA_EXTENSIONS`].
    pub is_data: bool,
}

/// Result of a file search operation.
#[derive(Debug, Clone, Default)]
pub struct SearchResult {
    /// Matching files, best matches first.
    pub matches: Vec<FileMatch>,
    /// Number of directories that could not be accessed.
    pub inaccessible_dirs: usize,
    /// True if any errors occurred during the search.
    pub had_errors: bool,
}

/// Returns true if `path` has a delimited-text extension (case-insensitive).
#[must_use]
pub fn is_data_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            DATA_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
}

/// Searches for files under `working_dir` matching `query`.
///
/// An empty query lists data files first, then everything else, each group
/// in path order. At most [`MAX_FILE_MATCHES`] results are returned.
#[must_use]
pub fn search_files(query: &str, working_dir: &Path) -> SearchResult {
    let mut result = SearchResult::default();

    let walker = WalkBuilder::new(working_dir)
        .hidden(true)
        .git_ignore(true)
        .git_global(true)
        .git_exclude(true)
        .follow_links(true)
        .add_custom_ignore_filename(".gitignore") // Also honoured outside git repos
        .build();

    let mut files: Vec<PathBuf> = Vec::new();
    for entry_result in walker {
        match entry_result {
            Ok(entry) => {
                if !entry.file_type().is_some_and(|ft| ft.is_file()) {
                    continue;
                }
                if let Ok(relative_path) = entry.path().strip_prefix(working_dir) {
                    files.push(relative_path.to_path_buf());
                }
            }
            Err(e) => {
                result.had_errors = true;
                if let Some(io_error) = e.io_error()
                    && io_error.kind() == std::io::ErrorKind::PermissionDenied
                {
                    result.inaccessible_dirs += 1;
                }
            }
        }
    }

    if query.is_empty() {
        let mut matches: Vec<FileMatch> = files
            .into_iter()
            .map(|path| FileMatch {
                is_data: is_data_file(&path),
                path,
                score: 0,
            })
            .collect();
        matches.sort_by(|a, b| b.is_data.cmp(&a.is_data).then_with(|| a.path.cmp(&b.path)));
        matches.truncate(MAX_FILE_MATCHES);
        result.matches = matches;
        return result;
    }

    let mut fuzzy_matcher = Matcher::new(Config::DEFAULT.match_paths());
    let atom = Atom::new(
        query,
        CaseMatching::Ignore,
        Normalization::Smart,
        AtomKind::Fuzzy,
        false,
    );

    let mut matches: Vec<FileMatch> = Vec::new();
    let mut haystack_buf = Vec::new();
    for path in files {
        let path_str = path.to_string_lossy().into_owned();
        let haystack = Utf32Str::new(&path_str, &mut haystack_buf);
        if let Some(score) = atom.score(haystack, &mut fuzzy_matcher) {
            let is_data = is_data_file(&path);
            let score = if is_data {
                u32::from(score).saturating_add(DATA_FILE_SCORE_BOOST)
            } else {
                u32::from(score)
            };
            matches.push(FileMatch {
                path,
                score,
                is_data,
            });
        }
    }

    matches.sort_by(|a, b| b.score.cmp(&a.score).then_with(|| a.path.cmp(&b.path)));
    matches.truncate(MAX_FILE_MATCHES);
    result.matches = matches;
    result
}
