//! Build the page hierarchy from a documentation directory.
//!
//! A directory is either one page with nested children, anchored by a root
//! page file (`index.htm[l]` or `@root.htm[l]`), or a flat list of sibling
//! pages under a synthetic container. A directory with several root pages,
//! or with subdirectories but no root page, is an authoring error.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::model::ContentPage;
use crate::util::ends_with_ignore_case;

/// File name suffixes that mark a directory's root page.
pub const ROOT_PAGE_SUFFIXES: [&str; 4] = ["index.htm", "index.html", "@root.htm", "@root.html"];

/// File name suffixes of page markup files.
pub const MARKUP_SUFFIXES: [&str; 2] = [".htm", ".html"];

/// Whether `name` marks a directory's root page.
pub fn is_root_page(name: &str) -> bool {
    ROOT_PAGE_SUFFIXES
        .iter()
        .any(|suffix| ends_with_ignore_case(name, suffix))
}

/// Whether `name` is a page markup file.
pub fn is_markup_file(name: &str) -> bool {
    MARKUP_SUFFIXES
        .iter()
        .any(|suffix| ends_with_ignore_case(name, suffix))
}

/// Build the unpopulated page tree for `dir`.
///
/// Pages come back without titles or zones; see
/// [`process_tree`](crate::process::process_tree).
pub fn build_tree(dir: &Path) -> Result<Vec<ContentPage>> {
    let listing = DirListing::read(dir)?;

    let candidates: Vec<&PathBuf> = listing
        .files
        .iter()
        .filter(|path| file_name(path).is_some_and(is_root_page))
        .collect();

    match candidates.as_slice() {
        [] => {
            if !listing.dirs.is_empty() {
                return Err(Error::MissingRootForSubdirectories {
                    dir: dir.to_path_buf(),
                });
            }

            let children = listing
                .files
                .iter()
                .filter(|path| file_name(path).is_some_and(is_markup_file))
                .map(|path| ContentPage::new(path.as_path()))
                .collect();
            debug!("{}: container page", dir.display());
            Ok(vec![ContentPage::new(dir).with_children(children)])
        }
        [root] => {
            let mut page = ContentPage::new(root.as_path());
            for sub in &listing.dirs {
                page.children.extend(build_tree(sub)?);
            }

            for sibling in listing.files.iter().filter(|path| {
                path != root && file_name(path).is_some_and(is_markup_file)
            }) {
                warn!(
                    "ignoring {}: directory has root page {}",
                    sibling.display(),
                    root.display()
                );
            }
            Ok(vec![page])
        }
        _ => Err(Error::AmbiguousRootPage {
            dir: dir.to_path_buf(),
            candidates: candidates.iter().map(|path| path.to_path_buf()).collect(),
        }),
    }
}

/// Immediate files and subdirectories of a directory, sorted by name.
///
/// Files whose names are not valid UTF-8 are skipped with a warning.
struct DirListing {
    files: Vec<PathBuf>,
    dirs: Vec<PathBuf>,
}

impl DirListing {
    fn read(dir: &Path) -> Result<Self> {
        let mut files = Vec::new();
        let mut dirs = Vec::new();
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if path.is_dir() {
                dirs.push(path);
            } else if file_name(&path).is_some() {
                files.push(path);
            } else {
                warn!("ignoring {}: file name is not valid UTF-8", path.display());
            }
        }
        files.sort();
        dirs.sort();
        Ok(Self { files, dirs })
    }
}

fn file_name(path: &Path) -> Option<&str> {
    path.file_name().and_then(|name| name.to_str())
}
