//! Where the three embedded documents come from: a generated report page, or the
//! standalone JSON files the job writes next to it.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use csvqr_model::{BlockIds, DocumentSource};
use hashbrown::HashMap;

#[derive(Debug)]
pub struct LoadError {
    pub path: PathBuf,
    pub source: io::Error,
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cannot read {}: {}", self.path.display(), self.source)
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}

fn read(path: &Path) -> Result<String, LoadError> {
    fs::read_to_string(path).map_err(|source| LoadError {
        path: path.to_path_buf(),
        source,
    })
}

/// Raw text of each block, keyed by element id.
#[derive(Clone, Debug, Default)]
pub struct PageBlocks {
    blocks: HashMap<String, String>,
}

impl PageBlocks {
    /// Pulls the text of the elements named in `ids` out of a report page.
    pub fn from_html(html: &str, ids: &BlockIds) -> Self {
        let mut blocks = HashMap::new();
        for id in [&ids.run, &ids.profile, &ids.dag] {
            match element_text(html, id) {
                Some(text) => {
                    blocks.insert(id.clone(), text.to_string());
                }
                None => log::debug!(target: "decode", "page has no #{} element", id),
            }
        }
        Self { blocks }
    }

    pub fn load_html(path: &Path, ids: &BlockIds) -> Result<Self, LoadError> {
        let html = read(path)?;
        Ok(Self::from_html(&html, ids))
    }

    /// Reads whichever document files were given; the rest stay absent.
    pub fn load_files(
        run: Option<&Path>,
        profile: Option<&Path>,
        dag: Option<&Path>,
        ids: &BlockIds,
    ) -> Result<Self, LoadError> {
        let mut blocks = HashMap::new();
        for (id, path) in [(&ids.run, run), (&ids.profile, profile), (&ids.dag, dag)] {
            if let Some(path) = path {
                blocks.insert(id.clone(), read(path)?);
            }
        }
        Ok(Self { blocks })
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

impl DocumentSource for PageBlocks {
    fn raw_block(&self, id: &str) -> Option<String> {
        self.blocks.get(id).cloned()
    }
}

/// Text content of the first element whose `id` attribute equals `id`, up to the next
/// closing tag.
pub fn element_text<'a>(html: &'a str, id: &str) -> Option<&'a str> {
    for quote in ['"', '\''] {
        let needle = format!("id={quote}{id}{quote}");
        let mut from = 0;
        while let Some(rel) = html[from..].find(&needle) {
            let at = from + rel;
            from = at + needle.len();
            // attribute boundary, so `data-id="x"` does not count
            if !html[..at].ends_with(|c: char| c.is_ascii_whitespace()) {
                continue;
            }
            let Some(open) = html[..at].rfind('<') else {
                continue;
            };
            if html[open..at].contains('>') {
                continue;
            }
            let Some(close) = html[from..].find('>') else {
                continue;
            };
            let body_start = from + close + 1;
            let Some(len) = html[body_start..].find("</") else {
                continue;
            };
            return Some(&html[body_start..body_start + len]);
        }
    }
    None
}
