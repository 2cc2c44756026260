//! Installed font catalog (made by FontLab https://www.fontlab.com/)
//!
//! The catalog is the ground truth for which family names are valid. A
//! [`FontCatalog`] produces an [`InstalledCatalog`] snapshot; favorites are
//! reconciled against that snapshot, never against a live directory listing.

use std::collections::{BTreeSet, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{ensure, Context, Result};
use rayon::prelude::*;
use rayon::ThreadPoolBuilder;
use read_fonts::tables::name::NameId;
use read_fonts::{FontRef, TableProvider};
use regex::Regex;
use serde::{Deserialize, Serialize};
use walkdir::WalkDir;

use crate::export::read_font_list;

/// A font family name exactly as the host reports it.
pub type FontName = String;

/// Where one face of a family lives on disk.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FontFace {
    pub path: PathBuf,
    pub ttc_index: Option<u32>,
}

impl FontFace {
    /// Render the path, appending `#<index>` for TTC/OTC collections.
    pub fn path_with_index(&self) -> String {
        if let Some(idx) = self.ttc_index {
            format!("{}#{idx}", self.path.display())
        } else {
            self.path.display().to_string()
        }
    }
}

/// One family in the catalog with the faces backing it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FamilyEntry {
    pub name: FontName,
    #[serde(default)]
    pub faces: Vec<FontFace>,
}

impl FamilyEntry {
    pub fn new(name: impl Into<FontName>) -> Self {
        Self {
            name: name.into(),
            faces: Vec::new(),
        }
    }
}

/// Ordered, duplicate-free snapshot of the installed families.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InstalledCatalog {
    families: Vec<FamilyEntry>,
    index: HashMap<FontName, usize>,
}

impl InstalledCatalog {
    /// Build from bare names, keeping first occurrences and dropping empty names.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<FontName>,
    {
        Self::from_entries(names.into_iter().map(FamilyEntry::new))
    }

    /// Build from family entries; repeated names merge their faces into the first.
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = FamilyEntry>,
    {
        let mut catalog = Self::default();
        for entry in entries {
            if entry.name.is_empty() {
                continue;
            }
            match catalog.index.get(&entry.name) {
                Some(&pos) => {
                    let faces = &mut catalog.families[pos].faces;
                    faces.extend(entry.faces);
                    faces.sort();
                    faces.dedup();
                }
                None => {
                    catalog
                        .index
                        .insert(entry.name.clone(), catalog.families.len());
                    catalog.families.push(entry);
                }
            }
        }
        catalog
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn family(&self, name: &str) -> Option<&FamilyEntry> {
        self.index.get(name).map(|&pos| &self.families[pos])
    }

    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.families.iter().map(|f| f.name.as_str())
    }

    pub fn entries(&self) -> &[FamilyEntry] {
        &self.families
    }

    pub fn len(&self) -> usize {
        self.families.len()
    }

    pub fn is_empty(&self) -> bool {
        self.families.is_empty()
    }

    /// Families whose name matches at least one pattern; all families when no
    /// patterns are given.
    pub fn filter(&self, patterns: &[Regex]) -> Vec<&FamilyEntry> {
        self.families
            .iter()
            .filter(|f| patterns.is_empty() || patterns.iter().any(|re| re.is_match(&f.name)))
            .collect()
    }
}

/// Source of the installed family list.
pub trait FontCatalog {
    fn list_families(&self) -> Result<InstalledCatalog>;
}

impl<T: FontCatalog + ?Sized> FontCatalog for Box<T> {
    fn list_families(&self) -> Result<InstalledCatalog> {
        (**self).list_families()
    }
}

/// Catalog read from font files under a set of directories.
#[derive(Debug, Clone)]
pub struct PathCatalog {
    roots: Vec<PathBuf>,
    follow_symlinks: bool,
    jobs: Option<usize>,
}

impl PathCatalog {
    pub fn new<I, P>(roots: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            roots: roots.into_iter().map(Into::into).collect(),
            follow_symlinks: false,
            jobs: None,
        }
    }

    pub fn follow_symlinks(mut self, follow: bool) -> Self {
        self.follow_symlinks = follow;
        self
    }

    pub fn jobs(mut self, jobs: Option<usize>) -> Self {
        self.jobs = jobs;
        self
    }

    /// Font files under every root, sorted, each listed once even when
    /// roots overlap.
    fn font_files(&self) -> Result<Vec<PathBuf>> {
        let mut files = BTreeSet::new();
        for root in &self.roots {
            ensure!(root.exists(), "font root does not exist: {}", root.display());

            for entry in WalkDir::new(root).follow_links(self.follow_symlinks) {
                let entry = entry.with_context(|| format!("walking {}", root.display()))?;
                if entry.file_type().is_file() && has_font_extension(entry.path()) {
                    files.insert(entry.into_path());
                }
            }
        }

        log::debug!(
            "found {} font files under {} roots",
            files.len(),
            self.roots.len()
        );
        Ok(files.into_iter().collect())
    }
}

const FONT_EXTENSIONS: &[&str] = &["ttf", "otf", "ttc", "otc"];

fn has_font_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| FONT_EXTENSIONS.iter().any(|known| ext.eq_ignore_ascii_case(known)))
}

impl FontCatalog for PathCatalog {
    fn list_families(&self) -> Result<InstalledCatalog> {
        let files = self.font_files()?;

        let collect = || -> Vec<FamilyEntry> {
            files
                .par_iter()
                .flat_map_iter(|path| match load_families(path) {
                    Ok(entries) => entries,
                    Err(err) => {
                        log::warn!("skipping {}: {err:#}", path.display());
                        Vec::new()
                    }
                })
                .collect()
        };

        let mut entries = if let Some(jobs) = self.jobs {
            let pool = ThreadPoolBuilder::new().num_threads(jobs).build()?;
            pool.install(collect)
        } else {
            collect()
        };

        entries.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.faces.cmp(&b.faces)));
        let catalog = InstalledCatalog::from_entries(entries);
        log::debug!("catalog lists {} families", catalog.len());
        Ok(catalog)
    }
}

/// Catalog backed by a fixed list of names, e.g. a previously exported font list.
#[derive(Debug, Clone, Default)]
pub struct ListCatalog {
    names: Vec<FontName>,
}

impl ListCatalog {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<FontName>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading font list {}", path.display()))?;
        Ok(Self::new(read_font_list(&text)))
    }
}

impl FontCatalog for ListCatalog {
    fn list_families(&self) -> Result<InstalledCatalog> {
        Ok(InstalledCatalog::from_names(self.names.iter().cloned()))
    }
}

fn load_families(path: &Path) -> Result<Vec<FamilyEntry>> {
    let data = fs::read(path).with_context(|| format!("reading font {}", path.display()))?;
    let mut entries = Vec::new();

    for font in FontRef::fonts(&data) {
        let font = font?;
        let face = FontFace {
            path: path.to_path_buf(),
            ttc_index: font.ttc_index(),
        };
        let name = family_name(&font).unwrap_or_else(|| file_stem_name(path));
        entries.push(FamilyEntry {
            name,
            faces: vec![face],
        });
    }

    Ok(entries)
}

const ENGLISH_US: u16 = 0x0409;

fn family_name(font: &FontRef) -> Option<FontName> {
    let name_table = font.name().ok()?;
    let data = name_table.string_data();

    let records: Vec<(NameId, u16, String)> = name_table
        .name_record()
        .iter()
        .filter(|record| record.is_unicode())
        .filter_map(|record| {
            let text = record.string(data).ok()?.to_string();
            Some((record.name_id(), record.language_id(), text))
        })
        .collect();

    pick_family_name(&records)
}

/// Typographic family name if present, otherwise the legacy family name.
/// English (or language-neutral) records win over other languages.
fn pick_family_name(records: &[(NameId, u16, String)]) -> Option<FontName> {
    let lookup = |wanted: NameId| -> Option<FontName> {
        let named = || {
            records
                .iter()
                .filter(move |(id, _, text)| *id == wanted && !text.trim().is_empty())
        };
        named()
            .find(|(_, lang, _)| *lang == ENGLISH_US || *lang == 0)
            .or_else(|| named().next())
            .map(|(_, _, text)| text.trim().to_string())
    };

    lookup(NameId::TYPOGRAPHIC_FAMILY_NAME).or_else(|| lookup(NameId::FAMILY_NAME))
}

fn file_stem_name(path: &Path) -> FontName {
    path.file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}
