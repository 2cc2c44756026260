//! Settings file: window geometry and persisted favorites
//! (made by FontLab https://www.fontlab.com/)
//!
//! The file is a small INI document with two sections:
//!
//! ```ini
//! [Settings]
//! window_size = 800,600
//! window_position = 100,100
//!
//! [Favorites]
//! fonts = Arial,Calibri
//! ```
//!
//! Loading never fails. Missing files, missing keys and malformed values all
//! fall back to defaults; anything else in the file is carried through to the
//! next save untouched.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use crate::error::{SaveError, SettingsParseError};
use crate::geometry::{WindowGeometry, DEFAULT_HEIGHT, DEFAULT_WIDTH, DEFAULT_X, DEFAULT_Y};
use crate::ini::IniDocument;

pub const SETTINGS_SECTION: &str = "Settings";
pub const FAVORITES_SECTION: &str = "Favorites";
pub const WINDOW_SIZE_KEY: &str = "window_size";
pub const WINDOW_POSITION_KEY: &str = "window_position";
pub const FONTS_KEY: &str = "fonts";

/// Default settings file name, resolved against the working directory.
pub const DEFAULT_SETTINGS_FILE: &str = "config.ini";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettingsRecord {
    pub geometry: WindowGeometry,
    /// Favorites in their persisted, comma-separated form.
    pub favorites: String,
    document: IniDocument,
}

impl SettingsRecord {
    pub fn new(geometry: WindowGeometry, favorites: impl Into<String>) -> Self {
        Self {
            geometry,
            favorites: favorites.into(),
            document: IniDocument::default(),
        }
    }

    pub fn parse(text: &str) -> Self {
        let document = IniDocument::parse(text);

        let (width, height) = read_pair(
            &document,
            WINDOW_SIZE_KEY,
            (DEFAULT_WIDTH, DEFAULT_HEIGHT),
        );
        let (x, y) = read_pair(&document, WINDOW_POSITION_KEY, (DEFAULT_X, DEFAULT_Y));
        let favorites = document
            .get(FAVORITES_SECTION, FONTS_KEY)
            .unwrap_or_default()
            .to_string();

        Self {
            geometry: WindowGeometry {
                width,
                height,
                x,
                y,
            },
            favorites,
            document,
        }
    }

    /// Read `path`, falling back to defaults when it is missing or unreadable.
    pub fn load(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(text) => Self::parse(&text),
            Err(err) if err.kind() == ErrorKind::NotFound => {
                log::debug!("no settings at {}, using defaults", path.display());
                Self::default()
            }
            Err(err) => {
                log::warn!(
                    "could not read settings {}: {err}; using defaults",
                    path.display()
                );
                Self::default()
            }
        }
    }

    pub fn to_ini_string(&self) -> String {
        let mut document = self.document.clone();
        let g = &self.geometry;
        document.set(
            SETTINGS_SECTION,
            WINDOW_SIZE_KEY,
            &format!("{},{}", g.width, g.height),
        );
        document.set(
            SETTINGS_SECTION,
            WINDOW_POSITION_KEY,
            &format!("{},{}", g.x, g.y),
        );
        document.set(FAVORITES_SECTION, FONTS_KEY, &self.favorites);
        document.render()
    }

    pub fn save(&self, path: &Path) -> Result<(), SaveError> {
        fs::write(path, self.to_ini_string()).map_err(|err| SaveError::new(path, err))?;
        log::info!("settings saved to {}", path.display());
        Ok(())
    }
}

/// Parse an `<int>,<int>` settings value.
pub fn parse_pair(section: &str, key: &str, value: &str) -> Result<(i32, i32), SettingsParseError> {
    let malformed = || SettingsParseError::MalformedPair {
        section: section.to_string(),
        key: key.to_string(),
        value: value.to_string(),
    };

    let (a, b) = value.split_once(',').ok_or_else(malformed)?;
    let a = a.trim().parse::<i32>().map_err(|_| malformed())?;
    let b = b.trim().parse::<i32>().map_err(|_| malformed())?;
    Ok((a, b))
}

fn read_pair(document: &IniDocument, key: &str, default: (i32, i32)) -> (i32, i32) {
    let Some(value) = document.get(SETTINGS_SECTION, key) else {
        return default;
    };
    parse_pair(SETTINGS_SECTION, key, value).unwrap_or_else(|err| {
        log::warn!("{err}; using {},{}", default.0, default.1);
        default
    })
}
