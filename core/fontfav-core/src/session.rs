//! Session state and action dispatch (made by FontLab https://www.fontlab.com/)
//!
//! A [`Session`] owns everything a front end needs: the catalog source, the
//! favorites store, the window geometry and where settings live. Front ends
//! translate user gestures into [`Action`]s (by name, through
//! [`Action::from_name`]) and show the returned [`Notice`]s.

use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};

use crate::catalog::{FontCatalog, FontName, InstalledCatalog};
use crate::error::SaveError;
use crate::export::{save_font_list, HostIdentity};
use crate::favorites::FavoritesStore;
use crate::geometry::{clamp_to_screen, ScreenSize, WindowGeometry};
use crate::settings::SettingsRecord;

/// Something the user asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Add(FontName),
    Remove(FontName),
    Refresh,
    SaveAll(PathBuf),
    SaveFavorites(PathBuf),
    MoveResize(WindowGeometry),
    Save,
    Close,
}

type ActionBuilder = fn(Option<&str>) -> Result<Action>;

/// Action names and how to build each from its optional argument.
static ACTION_TABLE: &[(&str, ActionBuilder)] = &[
    ("add", |arg| Ok(Action::Add(required("add", arg)?.to_string()))),
    ("remove", |arg| {
        Ok(Action::Remove(required("remove", arg)?.to_string()))
    }),
    ("refresh", |_| Ok(Action::Refresh)),
    ("save-all", |arg| {
        Ok(Action::SaveAll(PathBuf::from(required("save-all", arg)?)))
    }),
    ("save-favorites", |arg| {
        Ok(Action::SaveFavorites(PathBuf::from(required(
            "save-favorites",
            arg,
        )?)))
    }),
    ("move-resize", |arg| {
        Ok(Action::MoveResize(required("move-resize", arg)?.parse()?))
    }),
    ("save", |_| Ok(Action::Save)),
    ("close", |_| Ok(Action::Close)),
];

fn required<'a>(action: &str, arg: Option<&'a str>) -> Result<&'a str> {
    arg.ok_or_else(|| anyhow!("action `{action}` needs an argument"))
}

impl Action {
    /// Resolve an action by its table name.
    pub fn from_name(name: &str, arg: Option<&str>) -> Result<Self> {
        let (_, build) = ACTION_TABLE
            .iter()
            .find(|(n, _)| *n == name)
            .ok_or_else(|| anyhow!("unknown action: {name}"))?;
        build(arg)
    }

    pub fn names() -> impl Iterator<Item = &'static str> {
        ACTION_TABLE.iter().map(|(n, _)| *n)
    }
}

/// Feedback for the user after an action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Added(FontName),
    AlreadyFavorite(FontName),
    NotInstalled(FontName),
    Removed(FontName),
    NotFavorite(FontName),
    StaleFavorite(FontName),
    Refreshed { families: usize },
    RefreshFailed { reason: String },
    Exported { path: PathBuf, count: usize },
    GeometryChanged(WindowGeometry),
    SettingsSaved(PathBuf),
    SaveFailed { path: PathBuf, reason: String },
    Closed,
}

impl Notice {
    /// Whether the notice reports something that did not go as asked.
    pub fn is_problem(&self) -> bool {
        matches!(
            self,
            Notice::NotInstalled(_)
                | Notice::RefreshFailed { .. }
                | Notice::SaveFailed { .. }
                | Notice::Closed
        )
    }

    fn save_failed(err: SaveError) -> Self {
        log::error!("{err}");
        Notice::SaveFailed {
            path: err.path,
            reason: err.source.to_string(),
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::Added(name) => write!(f, "added {name} to favorites"),
            Notice::AlreadyFavorite(name) => write!(f, "{name} is already a favorite"),
            Notice::NotInstalled(name) => write!(f, "font {name} is not installed"),
            Notice::Removed(name) => write!(f, "removed {name} from favorites"),
            Notice::NotFavorite(name) => write!(f, "{name} is not a favorite"),
            Notice::StaleFavorite(name) => {
                write!(f, "font {name} no longer installed; dropped from favorites")
            }
            Notice::Refreshed { families } => write!(f, "catalog lists {families} families"),
            Notice::RefreshFailed { reason } => write!(f, "could not refresh fonts: {reason}"),
            Notice::Exported { path, count } => {
                write!(f, "fonts saved to {} ({count} names)", path.display())
            }
            Notice::GeometryChanged(g) => write!(f, "window geometry {g}"),
            Notice::SettingsSaved(path) => write!(f, "settings saved to {}", path.display()),
            Notice::SaveFailed { path, reason } => {
                write!(f, "could not write {}: {reason}", path.display())
            }
            Notice::Closed => write!(f, "session already closed"),
        }
    }
}

pub struct Session<C> {
    source: C,
    store: FavoritesStore,
    settings: SettingsRecord,
    settings_path: PathBuf,
    host: HostIdentity,
    closed: bool,
}

impl<C: FontCatalog> Session<C> {
    /// List the catalog, load settings and restore favorites.
    ///
    /// Favorites that are no longer installed are dropped and reported as
    /// [`Notice::StaleFavorite`]. Only a failing catalog is an error.
    pub fn open(source: C, settings_path: impl Into<PathBuf>) -> Result<(Self, Vec<Notice>)> {
        let settings_path = settings_path.into();
        let catalog = source.list_families()?;
        let settings = SettingsRecord::load(&settings_path);
        let (store, stale) =
            FavoritesStore::from_persisted_form_reporting(&settings.favorites, catalog);

        let session = Self {
            source,
            store,
            settings,
            settings_path,
            host: HostIdentity::from_env(),
            closed: false,
        };
        let notices = stale.into_iter().map(Notice::StaleFavorite).collect();
        Ok((session, notices))
    }

    pub fn with_host(mut self, host: HostIdentity) -> Self {
        self.host = host;
        self
    }

    pub fn dispatch(&mut self, action: Action) -> Vec<Notice> {
        if self.closed {
            return vec![Notice::Closed];
        }
        log::debug!("dispatching {action:?}");

        match action {
            Action::Add(name) => vec![self.add(name)],
            Action::Remove(name) => vec![self.remove(name)],
            Action::Refresh => self.refresh(),
            Action::SaveAll(path) => {
                let header = self.host.all_fonts_header();
                let names = self.store.catalog().names();
                vec![export(&path, names, &header)]
            }
            Action::SaveFavorites(path) => {
                let header = self.host.favorites_header();
                let names = self.store.sorted();
                vec![export(&path, names.iter().map(String::as_str), &header)]
            }
            Action::MoveResize(geometry) => {
                self.settings.geometry = geometry;
                vec![Notice::GeometryChanged(geometry)]
            }
            Action::Save => vec![self.save()],
            Action::Close => {
                self.closed = true;
                vec![self.save()]
            }
        }
    }

    fn add(&mut self, name: FontName) -> Notice {
        if self.store.add(&name) {
            Notice::Added(name)
        } else if self.store.contains(&name) {
            Notice::AlreadyFavorite(name)
        } else {
            Notice::NotInstalled(name)
        }
    }

    fn remove(&mut self, name: FontName) -> Notice {
        if self.store.remove(&name) {
            Notice::Removed(name)
        } else {
            Notice::NotFavorite(name)
        }
    }

    fn refresh(&mut self) -> Vec<Notice> {
        let catalog = match self.source.list_families() {
            Ok(catalog) => catalog,
            Err(err) => {
                log::error!("refresh failed: {err:#}");
                return vec![Notice::RefreshFailed {
                    reason: format!("{err:#}"),
                }];
            }
        };
        let families = catalog.len();
        let mut notices: Vec<Notice> = self
            .store
            .reconcile(catalog)
            .into_iter()
            .map(Notice::StaleFavorite)
            .collect();
        notices.push(Notice::Refreshed { families });
        notices
    }

    fn save(&mut self) -> Notice {
        let record = self.settings_record();
        match record.save(&self.settings_path) {
            Ok(()) => {
                self.settings = record;
                Notice::SettingsSaved(self.settings_path.clone())
            }
            Err(err) => Notice::save_failed(err),
        }
    }

    /// What would be written on the next save.
    pub fn settings_record(&self) -> SettingsRecord {
        let mut record = self.settings.clone();
        record.favorites = self.store.to_persisted_form();
        record
    }

    pub fn store(&self) -> &FavoritesStore {
        &self.store
    }

    pub fn catalog(&self) -> &InstalledCatalog {
        self.store.catalog()
    }

    pub fn geometry(&self) -> WindowGeometry {
        self.settings.geometry
    }

    /// The persisted geometry fitted onto `screen`.
    pub fn restored_geometry(&self, screen: ScreenSize) -> WindowGeometry {
        clamp_to_screen(self.settings.geometry, screen)
    }

    pub fn settings_path(&self) -> &Path {
        &self.settings_path
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

fn export<'a>(path: &Path, names: impl IntoIterator<Item = &'a str>, header: &str) -> Notice {
    match save_font_list(path, names, Some(header)) {
        Ok(count) => Notice::Exported {
            path: path.to_path_buf(),
            count,
        },
        Err(err) => Notice::save_failed(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_table_entry_resolves() {
        for name in Action::names() {
            let arg = match name {
                "move-resize" => Some("800x600+0+0"),
                _ => Some("x"),
            };
            assert!(Action::from_name(name, arg).is_ok(), "{name}");
        }
    }

    #[test]
    fn table_lookup_builds_actions() {
        assert_eq!(
            Action::from_name("add", Some("Arial")).unwrap(),
            Action::Add("Arial".into())
        );
        assert_eq!(
            Action::from_name("move-resize", Some("10x20+1+2")).unwrap(),
            Action::MoveResize(WindowGeometry {
                width: 10,
                height: 20,
                x: 1,
                y: 2
            })
        );
        assert_eq!(Action::from_name("refresh", None).unwrap(), Action::Refresh);
    }

    #[test]
    fn missing_argument_or_unknown_name_is_rejected() {
        assert!(Action::from_name("add", None).is_err());
        assert!(Action::from_name("explode", None).is_err());
        assert!(Action::from_name("move-resize", Some("big")).is_err());
    }

    #[test]
    fn problems_are_flagged() {
        assert!(Notice::NotInstalled("X".into()).is_problem());
        assert!(!Notice::StaleFavorite("X".into()).is_problem());
        assert!(!Notice::Added("X".into()).is_problem());
    }
}
