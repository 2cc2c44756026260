//! fontfav-core: the patient curator of your favorite fonts
//!
//! Every machine has a drawer full of typefaces, and every designer has the
//! handful they keep reaching for. This library remembers that handful,
//! keeps it honest against what is actually installed today, and puts the
//! window back where you left it.
//!
//! ## What lives here
//!
//! - [`catalog`]: the installed families, read from font files with
//!   read-fonts or from a saved list
//! - [`favorites`]: the curated subset, always a subset of the catalog
//! - [`settings`]: the small INI file that carries favorites and window
//!   geometry between sessions
//! - [`geometry`]: fitting a remembered window onto today's screen
//! - [`layout`] and [`sample`]: sizing name columns and previewing a sample
//!   string in a family
//! - [`export`] and [`output`]: font lists as text, JSON or NDJSON
//! - [`session`]: the whole thing wired behind a table of named actions
//!
//! ## A Sample Session
//!
//! ```rust,no_run
//! use fontfav_core::catalog::PathCatalog;
//! use fontfav_core::session::{Action, Session};
//!
//! let catalog = PathCatalog::new(["/usr/share/fonts"]);
//! let (mut session, stale) = Session::open(catalog, "config.ini")?;
//! for notice in stale {
//!     eprintln!("{notice}");
//! }
//!
//! for notice in session.dispatch(Action::Add("Noto Sans".into())) {
//!     println!("{notice}");
//! }
//! session.dispatch(Action::Close);
//! #
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ---
//!
//! Crafted with care at FontLab https://www.fontlab.com/

pub mod catalog;
pub mod error;
pub mod export;
pub mod favorites;
pub mod geometry;
pub mod ini;
pub mod layout;
pub mod output;
pub mod sample;
pub mod session;
pub mod settings;
