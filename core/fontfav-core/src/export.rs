//! Plain-text font lists (made by FontLab https://www.fontlab.com/)
//!
//! One family name per line, optionally preceded by a header naming the
//! machine and user. Names are written verbatim; family names are assumed to
//! contain no newlines.

use std::env;
use std::fs;
use std::io::{self, Write};
use std::path::Path;

use crate::error::SaveError;

const ALL_FONTS_PREFIX: &str = "All fonts on ";
const FAVORITES_PREFIX: &str = "Favorite Fonts of ";

/// Who and where an export was made.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostIdentity {
    pub user: String,
    pub machine: String,
}

impl HostIdentity {
    pub fn new(user: impl Into<String>, machine: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            machine: machine.into(),
        }
    }

    /// Best-effort lookup from the environment; unknown parts become `unknown`.
    pub fn from_env() -> Self {
        let user = env_any(&["USER", "USERNAME", "LOGNAME"]);
        let machine = env_any(&["HOSTNAME", "COMPUTERNAME"]).or_else(|| {
            fs::read_to_string("/etc/hostname")
                .ok()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        });

        Self {
            user: user.unwrap_or_else(|| "unknown".to_string()),
            machine: machine.unwrap_or_else(|| "unknown".to_string()),
        }
    }

    pub fn all_fonts_header(&self) -> String {
        format!("{ALL_FONTS_PREFIX}{}", self.machine)
    }

    pub fn favorites_header(&self) -> String {
        format!("{FAVORITES_PREFIX}{} on {}:", self.user, self.machine)
    }
}

fn env_any(keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|k| env::var(k).ok())
        .map(|v| v.trim().to_string())
        .find(|v| !v.is_empty())
}

/// Write `header` (if any) and then the names joined by newlines.
pub fn write_font_list<'a, I>(names: I, header: Option<&str>, mut w: impl Write) -> io::Result<usize>
where
    I: IntoIterator<Item = &'a str>,
{
    if let Some(header) = header {
        writeln!(w, "{header}")?;
    }

    let mut count = 0;
    for name in names {
        if count > 0 {
            w.write_all(b"\n")?;
        }
        w.write_all(name.as_bytes())?;
        count += 1;
    }
    Ok(count)
}

/// Write a font list file, returning how many names were written.
pub fn save_font_list<'a, I>(path: &Path, names: I, header: Option<&str>) -> Result<usize, SaveError>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut buf = Vec::new();
    let count = write_font_list(names, header, &mut buf).map_err(|e| SaveError::new(path, e))?;
    fs::write(path, buf).map_err(|e| SaveError::new(path, e))?;
    log::info!("wrote {count} font names to {}", path.display());
    Ok(count)
}

/// Read names back from an exported list, skipping a recognised header line
/// and blank lines.
pub fn read_font_list(text: &str) -> Vec<String> {
    let mut lines = text.lines().map(|l| l.trim_end_matches('\r')).peekable();

    if let Some(first) = lines.peek() {
        if is_header(first) {
            lines.next();
        }
    }

    lines
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect()
}

fn is_header(line: &str) -> bool {
    line.starts_with(ALL_FONTS_PREFIX) || (line.starts_with(FAVORITES_PREFIX) && line.ends_with(':'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn headers_name_user_and_machine() {
        let host = HostIdentity::new("ada", "lovelace");
        assert_eq!(host.all_fonts_header(), "All fonts on lovelace");
        assert_eq!(host.favorites_header(), "Favorite Fonts of ada on lovelace:");
    }

    #[test]
    fn list_has_header_and_no_trailing_newline() {
        let mut buf = Vec::new();
        let count = write_font_list(["Arial", "Verdana"], Some("All fonts on box"), &mut buf)
            .expect("write");
        assert_eq!(count, 2);
        assert_eq!(String::from_utf8(buf).unwrap(), "All fonts on box\nArial\nVerdana");
    }

    #[test]
    fn header_only_when_empty() {
        let mut buf = Vec::new();
        write_font_list(std::iter::empty(), Some("h"), &mut buf).expect("write");
        assert_eq!(buf, b"h\n");
    }

    #[test]
    fn reads_back_without_header() {
        let names = read_font_list("Favorite Fonts of ada on box:\nArial\r\n\nVerdana\n");
        assert_eq!(names, vec!["Arial", "Verdana"]);

        let plain = read_font_list("All Sorts Mono\nArial");
        assert_eq!(plain, vec!["All Sorts Mono", "Arial"]);
    }

    #[test]
    fn save_reports_unwritable_path() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let target = tmp.path().join("missing-dir").join("list.txt");
        let err = save_font_list(&target, ["Arial"], None).unwrap_err();
        assert_eq!(err.path, target);
    }
}
