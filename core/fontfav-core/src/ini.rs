//! Minimal INI document reader/writer (made by FontLab https://www.fontlab.com/)
//!
//! Reads the dialect written by Python's `configparser`: `[Section]` headers,
//! `key = value` or `key: value` pairs, full-line `#`/`;` comments and
//! indented continuation lines. Keys are case-insensitive and stored in lower
//! case. Parsing never fails; lines it cannot place are skipped with a warning.

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IniDocument {
    sections: Vec<IniSection>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IniSection {
    pub name: String,
    pub entries: Vec<(String, String)>,
}

impl IniSection {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            entries: Vec::new(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        let key = key.to_ascii_lowercase();
        self.entries
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    fn set(&mut self, key: &str, value: &str) {
        let key = key.to_ascii_lowercase();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value.to_string(),
            None => self.entries.push((key, value.to_string())),
        }
    }
}

impl IniDocument {
    pub fn parse(text: &str) -> Self {
        let mut doc = Self::default();
        let mut current: Option<usize> = None;
        let mut last_key: Option<String> = None;

        for (lineno, raw) in text.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() {
                last_key = None;
                continue;
            }
            if line.starts_with('#') || line.starts_with(';') {
                continue;
            }

            if raw.starts_with([' ', '\t']) {
                if let (Some(idx), Some(key)) = (current, last_key.as_ref()) {
                    let section = &mut doc.sections[idx];
                    if let Some(entry) = section.entries.iter_mut().find(|(k, _)| k == key) {
                        if !entry.1.is_empty() {
                            entry.1.push('\n');
                        }
                        entry.1.push_str(line);
                        continue;
                    }
                }
            }

            if let Some(name) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
                current = Some(doc.section_index_or_insert(name.trim()));
                last_key = None;
                continue;
            }

            let Some(idx) = current else {
                log::warn!("settings line {}: entry outside any section", lineno + 1);
                continue;
            };

            match split_pair(line) {
                Some((key, value)) => {
                    doc.sections[idx].set(key, value);
                    last_key = Some(key.to_ascii_lowercase());
                }
                None => {
                    log::warn!("settings line {}: missing '=' in {line:?}", lineno + 1);
                    last_key = None;
                }
            }
        }

        doc
    }

    pub fn section(&self, name: &str) -> Option<&IniSection> {
        self.sections.iter().find(|s| s.name == name)
    }

    pub fn get(&self, section: &str, key: &str) -> Option<&str> {
        self.section(section).and_then(|s| s.get(key))
    }

    /// Set `key` in `section`, creating either when missing.
    pub fn set(&mut self, section: &str, key: &str, value: &str) {
        let idx = self.section_index_or_insert(section);
        self.sections[idx].set(key, value);
    }

    pub fn sections(&self) -> &[IniSection] {
        &self.sections
    }

    /// Serialize in `configparser` layout, with a blank line after each section.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for section in &self.sections {
            out.push('[');
            out.push_str(&section.name);
            out.push_str("]\n");
            for (key, value) in &section.entries {
                out.push_str(key);
                out.push_str(" = ");
                out.push_str(&value.replace('\n', "\n\t"));
                out.push('\n');
            }
            out.push('\n');
        }
        out
    }

    fn section_index_or_insert(&mut self, name: &str) -> usize {
        if let Some(idx) = self.sections.iter().position(|s| s.name == name) {
            return idx;
        }
        self.sections.push(IniSection::new(name));
        self.sections.len() - 1
    }
}

fn split_pair(line: &str) -> Option<(&str, &str)> {
    let pos = line.find(['=', ':'])?;
    let key = line[..pos].trim();
    if key.is_empty() {
        return None;
    }
    Some((key, line[pos + 1..].trim()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_configparser_output() {
        let text = "[Settings]\nwindow_size = 900,600\nwindow_position = 10,20\n\n[Favorites]\nfonts = Arial,Verdana\n\n";
        let doc = IniDocument::parse(text);

        assert_eq!(doc.get("Settings", "window_size"), Some("900,600"));
        assert_eq!(doc.get("Favorites", "fonts"), Some("Arial,Verdana"));
        assert_eq!(doc.render(), text);
    }

    #[test]
    fn keys_are_case_insensitive_and_sections_are_not() {
        let doc = IniDocument::parse("[Settings]\nWindow_Size: 1,2\n");
        assert_eq!(doc.get("Settings", "window_size"), Some("1,2"));
        assert_eq!(doc.get("settings", "window_size"), None);
    }

    #[test]
    fn skips_comments_orphans_and_junk() {
        let text = "stray = 1\n# note\n[Favorites]\n; another\nnot a pair\nfonts =\n";
        let doc = IniDocument::parse(text);

        assert_eq!(doc.sections().len(), 1);
        assert_eq!(doc.get("Favorites", "fonts"), Some(""));
    }

    #[test]
    fn continuation_lines_extend_previous_value() {
        let doc = IniDocument::parse("[Favorites]\nfonts = Arial,\n\tVerdana\n");
        assert_eq!(doc.get("Favorites", "fonts"), Some("Arial,\nVerdana"));
    }

    #[test]
    fn set_creates_and_overwrites() {
        let mut doc = IniDocument::parse("[Other]\nkeep = yes\n");
        doc.set("Favorites", "fonts", "A");
        doc.set("Favorites", "fonts", "B");

        assert_eq!(doc.get("Favorites", "fonts"), Some("B"));
        assert_eq!(doc.get("Other", "keep"), Some("yes"));
        assert_eq!(
            doc.render(),
            "[Other]\nkeep = yes\n\n[Favorites]\nfonts = B\n\n"
        );
    }
}
