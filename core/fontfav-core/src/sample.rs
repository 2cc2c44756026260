//! Sample-string previews (made by FontLab https://www.fontlab.com/)
//!
//! A preview is a naive horizontal glyph run: every character is mapped
//! through the face's cmap and advanced by its hinting-free advance width at
//! the requested size. There is no shaping and no rasterization; the result is
//! enough to size a preview column and to tell which characters a family
//! cannot show.

use std::fs;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use skrifa::instance::{LocationRef, Size};
use skrifa::{FontRef, GlyphId, MetadataProvider};

use crate::catalog::{FontFace, InstalledCatalog};

/// Uppercase, lowercase, digits and ASCII punctuation.
pub const DEFAULT_SAMPLE: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ abcdefghijklmnopqrstuvwxyz 0123456789 !\"#$%&'()*+,-./:;<=>?@[\\]^_`{|}~";

pub const DEFAULT_POINT_SIZE: f32 = 16.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedGlyph {
    pub ch: char,
    pub glyph_id: u32,
    pub advance: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SamplePreview {
    pub family: String,
    pub point_size: f32,
    pub glyphs: Vec<PlacedGlyph>,
    pub width: f32,
    /// Characters the face has no glyph for, in order of first appearance.
    pub missing: Vec<char>,
}

/// Raw bytes of one face, kept so that borrowing font views can be rebuilt
/// on demand.
#[derive(Debug, Clone)]
pub struct LoadedFace {
    data: Vec<u8>,
    ttc_index: Option<u32>,
}

impl LoadedFace {
    pub fn open(face: &FontFace) -> Result<Self> {
        Self::from_path(&face.path, face.ttc_index)
    }

    pub fn from_path(path: &Path, ttc_index: Option<u32>) -> Result<Self> {
        let data = fs::read(path).with_context(|| format!("reading font {}", path.display()))?;
        let loaded = Self { data, ttc_index };
        loaded
            .font_ref()
            .with_context(|| format!("parsing font {}", path.display()))?;
        Ok(loaded)
    }

    pub fn font_ref(&self) -> Result<FontRef<'_>> {
        let font = match self.ttc_index {
            Some(idx) => FontRef::from_index(&self.data, idx)?,
            None => FontRef::new(&self.data)?,
        };
        Ok(font)
    }

    /// Lay out `text` at `point_size`.
    pub fn layout(&self, text: &str, point_size: f32) -> Result<(Vec<PlacedGlyph>, Vec<char>)> {
        let font = self.font_ref()?;
        let charmap = font.charmap();
        let metrics = font.glyph_metrics(Size::new(point_size), LocationRef::default());

        let mut glyphs = Vec::with_capacity(text.len());
        let mut missing = Vec::new();
        for ch in text.chars() {
            let glyph = match charmap.map(ch) {
                Some(gid) => gid,
                None => {
                    if !missing.contains(&ch) {
                        missing.push(ch);
                    }
                    GlyphId::NOTDEF
                }
            };
            glyphs.push(PlacedGlyph {
                ch,
                glyph_id: glyph.to_u32(),
                advance: metrics.advance_width(glyph).unwrap_or(0.0),
            });
        }
        Ok((glyphs, missing))
    }
}

/// Preview `sample` in the first face backing family `name`.
pub fn render_sample(
    catalog: &InstalledCatalog,
    name: &str,
    point_size: f32,
    sample: &str,
) -> Result<SamplePreview> {
    let family = catalog
        .family(name)
        .ok_or_else(|| anyhow!("font family is not installed: {name}"))?;
    let face = family
        .faces
        .first()
        .ok_or_else(|| anyhow!("no font file known for family: {name}"))?;

    let loaded = LoadedFace::open(face)?;
    let (glyphs, missing) = loaded.layout(sample, point_size)?;
    let width = glyphs.iter().map(|g| g.advance).sum();

    Ok(SamplePreview {
        family: family.name.clone(),
        point_size,
        glyphs,
        width,
        missing,
    })
}
