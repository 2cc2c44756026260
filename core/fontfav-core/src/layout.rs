//! Column auto-sizing (made by FontLab https://www.fontlab.com/)
//!
//! A name column must be as wide as its widest entry plus padding. Widths are
//! derived from the names being shown, so they have to be recomputed whenever
//! that set changes; [`FittedColumn`] does this by construction.

/// Measures the rendered width of a string.
pub trait TextMeasure {
    fn measure(&self, text: &str) -> f32;
}

impl<F> TextMeasure for F
where
    F: Fn(&str) -> f32,
{
    fn measure(&self, text: &str) -> f32 {
        self(text)
    }
}

/// One unit per character, for monospaced terminals.
#[derive(Debug, Clone, Copy, Default)]
pub struct CharCountMeasure;

impl TextMeasure for CharCountMeasure {
    fn measure(&self, text: &str) -> f32 {
        text.chars().count() as f32
    }
}

/// `max(measure(s)) + padding`; just `padding` when there is nothing to show.
pub fn column_width<'a, I, M>(strings: I, measure: &M, padding: f32) -> f32
where
    I: IntoIterator<Item = &'a str>,
    M: TextMeasure + ?Sized,
{
    let widest = strings
        .into_iter()
        .map(|s| measure.measure(s))
        .fold(0.0_f32, f32::max);
    widest + padding
}

/// A column whose width always matches the rows it holds.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FittedColumn {
    rows: Vec<String>,
    width: f32,
}

impl FittedColumn {
    pub fn fit<M>(rows: Vec<String>, measure: &M, padding: f32) -> Self
    where
        M: TextMeasure + ?Sized,
    {
        let width = column_width(rows.iter().map(String::as_str), measure, padding);
        Self { rows, width }
    }

    pub fn rows(&self) -> &[String] {
        &self.rows
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    /// Width rounded up to whole cells, for character grids.
    pub fn cells(&self) -> usize {
        self.width.ceil().max(0.0) as usize
    }
}
