//! Static glyph-width tables for the three core fonts the renderer draws with.
//!
//! Widths come from the Adobe Helvetica AFM files, in 1/1000 em. Tables cover
//! ASCII 0x20..=0x7E (95 printable characters), index = (char as usize) - 32.
//! Helvetica-Oblique shares the upright widths.
//!
//! Characters above 0x7E that survive the WinAnsi check fall back to
//! `average_char_width`. Wrapping for accented text is therefore approximate,
//! which is acceptable for body copy.

/// Points per millimetre.
pub const PT_PER_MM: f32 = 72.0 / 25.4;

// ────────────────────────────────────────────────────────────────────────────
// Font style enum
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FontStyle {
    /// Body text.
    Regular,
    /// Headings, titles, and the header band.
    Bold,
    /// Footer page numbers.
    Italic,
}

impl FontStyle {
    /// PostScript name of the standard Type1 font backing this style.
    pub fn base_font(self) -> &'static str {
        match self {
            FontStyle::Regular => "Helvetica",
            FontStyle::Bold => "Helvetica-Bold",
            FontStyle::Italic => "Helvetica-Oblique",
        }
    }

    /// Resource name used inside page content streams.
    pub fn resource_name(self) -> &'static str {
        match self {
            FontStyle::Regular => "F1",
            FontStyle::Bold => "F2",
            FontStyle::Italic => "F3",
        }
    }

    pub const ALL: [FontStyle; 3] = [FontStyle::Regular, FontStyle::Bold, FontStyle::Italic];
}

// ────────────────────────────────────────────────────────────────────────────
// Font metric table
// ────────────────────────────────────────────────────────────────────────────

/// `widths[i]` = advance width of ASCII character `(i + 32)` in 1/1000 em.
///
/// ```text
/// [0]=sp  [1]=!   [2]="   [3]=#   [4]=$   [5]=%   [6]=&   [7]='
/// [8]=(   [9]=)   [10]=*  [11]=+  [12]=,  [13]=-  [14]=.  [15]=/
/// [16..25]=0-9
/// [26]=:  [27]=;  [28]=<  [29]==  [30]=>  [31]=?  [32]=@
/// [33..58]=A-Z
/// [59]=[  [60]=\  [61]=]  [62]=^  [63]=_  [64]=`
/// [65..90]=a-z
/// [91]={  [92]=|  [93]=}  [94]=~
/// ```
pub struct FontMetricTable {
    widths: [u16; 95],
    pub average_char_width: u16,
}

impl FontMetricTable {
    /// Width of a single character in 1/1000 em.
    pub fn char_units(&self, c: char) -> u16 {
        let code = c as usize;
        if (32..=126).contains(&code) {
            self.widths[code - 32]
        } else {
            self.average_char_width
        }
    }

    /// Rendered width of `s` in millimetres at `size_pt`.
    pub fn measure_mm(&self, s: &str, size_pt: f32) -> f32 {
        let units: u32 = s.chars().map(|c| u32::from(self.char_units(c))).sum();
        units as f32 * size_pt / 1000.0 / PT_PER_MM
    }

    /// Greedy word wrap of one logical line into rows no wider than `max_width_mm`.
    ///
    /// Breaks at the last space that fits; a word longer than a whole row is
    /// split between characters. An empty line yields a single empty row so it
    /// still takes up vertical space.
    pub fn wrap(&self, line: &str, size_pt: f32, max_width_mm: f32) -> Vec<String> {
        let mut rows = Vec::new();
        let mut current = String::new();
        let mut current_w = 0.0_f32;
        // Byte index into `current` just after its last space.
        let mut last_space: Option<usize> = None;

        for c in line.chars() {
            let w = f32::from(self.char_units(c)) * size_pt / 1000.0 / PT_PER_MM;

            while current_w + w > max_width_mm && !current.is_empty() {
                match last_space {
                    Some(split) if c != ' ' => {
                        let carry = current.split_off(split);
                        rows.push(current.trim_end_matches(' ').to_string());
                        current = carry;
                    }
                    _ => {
                        rows.push(current.trim_end_matches(' ').to_string());
                        current.clear();
                    }
                }
                last_space = None;
                current_w = self.measure_mm(&current, size_pt);
            }

            if c == ' ' && current.is_empty() && !rows.is_empty() {
                // A wrapped row never starts with the space it broke at.
                continue;
            }

            current.push(c);
            current_w += w;
            if c == ' ' {
                last_space = Some(current.len());
            }
        }

        rows.push(current);
        rows
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Static width tables  (95 ASCII printable characters each)
// ────────────────────────────────────────────────────────────────────────────

#[rustfmt::skip]
const HELVETICA_WIDTHS: [u16; 95] = [
    // sp   !    "    #    $    %    &    '    (    )    *    +    ,    -    .    /
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    // 0    1    2    3    4    5    6    7    8    9
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556,
    // :    ;    <    =    >    ?    @
    278, 278, 584, 584, 584, 556, 1015,
    // A    B    C    D    E    F    G    H    I    J    K    L    M
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833,
    // N    O    P    Q    R    S    T    U    V    W    X    Y    Z
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,
    // [    \    ]    ^    _    `
    278, 278, 278, 469, 556, 333,
    // a    b    c    d    e    f    g    h    i    j    k    l    m
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833,
    // n    o    p    q    r    s    t    u    v    w    x    y    z
    556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500,
    // {    |    }    ~
    334, 260, 334, 584,
];

static HELVETICA_TABLE: FontMetricTable = FontMetricTable {
    widths: HELVETICA_WIDTHS,
    average_char_width: 556,
};

static HELVETICA_BOLD_TABLE: FontMetricTable = FontMetricTable {
    #[rustfmt::skip]
    widths: [
        // sp   !    "    #    $    %    &    '    (    )    *    +    ,    -    .    /
        278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
        // 0    1    2    3    4    5    6    7    8    9
        556, 556, 556, 556, 556, 556, 556, 556, 556, 556,
        // :    ;    <    =    >    ?    @
        333, 333, 584, 584, 584, 611, 975,
        // A    B    C    D    E    F    G    H    I    J    K    L    M
        722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833,
        // N    O    P    Q    R    S    T    U    V    W    X    Y    Z
        722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,
        // [    \    ]    ^    _    `
        333, 278, 333, 584, 556, 333,
        // a    b    c    d    e    f    g    h    i    j    k    l    m
        556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889,
        // n    o    p    q    r    s    t    u    v    w    x    y    z
        611, 611, 611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500,
        // {    |    }    ~
        389, 280, 389, 584,
    ],
    average_char_width: 611,
};

static HELVETICA_OBLIQUE_TABLE: FontMetricTable = FontMetricTable {
    widths: HELVETICA_WIDTHS,
    average_char_width: 556,
};

/// Returns the static metric table for a given font style.
pub fn get_metrics(style: FontStyle) -> &'static FontMetricTable {
    match style {
        FontStyle::Regular => &HELVETICA_TABLE,
        FontStyle::Bold => &HELVETICA_BOLD_TABLE,
        FontStyle::Italic => &HELVETICA_OBLIQUE_TABLE,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_measure_empty_is_zero() {
        assert_eq!(get_metrics(FontStyle::Regular).measure_mm("", 11.0), 0.0);
    }

    #[test]
    fn test_measure_known_word() {
        // "Page" = P(667) + a(556) + g(556) + e(556) = 2335 units
        let width = get_metrics(FontStyle::Regular).measure_mm("Page", 10.0);
        let expected = 2335.0 * 10.0 / 1000.0 / PT_PER_MM;
        assert!((width - expected).abs() < 1e-4, "got {width}");
    }

    #[test]
    fn test_bold_wider_than_regular() {
        let text = "Learning Outcomes";
        assert!(
            get_metrics(FontStyle::Bold).measure_mm(text, 12.0)
                > get_metrics(FontStyle::Regular).measure_mm(text, 12.0)
        );
    }

    #[test]
    fn test_non_ascii_falls_back_to_average() {
        let metrics = get_metrics(FontStyle::Regular);
        assert_eq!(metrics.char_units('\u{e9}'), metrics.average_char_width);
    }

    #[test]
    fn test_wrap_short_line_is_single_row() {
        let rows = get_metrics(FontStyle::Regular).wrap("Intro to Rust", 11.0, 188.0);
        assert_eq!(rows, vec!["Intro to Rust".to_string()]);
    }

    #[test]
    fn test_wrap_empty_line_yields_one_empty_row() {
        let rows = get_metrics(FontStyle::Regular).wrap("", 11.0, 188.0);
        assert_eq!(rows, vec![String::new()]);
    }

    #[test]
    fn test_wrap_breaks_at_spaces() {
        let metrics = get_metrics(FontStyle::Regular);
        let line = "word ".repeat(60);
        let rows = metrics.wrap(line.trim_end(), 11.0, 188.0);
        assert!(rows.len() > 1);
        for row in &rows {
            assert!(!row.starts_with(' '), "row starts with space: {row:?}");
            assert!(!row.ends_with(' '), "row ends with space: {row:?}");
            assert!(metrics.measure_mm(row, 11.0) <= 188.0);
            assert!(row.split(' ').all(|w| w == "word"), "split a word: {row:?}");
        }
        let word_count: usize = rows.iter().map(|r| r.split(' ').count()).sum();
        assert_eq!(word_count, 60);
    }

    #[test]
    fn test_wrap_splits_overlong_word() {
        let metrics = get_metrics(FontStyle::Regular);
        let word = "x".repeat(200);
        let rows = metrics.wrap(&word, 11.0, 50.0);
        assert!(rows.len() > 1);
        assert_eq!(rows.concat(), word);
        for row in &rows {
            assert!(metrics.measure_mm(row, 11.0) <= 50.0);
        }
    }

    #[test]
    fn test_resource_names_are_distinct() {
        let names: std::collections::HashSet<_> =
            FontStyle::ALL.iter().map(|s| s.resource_name()).collect();
        assert_eq!(names.len(), 3);
    }
}
