//! Text measurement and fitting for the standard Helvetica font.
//!
//! Only the base-14 Helvetica is used, so no font program is embedded and
//! measurement relies on its published metrics (1/1000 em units).

/// Height of capitals and ascenders above the baseline, in em
pub const ASCENT: f64 = 0.718;
/// Depth of descenders below the baseline, in em
pub const DESCENT: f64 = 0.207;
/// Baseline-to-baseline distance, in em
pub const LINE_HEIGHT: f64 = 1.2;

/// Width used for characters without a table entry
const FALLBACK_WIDTH: u16 = 556;

/// Step between candidate sizes when shrinking text
const SIZE_STEP_PT: f64 = 0.5;

const ELLIPSIS: char = '\u{2026}';

/// Helvetica advance widths for U+0020..=U+007E
#[rustfmt::skip]
const ASCII_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '../
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556, // 0..?
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778, // @..O
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556, // P.._
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556, // `..o
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,      // p..~
];

/// Map a character to its WinAnsiEncoding byte, or `None` when the font
/// cannot show it.
fn win_ansi_byte(c: char) -> Option<u8> {
    match c {
        ' '..='~' => Some(c as u8),
        '\u{00A0}'..='\u{00FF}' => Some(c as u32 as u8),
        '\u{20AC}' => Some(0x80),
        '\u{2026}' => Some(0x85),
        '\u{2018}' => Some(0x91),
        '\u{2019}' => Some(0x92),
        '\u{201C}' => Some(0x93),
        '\u{201D}' => Some(0x94),
        '\u{2013}' => Some(0x96),
        '\u{2014}' => Some(0x97),
        _ => None,
    }
}

fn char_width(c: char) -> u16 {
    match c {
        ' '..='~' => ASCII_WIDTHS[(c as u32 - 0x20) as usize],
        '\u{2018}' | '\u{2019}' => 222,
        '\u{201C}' | '\u{201D}' => 333,
        '\u{2014}' | '\u{2026}' => 1000,
        _ => FALLBACK_WIDTH,
    }
}

/// Encode `text` for a WinAnsi Type1 font. Unsupported characters become `?`.
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| win_ansi_byte(c).unwrap_or(b'?'))
        .collect()
}

/// Rendered width of `text` at `size` points.
pub fn text_width_pt(text: &str, size: f64) -> f64 {
    let units: u32 = text
        .chars()
        .map(|c| {
            if win_ansi_byte(c).is_some() {
                char_width(c) as u32
            } else {
                char_width('?') as u32
            }
        })
        .sum();
    units as f64 * size / 1000.0
}

/// Greedy word wrap. A word wider than `max_width` gets a line to itself.
pub fn wrap(text: &str, size: f64, max_width: f64) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if current.is_empty() {
            current.push_str(word);
            continue;
        }
        let candidate = format!("{} {}", current, word);
        if text_width_pt(&candidate, size) <= max_width {
            current = candidate;
        } else {
            lines.push(std::mem::take(&mut current));
            current.push_str(word);
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Shorten `text` with a trailing ellipsis until it fits `max_width`.
///
/// Returns an empty string when not even the ellipsis fits.
pub fn ellipsize(text: &str, size: f64, max_width: f64) -> String {
    if text_width_pt(text, size) <= max_width {
        return text.to_string();
    }
    let mut chars: Vec<char> = text.chars().collect();
    while !chars.is_empty() {
        chars.pop();
        let mut candidate: String = chars.iter().collect::<String>().trim_end().to_string();
        candidate.push(ELLIPSIS);
        if text_width_pt(&candidate, size) <= max_width {
            return candidate;
        }
    }
    let lone = ELLIPSIS.to_string();
    if text_width_pt(&lone, size) <= max_width {
        lone
    } else {
        String::new()
    }
}

/// Text laid out at a chosen size.
#[derive(Debug, Clone, PartialEq)]
pub struct FittedText {
    pub size: f64,
    pub lines: Vec<String>,
    /// Content was cut to fit at the minimum size
    pub truncated: bool,
}

impl FittedText {
    /// Distance from the first line's cap height to the last line's descender
    pub fn block_height(&self) -> f64 {
        let extra_lines = self.lines.len().saturating_sub(1) as f64;
        self.size * (ASCENT + DESCENT + extra_lines * LINE_HEIGHT)
    }

    pub fn widest_line(&self) -> f64 {
        self.lines
            .iter()
            .map(|line| text_width_pt(line, self.size))
            .fold(0.0, f64::max)
    }
}

/// Find the largest size between `min_size` and `preferred_size` at which
/// `text` wraps into `max_lines` lines of at most `max_width`.
///
/// Falls back to a truncated layout at `min_size`. Returns `None` for blank
/// text or when nothing fits at all.
pub fn fit_text(
    text: &str,
    max_width: f64,
    max_lines: usize,
    preferred_size: f64,
    min_size: f64,
) -> Option<FittedText> {
    let text = text.trim();
    if text.is_empty() || max_lines == 0 || max_width <= 0.0 || min_size <= 0.0 {
        return None;
    }

    let mut size = preferred_size.max(min_size);
    loop {
        let lines = wrap(text, size, max_width);
        let fits = lines.len() <= max_lines
            && lines.iter().all(|line| text_width_pt(line, size) <= max_width);
        if fits {
            return Some(FittedText {
                size,
                lines,
                truncated: false,
            });
        }
        if size <= min_size {
            break;
        }
        size = (size - SIZE_STEP_PT).max(min_size);
    }

    let size = min_size;
    let wrapped = wrap(text, size, max_width);
    let mut lines: Vec<String> = wrapped
        .iter()
        .take(max_lines)
        .map(|line| ellipsize(line, size, max_width))
        .collect();

    // Wrapped lines never fit joined, so the remainder always gets an ellipsis
    if wrapped.len() > max_lines {
        if let Some(last) = lines.last_mut() {
            *last = ellipsize(&wrapped[max_lines - 1..].join(" "), size, max_width);
        }
    }

    lines.retain(|line| !line.is_empty());
    if lines.is_empty() {
        return None;
    }
    Some(FittedText {
        size,
        lines,
        truncated: true,
    })
}
