use tui::buffer::Buffer;
use tui::layout::Rect;
use tui::style::{Color, Style};
use tui::widgets::Widget;

// ---------------------------------------------------------------------------
// Big-digit clock face for the display board
// ---------------------------------------------------------------------------

const GLYPH_ROWS: usize = 5;
const GLYPH_WIDTH: u16 = 3;
const GLYPH_GAP: u16 = 1;

/// 3x5 block glyphs for 0-9.
const DIGITS: [[&str; GLYPH_ROWS]; 10] = [
    ["███", "█ █", "█ █", "█ █", "███"],
    ["  █", "  █", "  █", "  █", "  █"],
    ["███", "  █", "███", "█  ", "███"],
    ["███", "  █", "███", "  █", "███"],
    ["█ █", "█ █", "███", "  █", "  █"],
    ["███", "█  ", "███", "  █", "███"],
    ["███", "█  ", "███", "█ █", "███"],
    ["███", "  █", "  █", "  █", "  █"],
    ["███", "█ █", "███", "█ █", "███"],
    ["███", "█ █", "███", "  █", "███"],
];

const COLON: [&str; GLYPH_ROWS] = ["   ", " █ ", "   ", " █ ", "   "];

/// Whole seconds → "MM:SS". Minutes keep growing past 99 rather than wrap —
/// an overtime marathon should read 102:07, not 02:07.
pub fn format_clock(total_seconds: u32) -> String {
    format!("{:02}:{:02}", total_seconds / 60, total_seconds % 60)
}

/// The venue clock: renders seconds as large block digits, centered, with an
/// optional phase label underneath ("HALF-TIME", "EXTRA TIME +00:42", ...).
/// Falls back to a plain one-line clock when the area is too small.
pub struct ClockFace {
    pub seconds: u32,
    pub label: Option<String>,
    pub accent: Color,
}

impl Widget for ClockFace {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let text = format_clock(self.seconds);
        let glyph_count = text.chars().count() as u16;
        let big_width = glyph_count * GLYPH_WIDTH + glyph_count.saturating_sub(1) * GLYPH_GAP;

        if area.width < big_width || area.height < GLYPH_ROWS as u16 {
            render_plain(&text, self.label.as_deref(), self.accent, area, buf);
            return;
        }

        let x0 = area.x + (area.width - big_width) / 2;
        let extra_rows = if self.label.is_some() { 1 } else { 0 };
        let y0 = area.y
            + area
                .height
                .saturating_sub(GLYPH_ROWS as u16 + extra_rows)
                / 2;
        let style = Style::default().fg(self.accent);

        for (row, y) in (y0..y0 + GLYPH_ROWS as u16).enumerate() {
            let mut x = x0;
            for ch in text.chars() {
                let glyph = glyph_row(ch, row);
                buf.set_string(x, y, glyph, style);
                x += GLYPH_WIDTH + GLYPH_GAP;
            }
        }

        if let Some(label) = self.label {
            let label_y = y0 + GLYPH_ROWS as u16;
            if label_y < area.y + area.height {
                let label_x = area.x
                    + area
                        .width
                        .saturating_sub(label.chars().count() as u16)
                        / 2;
                buf.set_string(label_x, label_y, label, Style::default().fg(Color::Gray));
            }
        }
    }
}

fn glyph_row(ch: char, row: usize) -> &'static str {
    match ch.to_digit(10) {
        Some(d) => DIGITS[d as usize][row],
        None => COLON[row],
    }
}

fn render_plain(text: &str, label: Option<&str>, accent: Color, area: Rect, buf: &mut Buffer) {
    if area.width == 0 || area.height == 0 {
        return;
    }
    let line = match label {
        Some(l) => format!("{text}  {l}"),
        None => text.to_string(),
    };
    let clipped: String = line.chars().take(area.width as usize).collect();
    let x = area.x + area.width.saturating_sub(clipped.chars().count() as u16) / 2;
    let y = area.y + area.height / 2;
    buf.set_string(x, y, clipped, Style::default().fg(accent));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_formats_minutes_and_seconds() {
        assert_eq!(format_clock(0), "00:00");
        assert_eq!(format_clock(431), "07:11");
        assert_eq!(format_clock(600), "10:00");
        assert_eq!(format_clock(59), "00:59");
    }

    #[test]
    fn clock_does_not_wrap_past_an_hour() {
        assert_eq!(format_clock(6127), "102:07");
    }

    #[test]
    fn every_digit_glyph_is_three_cells_wide() {
        for digit in DIGITS {
            for row in digit {
                assert_eq!(row.chars().count(), 3);
            }
        }
        for row in COLON {
            assert_eq!(row.chars().count(), 3);
        }
    }

    #[test]
    fn big_face_renders_into_a_buffer() {
        let area = Rect::new(0, 0, 30, 7);
        let mut buf = Buffer::empty(area);
        ClockFace { seconds: 65, label: None, accent: Color::White }.render(area, &mut buf);
        let rendered: String = (0..area.width)
            .map(|x| buf.cell((x, 3)).map(|c| c.symbol()).unwrap_or(" "))
            .collect();
        assert!(rendered.contains('█'));
    }

    #[test]
    fn tiny_area_falls_back_to_plain_text() {
        let area = Rect::new(0, 0, 10, 1);
        let mut buf = Buffer::empty(area);
        ClockFace { seconds: 65, label: None, accent: Color::White }.render(area, &mut buf);
        let rendered: String = (0..area.width)
            .map(|x| buf.cell((x, 0)).map(|c| c.symbol()).unwrap_or(" "))
            .collect();
        assert!(rendered.contains("01:05"));
    }
}
