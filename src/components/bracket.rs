use courtside_api::{Bracket, BracketTie, KnockoutRound, TeamSide};
use tui::buffer::Buffer;
use tui::layout::Rect;
use tui::style::{Color, Modifier, Style};
use tui::widgets::Widget;

// ---------------------------------------------------------------------------
// Knockout bracket, one column per round
// ---------------------------------------------------------------------------

/// Rows per tie cell: home line, away line, spacer.
const TIE_HEIGHT: u16 = 3;
const COL_GAP: u16 = 2;
/// Below this column width the multi-column layout is unreadable and the
/// widget collapses to the focused round only.
const MIN_COL_WIDTH: u16 = 14;

pub struct BracketColumns<'a> {
    pub bracket: &'a Bracket,
    pub view_round: KnockoutRound,
    pub selected_tie: usize,
}

impl Widget for BracketColumns<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height <= 1 || self.bracket.rounds.is_empty() {
            return;
        }

        let cols = self.bracket.rounds.len() as u16;
        let gap_total = COL_GAP * cols.saturating_sub(1);
        let col_width = area.width.saturating_sub(gap_total) / cols;

        if col_width < MIN_COL_WIDTH {
            // Narrow terminal: the focused round gets the whole area.
            if let Some(round) = self.bracket.round(self.view_round) {
                render_round_column(
                    buf,
                    area,
                    round.kind,
                    &round.ties,
                    true,
                    Some(self.selected_tie),
                );
            }
            return;
        }

        let mut x = area.x;
        for round in &self.bracket.rounds {
            let col = Rect::new(x, area.y, col_width, area.height);
            let focused = round.kind == self.view_round;
            render_round_column(
                buf,
                col,
                round.kind,
                &round.ties,
                focused,
                focused.then_some(self.selected_tie),
            );
            x += col_width + COL_GAP;
        }
    }
}

fn render_round_column(
    buf: &mut Buffer,
    area: Rect,
    kind: KnockoutRound,
    ties: &[BracketTie],
    focused: bool,
    selected: Option<usize>,
) {
    let header_style = if focused {
        Style::default().fg(Color::Yellow).add_modifier(Modifier::UNDERLINED)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    set_clipped(buf, area.x, area.y, kind.label(), area.width, header_style);

    let body = Rect::new(
        area.x,
        area.y + 1,
        area.width,
        area.height.saturating_sub(1),
    );
    if ties.is_empty() || body.height == 0 {
        return;
    }

    // Ties are spaced evenly down the column so later rounds sit between
    // their feeders, the way a wall bracket reads.
    let slot_height = (body.height / ties.len() as u16).max(TIE_HEIGHT.min(body.height));

    for (idx, tie) in ties.iter().enumerate() {
        let slot_y = body.y + idx as u16 * slot_height;
        if slot_y >= body.y + body.height {
            break;
        }
        let y = slot_y + slot_height.saturating_sub(TIE_HEIGHT) / 2;
        let is_selected = selected == Some(idx);
        render_tie(buf, body, tie, y, is_selected);
    }
}

fn render_tie(buf: &mut Buffer, body: Rect, tie: &BracketTie, y: u16, selected: bool) {
    let marker = if selected { '>' } else { ' ' };
    let home = tie_line(marker, &tie.home, tie.score.map(|(h, _)| h));
    let away = tie_line(' ', &tie.away, tie.score.map(|(_, a)| a));

    if y < body.y + body.height {
        set_clipped(buf, body.x, y, &home, body.width, side_style(tie, TeamSide::Home, selected));
    }
    if y + 1 < body.y + body.height {
        set_clipped(buf, body.x, y + 1, &away, body.width, side_style(tie, TeamSide::Away, selected));
    }
}

fn tie_line(marker: char, team: &str, score: Option<u16>) -> String {
    let score = score.map(|s| format!("{s:>3}")).unwrap_or_else(|| " --".to_string());
    format!("{marker} {team} {score}")
}

fn side_style(tie: &BracketTie, side: TeamSide, selected: bool) -> Style {
    let mut style = match tie.winner {
        Some(w) if w == side => Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        Some(_) => Style::default().fg(Color::DarkGray),
        None => Style::default().fg(Color::White),
    };
    if selected {
        style = style.add_modifier(Modifier::BOLD);
    }
    style
}

fn set_clipped(buf: &mut Buffer, x: u16, y: u16, text: &str, width: u16, style: Style) {
    if width == 0 {
        return;
    }
    let clipped: String = text.chars().take(width as usize).collect();
    buf.set_string(x, y, clipped, style);
}

#[cfg(test)]
mod tests {
    use super::*;
    use courtside_api::BracketRound;

    fn bracket() -> Bracket {
        Bracket {
            rounds: vec![
                BracketRound {
                    kind: KnockoutRound::SemiFinal,
                    ties: vec![
                        BracketTie {
                            id: "sf1".into(),
                            home: "Hornets".into(),
                            away: "Comets".into(),
                            score: Some((81, 63)),
                            winner: Some(TeamSide::Home),
                            scheduled: None,
                        },
                        BracketTie {
                            id: "sf2".into(),
                            home: "Pelicans".into(),
                            away: "Gulls".into(),
                            score: None,
                            winner: None,
                            scheduled: None,
                        },
                    ],
                },
                BracketRound {
                    kind: KnockoutRound::Final,
                    ties: vec![BracketTie {
                        id: "f1".into(),
                        home: "Hornets".into(),
                        away: "TBD".into(),
                        score: None,
                        winner: None,
                        scheduled: None,
                    }],
                },
            ],
        }
    }

    fn row_text(buf: &Buffer, area: Rect, y: u16) -> String {
        (area.x..area.x + area.width)
            .map(|x| buf.cell((x, y)).map(|c| c.symbol()).unwrap_or(" "))
            .collect()
    }

    #[test]
    fn wide_area_renders_every_round() {
        let bracket = bracket();
        let area = Rect::new(0, 0, 40, 12);
        let mut buf = Buffer::empty(area);
        BracketColumns {
            bracket: &bracket,
            view_round: KnockoutRound::SemiFinal,
            selected_tie: 0,
        }
        .render(area, &mut buf);

        let all: String = (0..area.height).map(|y| row_text(&buf, area, y)).collect();
        assert!(all.contains("Hornets"));
        assert!(all.contains("Semifinals"));
        assert!(all.contains("Final"));
    }

    #[test]
    fn narrow_area_collapses_to_the_focused_round() {
        let bracket = bracket();
        let area = Rect::new(0, 0, 18, 10);
        let mut buf = Buffer::empty(area);
        BracketColumns {
            bracket: &bracket,
            view_round: KnockoutRound::Final,
            selected_tie: 0,
        }
        .render(area, &mut buf);

        let all: String = (0..area.height).map(|y| row_text(&buf, area, y)).collect();
        assert!(all.contains("Final"));
        assert!(all.contains("TBD"));
        assert!(!all.contains("Comets"));
    }

    #[test]
    fn selected_tie_carries_a_marker() {
        let bracket = bracket();
        let area = Rect::new(0, 0, 40, 12);
        let mut buf = Buffer::empty(area);
        BracketColumns {
            bracket: &bracket,
            view_round: KnockoutRound::SemiFinal,
            selected_tie: 1,
        }
        .render(area, &mut buf);

        let all: String = (0..area.height).map(|y| row_text(&buf, area, y)).collect();
        assert!(all.contains("> Pelicans"));
    }
}
