use tui::backend::Backend;
use tui::layout::{Alignment, Constraint, Layout, Rect};
use tui::style::{Color, Modifier, Style};
use tui::text::{Line, Span};
use tui::widgets::{Block, BorderType, Borders, Clear, Paragraph, Tabs};
use tui::{Frame, Terminal};
use tui_logger::TuiLoggerWidget;

use crate::app::{App, MenuItem};
use crate::components::bracket::BracketColumns;
use crate::components::clock::{ClockFace, format_clock};
use crate::state::app_state::{fan_views_visible, standings_visible};
use crate::state::network::{ERROR_CHAR, LoadingState};
use crate::ui::layout::LayoutAreas;
use courtside_api::{MatchStatus, Penalty, Scoreboard, TeamSide};

static TABS: &[&str; 4] = &["Board", "Standings", "Bracket", "Summary"];

pub fn draw<B>(terminal: &mut Terminal<B>, app: &mut App, loading: LoadingState)
where
    B: Backend,
{
    let current_size = terminal.size().unwrap_or_default();
    if current_size.width <= 10 || current_size.height <= 10 {
        return;
    }

    let mut layout = LayoutAreas::new(current_size);

    terminal
        .draw(|f| {
            layout.update(f.area(), app.settings.full_screen);

            if !app.settings.full_screen {
                draw_tabs(f, layout.tab_bar, app);
            }

            match app.state.active_tab {
                MenuItem::Board => draw_board(f, layout.main, app),
                MenuItem::Standings => draw_standings(f, layout.main, app),
                MenuItem::Bracket => draw_bracket(f, layout.main, app),
                MenuItem::Summary => draw_summary(f, layout.main, app),
                MenuItem::Help => draw_placeholder(
                    f,
                    layout.main,
                    "Help: q=quit  1=Board  2=Standings  3=Bracket  4=Summary  h/l=round  j/k=move  r=refresh  f=fullscreen  \"=logs",
                ),
            }

            if !app.settings.full_screen {
                draw_status_line(f, layout.status, app);
            }

            if app.state.show_logs {
                draw_logs(f, layout.main);
            }

            draw_loading_spinner(f, f.area(), app, loading);
        })
        .unwrap();
}

pub fn default_border<'a>(color: Color) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(color))
}

fn draw_tabs(f: &mut Frame, tab_bar: [Rect; 2], app: &App) {
    let style = Style::default().fg(Color::White);
    let border_type = BorderType::Rounded;

    let tab_index = match app.state.active_tab {
        MenuItem::Board => 0,
        MenuItem::Standings => 1,
        MenuItem::Bracket => 2,
        MenuItem::Summary => 3,
        MenuItem::Help => 0,
    };

    let titles: Vec<Line> = TABS.iter().map(|t| Line::from(*t)).collect();
    let tabs = Tabs::new(titles)
        .block(
            Block::default()
                .borders(Borders::LEFT | Borders::BOTTOM | Borders::TOP)
                .border_type(border_type),
        )
        .highlight_style(Style::default().add_modifier(Modifier::UNDERLINED))
        .select(tab_index)
        .style(style);
    f.render_widget(tabs, tab_bar[0]);

    let help = Paragraph::new("Help: ? ")
        .alignment(Alignment::Right)
        .block(
            Block::default()
                .borders(Borders::RIGHT | Borders::BOTTOM | Borders::TOP)
                .border_type(border_type),
        )
        .style(style);
    f.render_widget(help, tab_bar[1]);
}

// ---------------------------------------------------------------------------
// Display board
// ---------------------------------------------------------------------------

fn draw_board(f: &mut Frame, area: Rect, app: &App) {
    let block = default_border(Color::White).title(" Display Board ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let Some(scoreboard) = app.state.board.scoreboard.as_ref() else {
        let msg = if let Some(err) = app.state.last_error.as_deref() {
            format!("Scoreboard unavailable:\n{err}")
        } else {
            "Waiting for the next match...".to_string()
        };
        f.render_widget(
            Paragraph::new(msg)
                .style(Style::default().fg(Color::DarkGray))
                .alignment(Alignment::Center),
            inner,
        );
        return;
    };

    let penalty_height = if scoreboard.penalties.is_empty() {
        0
    } else {
        (scoreboard.penalties.len() as u16 + 1).min(6)
    };

    let [header, score_area, clock_area, penalty_area] = Layout::vertical([
        Constraint::Length(2),
        Constraint::Length(3),
        Constraint::Fill(1),
        Constraint::Length(penalty_height),
    ])
    .areas(inner);

    let header_text = format!("{}  |  {}", scoreboard.stage, status_label(scoreboard.status));
    f.render_widget(
        Paragraph::new(header_text)
            .style(Style::default().fg(Color::Gray))
            .alignment(Alignment::Center),
        header,
    );

    draw_score_line(f, score_area, scoreboard);
    draw_clock(f, clock_area, app, scoreboard);
    if penalty_height > 0 {
        draw_penalties(f, penalty_area, scoreboard);
    }
}

fn draw_score_line(f: &mut Frame, area: Rect, scoreboard: &Scoreboard) {
    let leader = scoreboard.leader();
    let side_style = |side: TeamSide| {
        if leader == Some(side) {
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        }
    };

    let line = Line::from(vec![
        Span::styled(scoreboard.home.short_name.clone(), side_style(TeamSide::Home)),
        Span::styled(
            format!("  {:>3}", scoreboard.home.points),
            side_style(TeamSide::Home),
        ),
        Span::styled("  :  ", Style::default().fg(Color::DarkGray)),
        Span::styled(
            format!("{:<3}  ", scoreboard.away.points),
            side_style(TeamSide::Away),
        ),
        Span::styled(scoreboard.away.short_name.clone(), side_style(TeamSide::Away)),
    ]);

    f.render_widget(Paragraph::new(line).alignment(Alignment::Center), area);
}

fn draw_clock(f: &mut Frame, area: Rect, app: &App, scoreboard: &Scoreboard) {
    let clock = &app.state.board.clock;
    let local = clock.current();
    let flags = clock.flags();

    let label = match scoreboard.status {
        MatchStatus::Final => Some("FINAL".to_string()),
        MatchStatus::Postponed => Some("POSTPONED".to_string()),
        MatchStatus::Scheduled => scoreboard
            .tip_off
            .map(|t| t.format("Tip-off %m/%d %I:%M%p").to_string()),
        _ if flags.is_halftime_break => Some("HALF-TIME".to_string()),
        _ if flags.is_extra_time => {
            Some(format!("EXTRA TIME +{}", format_clock(local.extra_elapsed_seconds)))
        }
        _ => None,
    };

    let seconds = if flags.is_halftime_break {
        local.halftime_pause_remaining
    } else {
        local.remaining_seconds
    };

    let accent = if flags.is_running {
        Color::White
    } else {
        Color::DarkGray
    };

    f.render_widget(ClockFace { seconds, label, accent }, area);
}

fn draw_penalties(f: &mut Frame, area: Rect, scoreboard: &Scoreboard) {
    let mut lines = vec![Line::from(Span::styled(
        "Penalties",
        Style::default().fg(Color::Gray).add_modifier(Modifier::UNDERLINED),
    ))];

    for penalty in scoreboard.penalties.iter().take(area.height.saturating_sub(1) as usize) {
        lines.push(Line::from(Span::styled(
            format_penalty(penalty, scoreboard),
            Style::default().fg(Color::Red),
        )));
    }

    f.render_widget(Paragraph::new(lines).alignment(Alignment::Center), area);
}

fn format_penalty(penalty: &Penalty, scoreboard: &Scoreboard) -> String {
    let team = match penalty.side {
        TeamSide::Home => scoreboard.home.short_name.as_str(),
        TeamSide::Away => scoreboard.away.short_name.as_str(),
    };
    let number = penalty
        .number
        .map(|n| format!("#{n} "))
        .unwrap_or_default();
    let countdown = penalty
        .remaining_seconds
        .map(|s| format!("  {}", format_clock(s)))
        .unwrap_or_default();
    format!("{team}  {number}{}{countdown}", penalty.player)
}

// ---------------------------------------------------------------------------
// Fan dashboard views
// ---------------------------------------------------------------------------

fn draw_standings(f: &mut Frame, area: Rect, app: &App) {
    let block = default_border(Color::White).title(" Standings ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    if !fan_views_visible(app.state.summary.summary.as_ref()) {
        draw_gate_notice(f, inner);
        return;
    }

    let standings = &app.state.standings.standings;
    if !standings_visible(standings) {
        f.render_widget(
            Paragraph::new("No group stage in this tournament")
                .style(Style::default().fg(Color::DarkGray))
                .alignment(Alignment::Center),
            inner,
        );
        return;
    }

    let mut lines: Vec<Line> = Vec::new();
    for group in &standings.groups {
        if group.rows.is_empty() {
            continue;
        }
        lines.push(Line::from(Span::styled(
            group.name.clone(),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::from(Span::styled(
            format!("    {:<16} {:>2} {:>2} {:>2} {:>4} {:>4} {:>4}", "TEAM", "P", "W", "L", "PF", "PA", "PTS"),
            Style::default().fg(Color::DarkGray),
        )));
        for (idx, row) in group.rows.iter().enumerate() {
            lines.push(Line::from(format!(
                "{:>2}. {:<16} {:>2} {:>2} {:>2} {:>4} {:>4} {:>4}",
                idx + 1,
                clip(&row.team, 16),
                row.played,
                row.won,
                row.lost,
                row.points_for,
                row.points_against,
                row.points,
            )));
        }
        lines.push(Line::from(""));
    }

    let offset = app.state.standings.scroll_offset as usize;
    let window: Vec<Line> = lines.into_iter().skip(offset).collect();
    f.render_widget(Paragraph::new(window), inner);
}

fn draw_bracket(f: &mut Frame, area: Rect, app: &App) {
    let block = default_border(Color::White).title(" Bracket ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    if !fan_views_visible(app.state.summary.summary.as_ref()) {
        draw_gate_notice(f, inner);
        return;
    }

    let Some(bracket) = app.state.bracket.bracket.as_ref() else {
        let msg = if let Some(err) = app.state.last_error.as_deref() {
            format!("Bracket load failed:\n{err}")
        } else {
            "Loading bracket...".to_string()
        };
        f.render_widget(
            Paragraph::new(msg)
                .style(Style::default().fg(Color::DarkGray))
                .alignment(Alignment::Center),
            inner,
        );
        return;
    };

    let [key_legend, content] =
        Layout::vertical([Constraint::Length(1), Constraint::Fill(1)]).areas(inner);

    f.render_widget(
        Paragraph::new("Keys: h/l=round  j/k=move")
            .style(Style::default().fg(Color::DarkGray)),
        key_legend,
    );

    f.render_widget(
        BracketColumns {
            bracket,
            view_round: app.state.bracket.view_round,
            selected_tie: app.state.bracket.selected_tie,
        },
        content,
    );
}

fn draw_summary(f: &mut Frame, area: Rect, app: &App) {
    let block = default_border(Color::White).title(" Tournament ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let Some(summary) = app.state.summary.summary.as_ref() else {
        f.render_widget(
            Paragraph::new("No tournament summary published yet")
                .style(Style::default().fg(Color::DarkGray))
                .alignment(Alignment::Center),
            inner,
        );
        return;
    };

    if !fan_views_visible(Some(summary)) {
        draw_gate_notice(f, inner);
        return;
    }

    let mut lines: Vec<Line> = Vec::new();
    lines.push(Line::from(Span::styled(
        summary.name.clone(),
        Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
    )));
    if !summary.season.is_empty() {
        lines.push(Line::from(Span::styled(
            summary.season.clone(),
            Style::default().fg(Color::Gray),
        )));
    }
    lines.push(Line::from(format!(
        "Matches: {} / {}",
        summary.matches_played, summary.matches_total
    )));
    if let Some(champion) = summary.champion.as_deref() {
        lines.push(Line::from(Span::styled(
            format!("Champion: {champion}"),
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        )));
    }
    lines.push(Line::from(""));

    if !summary.top_scorers.is_empty() {
        lines.push(Line::from(Span::styled(
            "Top scorers",
            Style::default().fg(Color::Yellow),
        )));
        for (idx, scorer) in summary.top_scorers.iter().enumerate() {
            lines.push(Line::from(format!(
                "{:>2}. {:<18} {:<14} {:>4} pts  {:>2} g",
                idx + 1,
                clip(&scorer.player, 18),
                clip(&scorer.team, 14),
                scorer.points,
                scorer.games,
            )));
        }
    }

    let offset = app.state.summary.scroll_offset as usize;
    let window: Vec<Line> = lines.into_iter().skip(offset).collect();
    f.render_widget(Paragraph::new(window), inner);
}

fn draw_gate_notice(f: &mut Frame, area: Rect) {
    f.render_widget(
        Paragraph::new("This tournament is private.\nAsk the organizer for the live board link.")
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center),
        area,
    );
}

// ---------------------------------------------------------------------------
// Chrome: status line, log pane, spinner, placeholders
// ---------------------------------------------------------------------------

fn draw_status_line(f: &mut Frame, area: Rect, app: &App) {
    if area.height == 0 {
        return;
    }

    let (dot, dot_style) = if app.state.push.connected {
        ("● live", Style::default().fg(Color::Green))
    } else {
        ("○ polling", Style::default().fg(Color::DarkGray))
    };

    let mut spans = vec![Span::styled(dot, dot_style)];
    if let Some(event_at) = app.state.push.last_event_at.as_deref() {
        spans.push(Span::styled(
            format!("  event {event_at}"),
            Style::default().fg(Color::DarkGray),
        ));
    }
    if let Some(updated) = app.state.board.updated_at.as_deref() {
        spans.push(Span::styled(
            format!("  updated {updated}"),
            Style::default().fg(Color::DarkGray),
        ));
    }
    if let Some(err) = app.state.last_error.as_deref() {
        spans.push(Span::styled(
            format!("  {err}"),
            Style::default().fg(Color::Red),
        ));
    }

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn draw_logs(f: &mut Frame, area: Rect) {
    let [_, log_area] =
        Layout::vertical([Constraint::Fill(1), Constraint::Length(12)]).areas(area);
    f.render_widget(Clear, log_area);
    let widget = TuiLoggerWidget::default()
        .block(default_border(Color::DarkGray).title(" Logs "))
        .style_error(Style::default().fg(Color::Red))
        .style_warn(Style::default().fg(Color::Yellow))
        .style_info(Style::default().fg(Color::Gray))
        .style_debug(Style::default().fg(Color::DarkGray));
    f.render_widget(widget, log_area);
}

fn draw_placeholder(f: &mut Frame, area: Rect, msg: &str) {
    let block = default_border(Color::DarkGray);
    let inner = block.inner(area);
    f.render_widget(block, area);
    f.render_widget(
        Paragraph::new(msg)
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center),
        inner,
    );
}

fn draw_loading_spinner(f: &mut Frame, area: Rect, app: &App, loading: LoadingState) {
    if !loading.is_loading && loading.spinner_char != ERROR_CHAR {
        return;
    }
    let style = match loading.spinner_char {
        ERROR_CHAR => Style::default().fg(Color::Red),
        _ => Style::default().fg(Color::White),
    };
    let spinner = Paragraph::new(loading.spinner_char.to_string())
        .alignment(Alignment::Right)
        .style(style);
    let area = if app.settings.full_screen {
        Rect::new(area.width.saturating_sub(3), area.height.saturating_sub(2), 1, 1)
    } else {
        Rect::new(area.width.saturating_sub(11), 1, 1, 1)
    };
    f.render_widget(spinner, area);
}

fn status_label(status: MatchStatus) -> &'static str {
    match status {
        MatchStatus::Scheduled => "SCHEDULED",
        MatchStatus::InProgress => "LIVE",
        MatchStatus::Break => "BREAK",
        MatchStatus::Final => "FINAL",
        MatchStatus::Postponed => "PPD",
    }
}

fn clip(name: &str, max: usize) -> String {
    name.chars().take(max).collect()
}
