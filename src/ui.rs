use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{
    Block, Borders, Cell, Clear, List, ListItem, ListState, Paragraph, Row, Table, TableState,
    Wrap,
};

use crate::app::{App, FocusPane, InputMode};
use crate::controller::TablePhase;
use crate::model::TableKind;

const BG: Color = Color::Rgb(9, 15, 25);
const PANEL: Color = Color::Rgb(16, 27, 44);
const ACCENT: Color = Color::Rgb(52, 211, 153);
const MUTED: Color = Color::Rgb(140, 156, 178);
const WARN: Color = Color::Rgb(251, 191, 36);
const ERROR: Color = Color::Rgb(248, 113, 113);
const SELECTED: Color = Color::Rgb(24, 36, 58);
const PL_A: Color = Color::Rgb(17, 94, 89);
const PL_B: Color = Color::Rgb(30, 64, 175);
const PL_C: Color = Color::Rgb(55, 48, 163);

const CATALOG_WIDTH: u16 = 30;

pub fn render(frame: &mut Frame, app: &App) {
    let root = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(6),
            Constraint::Length(1),
        ])
        .split(frame.area());

    render_header(frame, root[0], app);
    render_body(frame, root[1], app);
    render_footer(frame, root[2], app);

    match app.mode() {
        InputMode::Describe => render_describe_modal(frame, app),
        InputMode::Logs => render_logs_modal(frame, app),
        InputMode::Create => render_create_modal(frame, app),
        InputMode::Namespace => render_namespace_modal(frame, app),
        InputMode::Normal | InputMode::Filter => {}
    }

    if app.show_help() {
        render_help_modal(frame, app);
    }
}

fn render_header(frame: &mut Frame, area: Rect, app: &App) {
    let left = Powerline::default()
        .segment(" KUBEGLASS ", Color::Black, ACCENT)
        .segment(
            format!(" ctx {} ", compact_text(app.context(), 24)),
            Color::White,
            PL_A,
        )
        .segment(
            format!(" ns {} ", app.namespace_scope().label()),
            Color::White,
            PL_B,
        )
        .into_spans(BG);

    let endpoint = display_cluster_endpoint(app.cluster());
    let right = vec![Span::styled(
        format!(" {} ", compact_text(&endpoint, 48)),
        Style::default().fg(MUTED).bg(BG),
    )];
    let right_width = spans_width(&right) as u16;
    if area.width < 42 || right_width >= area.width {
        frame.render_widget(
            Paragraph::new(Line::from(left)).style(Style::default().bg(BG).fg(Color::White)),
            area,
        );
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(1), Constraint::Length(right_width)])
        .split(area);
    frame.render_widget(
        Paragraph::new(Line::from(left)).style(Style::default().bg(BG).fg(Color::White)),
        chunks[0],
    );
    frame.render_widget(
        Paragraph::new(Line::from(right))
            .style(Style::default().bg(BG))
            .alignment(Alignment::Right),
        chunks[1],
    );
}

fn render_body(frame: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(CATALOG_WIDTH), Constraint::Min(20)])
        .split(area);

    render_catalog(frame, chunks[0], app, app.focus() == FocusPane::Catalog);
    render_table(frame, chunks[1], app, app.focus() == FocusPane::Table);
}

fn render_catalog(frame: &mut Frame, area: Rect, app: &App, focused: bool) {
    let active = app.table().kind();
    let visible = app.visible_kinds();
    let items = visible
        .iter()
        .map(|(_, descriptor)| {
            let marker = if active.is_some_and(|kind| kind.same_kind(descriptor)) {
                "● "
            } else {
                "  "
            };
            let group = descriptor.group();
            let mut spans = vec![
                Span::styled(marker, Style::default().fg(ACCENT)),
                Span::styled(descriptor.name.clone(), Style::default().fg(Color::White)),
            ];
            if !group.is_empty() {
                spans.push(Span::styled(
                    format!(" {}", compact_text(group, 14)),
                    Style::default().fg(MUTED),
                ));
            }
            ListItem::new(Line::from(spans))
        })
        .collect::<Vec<_>>();

    let title = if app.filter().is_empty() {
        format!("Kinds ({})", visible.len())
    } else {
        format!("Kinds /{} ({})", app.filter(), visible.len())
    };
    let title = if app.catalog().is_fallback() {
        format!("{title} [fallback]")
    } else {
        title
    };

    let list = List::new(items)
        .block(panel_block(title, focused))
        .highlight_style(
            Style::default()
                .bg(SELECTED)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("󰜴 ");

    let mut state = ListState::default();
    if !visible.is_empty() {
        state.select(Some(app.catalog_selected().min(visible.len() - 1)));
    }
    frame.render_stateful_widget(list, area, &mut state);
}

fn render_table(frame: &mut Frame, area: Rect, app: &App, focused: bool) {
    let controller = app.table();
    let data = controller.table();
    let title = match controller.phase() {
        TablePhase::Idle => "Resources".to_string(),
        TablePhase::Loading => format!("{} loading...", controller.title(app.namespace_scope())),
        _ => format!(
            "{} [{}]",
            controller.title(app.namespace_scope()),
            data.rows.len()
        ),
    };

    if controller.phase() == TablePhase::Idle {
        let hint = Paragraph::new("Select a resource kind and press Enter")
            .alignment(Alignment::Center)
            .block(panel_block(title, focused))
            .style(Style::default().fg(MUTED));
        frame.render_widget(hint, area);
        return;
    }

    let cell_style = match data.kind {
        TableKind::Error => Style::default().fg(ERROR),
        TableKind::Message => Style::default().fg(MUTED),
        TableKind::Items => Style::default().fg(Color::White),
    };

    let header_row = Row::new(data.headers.iter().map(|header| {
        Cell::from(header.clone()).style(Style::default().add_modifier(Modifier::BOLD))
    }))
    .height(1)
    .style(Style::default().fg(ACCENT));

    let rows = data.rows.iter().map(|row| {
        Row::new(
            row.cells
                .iter()
                .map(|cell| Cell::from(cell.clone()).style(cell_style)),
        )
    });

    let mut block = panel_block(title, focused);
    if let Some(refreshed) = data.last_refreshed {
        block = block.title_bottom(
            Line::from(format!(" refreshed {} ", refreshed.format("%H:%M:%S")))
                .alignment(Alignment::Right)
                .style(Style::default().fg(MUTED)),
        );
    }

    let table = Table::new(rows, column_constraints(&data.widths))
        .header(header_row)
        .block(block)
        .column_spacing(1)
        .row_highlight_style(
            Style::default()
                .bg(SELECTED)
                .add_modifier(Modifier::BOLD),
        )
        .cell_highlight_style(Style::default().fg(Color::Black).bg(ACCENT))
        .highlight_symbol("󰜴 ");

    let cursor = controller.cursor();
    let mut state = TableState::default();
    if !data.rows.is_empty() {
        state.select(Some(cursor.row));
        if focused {
            state.select_column(Some(cursor.column));
        }
    }
    frame.render_stateful_widget(table, area, &mut state);
}

fn render_footer(frame: &mut Frame, area: Rect, app: &App) {
    if app.mode() == InputMode::Filter {
        let spans = Powerline::default()
            .segment(" 󰈲 flt ", Color::Black, WARN)
            .segment(format!(" /{}▏", app.filter()), Color::White, PL_B)
            .into_spans(BG);
        frame.render_widget(
            Paragraph::new(Line::from(spans)).style(Style::default().bg(BG)),
            area,
        );
        return;
    }

    let (label, label_bg) = mode_badge(app.mode());
    let status = app.status();
    let status_bg = if is_failure(status) { ERROR } else { PL_B };
    let status_fg = if is_failure(status) {
        Color::Black
    } else {
        Color::White
    };
    let width_hint = area.width.saturating_sub(24).min(120) as usize;
    let spans = Powerline::default()
        .segment(label, Color::White, label_bg)
        .segment(
            format!(
                " {} {} ",
                footer_status_icon(status),
                compact_text(status, width_hint.max(24))
            ),
            status_fg,
            status_bg,
        )
        .into_spans(BG);

    let hints = vec![Span::styled(
        format!(" {} ", key_hints(app.mode())),
        Style::default().fg(MUTED).bg(BG),
    )];
    let left_width = spans_width(&spans) as u16;
    let right_width = (spans_width(&hints) as u16).min(area.width.saturating_sub(left_width));
    if right_width < 12 {
        frame.render_widget(
            Paragraph::new(Line::from(spans)).style(Style::default().bg(BG)),
            area,
        );
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(1), Constraint::Length(right_width)])
        .split(area);
    frame.render_widget(
        Paragraph::new(Line::from(spans)).style(Style::default().bg(BG)),
        chunks[0],
    );
    frame.render_widget(
        Paragraph::new(Line::from(hints))
            .style(Style::default().bg(BG))
            .alignment(Alignment::Right),
        chunks[1],
    );
}

fn mode_badge(mode: InputMode) -> (&'static str, Color) {
    match mode {
        InputMode::Normal | InputMode::Filter => (" 󰘳 nrm ", PL_A),
        InputMode::Namespace => (" 󰅩 ns ", PL_C),
        InputMode::Describe => (" 󰈈 dsc ", PL_C),
        InputMode::Logs => (" 󰍩 log ", PL_C),
        InputMode::Create => (" 󰐕 new ", PL_C),
    }
}

fn key_hints(mode: InputMode) -> &'static str {
    match mode {
        InputMode::Normal => "Enter open  Tab focus  w watch  d describe  l logs  c create  n ns  ? help",
        InputMode::Filter => "Enter keep  Esc clear",
        InputMode::Namespace => "Enter pick  a all  Esc close",
        InputMode::Describe => "j/k scroll  g/G ends  Esc close",
        InputMode::Logs => "w watch  r refresh  j/k scroll  Esc close",
        InputMode::Create => "Ctrl+A apply  e edit  Ctrl+R reset  Esc close",
    }
}

fn render_describe_modal(frame: &mut Frame, app: &App) {
    let Some(view) = app.describe() else {
        return;
    };

    let area = centered_rect(84, 82, frame.area());
    frame.render_widget(Clear, area);
    let modal = Paragraph::new(highlight_yaml(&view.content))
        .scroll((view.scroll, 0))
        .block(modal_block(view.title.clone(), ACCENT))
        .style(Style::default().fg(Color::White));
    frame.render_widget(modal, area);
}

fn render_logs_modal(frame: &mut Frame, app: &App) {
    let Some(logs) = app.logs() else {
        return;
    };

    let area = centered_rect(88, 84, frame.area());
    frame.render_widget(Clear, area);
    let border = if logs.is_watching() { WARN } else { ACCENT };
    let view = logs.text();
    let modal = Paragraph::new(Text::from(view.content.clone()))
        .wrap(Wrap { trim: false })
        .scroll((view.scroll, 0))
        .block(modal_block(logs.title(), border))
        .style(Style::default().fg(Color::White));
    frame.render_widget(modal, area);
}

fn render_create_modal(frame: &mut Frame, app: &App) {
    let Some(draft) = app.draft() else {
        return;
    };

    let area = centered_rect(80, 80, frame.area());
    frame.render_widget(Clear, area);
    let title = if draft.is_modified() {
        format!("{} [modified]", draft.title())
    } else {
        draft.title()
    };
    let block = modal_block(title, ACCENT).title_bottom(
        Line::from(format!(" {} ", key_hints(InputMode::Create)))
            .alignment(Alignment::Center)
            .style(Style::default().fg(MUTED)),
    );
    let modal = Paragraph::new(highlight_yaml(&draft.buffer))
        .scroll((draft.scroll, 0))
        .block(block)
        .style(Style::default().fg(Color::White));
    frame.render_widget(modal, area);
}

fn render_namespace_modal(frame: &mut Frame, app: &App) {
    let Some(picker) = app.namespace_picker() else {
        return;
    };

    let area = centered_rect(40, 60, frame.area());
    frame.render_widget(Clear, area);
    let block = modal_block("Namespace".to_string(), ACCENT);

    if picker.loading {
        frame.render_widget(
            Paragraph::new("Loading namespaces...")
                .block(block)
                .style(Style::default().fg(MUTED)),
            area,
        );
        return;
    }

    let current = app.namespace_scope().namespace();
    let items = picker
        .items
        .iter()
        .map(|name| {
            let style = if current == Some(name.as_str()) {
                Style::default().fg(ACCENT)
            } else {
                Style::default().fg(Color::White)
            };
            ListItem::new(Span::styled(name.clone(), style))
        })
        .collect::<Vec<_>>();

    let list = List::new(items)
        .block(block)
        .highlight_style(
            Style::default()
                .bg(SELECTED)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("󰜴 ");
    let mut state = ListState::default();
    state.select(Some(picker.selected));
    frame.render_stateful_widget(list, area, &mut state);
}

fn render_help_modal(frame: &mut Frame, app: &App) {
    let area = centered_rect(70, 70, frame.area());
    frame.render_widget(Clear, area);

    let mut lines = vec![
        Line::from(format!(
            "kubeglass help  context:{}  scope:{}",
            app.context(),
            app.namespace_scope()
        )),
        Line::from(""),
    ];
    for line in HELP_LINES {
        lines.push(Line::from(*line));
    }

    let modal = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(modal_block("Help".to_string(), ACCENT))
        .style(Style::default().fg(Color::White));
    frame.render_widget(modal, area);
}

const HELP_LINES: &[&str] = &[
    "Navigation: j/k or arrows move  g/G top/bottom  PgUp/PgDn page  Tab switch pane",
    "Table: Left/Right move the cell cursor  Enter describe the selected row",
    "Kinds: Enter load  / filter  R rediscover kinds",
    "Refresh: r reload once  w toggle watch (table every 1s, logs every 2s)",
    "Inspect: d or Ctrl+D describe  l pod logs",
    "Create: c open template  e edit in $EDITOR  Ctrl+A apply  Ctrl+R reset",
    "Namespaces: n pick  a all namespaces (inside picker)",
    "Quit: q or Ctrl+C",
];

fn panel_block(title: String, focused: bool) -> Block<'static> {
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(if focused {
            Style::default().fg(ACCENT)
        } else {
            Style::default().fg(MUTED)
        })
        .style(Style::default().bg(PANEL))
}

fn modal_block(title: String, border: Color) -> Block<'static> {
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border))
        .style(Style::default().bg(PANEL))
}

fn is_failure(status: &str) -> bool {
    let status = status.to_ascii_lowercase();
    [
        "failed",
        "error",
        "timed out",
        "unreachable",
        "refused",
        "forbidden",
        "unsupported",
    ]
    .iter()
    .any(|needle| status.contains(needle))
}

fn footer_status_icon(status_text: &str) -> &'static str {
    if is_failure(status_text) { "󰅚" } else { "󰄬" }
}

fn highlight_yaml(input: &str) -> Text<'static> {
    input
        .lines()
        .map(|line| {
            yaml_tokens(line)
                .into_iter()
                .map(|(token, text)| Span::styled(text.to_string(), token.style()))
                .collect::<Vec<_>>()
        })
        .map(Line::from)
        .collect::<Vec<_>>()
        .into()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum YamlToken {
    Plain,
    Comment,
    Dash,
    Key,
    Colon,
    Quoted,
    Literal,
    Number,
    Flow,
    Scalar,
}

impl YamlToken {
    fn of_value(value: &str) -> Self {
        if value.starts_with(['"', '\'']) {
            Self::Quoted
        } else if matches!(value, "true" | "false" | "null" | "~") {
            Self::Literal
        } else if value.parse::<f64>().is_ok() {
            Self::Number
        } else if value.starts_with(['{', '[']) {
            Self::Flow
        } else {
            Self::Scalar
        }
    }

    fn style(self) -> Style {
        let fg = match self {
            Self::Plain => Color::White,
            Self::Comment | Self::Colon | Self::Flow => MUTED,
            Self::Dash => ACCENT,
            Self::Key => Color::Rgb(103, 232, 249),
            Self::Quoted => Color::Rgb(125, 211, 252),
            Self::Literal => WARN,
            Self::Number => Color::Rgb(251, 146, 60),
            Self::Scalar => Color::Rgb(147, 197, 253),
        };
        Style::default().fg(fg)
    }
}

fn yaml_tokens(line: &str) -> Vec<(YamlToken, &str)> {
    let body = line.trim_start_matches([' ', '\t']);
    let mut tokens = vec![(YamlToken::Plain, &line[..line.len() - body.len()])];
    if body.starts_with('#') {
        tokens.push((YamlToken::Comment, body));
        return tokens;
    }

    let body = match body.strip_prefix("- ") {
        Some(rest) => {
            tokens.push((YamlToken::Dash, "- "));
            rest
        }
        None => body,
    };

    match body.split_once(':') {
        Some((key, value)) if is_yaml_key(key.trim_end()) => {
            tokens.push((YamlToken::Key, key.trim_end()));
            tokens.push((YamlToken::Colon, ":"));
            let value = value.trim();
            if !value.is_empty() {
                tokens.push((YamlToken::Plain, " "));
                tokens.push((YamlToken::of_value(value), value));
            }
        }
        _ if !body.is_empty() => tokens.push((YamlToken::Plain, body)),
        _ => {}
    }
    tokens
}

fn is_yaml_key(key: &str) -> bool {
    !key.is_empty() && !key.contains(' ')
}

#[derive(Default)]
struct Powerline {
    segments: Vec<(String, Color, Color)>,
}

impl Powerline {
    fn segment(mut self, content: impl Into<String>, fg: Color, bg: Color) -> Self {
        self.segments.push((content.into(), fg, bg));
        self
    }

    // Each separator blends into the background of whatever follows it.
    fn into_spans(self, tail_bg: Color) -> Vec<Span<'static>> {
        let next_bgs = self
            .segments
            .iter()
            .skip(1)
            .map(|(_, _, bg)| *bg)
            .chain(std::iter::once(tail_bg))
            .collect::<Vec<_>>();
        self.segments
            .into_iter()
            .zip(next_bgs)
            .flat_map(|((content, fg, bg), next_bg)| {
                [
                    Span::styled(
                        content,
                        Style::default().fg(fg).bg(bg).add_modifier(Modifier::BOLD),
                    ),
                    Span::styled("\u{e0b0}", Style::default().fg(bg).bg(next_bg)),
                ]
            })
            .collect()
    }
}

fn spans_width(spans: &[Span<'_>]) -> usize {
    spans.iter().map(|span| span.content.chars().count()).sum()
}

fn compact_text(value: &str, max_chars: usize) -> String {
    if value.chars().count() <= max_chars {
        return value.to_string();
    }

    if max_chars <= 1 {
        return "…".to_string();
    }

    let mut out = value
        .chars()
        .take(max_chars.saturating_sub(1))
        .collect::<String>();
    out.push('…');
    out
}

fn display_cluster_endpoint(cluster: &str) -> String {
    let trimmed = cluster.trim().trim_end_matches('/');
    trimmed
        .strip_prefix("https://")
        .or_else(|| trimmed.strip_prefix("http://"))
        .unwrap_or(trimmed)
        .to_string()
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

fn column_constraints(widths: &[u16]) -> Vec<Constraint> {
    match widths.split_last() {
        None => vec![Constraint::Percentage(100)],
        Some((last, rest)) => rest
            .iter()
            .map(|width| Constraint::Length(*width))
            .chain(std::iter::once(Constraint::Min(*last)))
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::{
        ACCENT, BG, Powerline, WARN, YamlToken, column_constraints, compact_text,
        display_cluster_endpoint, render, yaml_tokens,
    };
    use crate::app::App;
    use crate::catalog::DiscoveryReport;
    use crate::input::Action;
    use crate::model::NamespaceScope;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;
    use ratatui::layout::Constraint;
    use ratatui::style::Color;

    fn screen_text(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(120, 30)).unwrap();
        terminal.draw(|frame| render(frame, app)).unwrap();
        let buffer = terminal.backend().buffer().clone();
        buffer
            .content()
            .chunks(buffer.area.width as usize)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn compacts_long_text() {
        assert_eq!(compact_text("deployments", 6), "deplo…");
        assert_eq!(compact_text("pods", 6), "pods");
    }

    #[test]
    fn strips_endpoint_scheme() {
        assert_eq!(
            display_cluster_endpoint("https://10.0.0.1:6443/"),
            "10.0.0.1:6443"
        );
    }

    #[test]
    fn last_column_stretches() {
        assert_eq!(
            column_constraints(&[20, 10]),
            vec![Constraint::Length(20), Constraint::Min(10)]
        );
    }

    #[test]
    fn renders_catalog_and_status() {
        let mut app = App::new(
            "https://cluster".to_string(),
            "kind-dev".to_string(),
            NamespaceScope::Named("dev".to_string()),
        );
        app.apply_discovery(Ok(DiscoveryReport::default()));

        let text = screen_text(&app);
        assert!(text.contains("KUBEGLASS"));
        assert!(text.contains("Kinds (5) [fallback]"));
        assert!(text.contains("configmaps"));
        assert!(text.contains("built-in kinds"));
    }

    #[test]
    fn renders_help_modal() {
        let mut app = App::new(
            "https://cluster".to_string(),
            "kind-dev".to_string(),
            NamespaceScope::All,
        );
        app.apply_action(Action::ToggleHelp);
        assert!(screen_text(&app).contains("kubeglass help"));
    }

    #[test]
    fn yaml_lines_split_into_typed_tokens() {
        assert_eq!(
            yaml_tokens("  replicas: 3"),
            vec![
                (YamlToken::Plain, "  "),
                (YamlToken::Key, "replicas"),
                (YamlToken::Colon, ":"),
                (YamlToken::Plain, " "),
                (YamlToken::Number, "3"),
            ]
        );
        assert_eq!(
            yaml_tokens("- name: \"web\""),
            vec![
                (YamlToken::Plain, ""),
                (YamlToken::Dash, "- "),
                (YamlToken::Key, "name"),
                (YamlToken::Colon, ":"),
                (YamlToken::Plain, " "),
                (YamlToken::Quoted, "\"web\""),
            ]
        );
        assert_eq!(
            yaml_tokens("# managed"),
            vec![(YamlToken::Plain, ""), (YamlToken::Comment, "# managed")]
        );
        assert_eq!(
            yaml_tokens("metadata:"),
            vec![
                (YamlToken::Plain, ""),
                (YamlToken::Key, "metadata"),
                (YamlToken::Colon, ":"),
            ]
        );
        assert_eq!(YamlToken::of_value("null"), YamlToken::Literal);
        assert_eq!(YamlToken::of_value("[a, b]"), YamlToken::Flow);
        assert_eq!(YamlToken::of_value("Running"), YamlToken::Scalar);
    }

    #[test]
    fn powerline_separators_blend_into_the_next_segment() {
        let spans = Powerline::default()
            .segment(" a ", Color::Black, ACCENT)
            .segment(" b ", Color::White, WARN)
            .into_spans(BG);

        assert_eq!(spans.len(), 4);
        assert_eq!(spans[0].content, " a ");
        assert_eq!(spans[1].style.fg, Some(ACCENT));
        assert_eq!(spans[1].style.bg, Some(WARN));
        assert_eq!(spans[3].style.fg, Some(WARN));
        assert_eq!(spans[3].style.bg, Some(BG));
    }
}
