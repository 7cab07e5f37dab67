//! Draws a list session with ratatui widgets.
//!
//! Layout, top to bottom: the scrollable list (a blank separator row, then one
//! four-row rounded block per visible entry), the page dots, and the help footer.

use ratatui::Frame;
use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Padding, Paragraph, Widget};

use docmon_core::keymap;
use docmon_core::model::{Card, ListEntry};
use docmon_core::state::{ListSession, ROWS_PER_ITEM};

use super::theme::Theme;

pub const LOADING: &str = "Loading ...";

const DOT: &str = "•";
const FIELD_GAP: &str = "  ";

/// Draw the whole screen for `session`. Same state, same buffer.
pub fn draw<E: ListEntry>(frame: &mut Frame, session: &ListSession<E>, theme: &Theme) {
    let area = frame.area();
    if !session.is_loaded() {
        frame.render_widget(Paragraph::new(LOADING).style(theme.help_style()), area);
        return;
    }

    let [list_area, dots_area, help_area] = Layout::vertical([
        Constraint::Length(session.list_height()),
        Constraint::Length(1),
        Constraint::Min(0),
    ])
    .areas(area);

    render_list(session, theme, list_area, frame.buffer_mut());
    frame.render_widget(page_indicator(session, theme), dots_area);
    frame.render_widget(Paragraph::new(help_lines(session, theme)), help_area);
}

/// Render every visible block into an off-screen buffer, then copy the rows that fit,
/// scrolled just far enough to keep the cursor block whole.
fn render_list<E: ListEntry>(session: &ListSession<E>, theme: &Theme, area: Rect, buf: &mut Buffer) {
    let visible = session.visible();
    let content_height = 1 + visible.len() as u16 * ROWS_PER_ITEM;
    let mut content = Buffer::empty(Rect::new(0, 0, area.width, content_height));

    for (index, entry) in visible.iter().enumerate() {
        let block_area = Rect::new(0, 1 + index as u16 * ROWS_PER_ITEM, area.width, ROWS_PER_ITEM);
        card_widget(&entry.card(), index == session.cursor(), theme).render(block_area, &mut content);
    }

    let offset = scroll_offset(session.cursor(), area.height);
    let rows = area.height.min(content_height.saturating_sub(offset));
    for y in 0..rows {
        for x in 0..area.width {
            buf[(area.x + x, area.y + y)] = content[(x, y + offset)].clone();
        }
    }
}

/// Rows to skip so the block at `cursor` ends inside a list area `height` rows tall.
fn scroll_offset(cursor: usize, height: u16) -> u16 {
    let cursor_end = 1 + (cursor as u16 + 1) * ROWS_PER_ITEM;
    cursor_end.saturating_sub(height)
}

fn card_widget<'a>(card: &Card<'a>, selected: bool, theme: &Theme) -> Paragraph<'a> {
    let block = Block::bordered()
        .border_type(BorderType::Rounded)
        .border_style(theme.border_style(selected))
        .padding(Padding::horizontal(1));

    Paragraph::new(vec![
        Line::from(Span::styled(card.title, theme.name_style())),
        Line::from(vec![
            Span::styled(card.detail, theme.detail_style()),
            Span::raw(FIELD_GAP),
            Span::styled(card.tag, theme.tag_style()),
            Span::raw(FIELD_GAP),
            Span::styled(card.status, theme.tone_style(card.tone)),
        ]),
    ])
    .block(block)
}

fn page_indicator<E: ListEntry>(session: &ListSession<E>, theme: &Theme) -> Line<'static> {
    let paginator = session.paginator();
    let mut spans = Vec::with_capacity(paginator.page_count() * 2);
    for page in 0..paginator.page_count() {
        if page > 0 {
            spans.push(Span::raw(" "));
        }
        spans.push(Span::styled(DOT, theme.dot_style(page == paginator.page())));
    }
    Line::from(spans)
}

fn help_lines<E: ListEntry>(session: &ListSession<E>, theme: &Theme) -> Vec<Line<'static>> {
    let failure = session.last_command_failure().map(|f| {
        Span::styled(
            format!("⚠ {}: {}", f.command, f.error),
            theme.error_style(),
        )
    });

    if !session.help_expanded() {
        let mut spans = vec![Span::styled(
            keymap::short_help(session.commands()),
            theme.help_style(),
        )];
        if let Some(failure) = failure {
            spans.push(Span::styled(" · ", theme.help_style()));
            spans.push(failure);
        }
        return vec![Line::from(spans)];
    }

    let mut lines: Vec<Line<'static>> = keymap::extended_help(session.commands())
        .into_iter()
        .map(|text| Line::styled(text, theme.key_hint_style()))
        .collect();
    if let Some(failure) = failure {
        lines.push(Line::from(failure));
    }
    lines
}

#[cfg(test)]
mod tests {
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;
    use ratatui::style::Modifier;

    use super::*;
    use docmon_core::command::{CommandSet, LifecycleCommand, LifecycleOp};
    use docmon_core::engine::EngineError;
    use docmon_core::keymap::Key;
    use docmon_core::model::{Container, ContainerState, Volume};
    use docmon_core::reducer::{Effect, SessionEvent};

    fn containers(n: usize) -> Vec<Container> {
        (0..n)
            .map(|i| {
                Container::new(format!("{i:064}"), format!("/svc{i}"), "alpine:3.20")
                    .with_status(ContainerState::Running, "Up 1 minute")
            })
            .collect()
    }

    fn loaded<E: ListEntry>(
        mut session: ListSession<E>,
        width: u16,
        height: u16,
        entries: Vec<E>,
    ) -> ListSession<E> {
        session.handle(SessionEvent::Resize { width, height });
        let seq = session
            .handle(SessionEvent::Tick)
            .into_iter()
            .find_map(|e| match e {
                Effect::Fetch { seq } => Some(seq),
                _ => None,
            })
            .unwrap();
        session.handle(SessionEvent::RefreshCompleted {
            seq,
            result: Ok(entries),
        });
        session
    }

    /// Draw on a test terminal the size of the session's viewport.
    fn screen<E: ListEntry>(session: &ListSession<E>, theme: &Theme) -> Buffer {
        let viewport = session.viewport();
        let mut terminal =
            Terminal::new(TestBackend::new(viewport.width, viewport.height)).unwrap();
        terminal.draw(|f| draw(f, session, theme)).unwrap();
        terminal.backend().buffer().clone()
    }

    fn row(buf: &Buffer, y: u16) -> String {
        (0..buf.area.width).map(|x| buf[(x, y)].symbol()).collect()
    }

    #[test]
    fn test_loading_placeholder_before_first_refresh() {
        let mut session: ListSession<Container> = ListSession::new(CommandSet::none());
        session.handle(SessionEvent::Resize {
            width: 20,
            height: 4,
        });
        let buf = screen(&session, &Theme::default());
        assert!(row(&buf, 0).starts_with(LOADING));
        assert_eq!(row(&buf, 1).trim(), "");
    }

    #[test]
    fn test_layout_rows_and_widths() {
        // 14 rows: 12 for the list (3 blocks), page dots, help.
        let session = loaded(
            ListSession::new(CommandSet::lifecycle("SIGKILL")),
            40,
            14,
            containers(5),
        );
        let buf = screen(&session, &Theme::default());
        assert_eq!(row(&buf, 0).trim(), "");
        assert_eq!(row(&buf, 1), format!("╭{}╮", "─".repeat(38)));
        assert_eq!(row(&buf, 2), format!("│ svc0{}│", " ".repeat(33)));
        assert_eq!(row(&buf, 4), format!("╰{}╯", "─".repeat(38)));
        assert_eq!(row(&buf, 12).trim_end(), "• •");
        assert!(row(&buf, 13).starts_with("↑/↓ navigate · ←/→ page"));
    }

    #[test]
    fn test_fields_show_truncated_id_tag_and_status() {
        let session = loaded(
            ListSession::new(CommandSet::lifecycle("SIGKILL")),
            80,
            14,
            containers(1),
        );
        let fields = row(&screen(&session, &Theme::default()), 3);
        let id24 = "0".repeat(24);
        assert!(fields.starts_with(&format!("│ {id24}  alpine:3.20  Up 1 minute")));
        assert!(!fields.contains(&"0".repeat(25)));
    }

    #[test]
    fn test_cursor_block_has_highlighted_border() {
        let theme = Theme::default();
        let mut session = loaded(ListSession::new(CommandSet::none()), 30, 14, containers(3));
        session.handle(SessionEvent::Key(Key::Down));
        let buf = screen(&session, &theme);

        // Block tops sit at rows 1, 5, 9.
        assert_eq!(buf[(0, 1)].fg, theme.palette.border);
        assert_eq!(buf[(0, 5)].fg, theme.palette.border_selected);
        assert!(buf[(0, 5)].modifier.contains(Modifier::BOLD));
        assert_eq!(buf[(29, 7)].fg, theme.palette.border_selected);
        assert_eq!(buf[(0, 9)].fg, theme.palette.border);
    }

    #[test]
    fn test_draw_is_idempotent() {
        let theme = Theme::default();
        let session = loaded(
            ListSession::new(CommandSet::lifecycle("SIGKILL")),
            60,
            20,
            containers(7),
        );
        assert_eq!(screen(&session, &theme), screen(&session, &theme));
    }

    #[test]
    fn test_active_page_dot() {
        let theme = Theme::default();
        let mut session = loaded(ListSession::new(CommandSet::none()), 30, 6, containers(3));
        session.handle(SessionEvent::Key(Key::Right));
        let buf = screen(&session, &theme);
        assert_eq!(row(&buf, 4).trim_end(), "• • •");
        assert_eq!(buf[(0, 4)].fg, theme.palette.dot_inactive);
        assert_eq!(buf[(2, 4)].fg, theme.palette.dot_active);
        assert_eq!(buf[(4, 4)].fg, theme.palette.dot_inactive);
    }

    #[test]
    fn test_list_scrolls_to_cursor_block() {
        // A 12-row list area holds three blocks but not the separator as well; the
        // third block's bottom border needs one row of scroll.
        let mut session = loaded(ListSession::new(CommandSet::none()), 20, 14, containers(3));
        assert_eq!(session.paginator().per_page(), 3);
        let top = screen(&session, &Theme::default());
        assert_eq!(row(&top, 0).trim(), "");
        // Unscrolled, the last block is cut above its bottom border.
        assert!(row(&top, 11).starts_with('│'));

        session.handle(SessionEvent::Key(Key::Down));
        session.handle(SessionEvent::Key(Key::Down));
        let buf = screen(&session, &Theme::default());
        assert!(row(&buf, 0).starts_with('╭'));
        assert!(row(&buf, 11).starts_with('╰'));
        assert_eq!(row(&buf, 12).trim_end(), "•");
    }

    #[test]
    fn test_expanded_help_fills_footer() {
        let mut session = loaded(
            ListSession::new(CommandSet::lifecycle("SIGKILL")),
            60,
            24,
            containers(2),
        );
        session.handle(SessionEvent::Key(Key::Char('?')));
        let buf = screen(&session, &Theme::default());
        // 14-row list, dots on row 14, 8 legend rows below.
        assert_eq!(row(&buf, 14).trim_end(), "•");
        assert!((15..23).any(|y| row(&buf, y).contains("force kill container")));
        assert!(row(&buf, 22).contains("hide help"));
        assert_eq!(row(&buf, 23).trim(), "");
    }

    #[test]
    fn test_command_failure_on_help_line() {
        let theme = Theme::default();
        let mut session = loaded(
            ListSession::new(CommandSet::lifecycle("SIGKILL")),
            200,
            10,
            containers(1),
        );
        session.handle(SessionEvent::CommandCompleted {
            command: LifecycleCommand {
                target: "0123456789abcdef".into(),
                op: LifecycleOp::Kill {
                    signal: "SIGKILL".into(),
                },
            },
            result: Err(EngineError::Rejected {
                operation: "kill",
                id: "0123456789abcdef".into(),
                message: "container is not running".into(),
            }),
        });
        let buf = screen(&session, &theme);
        let help = row(&buf, 9);
        assert!(help.contains("⚠ kill 0123456789ab: kill 0123456789abcdef rejected"));
        let column = help.chars().position(|c| c == '⚠').unwrap() as u16;
        assert_eq!(buf[(column, 9)].fg, theme.palette.error);
    }

    #[test]
    fn test_wide_characters_keep_block_width() {
        let session = loaded(
            ListSession::new(CommandSet::lifecycle("SIGKILL")),
            20,
            6,
            vec![
                Container::new("abc", "/数据库服务数据库服务", "镜像")
                    .with_status(ContainerState::Running, "Up"),
            ],
        );
        let buf = screen(&session, &Theme::default());
        // Scrolled by one row: the block spans rows 0..4.
        assert_eq!(buf[(0, 0)].symbol(), "╭");
        assert_eq!(buf[(19, 0)].symbol(), "╮");
        assert_eq!(buf[(2, 1)].symbol(), "数");
        for y in 1..3 {
            assert_eq!(buf[(0, y)].symbol(), "│");
            assert_eq!(buf[(19, y)].symbol(), "│");
        }
        assert_eq!(buf[(19, 3)].symbol(), "╯");
        assert!(row(&buf, 2).contains("abc  镜"));
    }

    #[test]
    fn test_long_fields_are_clipped_inside_border() {
        let session = loaded(
            ListSession::new(CommandSet::none()),
            16,
            6,
            vec![Volume {
                name: "a-very-long-volume-name".into(),
                created_at: "2024-06-01T09:30:00Z".into(),
                scope: "local".into(),
                status: String::new(),
            }],
        );
        let buf = screen(&session, &Theme::default());
        let title = row(&buf, 1);
        assert_eq!(title, "│ a-very-long- │");
        assert_eq!(Line::from(title.as_str()).width(), 16);
    }

    #[test]
    fn test_volume_help_has_no_lifecycle_keys() {
        let session = loaded(
            ListSession::new(CommandSet::none()),
            80,
            10,
            Vec::<Volume>::new(),
        );
        let help = row(&screen(&session, &Theme::default()), 9);
        assert!(!help.contains("kill"));
        assert!(help.contains("? help"));
    }

    #[test]
    fn test_scroll_offset() {
        assert_eq!(scroll_offset(0, 12), 0);
        assert_eq!(scroll_offset(2, 12), 1);
        assert_eq!(scroll_offset(2, 13), 0);
        assert_eq!(scroll_offset(0, 0), 5);
    }
}
