use std::collections::HashSet;
use std::fmt;

use gpui::*;
use log::warn;

use crate::config::SheetConfig;
use crate::error::RenderError;
use crate::sheet::{Rect, Sheet};
use crate::state::{column_label, row_label, CellPosition, EditState};
use crate::Theme;

const GRID_LINE_WIDTH: f32 = 1.0;
const EDIT_BORDER_WIDTH: f32 = 2.0;

/// Identifies one piece of text in a frame, so failures can be reported once.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DrawTarget {
    Cell(CellPosition),
    ColumnLabel(usize),
    RowLabel(usize),
    EditOverlay,
}

impl fmt::Display for DrawTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DrawTarget::Cell(pos) => write!(f, "cell {}", pos.to_reference()),
            DrawTarget::ColumnLabel(col) => write!(f, "column label {}", column_label(*col)),
            DrawTarget::RowLabel(row) => write!(f, "row label {}", row_label(*row)),
            DrawTarget::EditOverlay => write!(f, "edit overlay"),
        }
    }
}

/// Axis-aligned grid line from (x0, y0) to (x1, y1).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LineSegment {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TextLayout {
    /// Word-wrapped to `width`, top-left aligned in the frame, clipped to the clip rect.
    Wrapped { width: f32 },
    /// One line centered in the frame.
    Centered,
    /// One line, left aligned in the frame, clipped to the clip rect.
    SingleLine,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TextItem {
    pub target: DrawTarget,
    pub text: String,
    /// Where the text is placed.
    pub frame: Rect,
    /// What the text may paint into. Taller than `frame` for cells so
    /// descenders below the padded box stay visible.
    pub clip: Rect,
    pub layout: TextLayout,
}

#[derive(Clone, Debug, PartialEq)]
pub struct EditOverlay {
    pub bounds: Rect,
    pub text: TextItem,
}

/// Everything one frame draws, in paint order.
#[derive(Clone, Debug, PartialEq)]
pub struct DisplayList {
    pub width: f32,
    pub height: f32,
    pub lines: Vec<LineSegment>,
    pub labels: Vec<TextItem>,
    pub cells: Vec<TextItem>,
    pub overlay: Option<EditOverlay>,
}

pub fn build_display_list(
    sheet: &Sheet,
    state: EditState,
    preedit: Option<&str>,
    padding: f32,
) -> DisplayList {
    let geometry = sheet.geometry();
    let width = geometry.window_width as f32;
    let height = geometry.window_height as f32;
    let margin_x = geometry.label_margin_x as f32;
    let margin_y = geometry.label_margin_y as f32;
    let visible_rows = geometry.visible_rows();
    let visible_cols = geometry.visible_cols();

    let mut lines = Vec::new();
    for col in 0..=sheet.cols() {
        let x = geometry.col_left(col);
        if x > width {
            break;
        }
        lines.push(LineSegment { x0: x, y0: margin_y, x1: x, y1: height });
    }
    for row in 0..=sheet.rows() {
        let y = geometry.row_top(row);
        if y > height {
            break;
        }
        lines.push(LineSegment { x0: margin_x, y0: y, x1: width, y1: y });
    }

    let column_labels = (0..visible_cols).map(|col| TextItem {
        target: DrawTarget::ColumnLabel(col),
        text: column_label(col),
        frame: Rect::new(geometry.col_left(col), 0.0, geometry.cell_width as f32, margin_y),
        clip: Rect::new(geometry.col_left(col), 0.0, geometry.cell_width as f32, margin_y),
        layout: TextLayout::Centered,
    });
    let row_labels = (0..visible_rows).map(|row| TextItem {
        target: DrawTarget::RowLabel(row),
        text: row_label(row),
        frame: Rect::new(0.0, geometry.row_top(row), margin_x, geometry.cell_height as f32),
        clip: Rect::new(0.0, geometry.row_top(row), margin_x, geometry.cell_height as f32),
        layout: TextLayout::Centered,
    });
    let labels = column_labels.chain(row_labels).collect();

    let cells = sheet
        .iter()
        .filter(|(pos, cell)| {
            pos.row < visible_rows && pos.col < visible_cols && !cell.content.is_empty()
        })
        .map(|(pos, cell)| TextItem {
            target: DrawTarget::Cell(pos),
            text: cell.content.clone(),
            frame: cell.bounds.inset(padding),
            clip: cell.bounds,
            layout: TextLayout::Wrapped {
                width: (cell.bounds.w - 2.0 * padding).max(0.0),
            },
        })
        .collect();

    let overlay = state.selected().and_then(|pos| sheet.cell(pos)).map(|cell| {
        let mut text = cell.content.replace('\n', " ");
        if let Some(preedit) = preedit {
            text.push_str(&preedit.replace('\n', " "));
        }
        EditOverlay {
            bounds: cell.bounds,
            text: TextItem {
                target: DrawTarget::EditOverlay,
                text,
                frame: cell.bounds.inset(padding),
                clip: cell.bounds,
                layout: TextLayout::SingleLine,
            },
        }
    });

    DisplayList {
        width,
        height,
        lines,
        labels,
        cells,
        overlay,
    }
}

/// Font and colors resolved once at startup.
#[derive(Clone)]
pub struct RenderStyle {
    pub font: Font,
    pub font_size: Pixels,
    pub line_height: Pixels,
    pub background: Rgba,
    pub grid_line: Rgba,
    pub text: Rgba,
    pub label_text: Rgba,
    pub edit_background: Rgba,
    pub accent: Rgba,
}

impl RenderStyle {
    pub fn new(config: &SheetConfig, theme: &Theme) -> Self {
        Self {
            font: font(config.font_family.clone()),
            font_size: px(config.font_size),
            line_height: px(config.line_height),
            background: theme.background,
            grid_line: theme.grid_line,
            text: theme.text,
            label_text: theme.label_text,
            edit_background: theme.edit_background,
            accent: theme.accent,
        }
    }
}

/// Paint a frame. Text that fails to shape or paint is skipped and returned
/// so the caller can report it; the rest of the frame still draws.
pub fn paint_display_list(
    list: &DisplayList,
    style: &RenderStyle,
    bounds: Bounds<Pixels>,
    window: &mut Window,
    cx: &mut App,
) -> Vec<RenderError> {
    let origin = bounds.origin;
    let mut failures = Vec::new();

    window.paint_quad(fill(
        Bounds::new(origin, size(px(list.width), px(list.height))),
        style.background,
    ));

    for line in &list.lines {
        window.paint_quad(fill(line_bounds(origin, line), style.grid_line));
    }

    for item in &list.labels {
        if let Err(err) = paint_text(item, style.label_text, style, origin, window, cx) {
            failures.push(err);
        }
    }

    for item in &list.cells {
        if let Err(err) = paint_text(item, style.text, style, origin, window, cx) {
            failures.push(err);
        }
    }

    if let Some(overlay) = &list.overlay {
        let cell = to_bounds(origin, overlay.bounds);
        window.paint_quad(fill(cell, style.edit_background));
        paint_border(cell, style.accent, window);
        if let Err(err) = paint_text(&overlay.text, style.text, style, origin, window, cx) {
            failures.push(err);
        }
    }

    failures
}

fn paint_text(
    item: &TextItem,
    color: Rgba,
    style: &RenderStyle,
    origin: Point<Pixels>,
    window: &mut Window,
    cx: &mut App,
) -> Result<(), RenderError> {
    if item.text.is_empty() {
        return Ok(());
    }

    let run = TextRun {
        len: item.text.len(),
        font: style.font.clone(),
        color: color.into(),
        background_color: None,
        underline: None,
        strikethrough: None,
    };
    let frame = to_bounds(origin, item.frame);
    let clip = to_bounds(origin, item.clip);
    let text: SharedString = item.text.clone().into();
    let line_height = style.line_height;

    let result = match item.layout {
        TextLayout::Wrapped { width } => {
            window.with_content_mask(Some(ContentMask { bounds: clip }), |window| -> gpui::Result<()> {
                let lines = window.text_system().shape_text(
                    text,
                    style.font_size,
                    &[run],
                    Some(px(width)),
                    None,
                )?;
                let mut y = frame.origin.y;
                for line in lines {
                    line.paint(point(frame.origin.x, y), line_height, TextAlign::Left, None, window, cx)?;
                    y += line.size(line_height).height;
                }
                Ok(())
            })
        }
        TextLayout::Centered => {
            let line = window.text_system().shape_line(text, style.font_size, &[run], None);
            let y = frame.origin.y + (frame.size.height - line_height) / 2.0;
            line.paint(
                point(frame.origin.x, y),
                line_height,
                TextAlign::Center,
                Some(frame.size.width),
                window,
                cx,
            )
        }
        TextLayout::SingleLine => {
            window.with_content_mask(Some(ContentMask { bounds: clip }), |window| {
                let line = window.text_system().shape_line(text, style.font_size, &[run], None);
                line.paint(frame.origin, line_height, TextAlign::Left, None, window, cx)
            })
        }
    };

    result.map_err(|err| RenderError::Rasterize {
        target: item.target,
        message: format!("{err:#}"),
    })
}

fn to_bounds(origin: Point<Pixels>, rect: Rect) -> Bounds<Pixels> {
    Bounds::new(
        point(origin.x + px(rect.x), origin.y + px(rect.y)),
        size(px(rect.w), px(rect.h)),
    )
}

fn line_bounds(origin: Point<Pixels>, line: &LineSegment) -> Bounds<Pixels> {
    let rect = if line.x0 == line.x1 {
        Rect::new(line.x0, line.y0, GRID_LINE_WIDTH, line.y1 - line.y0)
    } else {
        Rect::new(line.x0, line.y0, line.x1 - line.x0, GRID_LINE_WIDTH)
    };
    to_bounds(origin, rect)
}

fn paint_border(bounds: Bounds<Pixels>, color: Rgba, window: &mut Window) {
    let width = px(EDIT_BORDER_WIDTH);
    let Bounds { origin, size: outer } = bounds;
    let edges = [
        Bounds::new(origin, size(outer.width, width)),
        Bounds::new(point(origin.x, origin.y + outer.height - width), size(outer.width, width)),
        Bounds::new(origin, size(width, outer.height)),
        Bounds::new(point(origin.x + outer.width - width, origin.y), size(width, outer.height)),
    ];
    for edge in edges {
        window.paint_quad(fill(edge, color));
    }
}

/// Remembers which draw targets already had a failure logged.
#[derive(Debug, Default)]
pub struct RasterLog {
    reported: HashSet<DrawTarget>,
}

impl RasterLog {
    /// Log the failure unless this target was reported before. Returns whether
    /// it was logged.
    pub fn record(&mut self, err: RenderError) -> bool {
        let RenderError::Rasterize { target, .. } = &err;
        if !self.reported.insert(*target) {
            return false;
        }
        warn!("{err}; skipping it this frame");
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LINE_HEIGHT;
    use crate::sheet::Geometry;

    fn sheet() -> Sheet {
        Sheet::new(Geometry::new(800, 600, 50, 20, 20, 20).unwrap())
    }

    #[test]
    fn lines_cover_every_on_screen_boundary() {
        let list = build_display_list(&sheet(), EditState::Idle, None, 5.0);
        let vertical: Vec<_> = list.lines.iter().filter(|l| l.x0 == l.x1).collect();
        let horizontal: Vec<_> = list.lines.iter().filter(|l| l.y0 == l.y1).collect();

        // x = 20, 70, ..., 770; the right edge of the last column (820) is off screen.
        assert_eq!(vertical.len(), 16);
        assert_eq!(vertical[0], &LineSegment { x0: 20.0, y0: 20.0, x1: 20.0, y1: 600.0 });
        assert_eq!(vertical[15].x0, 770.0);

        // y = 20, 40, ..., 600.
        assert_eq!(horizontal.len(), 30);
        assert_eq!(horizontal[29], &LineSegment { x0: 20.0, y0: 600.0, x1: 800.0, y1: 600.0 });
    }

    #[test]
    fn labels_sit_in_the_margins() {
        let list = build_display_list(&sheet(), EditState::Idle, None, 5.0);
        assert_eq!(list.labels.len(), 16 + 29);

        let d = &list.labels[3];
        assert_eq!(d.text, "D");
        assert_eq!(d.frame, Rect::new(170.0, 0.0, 50.0, 20.0));

        let third_row = list
            .labels
            .iter()
            .find(|item| item.target == DrawTarget::RowLabel(2))
            .unwrap();
        assert_eq!(third_row.text, "3");
        assert_eq!(third_row.frame, Rect::new(0.0, 60.0, 20.0, 20.0));
        assert!(list.labels.iter().all(|item| item.layout == TextLayout::Centered));
    }

    #[test]
    fn only_non_empty_cells_are_drawn() {
        let mut sheet = sheet();
        let pos = CellPosition::new(2, 3);
        sheet.cell_mut(pos).unwrap().append("hello");

        let list = build_display_list(&sheet, EditState::Idle, None, 5.0);
        assert_eq!(list.cells.len(), 1);
        let item = &list.cells[0];
        assert_eq!(item.target, DrawTarget::Cell(pos));
        assert_eq!(item.frame, Rect::new(175.0, 65.0, 40.0, 10.0));
        assert_eq!(item.layout, TextLayout::Wrapped { width: 40.0 });
        assert!(list.overlay.is_none());
    }

    #[test]
    fn cell_text_may_use_the_full_cell_height() {
        let mut sheet = sheet();
        let pos = CellPosition::new(0, 0);
        sheet.cell_mut(pos).unwrap().append("gyp");

        let list = build_display_list(&sheet, EditState::Editing(pos), None, 5.0);
        let cell = &list.cells[0];
        let overlay = &list.overlay.as_ref().unwrap().text;
        for item in [cell, overlay] {
            assert_eq!(item.frame, Rect::new(25.0, 25.0, 40.0, 10.0));
            assert_eq!(item.clip, Rect::new(20.0, 20.0, 50.0, 20.0));
            // Descenders hang below the first line box; the clip must fit a whole line.
            assert!(item.clip.bottom() - item.frame.y >= LINE_HEIGHT);
            assert!(item.clip.h >= LINE_HEIGHT);
        }
    }

    #[test]
    fn off_screen_row_is_skipped() {
        let mut sheet = sheet();
        sheet.cell_mut(CellPosition::new(29, 0)).unwrap().append("hidden");
        let list = build_display_list(&sheet, EditState::Idle, None, 5.0);
        assert!(list.cells.is_empty());
    }

    #[test]
    fn editing_adds_an_overlay_with_composition() {
        let mut sheet = sheet();
        let pos = CellPosition::new(1, 1);
        sheet.cell_mut(pos).unwrap().append("ab");

        let list = build_display_list(&sheet, EditState::Editing(pos), Some("c"), 5.0);
        let overlay = list.overlay.unwrap();
        assert_eq!(overlay.bounds, Rect::new(70.0, 40.0, 50.0, 20.0));
        assert_eq!(overlay.text.text, "abc");
        assert_eq!(overlay.text.layout, TextLayout::SingleLine);
        assert_eq!(overlay.text.target, DrawTarget::EditOverlay);
    }

    #[test]
    fn raster_failures_are_logged_once_per_target() {
        let mut log = RasterLog::default();
        let failure = |target| RenderError::Rasterize {
            target,
            message: "glyph missing".to_string(),
        };
        let cell = DrawTarget::Cell(CellPosition::new(0, 0));

        assert!(log.record(failure(cell)));
        assert!(!log.record(failure(cell)));
        assert!(log.record(failure(DrawTarget::ColumnLabel(0))));
        assert!(!log.record(failure(cell)));
    }

    #[test]
    fn targets_describe_themselves() {
        assert_eq!(DrawTarget::Cell(CellPosition::new(2, 3)).to_string(), "cell D3");
        assert_eq!(DrawTarget::ColumnLabel(26).to_string(), "column label AA");
        assert_eq!(DrawTarget::RowLabel(0).to_string(), "row label 1");
    }
}
