//! The demo page: document layout, hit testing and rendering.

use std::io::{self, Write};

use crossterm::{
    cursor::MoveTo,
    queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{Clear, ClearType},
};
use navbar::{Position, SidebarError, SidebarOptions, Sidebars};
use navdom::{Document, Element, NodeId, Viewport};

pub const PX_PER_COL: f64 = 8.0;
pub const PX_PER_ROW: f64 = 16.0;

const SIDEBAR_COLS: u16 = 32;
const TOGGLE_LABEL: &str = "[ = Menu ]";
const MENU_ITEMS: [&str; 6] = ["Dashboard", "Projects", "Reports", "Settings", "Help", "Sign out"];

const HELP: [&str; 7] = [
    "Click the menu button or press Ctrl+Alt+S to toggle the sidebar.",
    "Drag from the screen edge to swipe it open, drag it back to close.",
    "Click outside an open sidebar to dismiss it.",
    "",
    "o open   c close   f force open   x force close   t toggle",
    "d destroy / re-attach",
    "q quit",
];

/// Terminal coordinates to document pixels, at the centre of the cell.
pub fn to_px(col: u16, row: u16) -> (f64, f64) {
    (
        (f64::from(col) + 0.5) * PX_PER_COL,
        (f64::from(row) + 0.5) * PX_PER_ROW,
    )
}

fn viewport(cols: u16, rows: u16) -> Viewport {
    Viewport::new(f64::from(cols) * PX_PER_COL, f64::from(rows) * PX_PER_ROW)
}

pub struct Demo {
    pub sidebars: Sidebars,
    options: SidebarOptions,
    cols: u16,
    rows: u16,
    pub toggle: NodeId,
    pub nav: NodeId,
    items: Vec<NodeId>,
    pub main: NodeId,
}

impl Demo {
    pub fn new(cols: u16, rows: u16, options: SidebarOptions) -> Result<Self, SidebarError> {
        let mut doc = Document::new(viewport(cols, rows));
        let body = doc.body();

        let toggle = doc.append(body, Element::new("button").id("toggle"))?;
        let nav = doc.append(
            body,
            Element::new("nav")
                .id("sidebar")
                .class("sidebar")
                .size(f64::from(SIDEBAR_COLS) * PX_PER_COL, f64::from(rows.saturating_sub(1)) * PX_PER_ROW),
        )?;
        let menu = doc.append(nav, Element::new("ul").class("sidebar-menu"))?;
        let items = MENU_ITEMS
            .iter()
            .map(|label| doc.append(menu, Element::new("li").attr("title", *label)))
            .collect::<Result<Vec<_>, _>>()?;
        let main = doc.append(body, Element::div().class("container-main"))?;

        let sheet = doc.stylesheet_mut();
        sheet.rule(".sidebar", &[("transform", "translateX(-100%)")])?;
        sheet.rule(".sidebar.sidebar-right", &[("transform", "translateX(100%)")])?;
        sheet.rule(".sidebar.sidebar-open", &[("transform", "none")])?;

        let mut demo = Self {
            sidebars: Sidebars::new(doc),
            options,
            cols,
            rows,
            toggle,
            nav,
            items,
            main,
        };
        demo.attach()?;
        Ok(demo)
    }

    pub fn attach(&mut self) -> Result<(), SidebarError> {
        self.sidebars.attach(self.nav, self.options.clone())?;
        Ok(())
    }

    pub fn resize(&mut self, cols: u16, rows: u16) -> Result<(), SidebarError> {
        self.cols = cols;
        self.rows = rows;
        let height = f64::from(rows.saturating_sub(1)) * PX_PER_ROW;
        let doc = self.sidebars.doc_mut();
        doc.set_viewport(viewport(cols, rows));
        doc.set_body_height(f64::from(rows) * PX_PER_ROW);
        doc.set_size(self.nav, f64::from(SIDEBAR_COLS) * PX_PER_COL, height)?;
        Ok(())
    }

    fn position(&self) -> Position {
        self.sidebars
            .get(self.nav)
            .map(|s| s.position())
            .unwrap_or(self.options.position)
    }

    /// Column of the sidebar's left edge, following its current transform.
    fn sidebar_left(&self) -> i32 {
        let offset = (self.sidebars.doc().transform_matrix(self.nav).e / PX_PER_COL).round() as i32;
        match self.position() {
            Position::Left => offset,
            Position::Right => i32::from(self.cols) - i32::from(SIDEBAR_COLS) + offset,
        }
    }

    fn swipe_col(&self) -> Option<u16> {
        self.sidebars.get(self.nav)?.swipe_element()?;
        match self.position() {
            Position::Left => Some(0),
            Position::Right => Some(self.cols.saturating_sub(1)),
        }
    }

    /// Topmost element under a terminal cell.
    pub fn hit(&self, col: u16, row: u16) -> NodeId {
        if row == 0 {
            return if usize::from(col) < TOGGLE_LABEL.len() {
                self.toggle
            } else {
                self.main
            };
        }

        let left = self.sidebar_left();
        let c = i32::from(col);
        if c >= left && c < left + i32::from(SIDEBAR_COLS) {
            let index = usize::from(row).saturating_sub(3);
            return match row {
                0..=2 => self.nav,
                _ => self.items.get(index).copied().unwrap_or(self.nav),
            };
        }

        if let Some(swipe_col) = self.swipe_col()
            && col == swipe_col
            && let Some(swipe) = self.sidebars.get(self.nav).and_then(|s| s.swipe_element())
        {
            return swipe;
        }
        self.main
    }

    // -------------------------------------------------------------------------
    // Rendering
    // -------------------------------------------------------------------------

    pub fn render(&self, out: &mut impl Write) -> io::Result<()> {
        queue!(out, ResetColor, Clear(ClearType::All))?;
        self.render_header(out)?;
        self.render_main(out)?;
        self.render_swipe(out)?;
        self.render_sidebar(out)?;
        queue!(out, ResetColor)?;
        out.flush()
    }

    fn render_header(&self, out: &mut impl Write) -> io::Result<()> {
        let doc = self.sidebars.doc();
        let active = doc.has_class(self.toggle, "sidebar-open");
        let bg = if active { Color::DarkCyan } else { Color::DarkGrey };
        queue!(out, MoveTo(0, 0), SetBackgroundColor(bg), Print(TOGGLE_LABEL), ResetColor)?;

        let status = match self.sidebars.get(self.nav) {
            Some(sidebar) => format!(
                " open:{} fully:{} locked:{} {}  {}x{}px",
                sidebar.is_open(doc),
                sidebar.is_fully_opened(doc),
                sidebar.is_locked(),
                sidebar.position(),
                doc.viewport().width,
                doc.viewport().height,
            ),
            None => " (destroyed)".to_string(),
        };
        queue!(out, Print(status))
    }

    fn render_main(&self, out: &mut impl Write) -> io::Result<()> {
        // A pinned sidebar pushes the content aside instead of covering it
        let pinned = self
            .sidebars
            .get(self.nav)
            .is_some_and(|s| s.is_fully_opened(self.sidebars.doc()) && s.is_over_min_width(self.sidebars.doc()));
        let indent = match (pinned, self.position()) {
            (true, Position::Left) => SIDEBAR_COLS + 2,
            _ => 2,
        };

        for (i, line) in HELP.iter().enumerate() {
            let row = 2 + i as u16;
            if row >= self.rows {
                break;
            }
            queue!(out, MoveTo(indent, row), SetForegroundColor(Color::Grey), Print(*line))?;
        }
        queue!(out, ResetColor)
    }

    fn render_swipe(&self, out: &mut impl Write) -> io::Result<()> {
        let Some(col) = self.swipe_col() else {
            return Ok(());
        };
        for row in 1..self.rows {
            queue!(out, MoveTo(col, row), SetForegroundColor(Color::DarkGrey), Print(":"))?;
        }
        queue!(out, ResetColor)
    }

    fn render_sidebar(&self, out: &mut impl Write) -> io::Result<()> {
        let left = self.sidebar_left();
        let dragging = self.sidebars.doc().has_class(self.nav, "sidebar-dragging");
        let bg = if dragging { Color::DarkMagenta } else { Color::DarkBlue };

        for row in 1..self.rows {
            let text = match row {
                1 => " Navigation".to_string(),
                2 => String::new(),
                _ => MENU_ITEMS
                    .get(usize::from(row) - 3)
                    .map(|item| format!("  {item}"))
                    .unwrap_or_default(),
            };
            let line = format!("{text:<width$}", width = usize::from(SIDEBAR_COLS));
            let Some((col, visible)) = clip(&line, left, self.cols) else {
                return Ok(());
            };
            queue!(
                out,
                MoveTo(col, row),
                SetBackgroundColor(bg),
                SetForegroundColor(Color::White),
                Print(visible),
                ResetColor
            )?;
        }
        Ok(())
    }
}

/// Part of `line` visible when drawn from column `start` on a screen `cols`
/// wide, with the column it starts at.
fn clip(line: &str, start: i32, cols: u16) -> Option<(u16, String)> {
    let skip = usize::try_from(-start).unwrap_or(0);
    let col = u16::try_from(start.max(0)).ok()?;
    if col >= cols {
        return None;
    }
    let visible: String = line
        .chars()
        .skip(skip)
        .take(usize::from(cols - col))
        .collect();
    if visible.is_empty() {
        return None;
    }
    Some((col, visible))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clip_hides_offscreen_columns() {
        assert_eq!(clip("abcdef", -2, 80), Some((0, "cdef".to_string())));
        assert_eq!(clip("abcdef", 76, 80), Some((76, "abcd".to_string())));
        assert_eq!(clip("abcdef", -6, 80), None);
        assert_eq!(clip("abcdef", 80, 80), None);
    }

    #[test]
    fn closed_sidebar_is_offscreen() {
        let options = SidebarOptions::new().toggle_id("toggle");
        let demo = Demo::new(160, 40, options).unwrap();
        assert_eq!(demo.sidebar_left(), -i32::from(SIDEBAR_COLS));
        assert_eq!(demo.hit(10, 10), demo.main);
        assert_eq!(demo.hit(2, 0), demo.toggle);
        assert_ne!(demo.hit(0, 10), demo.main);
    }

    #[test]
    fn open_sidebar_is_hit_first() {
        let options = SidebarOptions::new().toggle_id("toggle");
        let mut demo = Demo::new(160, 40, options).unwrap();
        demo.sidebars.open(demo.nav).unwrap();
        assert_eq!(demo.sidebar_left(), 0);
        assert_eq!(demo.hit(0, 1), demo.nav);
        assert_eq!(demo.hit(4, 3), demo.items[0]);
        assert_eq!(demo.hit(40, 10), demo.main);
    }
}
