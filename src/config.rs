use std::path::PathBuf;

use crate::error::StartupError;
use crate::sheet::Geometry;

pub const WINDOW_TITLE: &str = "Table Editor";
pub const WINDOW_WIDTH: u32 = 800;
pub const WINDOW_HEIGHT: u32 = 600;
pub const CELL_WIDTH: u32 = 50;
pub const CELL_HEIGHT: u32 = 20;
// Room reserved left of the grid for row numbers and above it for column letters.
pub const COLUMN_LABEL_WIDTH: u32 = 20;
pub const ROW_LABEL_HEIGHT: u32 = 20;
pub const CELL_PADDING: f32 = 5.0;

pub const FONT_PATH: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/assets/fonts/ArialRegular.ttf");
pub const FONT_FAMILY: &str = "Arial";
pub const FONT_SIZE: f32 = 10.0;
pub const LINE_HEIGHT: f32 = 12.0;

/// Everything the sheet needs to know before the window opens.
#[derive(Clone, Debug)]
pub struct SheetConfig {
    pub title: String,
    pub window_width: u32,
    pub window_height: u32,
    pub cell_width: u32,
    pub cell_height: u32,
    pub label_margin_x: u32,
    pub label_margin_y: u32,
    pub cell_padding: f32,
    pub font_path: PathBuf,
    pub font_family: String,
    pub font_size: f32,
    pub line_height: f32,
}

impl Default for SheetConfig {
    fn default() -> Self {
        Self {
            title: WINDOW_TITLE.to_string(),
            window_width: WINDOW_WIDTH,
            window_height: WINDOW_HEIGHT,
            cell_width: CELL_WIDTH,
            cell_height: CELL_HEIGHT,
            label_margin_x: COLUMN_LABEL_WIDTH,
            label_margin_y: ROW_LABEL_HEIGHT,
            cell_padding: CELL_PADDING,
            font_path: PathBuf::from(FONT_PATH),
            font_family: FONT_FAMILY.to_string(),
            font_size: FONT_SIZE,
            line_height: LINE_HEIGHT,
        }
    }
}

impl SheetConfig {
    pub fn geometry(&self) -> Result<Geometry, StartupError> {
        Geometry::new(
            self.window_width,
            self.window_height,
            self.cell_width,
            self.cell_height,
            self.label_margin_x,
            self.label_margin_y,
        )
    }

    /// Read the font file into memory so it can be handed to the text system.
    pub fn load_font(&self) -> Result<Vec<u8>, StartupError> {
        std::fs::read(&self.font_path).map_err(|source| StartupError::FontMissing {
            path: self.font_path.clone(),
            source,
        })
    }
}
