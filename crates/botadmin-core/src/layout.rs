//! Viewport classes and the placement rule for the prompt field.

/// Widest viewport (px) that still counts as small.
pub const SMALL_MAX_WIDTH: u32 = 768;
/// Widest viewport (px) that still counts as medium.
pub const MEDIUM_MAX_WIDTH: u32 = 1040;
/// Approximate width of one terminal cell, used when no config overrides it.
pub const DEFAULT_CELL_WIDTH_PX: u16 = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewportClass {
    Small,
    Medium,
    #[default]
    Large,
}

impl ViewportClass {
    pub fn from_width_px(width: u32) -> Self {
        if width <= SMALL_MAX_WIDTH {
            ViewportClass::Small
        } else if width <= MEDIUM_MAX_WIDTH {
            ViewportClass::Medium
        } else {
            ViewportClass::Large
        }
    }

    /// Classify a terminal by its column count.
    pub fn from_columns(columns: u16, cell_width_px: u16) -> Self {
        Self::from_width_px(u32::from(columns) * u32::from(cell_width_px.max(1)))
    }

    pub fn label(&self) -> &'static str {
        match self {
            ViewportClass::Small => "small",
            ViewportClass::Medium => "medium",
            ViewportClass::Large => "large",
        }
    }
}

/// The prompt (with its submit/cancel controls) sits above the field grid
/// only on a large viewport with no uploads; below it otherwise.
pub fn place_prompt_above_grid(has_uploaded_files: bool, viewport: ViewportClass) -> bool {
    viewport == ViewportClass::Large && !has_uploaded_files
}

/// Columns used for the fixed-field grid.
pub fn grid_columns(viewport: ViewportClass) -> u16 {
    match viewport {
        ViewportClass::Small => 1,
        ViewportClass::Medium | ViewportClass::Large => 2,
    }
}
