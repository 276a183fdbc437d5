//! UI Preferences - Sidebar and Table Density

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TableDensity {
    #[default]
    Comfortable,
    Compact,
}

impl TableDensity {
    /// Row height hint for renderers, in pixels
    pub fn row_height(self) -> f32 {
        match self {
            TableDensity::Comfortable => 44.0,
            TableDensity::Compact => 32.0,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UiState {
    pub sidebar_collapsed: bool,
    pub table_density: TableDensity,
}

impl UiState {
    pub fn toggle_sidebar(&mut self) -> bool {
        self.sidebar_collapsed = !self.sidebar_collapsed;
        self.sidebar_collapsed
    }

    pub fn set_table_density(&mut self, density: TableDensity) -> bool {
        if self.table_density == density {
            return false;
        }
        self.table_density = density;
        true
    }
}
