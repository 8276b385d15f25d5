mod memory;
mod renderer;

pub use memory::{MemorySurface, RowNodes, SurfaceState};
pub use renderer::{DriveListRenderer, SnapshotReport};

/// Named panels of the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Panel {
    #[default]
    Drives,
    Files,
}

impl Panel {
    pub fn name(self) -> &'static str {
        match self {
            Panel::Drives => "drives",
            Panel::Files => "files",
        }
    }
}

/// Controls created once per drive slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowSpec {
    pub slot: usize,
    /// Accept list of the hidden file picker bound to the slot button.
    pub accept: String,
    pub icon: &'static str,
    pub label: String,
    pub enabled: bool,
}

/// The document the renderer writes into. Slots are 1-based.
pub trait ViewSurface: Send {
    fn add_row(&mut self, row: RowSpec);
    fn set_slot_icon(&mut self, slot: usize, icon: &'static str);
    fn set_slot_label(&mut self, slot: usize, label: &str);
    fn set_slot_enabled(&mut self, slot: usize, enabled: bool);
    fn set_client(&mut self, icon: &'static str, label: &str);
    fn show_panel(&mut self, panel: Panel);
    fn set_file_list(&mut self, text: &str);
    /// Enable the save/unload buttons of the file panel for a drive, or disable them.
    fn set_drive_actions(&mut self, target: Option<usize>);
}
