// crates/dubcut-ui/src/modules/mod.rs
//
// Module registry. To add a new panel:
//   1. Create modules/mypanel.rs implementing ReviewModule
//   2. Add `pub mod mypanel;` below
//   3. Give DubCutApp a field for it and call ui() from update()

pub mod card_panel;
pub mod segment_list;
pub mod timeline;

use crate::context::AppContext;
use dubcut_core::commands::ReviewCommand;
use dubcut_core::state::ReviewState;
use egui::Ui;

/// Every review panel implements this trait.
/// Modules read state and context, emit commands — they never mutate state
/// directly; app.rs applies commands after the UI pass.
pub trait ReviewModule {
    fn name(&self) -> &str;
    fn ui(
        &mut self,
        ui:    &mut Ui,
        state: &ReviewState,
        ctx:   &AppContext,
        cmd:   &mut Vec<ReviewCommand>,
    );
}
