pub mod card;
mod dashboard;
mod help;
pub mod pagination;

use crate::dashboard::Dashboard;
use crate::store::Store;
use ratatui::Frame;

/// Top-level render dispatch.
pub fn render<S: Store>(app: &Dashboard<S>, frame: &mut Frame) {
    dashboard::render(app, frame);

    // Render help overlay on top if active
    if app.show_help {
        help::render(frame);
    }
}
