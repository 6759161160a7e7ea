//! UI adapters for the weather controller.
//!
//! Each adapter implements [`PanelView`]; the controller never knows which
//! one it is driving.

pub mod page;
pub mod terminal;

pub use page::{render_document, HtmlPageView};
pub use terminal::TerminalView;

use skycast_weather::{PanelView, RenderedPanels, ViewState};

/// Fans every transition out to several views
#[derive(Default)]
pub struct CompositeView {
    views: Vec<Box<dyn PanelView>>,
}

impl CompositeView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, view: Box<dyn PanelView>) -> Self {
        self.views.push(view);
        self
    }

    pub fn len(&self) -> usize {
        self.views.len()
    }

    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }
}

impl PanelView for CompositeView {
    fn show(&mut self, state: &ViewState, panels: Option<&RenderedPanels>) {
        for view in &mut self.views {
            view.show(state, panels);
        }
    }
}
