//! HTML dashboard view: writes a self-contained page after every transition.

use std::path::{Path, PathBuf};

use skycast_weather::{escape_html, Panel, PanelView, RenderedPanels, ViewState};

const STYLE: &str = "body{font-family:system-ui,sans-serif;max-width:960px;margin:2rem auto;padding:0 1rem}\
.hourly-forecast,.daily-forecast{display:flex;gap:.75rem;overflow-x:auto}\
.hourly-item,.daily-item{display:flex;flex-direction:column;align-items:center;min-width:4rem}\
.weather-details{display:grid;grid-template-columns:repeat(4,1fr);gap:.5rem}\
.error{color:#b00020}";

fn section_id(panel: Panel) -> &'static str {
    match panel {
        Panel::Placeholder => "placeholder",
        Panel::Loading => "loading",
        Panel::Error => "error",
        Panel::Content => "weather-content",
    }
}

/// Build the full document. Only the panel for `state` lacks the `hidden` attribute.
pub fn render_document(state: &ViewState, panels: Option<&RenderedPanels>) -> String {
    let visible = state.visible_panel();
    let attrs = |panel: Panel| {
        let hidden = if panel == visible { "" } else { " hidden" };
        format!("id=\"{}\"{}", section_id(panel), hidden)
    };

    let error_message = match state {
        ViewState::Error(message) => escape_html(message),
        _ => String::new(),
    };

    let content = panels
        .map(|p| {
            format!(
                "{}\n{}\n<h3>Hourly Forecast</h3>\n{}\n<h3>7-Day Forecast</h3>\n{}",
                p.current_html(),
                p.details_html(),
                p.hourly_html(),
                p.daily_html()
            )
        })
        .unwrap_or_default();

    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>Skycast</title>\n<style>{style}</style>\n</head>\n<body>\n\
         <section {}><p>Search for a city to see the weather.</p></section>\n\
         <section {}><p>Loading weather data...</p></section>\n\
         <section {}><p class=\"error\">{}</p></section>\n\
         <section {}>\n{}\n</section>\n\
         </body>\n</html>\n",
        attrs(Panel::Placeholder),
        attrs(Panel::Loading),
        attrs(Panel::Error),
        error_message,
        attrs(Panel::Content),
        content,
        style = STYLE,
    )
}

/// Writes the dashboard document to a file
#[derive(Debug, Clone)]
pub struct HtmlPageView {
    path: PathBuf,
}

impl HtmlPageView {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write(&self, document: &str) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, document)
    }
}

impl PanelView for HtmlPageView {
    fn show(&mut self, state: &ViewState, panels: Option<&RenderedPanels>) {
        let document = render_document(state, panels);
        match self.write(&document) {
            Ok(()) => tracing::debug!("Dashboard written to {}", self.path.display()),
            Err(e) => tracing::warn!(
                "Failed to write dashboard to {}: {}",
                self.path.display(),
                e
            ),
        }
    }
}
