//! Plain-text view for the terminal.

use std::io::Write;

use skycast_weather::{PanelView, RenderedPanels, ViewState};

/// Prints each view state to a writer (stdout in the CLI)
pub struct TerminalView<W: Write + Send> {
    out: W,
}

impl<W: Write + Send> TerminalView<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_state(
        &mut self,
        state: &ViewState,
        panels: Option<&RenderedPanels>,
    ) -> std::io::Result<()> {
        match (state, panels) {
            (ViewState::Idle, _) => writeln!(self.out, "Search for a city to see the weather."),
            (ViewState::Loading, _) => writeln!(self.out, "Loading weather data..."),
            (ViewState::Error(message), _) => writeln!(self.out, "Error: {}", message),
            (ViewState::Content, Some(p)) => self.write_panels(p),
            (ViewState::Content, None) => Ok(()),
        }
    }

    fn write_panels(&mut self, p: &RenderedPanels) -> std::io::Result<()> {
        let c = &p.current;
        let d = &p.details;

        writeln!(self.out)?;
        writeln!(self.out, "{}", c.city)?;
        writeln!(self.out, "{}", c.date)?;
        writeln!(self.out, "{} {}°C  {}", c.icon, c.temperature, c.description)?;
        writeln!(
            self.out,
            "Feels like {}°C | Humidity {}% | Wind {} km/h | Clouds {}%",
            d.feels_like, d.humidity, d.wind_speed, d.cloud_cover
        )?;

        writeln!(self.out)?;
        writeln!(self.out, "Hourly")?;
        let hourly: Vec<String> = p
            .hourly
            .iter()
            .map(|h| format!("{} {} {}°", h.label, h.icon, h.temperature))
            .collect();
        writeln!(self.out, "  {}", hourly.join("  "))?;

        writeln!(self.out)?;
        writeln!(self.out, "7-Day")?;
        for day in &p.daily {
            writeln!(
                self.out,
                "  {:<6} {} {:<30} {:>4}° / {:>4}°",
                day.label, day.icon, day.description, day.high, day.low
            )?;
        }
        self.out.flush()
    }
}

impl<W: Write + Send> PanelView for TerminalView<W> {
    fn show(&mut self, state: &ViewState, panels: Option<&RenderedPanels>) {
        if let Err(e) = self.write_state(state, panels) {
            tracing::warn!("Failed to write to terminal: {}", e);
        }
    }
}
