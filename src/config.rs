use crate::color::ColorScheme;
use crate::order::MajorityTieBreak;

/// Policy knobs shared by the three plotting modes.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PlotConfig {
    pub colors: ColorScheme,
    pub tie_break: MajorityTieBreak,
}

impl PlotConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_colors(mut self, colors: ColorScheme) -> Self {
        self.colors = colors;
        self
    }

    pub fn with_tie_break(mut self, tie_break: MajorityTieBreak) -> Self {
        self.tie_break = tie_break;
        self
    }
}
