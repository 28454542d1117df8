use crate::effects::handle::{Effect, place_input};
use crate::foundation::core::FrameIndex;
use crate::foundation::error::{HalfblockError, HalfblockResult};
use crate::surface::PixelSurface;

/// Moves every channel `percent`% of the way toward white.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Brighter {
    /// Amount in `0..=100`.
    pub percent: u32,
}

/// Moves every channel `percent`% of the way toward black.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Darker {
    /// Amount in `0..=100`.
    pub percent: u32,
}

impl Brighter {
    /// Build a brightening effect.
    pub fn new(percent: u32) -> Self {
        Self { percent }
    }
}

impl Darker {
    /// Build a darkening effect.
    pub fn new(percent: u32) -> Self {
        Self { percent }
    }
}

fn check_percent(effect: &str, percent: u32) -> HalfblockResult<()> {
    if percent > 100 {
        return Err(HalfblockError::invalid_value(format!(
            "{effect} percent must be <= 100, got {percent}"
        )));
    }
    Ok(())
}

fn lighten(v: u8, percent: u32) -> u8 {
    let v = u32::from(v);
    (v + ((255 - v) * percent + 50) / 100) as u8
}

fn darken(v: u8, percent: u32) -> u8 {
    let v = u32::from(v);
    (v - (v * percent + 50) / 100) as u8
}

impl Effect for Brighter {
    fn name(&self) -> &'static str {
        "brighter"
    }

    fn run(
        &mut self,
        input: &PixelSurface,
        output: &mut PixelSurface,
        _frame: FrameIndex,
    ) -> HalfblockResult<()> {
        place_input(input, output);
        let p = self.percent.min(100);
        for c in output.color_mut() {
            *c = c.map(|v| lighten(v, p));
        }
        Ok(())
    }

    fn validate(&self) -> HalfblockResult<()> {
        check_percent("brighter", self.percent)
    }
}

impl Effect for Darker {
    fn name(&self) -> &'static str {
        "darker"
    }

    fn run(
        &mut self,
        input: &PixelSurface,
        output: &mut PixelSurface,
        _frame: FrameIndex,
    ) -> HalfblockResult<()> {
        place_input(input, output);
        let p = self.percent.min(100);
        for c in output.color_mut() {
            *c = c.map(|v| darken(v, p));
        }
        Ok(())
    }

    fn validate(&self) -> HalfblockResult<()> {
        check_percent("darker", self.percent)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/tone.rs"]
mod tests;
