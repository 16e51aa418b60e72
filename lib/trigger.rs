/// Trigger position on screen: `x` is the column the crossing lands on,
/// `y` the threshold in scaled (row) units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(target_os = "none", derive(defmt::Format))]
pub struct TriggerConfig {
    pub x: u16,
    pub y: i16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(target_os = "none", derive(defmt::Format))]
pub enum TriggerMode {
    /// Start a new epoch as soon as the engine is idle.
    FreeRun,
    /// Start on a rising crossing of `y`.
    Edge,
}

/// Rising-edge crossing: strictly below before, at or above now.
pub fn crossed(previous: i16, current: i16, level: i16) -> bool {
    previous < level && current >= level
}

impl TriggerConfig {
    /// Decides whether an idle engine starts a new epoch on this sample.
    ///
    /// `since_rotation` counts samples written into the buffer since it became
    /// active, so an edge trigger only fires once the pre-trigger part is filled.
    /// `blocked` is set while the draw engine still reads the slot.
    pub fn fires(
        &self,
        mode: TriggerMode,
        previous: i16,
        current: i16,
        since_rotation: u16,
        blocked: bool,
    ) -> bool {
        if blocked {
            return false;
        }
        match mode {
            TriggerMode::FreeRun => true,
            TriggerMode::Edge => since_rotation > self.x && crossed(previous, current, self.y),
        }
    }
}
