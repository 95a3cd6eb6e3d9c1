//! Alert state carried between evaluation cycles

/// Which alert categories fired since the last recovery.
///
/// This is the only memory the monitor keeps between cycles. It starts
/// all-clear and is rebuilt from scratch on restart.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AlertState {
    /// Any threshold alert was sent
    pub general_alert_active: bool,
    /// A dust storm warning was sent
    pub dust_storm_active: bool,
    /// A UV warning was sent
    pub uv_alert_active: bool,
}

impl AlertState {
    /// True if any category is waiting for a recovery message
    pub fn any_active(&self) -> bool {
        self.general_alert_active || self.dust_storm_active || self.uv_alert_active
    }

    /// All-clear state
    pub fn cleared() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_any_active() {
        assert!(!AlertState::cleared().any_active());

        let state = AlertState {
            uv_alert_active: true,
            ..AlertState::default()
        };
        assert!(state.any_active());
    }
}
