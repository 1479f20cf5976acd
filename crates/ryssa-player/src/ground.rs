//! The grounded handshake between locomotion and climbing.

/// Two independently written ground signals and their combination.
///
/// The locomotion controller is the only writer of the physical ground test;
/// the climb controller is the only writer of the override. Readers see the
/// logical OR through [`is_grounded`](GroundContact::is_grounded).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GroundContact {
    grounded: bool,
    external_override: bool,
}

impl GroundContact {
    /// Effective-grounded: the ground test OR the climb override.
    pub fn is_grounded(&self) -> bool {
        self.grounded || self.external_override
    }

    /// Result of the most recent physical ground test.
    pub fn physically_grounded(&self) -> bool {
        self.grounded
    }

    /// Whether the climb override is currently asserted.
    pub fn override_active(&self) -> bool {
        self.external_override
    }

    /// Record the physical ground test. Locomotion only.
    pub(crate) fn record_ground_test(&mut self, grounded: bool) {
        self.grounded = grounded;
    }

    /// Publish the climb override. Climbing only.
    pub(crate) fn set_climb_override(&mut self, active: bool) {
        self.external_override = active;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effective_grounded_is_logical_or() {
        for (grounded, overridden) in [(false, false), (true, false), (false, true), (true, true)]
        {
            let mut contact = GroundContact::default();
            contact.record_ground_test(grounded);
            contact.set_climb_override(overridden);
            assert_eq!(
                contact.is_grounded(),
                grounded || overridden,
                "grounded={grounded} override={overridden}"
            );
        }
    }

    #[test]
    fn test_signals_are_written_independently() {
        let mut contact = GroundContact::default();
        contact.set_climb_override(true);
        contact.record_ground_test(false);
        assert!(contact.override_active());
        assert!(!contact.physically_grounded());

        contact.set_climb_override(false);
        assert!(!contact.is_grounded());
    }
}
