//! Trip mode enum.
//!
//! The scheduling core never sets a mode; activities carry
//! `Option<TripMode>` which mode choice fills in downstream.

/// The means by which a person reaches an activity.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[non_exhaustive]
pub enum TripMode {
    AutoDriver,
    AutoPassenger,
    Walk,
    Bike,
    WalkTransit,
    DriveTransit,
    SchoolBus,
}

impl TripMode {
    /// `true` for modes that put a household vehicle on the road.
    #[inline]
    pub fn uses_household_auto(self) -> bool {
        matches!(self, TripMode::AutoDriver | TripMode::DriveTransit)
    }

    /// Human-readable label, useful for CSV column values.
    pub fn as_str(self) -> &'static str {
        match self {
            TripMode::AutoDriver    => "auto_driver",
            TripMode::AutoPassenger => "auto_passenger",
            TripMode::Walk          => "walk",
            TripMode::Bike          => "bike",
            TripMode::WalkTransit   => "walk_transit",
            TripMode::DriveTransit  => "drive_transit",
            TripMode::SchoolBus     => "school_bus",
        }
    }
}

impl std::fmt::Display for TripMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
