//! Region reference data.
//!
//! The server only owns the top tier of the address hierarchy. Provinces,
//! cities and barangays are picked in the browser from the PSA dataset and
//! echoed back, so they never pass through a catalog here.

use crate::types::Region;

/// Source of the regions a customer may select.
pub trait LocationCatalog: Send + Sync {
    /// Selectable regions, in display order.
    fn regions(&self) -> &[Region];

    /// Resolve a submitted region value (alias or PSA code).
    ///
    /// Returns `None` for unknown values and for regions this catalog does
    /// not offer.
    fn lookup_region(&self, value: &str) -> Option<Region> {
        Region::parse(value)
            .ok()
            .filter(|region| self.regions().contains(region))
    }
}

/// All seventeen Philippine regions.
#[derive(Debug, Clone, Copy, Default)]
pub struct PhilippineRegions;

impl LocationCatalog for PhilippineRegions {
    fn regions(&self) -> &[Region] {
        &Region::ALL
    }
}

impl<T: LocationCatalog + ?Sized> LocationCatalog for &T {
    fn regions(&self) -> &[Region] {
        (**self).regions()
    }
}
