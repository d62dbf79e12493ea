//! The rendered-page side of the coordinator
//!
//! A `PageSurface` is whatever the renderer hands over for a page's text
//! layer. In the browser it is the text-layer element (see
//! `api::dom::DomTextLayer`); natively it can be any test double.

use crate::errors::SurfaceError;
use crate::models::PageNumber;
use crate::overlay::OverlayLayer;

/// Identity of the element behind a surface
///
/// Two surfaces with the same id wrap the same element, so a listener bound
/// through one is live for the other.
pub type SurfaceId = u64;

pub trait PageSurface {
    fn surface_id(&self) -> SurfaceId;

    /// Attach the pointer-release listener that feeds selection capture
    ///
    /// Implementations replace any listener they previously attached to
    /// the same element.
    fn bind_pointer_release(&self, page_number: PageNumber) -> Result<(), SurfaceError>;

    /// Paint `layer` above the text layer, replacing the previous one
    fn mount_overlay(&self, layer: &OverlayLayer) -> Result<(), SurfaceError>;
}
