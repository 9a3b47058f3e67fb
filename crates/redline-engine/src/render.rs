//! Writing the shadow document or a history entry onto the surface.
//!
//! Both paths replace the surface wholesale, so the caret is carried across
//! the write as a linear offset.

use crate::history::HistoryEntry;
use crate::markup::MarkupError;
use crate::model::Document;
use crate::ports::{SelectionPort, SurfacePort};

/// Result of rendering the document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    /// Markup written to the surface
    pub markup: String,
    /// Caret offset captured before the write and restored after it
    pub cursor: usize,
}

/// Serialize `document` onto the surface, keeping the caret's linear offset.
///
/// ## Steps
///
/// 1. Capture the caret offset (0 without a usable selection)
/// 2. Serialize the document and replace the surface content
/// 3. Restore the caret at the captured offset
pub fn render_document<H>(host: &mut H, document: &Document) -> Result<Rendered, MarkupError>
where
    H: SurfacePort + SelectionPort,
{
    let cursor = host.capture_offset();
    let markup = document.serialize();
    host.write_markup(&markup)?;
    host.restore_offset(cursor);
    log::debug!("render: {} bytes, caret at {cursor}", markup.len());

    Ok(Rendered { markup, cursor })
}

/// Put a history entry back on the surface with its own caret
pub fn render_entry<H>(host: &mut H, entry: &HistoryEntry) -> Result<(), MarkupError>
where
    H: SurfacePort + SelectionPort,
{
    host.write_markup(entry.surface())?;
    host.restore_offset(entry.cursor());
    Ok(())
}
