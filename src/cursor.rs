//! Platform cursor control.

/// Cursor glyphs the core asks the platform for.
///
/// Scene transitions reset the cursor to [`Arrow`](CursorGlyph::Arrow) so a
/// hover state from the outgoing scene's UI never leaks into the new scene.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CursorGlyph {
    #[default]
    Arrow,
    Hand,
}

impl From<CursorGlyph> for winit::window::CursorIcon {
    fn from(glyph: CursorGlyph) -> Self {
        match glyph {
            CursorGlyph::Arrow => winit::window::CursorIcon::Default,
            CursorGlyph::Hand => winit::window::CursorIcon::Pointer,
        }
    }
}

/// Whatever owns the OS cursor.
pub trait CursorHost {
    fn set_cursor(&mut self, glyph: CursorGlyph);
}

/// Cursor host for headless embeddings; ignores every request.
#[derive(Default)]
pub struct NullCursor;

impl CursorHost for NullCursor {
    fn set_cursor(&mut self, _glyph: CursorGlyph) {}
}
