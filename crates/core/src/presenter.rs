//! Presentation collaborator
//!
//! The engine never draws anything. It tells a [`Presenter`] when a tile must
//! appear, disappear, or move, and when the board has changed or come to rest.

use crate::types::{TileHandle, TileKind};

pub trait Presenter {
    /// Create the visual for a new tile at (x, y) and return its handle
    fn spawn(&mut self, x: u8, y: u8, kind: TileKind) -> TileHandle;

    /// Remove the visual for a destroyed tile
    fn destroy(&mut self, handle: TileHandle);

    /// Move the visual for a tile that fell or was swapped
    fn relocate(&mut self, handle: TileHandle, x: u8, y: u8);

    fn on_board_stable(&mut self) {}

    fn on_board_changed(&mut self) {}
}

impl<P: Presenter + ?Sized> Presenter for &mut P {
    fn spawn(&mut self, x: u8, y: u8, kind: TileKind) -> TileHandle {
        (**self).spawn(x, y, kind)
    }

    fn destroy(&mut self, handle: TileHandle) {
        (**self).destroy(handle)
    }

    fn relocate(&mut self, handle: TileHandle, x: u8, y: u8) {
        (**self).relocate(handle, x, y)
    }

    fn on_board_stable(&mut self) {
        (**self).on_board_stable()
    }

    fn on_board_changed(&mut self) {
        (**self).on_board_changed()
    }
}

/// Headless presenter: sequential handles, no side effects
#[derive(Debug, Clone, Default)]
pub struct NullPresenter {
    next_handle: u64,
}

impl NullPresenter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Presenter for NullPresenter {
    fn spawn(&mut self, _x: u8, _y: u8, _kind: TileKind) -> TileHandle {
        self.next_handle += 1;
        TileHandle(self.next_handle)
    }

    fn destroy(&mut self, _handle: TileHandle) {}

    fn relocate(&mut self, _handle: TileHandle, _x: u8, _y: u8) {}
}
