//! Normalized button state, sampled once per tick by the host.

bitflags::bitflags! {
    #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
    pub struct Buttons: u16 {
        const UP = 1 << 0;
        const DOWN = 1 << 1;
        const LEFT = 1 << 2;
        const RIGHT = 1 << 3;
        const JUMP = 1 << 4;
        /// Hold to mine; a short tap places instead.
        const MINE = 1 << 5;
        /// Places a block on press.
        const PLACE = 1 << 6;
        /// While held, up/down pitch the camera instead of walking.
        const AIM = 1 << 7;
    }
}

impl Buttons {
    /// Bits set now that were clear last tick.
    #[inline]
    pub fn pressed_since(self, previous: Buttons) -> Buttons {
        self & !previous
    }
}
