//! Busy-wait strategies.

/// Blocks the caller until a hardware condition holds.
///
/// The engine hands every completion check to a [`Wait`] so that the
/// polling loop can be swapped out, e.g. for one that gives up after a
/// bounded number of polls and resets the device.
pub trait Wait {
    /// Returns once `ready` returns `true`.
    fn until<F: FnMut() -> bool>(&mut self, ready: F);
}

/// Repeatedly polls the condition with no upper bound.
///
/// A slave that never completes a phase hangs the caller forever; add a
/// watchdog or a bounded [`Wait`] where that matters.
#[derive(Debug, Default, Clone, Copy)]
pub struct Spin;

impl Wait for Spin {
    fn until<F: FnMut() -> bool>(&mut self, mut ready: F) {
        while !ready() {
            core::hint::spin_loop();
        }
    }
}

impl<W: Wait + ?Sized> Wait for &mut W {
    fn until<F: FnMut() -> bool>(&mut self, ready: F) {
        (**self).until(ready)
    }
}
