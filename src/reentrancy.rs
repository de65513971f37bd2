//! Debug-only exclusive-section guard.
//!
//! Table operations call into user code only through the injected
//! allocator. An allocator that calls back into the same table while an
//! operation is half done would observe a chain mid-splice, so in debug
//! builds entering a second section on the same table panics and names
//! both operations. In release builds the guard compiles away.
//!
//! The marker keeps tables `!Sync`; they stay `Send`, so a caller may
//! confine one to a thread or put it behind a `Mutex`.

use core::cell::Cell;
use core::marker::PhantomData;

#[derive(Debug, Default)]
pub(crate) struct ExclusiveSection {
    #[cfg(debug_assertions)]
    active: Cell<Option<&'static str>>,
    _not_sync: PhantomData<Cell<()>>,
}

impl ExclusiveSection {
    pub(crate) const fn new() -> Self {
        Self {
            #[cfg(debug_assertions)]
            active: Cell::new(None),
            _not_sync: PhantomData,
        }
    }

    /// Enter the section for operation `op` until the guard drops.
    #[inline]
    pub(crate) fn enter(&self, op: &'static str) -> SectionGuard<'_> {
        #[cfg(debug_assertions)]
        if let Some(outer) = self.active.replace(Some(op)) {
            panic!("reentrant `{op}` while `{outer}` is in progress on the same table");
        }
        #[cfg(not(debug_assertions))]
        let _ = op;
        SectionGuard { section: self }
    }
}

pub(crate) struct SectionGuard<'a> {
    #[cfg_attr(not(debug_assertions), allow(dead_code))]
    section: &'a ExclusiveSection,
}

impl Drop for SectionGuard<'_> {
    fn drop(&mut self) {
        #[cfg(debug_assertions)]
        self.section.active.set(None);
    }
}
