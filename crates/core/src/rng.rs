//! RNG module - seeded random stream for refills, shuffles and obstacle placement
//!
//! Every random decision in a session draws from one seeded generator, so a
//! whole session replays exactly from its seed. Nothing here touches a
//! process-wide source.
//!
//! [`SimpleRng`] is the generator itself (mulberry32). [`RngStream`] is a
//! cloneable handle onto one generator: a grid and its clones hold handles to
//! the same stream, so a cloned grid continues the sequence instead of
//! restarting it.

use std::cell::RefCell;
use std::rc::Rc;

/// Mulberry32 generator
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    /// Generate next random u32
    pub fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_add(0x6D2B_79F5);
        let mut z = self.state;
        z = (z ^ (z >> 15)).wrapping_mul(z | 1);
        z ^= z.wrapping_add((z ^ (z >> 7)).wrapping_mul(z | 61));
        z ^ (z >> 14)
    }

    /// Uniform double in [0, 1)
    pub fn next_f64(&mut self) -> f64 {
        f64::from(self.next_u32()) / 4_294_967_296.0
    }

    /// Uniform integer in `lo..=hi`
    pub fn int(&mut self, lo: usize, hi: usize) -> usize {
        debug_assert!(lo <= hi, "empty range {lo}..={hi}");
        let span = (hi - lo + 1) as f64;
        lo + (self.next_f64() * span) as usize
    }

    /// Uniform integer in `0..max`
    pub fn next_range(&mut self, max: usize) -> usize {
        debug_assert!(max > 0);
        self.int(0, max - 1)
    }

    /// Shuffle a slice using Fisher-Yates
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        for i in (1..slice.len()).rev() {
            let j = self.int(0, i);
            slice.swap(i, j);
        }
    }

    /// Current generator state; `SimpleRng::new(state)` resumes the sequence
    pub fn state(&self) -> u32 {
        self.state
    }
}

/// Shared handle onto one [`SimpleRng`]
///
/// Cloning the handle does not fork the generator: all clones draw from the
/// same sequence. Use [`RngStream::fork`] for an independent copy. The
/// simulation is single-threaded, so the handle is `!Send`.
#[derive(Debug, Clone)]
pub struct RngStream {
    inner: Rc<RefCell<SimpleRng>>,
    seed: u32,
}

impl RngStream {
    pub fn new(seed: u32) -> Self {
        Self {
            inner: Rc::new(RefCell::new(SimpleRng::new(seed))),
            seed,
        }
    }

    /// Seed the stream was created with
    pub fn seed(&self) -> u32 {
        self.seed
    }

    pub fn next_u32(&self) -> u32 {
        self.inner.borrow_mut().next_u32()
    }

    pub fn next_f64(&self) -> f64 {
        self.inner.borrow_mut().next_f64()
    }

    pub fn int(&self, lo: usize, hi: usize) -> usize {
        self.inner.borrow_mut().int(lo, hi)
    }

    pub fn next_range(&self, max: usize) -> usize {
        self.inner.borrow_mut().next_range(max)
    }

    /// Uniformly chosen element, `None` for an empty slice
    pub fn pick<T: Copy>(&self, items: &[T]) -> Option<T> {
        if items.is_empty() {
            return None;
        }
        Some(items[self.next_range(items.len())])
    }

    pub fn shuffle<T>(&self, slice: &mut [T]) {
        self.inner.borrow_mut().shuffle(slice);
    }

    /// True when both handles draw from the same generator
    pub fn same_stream(&self, other: &RngStream) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    /// New generator that continues this stream's sequence independently
    pub fn fork(&self) -> RngStream {
        let state = self.inner.borrow().state();
        Self {
            inner: Rc::new(RefCell::new(SimpleRng::new(state))),
            seed: self.seed,
        }
    }
}
