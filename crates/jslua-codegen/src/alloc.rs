//! Unique id allocation for synthesized names.

/// Hands out strictly increasing ids, starting at 1.
///
/// One allocator serves a whole conversion run, so scaffolding generated for
/// nested or repeated constructs never collides.
#[derive(Debug, Default)]
pub struct IdAllocator {
    last: u64,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next(&mut self) -> u64 {
        self.last += 1;
        self.last
    }

    /// A fresh name such as `__tmp7`.
    pub fn fresh(&mut self, prefix: &str) -> String {
        format!("{}{}", prefix, self.next())
    }
}
