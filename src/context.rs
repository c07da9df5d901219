/// A context for a schema build which holds an arena allocator.
///
/// Building a schema allocates many small, long-lived pieces: type definitions, type references,
/// inflected names, and the patch maps derived from them. All of them share the lifetime of the
/// schema they belong to, so they're allocated in one arena and dropped all at once.
///
/// Unlike a per-request context, a `BuildContext` is expected to live as long as the schema that
/// was built inside of it is served.
pub struct BuildContext {
    /// An arena allocator that holds the memory allocated for the Build Context's lifetime
    pub arena: bumpalo::Bump,
}

impl BuildContext {
    /// Create a new build context with a preallocated arena.
    pub fn new() -> Self {
        let arena = bumpalo::Bump::new();
        BuildContext { arena }
    }

    /// Put the value of `item` onto the arena and return a reference to it.
    #[inline]
    pub fn alloc<T>(&self, item: T) -> &T {
        self.arena.alloc(item)
    }

    /// Puts a `String` onto the arena and returns a reference to it to tie the `String`'s lifetime
    /// to this context without reallocating or copying it. Inflected names are stored this way.
    #[inline]
    pub fn alloc_string(&self, str: String) -> &str {
        self.arena.alloc(str)
    }
}

impl Default for BuildContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Trait for structures that can be created empty inside of an arena.
pub trait DefaultIn<'a> {
    fn default_in(arena: &'a bumpalo::Bump) -> Self;
}
