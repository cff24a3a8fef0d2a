use std::fmt;
use std::sync::Arc;

/// Cheaply clonable, immutable file contents.
///
/// Backed by anything that can lend out a byte slice, so both owned
/// `Vec<u8>` reads and memory maps can be shared with a blocking
/// dimension probe without copying.
#[derive(Clone)]
pub struct SharedBuffer(Arc<dyn AsRef<[u8]> + Send + Sync>);

impl SharedBuffer {
    pub fn new<T>(bytes: T) -> Self
    where
        T: AsRef<[u8]> + Send + Sync + 'static,
    {
        Self(Arc::new(bytes))
    }

    pub fn as_slice(&self) -> &[u8] {
        AsRef::<[u8]>::as_ref(&*self.0)
    }

    pub fn len(&self) -> usize {
        self.as_slice().len()
    }

    pub fn is_empty(&self) -> bool {
        self.as_slice().is_empty()
    }
}

impl From<Vec<u8>> for SharedBuffer {
    fn from(bytes: Vec<u8>) -> Self {
        Self::new(bytes)
    }
}

impl From<&'static [u8]> for SharedBuffer {
    fn from(bytes: &'static [u8]) -> Self {
        Self::new(bytes)
    }
}

impl AsRef<[u8]> for SharedBuffer {
    fn as_ref(&self) -> &[u8] {
        self.as_slice()
    }
}

impl fmt::Debug for SharedBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedBuffer")
            .field("len", &self.len())
            .finish()
    }
}
