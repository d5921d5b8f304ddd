/// A stable name for a stream.
///
/// Two handles that report the same identity are treated as the same logical
/// stream. Pointer-cycle detection keys its state on this value and starts
/// over whenever it changes.
pub trait StreamIdentity {
    /// The stream's identity, e.g. the path of the underlying file.
    fn identity(&self) -> &str;
}

impl<T: StreamIdentity + ?Sized> StreamIdentity for &mut T {
    fn identity(&self) -> &str {
        (**self).identity()
    }
}

impl<T: StreamIdentity + ?Sized> StreamIdentity for Box<T> {
    fn identity(&self) -> &str {
        (**self).identity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryStream;

    fn identity_of<S: StreamIdentity>(stream: S) -> String {
        stream.identity().to_string()
    }

    #[test]
    fn forwards_through_mut_ref_and_box() {
        let mut stream = MemoryStream::new("incoming/ABC123");
        assert_eq!(identity_of(&mut stream), "incoming/ABC123");
        assert_eq!(identity_of(Box::new(stream)), "incoming/ABC123");
    }
}
