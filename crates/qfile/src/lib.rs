//! Typed-record mail queue files.
//!
//! qfile reads and writes the record format queue files are made of: a type
//! byte, a variable-length size, and an opaque payload, with pointer records
//! that splice in content appended later.
//!
//! # Crate Structure
//!
//! - [`stream`]: Random-access streams with stable identities (files, memory)
//! - [`record`]: The record codec: writer, reader, pointer navigation

/// Re-export stream types.
pub mod stream {
    pub use qfile_stream::*;
}

/// Re-export record codec types.
pub mod record {
    pub use qfile_record::*;
}
