//! Resource probing.
//!
//! Before any byte is fetched the engine issues a metadata-only `HEAD`
//! request to learn the resource's length, its content type and whether the
//! server accepts byte-range requests.
//!
//! - [`descriptor`] - the immutable [`ResourceDescriptor`]
//! - [`probe`](mod@probe) - the `HEAD` probe itself

pub mod descriptor;
pub mod probe;

pub use descriptor::ResourceDescriptor;
pub use probe::{parse_url, probe};
