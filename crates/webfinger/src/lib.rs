//! # WebFinger Discovery
//!
//! Discovery documents used to locate a remote account before talking to
//! it: the server's host-meta, and the account's WebFinger document, both
//! XRD underneath.
//!
//! | Module | Document |
//! |--------|----------|
//! | `xrd` | Generic XRD 1.0 (XML) / JRD (JSON) |
//! | `webfinger` | Account endpoints and legacy public key |
//! | `host_meta` | WebFinger URL template for a server |

pub mod errors;
pub mod host_meta;
pub mod webfinger;
pub mod xrd;

pub use errors::DiscoveryError;
pub use host_meta::HostMeta;
pub use webfinger::WebFinger;
pub use xrd::{Link, XrdDocument};
