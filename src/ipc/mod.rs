//! TCP+msgpack IPC transport layer.
//!
//! The application-layer boundary: length-prefixed msgpack frames carrying
//! `{id, method, body}` requests into the bridge and `{id, ok, ..}` replies
//! back out.

pub mod codec;
pub mod server;

pub use server::IpcServer;
