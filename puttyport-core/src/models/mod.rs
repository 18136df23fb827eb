//! Core data structures: imported sessions, port forwards, and the records
//! held by the destination store.

mod host;
mod port_forward;
mod session;

pub use host::{DEFAULT_COLOR, DEFAULT_FONT_SIZE, HostRecord, PortForwardRecord};
pub use port_forward::{
    BIND_ALL_INTERFACES, BIND_IPV6_ANY, BIND_IPV6_LOOPBACK, BIND_LOCALHOST, ForwardDestination,
    ForwardKind, PortForwardDescriptor,
};
pub use session::{
    AuthAgentUse, DEFAULT_SSH_PORT, SSH_PROTOCOL, SessionDefaults, SessionDescriptor,
};
