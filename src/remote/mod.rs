//! Remote bus connector: local proxy so the bus itself never needs to be
//! serializable (spec §4.4).

pub mod connector;

pub use connector::{RemoteBusConnector, RemoteCommand};
