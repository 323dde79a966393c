//! Federation contract for satellite universes reached through a peer
//! master (spec §4.9: two-step remote handshake, remote start/clock-reset/
//! terminate propagation).

// Layer 1: Standard library imports
// (none)

// Layer 2: Third-party crate imports
use async_trait::async_trait;

// Layer 3: Internal module imports
use crate::actor::CapabilitySet;
use crate::clock::Instant;
use crate::system::UniverseError;

/// Outcome of a `RemoteConnectionRequest(self)` handshake.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandshakeOutcome {
    /// The satellite accepted the connection, reporting its capabilities.
    Accept(CapabilitySet),
    /// The satellite explicitly rejected the connection.
    Reject,
    /// The satellite did not respond within the handshake timeout.
    Timeout,
}

/// A peer master reached over the network, standing in for everything a
/// [`crate::master::Master`] needs to federate with it. Concrete wire
/// transport (dial function, address resolution) is supplied by the
/// embedding process (spec §9: "remote actor references: a string address
/// + a dial function"); this trait only describes the protocol steps.
#[async_trait]
pub trait RemoteSatellite: Send + Sync {
    /// The satellite's configured remote URI.
    fn uri(&self) -> &str;

    /// Step one of the handshake: resolve the remote master reference.
    async fn identify(&self) -> Result<(), UniverseError>;

    /// Step two: request acceptance, offering `local_caps`.
    async fn request_connection(&self, local_caps: CapabilitySet) -> HandshakeOutcome;

    /// `RemoteRaceStart(master, simTime, timeScale)`.
    async fn start(&self, sim_time: Instant, time_scale: f64);

    /// `RemoteClockReset(instant, scale)`.
    async fn clock_reset(&self, instant: Instant, scale: f64);

    /// Terminate the satellite side of the federation.
    async fn terminate(&self) -> Result<(), UniverseError>;
}
