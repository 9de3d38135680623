//! Domain models

pub mod packet;

pub use packet::{Packet, PacketBatch, ENERGY_SUM_TOLERANCE};
