//! Core signal-processing and protocol-decoding engine for a tire-pressure
//! monitoring receiver: a ring buffer of RF pulses, a coherent-signal
//! scanner, a bit-level codec layer, and a registry of vehicle-specific
//! protocol decoders. No radio tuning, no display, no file I/O — this is a
//! library meant to be driven by a shell that owns those concerns.

#![cfg_attr(not(test), no_std)]

pub mod bitmap;
pub mod checksum;
pub mod decoders;
pub mod dispatcher;
pub mod error;
pub mod field_set;
pub mod line_code;
pub(crate) mod log;
pub mod ring_buffer;
pub mod scanner;
pub mod types;

pub use dispatcher::decode_signal;
pub use error::{CoreError, CoreResult};
pub use field_set::{Field, FieldSet, FieldType, FieldValue};
pub use ring_buffer::{DefaultSampleBuffer, SampleBuffer};
pub use scanner::{scan_for_signal, ScanStats, ScannerState};
pub use types::{free_msg_info, MessageInfo, Pulse};
