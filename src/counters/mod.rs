//! Reading of kernel IPv6 counter pseudo-files.
//!
//! The kernel exposes IPv6 statistics as line-oriented text, one counter per
//! line in `<label> <value>` form:
//!
//! - `/proc/net/snmp6` for the whole host
//! - `/proc/net/dev_snmp6/<interface>` for a single interface
//!
//! Parsing keeps only the numeric second field of each line, in file order,
//! producing a [`CounterSequence`]. The traffic octet counters are then picked
//! by their fixed ordinal position into a [`TrafficSample`].
//!
//! # Example
//!
//! ```rust
//! use snmp6_monitor::counters::{CounterSequence, TrafficSample};
//!
//! let mut data = String::new();
//! for i in 0..26 {
//!     data.push_str(&format!("Ip6Counter{i} {}\n", i * 10));
//! }
//! let seq = CounterSequence::from_reader(&mut data.as_bytes()).unwrap();
//! let sample = TrafficSample::build(&seq, "eth0").unwrap();
//! assert_eq!(sample.rx(), 240);
//! assert_eq!(sample.tx(), 250);
//! ```

mod error;
mod parser;
mod sample;

pub use error::{Error, InsufficientData, Result};
pub use parser::{CounterLine, CounterSequence, MAX_FIELDS, MAX_LINE_LEN, parse};
pub use sample::{RX_OCTETS_ORDINAL, TX_OCTETS_ORDINAL, TrafficSample};
