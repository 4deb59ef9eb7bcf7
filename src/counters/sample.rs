//! Selection of the traffic octet counters from a [`CounterSequence`].
//!
//! The kernel writes its IPv6 counters in a fixed order, so the received and
//! transmitted octets are always found at the same ordinal positions,
//! [`RX_OCTETS_ORDINAL`] and [`TX_OCTETS_ORDINAL`]. A sequence that ends before
//! the transmit ordinal yields no sample at all.

use super::{CounterSequence, InsufficientData};

/// Ordinal of the received octets counter within a counter sequence.
pub const RX_OCTETS_ORDINAL: usize = 24;
/// Ordinal of the transmitted octets counter within a counter sequence.
pub const TX_OCTETS_ORDINAL: usize = 25;

/// Received and transmitted octet counters for one scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrafficSample {
    scope: String,
    rx: i64,
    tx: i64,
}

impl TrafficSample {
    /// Creates a sample from already known counter values.
    ///
    /// # Arguments
    ///
    /// * `scope` - Interface name or global scope token.
    /// * `rx` - Received octets.
    /// * `tx` - Transmitted octets.
    pub fn new(scope: impl Into<String>, rx: i64, tx: i64) -> Self {
        Self {
            scope: scope.into(),
            rx,
            tx,
        }
    }

    /// Picks the traffic counters out of `sequence`.
    ///
    /// # Arguments
    ///
    /// * `sequence` - Counter values of one file, in file order.
    /// * `scope` - Reporting identity of the sample.
    ///
    /// # Errors
    ///
    /// Returns [`InsufficientData`] unless both [`RX_OCTETS_ORDINAL`] and
    /// [`TX_OCTETS_ORDINAL`] are present in the sequence.
    pub fn build(
        sequence: &CounterSequence,
        scope: impl Into<String>,
    ) -> Result<Self, InsufficientData> {
        let scope = scope.into();
        match (
            sequence.get(RX_OCTETS_ORDINAL),
            sequence.get(TX_OCTETS_ORDINAL),
        ) {
            (Some(rx), Some(tx)) => Ok(Self { scope, rx, tx }),
            _ => Err(InsufficientData {
                scope,
                found: sequence.len(),
                required: TX_OCTETS_ORDINAL + 1,
            }),
        }
    }

    /// Interface name or global scope token.
    pub fn scope(&self) -> &str {
        &self.scope
    }

    /// Received octets.
    pub fn rx(&self) -> i64 {
        self.rx
    }

    /// Transmitted octets.
    pub fn tx(&self) -> i64 {
        self.tx
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sequence_of(len: usize) -> CounterSequence {
        (0..len as i64).map(|i| i * 100).collect::<Vec<_>>().into()
    }

    #[test]
    fn test_build_picks_fixed_ordinals() {
        let sample = TrafficSample::build(&sequence_of(76), "eth0").unwrap();
        assert_eq!(sample, TrafficSample::new("eth0", 2400, 2500));
    }

    #[test]
    fn test_build_with_minimal_sequence() {
        let sample = TrafficSample::build(&sequence_of(26), "eth0").unwrap();
        assert_eq!(sample.rx(), 2400);
        assert_eq!(sample.tx(), 2500);
    }

    #[test]
    fn test_build_with_too_few_entries() {
        let err = TrafficSample::build(&sequence_of(24), "eth0").unwrap_err();
        assert_eq!(
            err,
            InsufficientData {
                scope: "eth0".to_string(),
                found: 24,
                required: 26,
            }
        );
    }

    #[test]
    fn test_build_without_transmit_counter() {
        let err = TrafficSample::build(&sequence_of(25), "snmpv6").unwrap_err();
        assert_eq!(err.found, 25);
    }

    #[test]
    fn test_build_from_parsed_file_with_noise() {
        let mut data = String::from("Header\n\n");
        for i in 0..24 {
            data.push_str(&format!("Ip6Counter{i} {i}\n"));
            if i % 5 == 0 {
                data.push_str("TotalPackets\n");
            }
        }
        data.push_str("Ip6InOctets 100\nIp6OutOctets 200\n");

        let seq = CounterSequence::from_reader(&mut data.as_bytes()).unwrap();
        let sample = TrafficSample::build(&seq, "eth0").unwrap();
        assert_eq!((sample.rx(), sample.tx()), (100, 200));
    }
}
