//! Hand-off of collected samples to a metrics sink.
//!
//! Each accepted [`TrafficSample`] is wrapped into a [`ValueList`], which carries
//! the plugin name, the scope as plugin instance, the `if_octets` type and the
//! two counters as DERIVE values. A [`Dispatcher`] receives one value list per
//! sample.

use std::io::Write;

use crate::counters::TrafficSample;

/// Type name of the receive/transmit octet counter pair.
pub const IF_OCTETS: &str = "if_octets";

/// Data source names of the two values, in order.
pub const DS_NAMES: [&str; 2] = ["rx", "tx"];

/// Errors that may occur while dispatching a value list.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to serialize value list: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("failed to write value list: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

/// A single metric record handed to the sink.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct ValueList {
    /// Timestamp (in UNIX epoch seconds)
    pub time: u64,
    pub plugin: String,
    pub plugin_instance: String,
    #[serde(rename = "type")]
    pub type_: &'static str,
    pub dsnames: [&'static str; 2],
    /// Monotonic counters, `[rx, tx]`.
    pub values: [i64; 2],
}

impl ValueList {
    /// Builds the `if_octets` record for `sample`.
    ///
    /// # Examples
    ///
    /// ```
    /// use snmp6_monitor::counters::TrafficSample;
    /// use snmp6_monitor::dispatch::ValueList;
    ///
    /// let sample = TrafficSample::new("eth0", 100, 200);
    /// let vl = ValueList::if_octets(1700000000, "snmp6", &sample);
    /// assert_eq!(vl.plugin_instance, "eth0");
    /// assert_eq!(vl.values, [100, 200]);
    /// ```
    pub fn if_octets(time: u64, plugin: &str, sample: &TrafficSample) -> Self {
        Self {
            time,
            plugin: plugin.to_owned(),
            plugin_instance: sample.scope().to_owned(),
            type_: IF_OCTETS,
            dsnames: DS_NAMES,
            values: [sample.rx(), sample.tx()],
        }
    }
}

/// Receives accepted value lists.
pub trait Dispatcher {
    fn dispatch(&mut self, values: &ValueList) -> Result<()>;
}

/// Writes each value list to the `log` facade at info level.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogDispatcher;

impl Dispatcher for LogDispatcher {
    fn dispatch(&mut self, values: &ValueList) -> Result<()> {
        log::info!(
            target: "snmp6 dispatch",
            "{}/{}/{} time={} rx={} tx={}",
            values.plugin,
            values.plugin_instance,
            values.type_,
            values.time,
            values.values[0],
            values.values[1]
        );
        Ok(())
    }
}

/// Writes each value list as one JSON object per line.
#[derive(Debug)]
pub struct JsonLinesDispatcher<W> {
    out: W,
}

impl<W: Write> JsonLinesDispatcher<W> {
    /// Creates a dispatcher writing to `out`, flushing after every line.
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Consumes the dispatcher, returning the underlying writer.
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Dispatcher for JsonLinesDispatcher<W> {
    fn dispatch(&mut self, values: &ValueList) -> Result<()> {
        serde_json::to_writer(&mut self.out, values)?;
        self.out.write_all(b"\n")?;
        self.out.flush()?;
        Ok(())
    }
}
