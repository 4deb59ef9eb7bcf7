//! A single collection pass over the IPv6 counter files.
//!
//! In [`Mode::Interface`] the [`Collector`] enumerates interfaces, reads
//! `<proc_root>/net/dev_snmp6/<interface>` for each of them, consults the
//! [`IgnoreList`] and dispatches one `snmp6` value list per accepted interface.
//! In [`Mode::Global`] it reads `<proc_root>/net/snmp6` once and dispatches a
//! single unfiltered `snmpv6` value list.
//!
//! A failing target is logged and skipped. Only a failure to enumerate
//! interfaces fails the whole pass.

use std::path::{Path, PathBuf};

use crate::config::{Config, Mode};
use crate::counters::{self, TrafficSample};
use crate::dispatch::{self, Dispatcher, ValueList};
use crate::filter::IgnoreList;
use crate::interfaces::{self, InterfaceSource, ProcNetDev};

/// Plugin name of per-interface samples.
pub const INTERFACE_PLUGIN: &str = "snmp6";
/// Plugin name of the global sample.
pub const GLOBAL_PLUGIN: &str = "snmpv6";
/// Scope of the global sample.
pub const GLOBAL_SCOPE: &str = "snmpv6";

/// Errors that abort a whole collection pass.
#[derive(Debug, thiserror::Error)]
pub enum CollectError {
    #[error("failed to enumerate interfaces: {0}")]
    Enumeration(#[from] interfaces::Error),
}

/// Errors that cause a single target to be skipped.
#[derive(Debug, thiserror::Error)]
pub enum TargetError {
    #[error(transparent)]
    Source(#[from] counters::Error),
    #[error(transparent)]
    InsufficientData(#[from] counters::InsufficientData),
    #[error("invalid interface name `{0}`")]
    InvalidInterfaceName(String),
    #[error(transparent)]
    Dispatch(#[from] dispatch::Error),
}

/// Outcome of one collection pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PassSummary {
    /// Samples handed to the dispatcher.
    pub dispatched: usize,
    /// Samples dropped by the filter.
    pub filtered: usize,
    /// Targets skipped because of an error.
    pub failed: usize,
}

/// Collects IPv6 traffic counters in one of the two [`Mode`]s.
#[derive(Debug)]
pub struct Collector<S> {
    mode: Mode,
    proc_root: PathBuf,
    filter: IgnoreList,
    source: S,
}

impl Collector<ProcNetDev> {
    /// Builds a collector enumerating interfaces from `<proc_root>/net/dev`.
    pub fn from_config(config: Config) -> Self {
        let source = ProcNetDev::from_proc_root(&config.proc_root);
        CollectorBuilder::default()
            .set_mode(config.mode)
            .set_proc_root(config.proc_root.clone())
            .set_filter(config.into_filter())
            .build(source)
    }
}

impl<S: InterfaceSource> Collector<S> {
    /// Returns the collection mode.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Returns the interface filter applied in [`Mode::Interface`].
    pub fn filter(&self) -> &IgnoreList {
        &self.filter
    }

    /// Runs one collection pass.
    ///
    /// # Arguments
    ///
    /// * `timestamp` - UNIX time attached to every dispatched value list.
    /// * `dispatcher` - Receives the accepted samples.
    ///
    /// # Errors
    ///
    /// Returns [`CollectError::Enumeration`] if the interface list cannot be
    /// obtained. Nothing is dispatched in that case.
    pub fn collect(
        &self,
        timestamp: u64,
        dispatcher: &mut dyn Dispatcher,
    ) -> Result<PassSummary, CollectError> {
        let mut summary = PassSummary::default();

        match self.mode {
            Mode::Global => match self.collect_global(timestamp, dispatcher) {
                Ok(()) => summary.dispatched += 1,
                Err(err) => {
                    log::warn!(
                        target: "snmp6 collector",
                        "skipping global counters: error={}",
                        err
                    );
                    summary.failed += 1;
                }
            },
            Mode::Interface => {
                for iface in self.source.interfaces()? {
                    match self.collect_interface(&iface, timestamp, dispatcher) {
                        Ok(true) => summary.dispatched += 1,
                        Ok(false) => summary.filtered += 1,
                        Err(err) => {
                            log::warn!(
                                target: "snmp6 collector",
                                "skipping interface: interface={}, error={}",
                                iface,
                                err
                            );
                            summary.failed += 1;
                        }
                    }
                }
            }
        }

        Ok(summary)
    }

    /// Reads, builds, filters and dispatches the sample of one interface.
    ///
    /// # Returns
    ///
    /// `Ok(true)` if the sample was dispatched, `Ok(false)` if the filter
    /// dropped it.
    ///
    /// # Errors
    ///
    /// Returns a [`TargetError`] if the interface name is invalid, the counter
    /// file cannot be read, it holds too few counters, or dispatching fails.
    fn collect_interface(
        &self,
        iface: &str,
        timestamp: u64,
        dispatcher: &mut dyn Dispatcher,
    ) -> Result<bool, TargetError> {
        let path = interface_counter_path(&self.proc_root, iface)?;
        let sequence = counters::parse(path)?;
        let sample = TrafficSample::build(&sequence, iface)?;

        if self.filter.matches(sample.scope()) {
            log::trace!("Filtered interface `{iface}`");
            return Ok(false);
        }

        dispatcher.dispatch(&ValueList::if_octets(
            timestamp,
            INTERFACE_PLUGIN,
            &sample,
        ))?;
        Ok(true)
    }

    /// Reads `net/snmp6` and dispatches the global sample without filtering.
    fn collect_global(
        &self,
        timestamp: u64,
        dispatcher: &mut dyn Dispatcher,
    ) -> Result<(), TargetError> {
        let sequence = counters::parse(self.proc_root.join("net/snmp6"))?;
        let sample = TrafficSample::build(&sequence, GLOBAL_SCOPE)?;
        dispatcher.dispatch(&ValueList::if_octets(timestamp, GLOBAL_PLUGIN, &sample))?;
        Ok(())
    }
}

/// Resolves `<proc_root>/net/dev_snmp6/<iface>`, rejecting names that would
/// leave that directory.
fn interface_counter_path(proc_root: &Path, iface: &str) -> Result<PathBuf, TargetError> {
    if iface.is_empty() || iface == "." || iface == ".." || iface.contains('/') {
        return Err(TargetError::InvalidInterfaceName(iface.to_owned()));
    }
    Ok(proc_root.join("net/dev_snmp6").join(iface))
}

/// Builder for a [`Collector`].
///
/// Unset fields default to [`Mode::Interface`], `/proc` and an empty filter.
#[derive(Debug, Default)]
pub struct CollectorBuilder {
    mode: Mode,
    proc_root: Option<PathBuf>,
    filter: IgnoreList,
}

impl CollectorBuilder {
    /// Sets the collection mode.
    ///
    /// # Arguments
    ///
    /// * `mode` - [`Mode::Interface`] for per-interface samples, [`Mode::Global`]
    ///   for a single host-wide sample.
    ///
    /// # Returns
    ///
    /// The builder with the `mode` set.
    pub fn set_mode(&mut self, mode: Mode) -> &mut Self {
        self.mode = mode;
        self
    }

    /// Sets the procfs mount root. Defaults to `/proc`.
    ///
    /// # Arguments
    ///
    /// * `proc_root` - Directory containing `net/snmp6` and `net/dev_snmp6`,
    ///   e.g. `/rootfs/proc` when running in a container.
    ///
    /// # Returns
    ///
    /// The builder with the `proc_root` set.
    pub fn set_proc_root(&mut self, proc_root: impl Into<PathBuf>) -> &mut Self {
        self.proc_root = Some(proc_root.into());
        self
    }

    /// Sets the interface filter. Ignored in [`Mode::Global`].
    pub fn set_filter(&mut self, filter: IgnoreList) -> &mut Self {
        self.filter = filter;
        self
    }

    /// Builds the [`Collector`], taking the configured fields out of the builder.
    ///
    /// # Arguments
    ///
    /// * `source` - Supplies the interface names on every pass.
    pub fn build<S: InterfaceSource>(&mut self, source: S) -> Collector<S> {
        Collector {
            mode: self.mode,
            proc_root: self
                .proc_root
                .take()
                .unwrap_or_else(|| PathBuf::from("/proc")),
            filter: std::mem::take(&mut self.filter),
            source,
        }
    }
}
