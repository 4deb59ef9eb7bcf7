//! snmp6 monitor: collects IPv6 traffic octet counters from the Linux kernel.
//!
//! The library reads `/proc/net/dev_snmp6/<interface>` (or `/proc/net/snmp6`
//! for the whole host), extracts the received and transmitted octet counters,
//! applies an interface filter and hands the samples to a dispatcher.

use std::sync::Arc;

use collector::Collector;
use config::{Config, Output};
use dispatch::{Dispatcher, JsonLinesDispatcher, LogDispatcher};
use error::ResultOkLogExt;

pub mod collector;
pub mod config;
pub mod counters;
pub mod dispatch;
pub mod error;
pub mod filter;
pub mod interfaces;

/// Runs the collector until Ctrl-C is received.
///
/// One collection pass is executed per configured interval on the blocking
/// thread pool. A failed pass is logged and the next one is attempted on the
/// following tick.
///
/// # Errors
///
/// Possible errors include:
/// - Invalid `SNMP6_*` environment variables.
/// - A panicking collection pass.
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_env()?;
    log::debug!(
        "Collecting {:?} counters from `{}` every {:?}",
        config.mode,
        config.proc_root.display(),
        config.interval
    );

    let mut dispatcher: Box<dyn Dispatcher + Send> = match config.output {
        Output::Log => Box::new(LogDispatcher),
        Output::Json => Box::new(JsonLinesDispatcher::new(std::io::stdout())),
    };

    let mut interval = tokio::time::interval(config.interval);
    let collector = Arc::new(Collector::from_config(config));

    loop {
        tokio::select! {
            _ = interval.tick() => {}
            _ = tokio::signal::ctrl_c() => {
                log::info!("Received Ctrl-C, stopping collection");
                return Ok(());
            }
        }

        let timestamp = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)?
            .as_secs();
        log::trace!("Collecting counters@{timestamp}");

        let collector = Arc::clone(&collector);
        let (returned, result) = tokio::task::spawn_blocking(move || {
            let before = std::time::Instant::now();
            let result = collector.collect(timestamp, &mut *dispatcher);
            let took = before.elapsed();
            log::trace!("collect() took {} nanoseconds", took.as_nanos());
            (dispatcher, result)
        })
        .await?;
        dispatcher = returned;

        if let Some(summary) = result.ok_log(log::Level::Error) {
            log::debug!(
                "Pass finished: dispatched={}, filtered={}, failed={}",
                summary.dispatched,
                summary.filtered,
                summary.failed
            );
        }
    }
}
