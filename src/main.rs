/// Entry point of the IPv6 traffic counter collector.
///
/// Reads its configuration from `SNMP6_*` environment variables and runs one
/// collection pass per interval until interrupted.
///
/// # Examples
///
/// ```bash
/// RUST_LOG=info SNMP6_INTERFACES=lo SNMP6_IGNORE_SELECTED=true cargo run
/// ```
#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    snmp6_monitor::run().await
}
