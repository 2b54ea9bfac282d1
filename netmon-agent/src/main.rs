mod cli;
mod config;

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use netmon_alarms::AlarmEngine;
use netmon_oid::OidRegistry;
use netmon_orchestrator::{DeviceRegistry, Scheduler};
use netmon_sink::{RingBufferSink, Sink};
use netmon_types::{DeviceConfig, TierIntervals, TransportCredentials, Vendor};
use tokio::sync::watch;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cli::{Cli, Command, DevicesCommand};
use config::AgentConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "netmon_agent=info,netmon_orchestrator=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Run => run(&cli.config).await,
        Command::Devices { command } => devices(&cli.config, command).await,
    }
}

async fn run(config_path: &std::path::Path) -> anyhow::Result<()> {
    let config = AgentConfig::load_from_file(config_path)?;

    let oid_registry = Arc::new(OidRegistry::with_builtin_vendors());
    let device_registry = Arc::new(DeviceRegistry::new());
    for device in config.devices.clone() {
        device_registry
            .register_device(device, &oid_registry)
            .context("registering device from config")?;
    }

    let alarms = Arc::new(AlarmEngine::new(config.thresholds.clone().into()));
    let sink = build_sink(&config);

    let scheduler = Arc::new(Scheduler::new(
        device_registry,
        oid_registry,
        config.session_config(),
        alarms,
        sink,
        config.scheduler_config(),
    ));

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let scheduler_task = {
        let scheduler = scheduler.clone();
        tokio::spawn(async move { scheduler.run(shutdown_rx).await })
    };

    tokio::signal::ctrl_c().await.context("waiting for ctrl-c")?;
    tracing::info!("shutdown requested");
    shutdown_tx.send(true).ok();
    scheduler_task.await.context("scheduler task panicked")?;

    Ok(())
}

fn build_sink(config: &AgentConfig) -> Arc<dyn Sink> {
    #[cfg(feature = "http-sink")]
    if let Some(base_url) = &config.sink.http_base_url {
        return Arc::new(netmon_sink::HttpSink::new(base_url.clone()));
    }
    #[cfg(not(feature = "http-sink"))]
    if config.sink.http_base_url.is_some() {
        tracing::warn!("sink.http_base_url is set but this binary was built without the http-sink feature; falling back to the in-memory ring buffer");
    }
    Arc::new(RingBufferSink::default())
}

async fn devices(config_path: &std::path::Path, command: DevicesCommand) -> anyhow::Result<()> {
    match command {
        DevicesCommand::List => list_devices(config_path),
        DevicesCommand::Register {
            device_id,
            name,
            address,
            vendor,
            community,
        } => register_device(config_path, device_id, name, address, vendor, community),
        DevicesCommand::PollNow { device_id, tier } => {
            poll_now(config_path, device_id, tier.into()).await
        }
    }
}

fn list_devices(config_path: &std::path::Path) -> anyhow::Result<()> {
    let config = AgentConfig::load_from_file(config_path)?;
    if config.devices.is_empty() {
        println!("no devices configured");
        return Ok(());
    }
    for device in &config.devices {
        println!(
            "{:<6} {:<20} {:<20} {:<10} enabled={}",
            device.device_id, device.name, device.address, device.vendor_tag, device.enabled
        );
    }
    Ok(())
}

fn register_device(
    config_path: &std::path::Path,
    device_id: u64,
    name: String,
    address: String,
    vendor: String,
    community: String,
) -> anyhow::Result<()> {
    let mut config = AgentConfig::load_from_file(config_path)?;
    let id = netmon_types::DeviceId(device_id);
    if config.devices.iter().any(|d| d.device_id == id) {
        anyhow::bail!("device {device_id} is already registered in {}", config_path.display());
    }

    config.devices.push(DeviceConfig {
        device_id: id,
        name,
        address,
        credentials: TransportCredentials::V2c { community },
        vendor_tag: Vendor::new(vendor),
        enabled: true,
        tier_intervals: TierIntervals::default(),
    });

    let yaml = serde_yaml::to_string(&config).context("serializing updated config")?;
    std::fs::write(config_path, yaml)
        .with_context(|| format!("writing config file {}", config_path.display()))?;
    println!("registered device {device_id} in {}", config_path.display());
    Ok(())
}

async fn poll_now(
    config_path: &std::path::Path,
    device_id: u64,
    tier: netmon_types::PollTier,
) -> anyhow::Result<()> {
    let config = AgentConfig::load_from_file(config_path)?;
    let id = netmon_types::DeviceId(device_id);
    let device = config
        .devices
        .into_iter()
        .find(|d| d.device_id == id)
        .ok_or_else(|| anyhow::anyhow!("device {device_id} is not in {}", config_path.display()))?;

    let oid_registry = Arc::new(OidRegistry::with_builtin_vendors());
    let device_registry = Arc::new(DeviceRegistry::new());
    device_registry.register_device(device, &oid_registry)?;
    let alarms = Arc::new(AlarmEngine::new(config.thresholds.clone().into()));
    let ring = Arc::new(RingBufferSink::default());

    let scheduler = Scheduler::new(
        device_registry,
        oid_registry,
        config.session_config(),
        alarms,
        ring.clone(),
        config.scheduler_config(),
    );

    scheduler
        .poll_now(id, tier)
        .await
        .context("one-shot poll failed")?;

    for sample in ring.samples_snapshot() {
        println!("{sample:#?}");
    }
    for alarm in ring.alarms_snapshot() {
        println!("{alarm:#?}");
    }
    Ok(())
}
