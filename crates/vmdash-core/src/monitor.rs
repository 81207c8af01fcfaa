// ── Monitor ──
//
// Full lifecycle management for one vmrest daemon connection: the
// fixed-cadence poller, the out-of-cycle refreshes, and command routing.
// Reads flow Poller → DataStore → projection; writes flow dispatcher →
// OverrideStore → daemon, and the next poll reconciles.

use std::sync::Arc;

use futures_util::future::join_all;
use tokio::sync::{Mutex, mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use vmdash_api::types::{
    CloneParams, CreateNetworkParams, NicParams, PortForwardParams, RegistrationParams,
    SharedFolder, SharedFolderParams, VmUpdateParams,
};
use vmdash_api::{BasicAuth, TlsMode, TransportConfig, VmRestClient};

use crate::command::{Command, CommandEnvelope, CommandResult};
use crate::config::{MonitorConfig, TlsVerification};
use crate::error::CoreError;
use crate::ip::resolve_ip;
use crate::model::{
    HostNetwork, NicAttachment, PortForwardRule, PowerOperation, PowerState, SharedFolderEntry,
    Vm, VmDetail, VmId,
};
use crate::projection::{VmSnapshot, project};
use crate::store::{DataStore, OverrideStore, PollSnapshot};

const COMMAND_CHANNEL_SIZE: usize = 64;

// ── ConnectionState ──────────────────────────────────────────────────

/// Connection state observable by consumers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
    Failed,
}

// ── Monitor ──────────────────────────────────────────────────────────

/// The main entry point for consumers.
///
/// Cheaply cloneable via `Arc<MonitorInner>`. Owns the vmrest client,
/// the DataStore, and the OverrideStore; spawns the background poll and
/// command-processor tasks on `connect()`.
#[derive(Clone)]
pub struct Monitor {
    inner: Arc<MonitorInner>,
}

struct MonitorInner {
    config: MonitorConfig,
    client: VmRestClient,
    store: Arc<DataStore>,
    overrides: OverrideStore,
    connection_state: watch::Sender<ConnectionState>,
    command_tx: Mutex<mpsc::Sender<CommandEnvelope>>,
    command_rx: Mutex<Option<mpsc::Receiver<CommandEnvelope>>>,
    cancel: CancellationToken,
    /// Child token for the current connection — cancelled on disconnect,
    /// replaced on reconnect.
    cancel_child: Mutex<CancellationToken>,
    task_handles: Mutex<Vec<JoinHandle<()>>>,
}

impl Monitor {
    /// Create a new Monitor from configuration. Does NOT poll --
    /// call [`connect()`](Self::connect) to load data and start
    /// background tasks.
    pub fn new(config: MonitorConfig) -> Result<Self, CoreError> {
        let transport = build_transport(&config);
        let auth = config.auth.as_ref().map(|c| BasicAuth {
            username: c.username.clone(),
            password: c.password.clone(),
        });
        let client = VmRestClient::new(config.url.clone(), auth, &transport)?;

        let store = Arc::new(DataStore::new());
        let overrides = OverrideStore::new(config.override_timeout);
        let (connection_state, _) = watch::channel(ConnectionState::Disconnected);
        let (command_tx, command_rx) = mpsc::channel(COMMAND_CHANNEL_SIZE);
        let cancel = CancellationToken::new();
        let cancel_child = cancel.child_token();

        Ok(Self {
            inner: Arc::new(MonitorInner {
                config,
                client,
                store,
                overrides,
                connection_state,
                command_tx: Mutex::new(command_tx),
                command_rx: Mutex::new(Some(command_rx)),
                cancel,
                cancel_child: Mutex::new(cancel_child),
                task_handles: Mutex::new(Vec::new()),
            }),
        })
    }

    /// Access the monitor configuration.
    pub fn config(&self) -> &MonitorConfig {
        &self.inner.config
    }

    /// Access the underlying DataStore.
    pub fn store(&self) -> &Arc<DataStore> {
        &self.inner.store
    }

    /// Access the override store.
    pub fn overrides(&self) -> &OverrideStore {
        &self.inner.overrides
    }

    /// Project the current state into display rows.
    pub fn snapshot(&self) -> Vec<VmSnapshot> {
        project(&self.inner.store, &self.inner.overrides)
    }

    /// Subscribe to connection state changes.
    pub fn connection_state(&self) -> watch::Receiver<ConnectionState> {
        self.inner.connection_state.subscribe()
    }

    // ── Connection lifecycle ─────────────────────────────────────────

    /// Connect to the daemon: perform the initial poll cycle and spawn
    /// background tasks (periodic poller, command processor).
    pub async fn connect(&self) -> Result<(), CoreError> {
        let _ = self
            .inner
            .connection_state
            .send(ConnectionState::Connecting);

        // Fresh child token for this connection (supports reconnect).
        let child = self.inner.cancel.child_token();
        *self.inner.cancel_child.lock().await = child.clone();

        // Initial load — the "freshly mounted" edge trigger.
        if let Err(e) = self.full_refresh().await {
            let _ = self.inner.connection_state.send(ConnectionState::Failed);
            return Err(e);
        }

        let mut handles = self.inner.task_handles.lock().await;

        if let Some(rx) = self.inner.command_rx.lock().await.take() {
            let monitor = self.clone();
            let cancel = child.clone();
            handles.push(tokio::spawn(command_processor_task(monitor, rx, cancel)));
        }

        let interval = self.inner.config.poll_interval;
        if !interval.is_zero() {
            let monitor = self.clone();
            let cancel = child.clone();
            handles.push(tokio::spawn(poll_task(monitor, interval, cancel)));
        }

        let _ = self.inner.connection_state.send(ConnectionState::Connected);
        info!(vms = self.inner.store.vm_count(), "connected to vmrest");
        Ok(())
    }

    /// Disconnect: cancel background tasks and reset state so a later
    /// `connect()` starts clean.
    pub async fn disconnect(&self) {
        // Cancel the child token (not the parent — allows reconnect).
        self.inner.cancel_child.lock().await.cancel();

        let mut handles = self.inner.task_handles.lock().await;
        for handle in handles.drain(..) {
            let _ = handle.await;
        }

        // Recreate the command channel so reconnects get a fresh receiver;
        // the previous one was consumed by the processor task.
        {
            let (tx, rx) = mpsc::channel(COMMAND_CHANNEL_SIZE);
            *self.inner.command_tx.lock().await = tx;
            *self.inner.command_rx.lock().await = Some(rx);
        }

        let _ = self
            .inner
            .connection_state
            .send(ConnectionState::Disconnected);
        debug!("disconnected");
    }

    /// Force an immediate out-of-cycle poll — the "view became visible
    /// again" edge trigger.
    pub async fn resume(&self) -> Result<(), CoreError> {
        self.full_refresh().await
    }

    // ── Polling ──────────────────────────────────────────────────────

    /// One full poll cycle: fetch the collection, then fan out per-VM
    /// power/detail/IP requests concurrently.
    ///
    /// A collection fetch failure fails the cycle; per-VM sub-request
    /// failures are contained to that VM. A failed power poll records the
    /// powered-off fail-safe default rather than leaving the VM unset.
    pub async fn full_refresh(&self) -> Result<(), CoreError> {
        let raw = self.inner.client.list_vms().await?;
        let vms: Vec<Vm> = raw.into_iter().map(Vm::from).collect();

        let client = &self.inner.client;
        let codes = self.inner.config.ip_error_codes;

        // Explicit per-id task set: each entry runs its three
        // sub-requests concurrently and independently of other VMs.
        let futs = vms.iter().map(|vm| {
            let id = vm.id.clone();
            async move {
                let (power_res, detail_res, ip) = tokio::join!(
                    client.get_power_state(id.as_str()),
                    client.get_vm(id.as_str()),
                    resolve_ip(client, &codes, &id),
                );

                let power = match power_res {
                    Ok(body) => PowerState::from_wire(&body.power_state).unwrap_or_else(|| {
                        warn!(vm = %id, raw = %body.power_state, "unrecognized power state");
                        PowerState::PoweredOff
                    }),
                    Err(e) => {
                        debug!(vm = %id, error = %e, "power poll failed, recording poweredOff");
                        PowerState::PoweredOff
                    }
                };

                let detail = match detail_res {
                    Ok(info) => Some(VmDetail::from(info)),
                    Err(e) => {
                        debug!(vm = %id, error = %e, "detail fetch failed");
                        None
                    }
                };

                (id, power, detail, ip)
            }
        });
        let results = join_all(futs).await;

        let mut power = Vec::with_capacity(results.len());
        let mut ips = Vec::with_capacity(results.len());
        let mut details = Vec::new();
        for (id, state, detail, ip) in results {
            power.push((id.clone(), state));
            ips.push((id.clone(), ip));
            if let Some(detail) = detail {
                details.push((id, detail));
            }
        }

        self.inner.store.apply_poll_snapshot(PollSnapshot {
            vms,
            power: power.clone(),
            ips,
            details,
        });

        // Reconciliation rule: server progress supersedes optimistic
        // overrides before their timeout.
        for (id, state) in &power {
            self.inner.overrides.reconcile(id, *state);
        }

        debug!(vms = self.inner.store.vm_count(), "poll cycle complete");
        Ok(())
    }

    /// Out-of-cycle power refresh for one VM, with reconciliation.
    pub async fn refresh_power(&self, id: &VmId) -> Result<PowerState, CoreError> {
        let body = self.inner.client.get_power_state(id.as_str()).await?;
        let state = PowerState::from_wire(&body.power_state).ok_or_else(|| {
            CoreError::Internal(format!(
                "unrecognized power state '{}'",
                body.power_state
            ))
        })?;
        self.inner.store.record_power(id.clone(), state);
        self.inner.overrides.reconcile(id, state);
        Ok(state)
    }

    // ── Power dispatch ───────────────────────────────────────────────

    /// Dispatch a power operation.
    ///
    /// The optimistic override is installed before this method first
    /// suspends, so the transition shows immediately. On success the
    /// override stays — cleared by reconciliation or its timeout,
    /// whichever comes first. On failure it is rolled back (but never a
    /// newer dispatch's override: identity is checked by generation) and
    /// the state is re-observed either way.
    pub async fn set_power(&self, id: &VmId, operation: PowerOperation) -> Result<(), CoreError> {
        let generation = operation
            .transient()
            .map(|t| self.inner.overrides.apply(id.clone(), t));

        let result = self
            .inner
            .client
            .set_power_state(id.as_str(), operation.as_wire())
            .await;

        match result {
            Ok(_) => {
                self.spawn_power_refresh(id);
                Ok(())
            }
            Err(err) => {
                if let Some(generation) = generation {
                    self.inner.overrides.clear_if_current(id, generation);
                }
                // True state unknown after a failure — re-observe.
                self.spawn_power_refresh(id);

                if err.is_conflict() {
                    Err(CoreError::InvalidPowerTransition {
                        message: match &err {
                            vmdash_api::Error::Api { message, .. } => message.clone(),
                            other => other.to_string(),
                        },
                    })
                } else {
                    Err(err.into())
                }
            }
        }
    }

    fn spawn_power_refresh(&self, id: &VmId) {
        let monitor = self.clone();
        let id = id.clone();
        tokio::spawn(async move {
            if let Err(e) = monitor.refresh_power(&id).await {
                debug!(vm = %id, error = %e, "post-command power refresh failed");
            }
        });
    }

    fn spawn_collection_refresh(&self) {
        let monitor = self.clone();
        tokio::spawn(async move {
            if let Err(e) = monitor.full_refresh().await {
                debug!(error = %e, "post-command refresh failed");
            }
        });
    }

    // ── Command execution ────────────────────────────────────────────

    /// Execute a non-power command against the daemon.
    ///
    /// Sends the command through the internal channel to the processor
    /// task and awaits the result.
    pub async fn execute(&self, cmd: Command) -> Result<CommandResult, CoreError> {
        if *self.inner.connection_state.borrow() != ConnectionState::Connected {
            return Err(CoreError::Disconnected);
        }

        let (tx, rx) = tokio::sync::oneshot::channel();

        let command_tx = self.inner.command_tx.lock().await.clone();

        command_tx
            .send(CommandEnvelope {
                command: cmd,
                response_tx: tx,
            })
            .await
            .map_err(|_| CoreError::Disconnected)?;

        rx.await.map_err(|_| CoreError::Disconnected)?
    }

    // ── One-shot convenience ─────────────────────────────────────────

    /// One-shot: connect, run closure, disconnect.
    ///
    /// Optimized for the CLI: disables the periodic poller since a
    /// single request-response cycle is all that's needed.
    pub async fn oneshot<F, Fut, T>(config: MonitorConfig, f: F) -> Result<T, CoreError>
    where
        F: FnOnce(Monitor) -> Fut,
        Fut: std::future::Future<Output = Result<T, CoreError>>,
    {
        let mut cfg = config;
        cfg.poll_interval = Duration::ZERO;

        let monitor = Monitor::new(cfg)?;
        monitor.connect().await?;
        let result = f(monitor.clone()).await;
        monitor.disconnect().await;
        result
    }

    // ── Ad-hoc stateless queries ─────────────────────────────────────
    //
    // NICs, shared folders, networks, and port-forwards are plain
    // request/response data: fetched on demand, never cached.

    pub async fn list_nics(&self, id: &VmId) -> Result<Vec<NicAttachment>, CoreError> {
        let resp = self.inner.client.list_nics(id.as_str()).await?;
        Ok(resp.nics.into_iter().map(NicAttachment::from).collect())
    }

    pub async fn list_shared_folders(&self, id: &VmId) -> Result<Vec<SharedFolderEntry>, CoreError> {
        let raw = self.inner.client.list_shared_folders(id.as_str()).await?;
        Ok(raw.into_iter().map(SharedFolderEntry::from).collect())
    }

    pub async fn list_networks(&self) -> Result<Vec<HostNetwork>, CoreError> {
        let resp = self.inner.client.list_networks().await?;
        Ok(resp.vmnets.into_iter().map(HostNetwork::from).collect())
    }

    pub async fn list_port_forwards(&self, vmnet: &str) -> Result<Vec<PortForwardRule>, CoreError> {
        let resp = self.inner.client.list_port_forwards(vmnet).await?;
        Ok(resp
            .port_forwardings
            .into_iter()
            .map(PortForwardRule::from)
            .collect())
    }

    /// Restriction flags for one VM. Shape varies by product version, so
    /// this stays untyped.
    pub async fn get_restrictions(&self, id: &VmId) -> Result<serde_json::Value, CoreError> {
        Ok(self.inner.client.get_restrictions(id.as_str()).await?)
    }
}

// ── Background tasks ─────────────────────────────────────────────────

async fn poll_task(monitor: Monitor, period: Duration, cancel: CancellationToken) {
    let mut interval = tokio::time::interval(period);
    interval.tick().await; // consume the immediate first tick

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            _ = interval.tick() => {
                if let Err(e) = monitor.full_refresh().await {
                    warn!(error = %e, "periodic poll failed");
                }
            }
        }
    }
}

/// Process commands from the mpsc channel, routing each to the
/// appropriate vmrest call.
async fn command_processor_task(
    monitor: Monitor,
    mut rx: mpsc::Receiver<CommandEnvelope>,
    cancel: CancellationToken,
) {
    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            envelope = rx.recv() => {
                let Some(envelope) = envelope else { break };
                let result = route_command(&monitor, envelope.command).await;
                let _ = envelope.response_tx.send(result);
            }
        }
    }
}

// ── Command routing ──────────────────────────────────────────────────

/// Route a command to the vmrest call. Mutations that change what the
/// collection poll would see trigger an out-of-cycle refresh on success.
async fn route_command(monitor: &Monitor, cmd: Command) -> Result<CommandResult, CoreError> {
    let client = &monitor.inner.client;

    match cmd {
        // ── VM lifecycle ─────────────────────────────────────────────
        Command::DeleteVm { id } => {
            client.delete_vm(id.as_str()).await?;
            monitor.spawn_collection_refresh();
            Ok(CommandResult::Ok)
        }

        Command::UpdateVm {
            id,
            processors,
            memory_mb,
        } => {
            let info = client
                .update_vm(
                    id.as_str(),
                    &VmUpdateParams {
                        processors,
                        memory: memory_mb,
                    },
                )
                .await?;
            monitor.spawn_collection_refresh();
            Ok(CommandResult::VmUpdated(VmDetail::from(info)))
        }

        Command::CloneVm { name, parent } => {
            client
                .clone_vm(&CloneParams {
                    name,
                    parent_id: parent.as_str().to_owned(),
                })
                .await?;
            monitor.spawn_collection_refresh();
            Ok(CommandResult::Ok)
        }

        Command::RegisterVm { name, path } => {
            let vm = client
                .register_vm(&RegistrationParams { name, path })
                .await?;
            monitor.spawn_collection_refresh();
            Ok(CommandResult::VmRegistered(Vm::from(vm)))
        }

        // ── NIC devices ──────────────────────────────────────────────
        Command::CreateNic { id, nic_type, vmnet } => {
            let nic = client
                .create_nic(id.as_str(), &NicParams { nic_type, vmnet })
                .await?;
            Ok(CommandResult::Nic(NicAttachment::from(nic)))
        }

        Command::UpdateNic {
            id,
            index,
            nic_type,
            vmnet,
        } => {
            let nic = client
                .update_nic(id.as_str(), index, &NicParams { nic_type, vmnet })
                .await?;
            Ok(CommandResult::Nic(NicAttachment::from(nic)))
        }

        Command::DeleteNic { id, index } => {
            client.delete_nic(id.as_str(), index).await?;
            Ok(CommandResult::Ok)
        }

        // ── Shared folders ───────────────────────────────────────────
        Command::CreateSharedFolder {
            id,
            folder_id,
            host_path,
            flags,
        } => {
            let folders = client
                .create_shared_folder(
                    id.as_str(),
                    &SharedFolder {
                        folder_id,
                        host_path,
                        flags,
                    },
                )
                .await?;
            Ok(CommandResult::SharedFolders(
                folders.into_iter().map(SharedFolderEntry::from).collect(),
            ))
        }

        Command::UpdateSharedFolder {
            id,
            folder_id,
            host_path,
            flags,
        } => {
            let folders = client
                .update_shared_folder(
                    id.as_str(),
                    &folder_id,
                    &SharedFolderParams { host_path, flags },
                )
                .await?;
            Ok(CommandResult::SharedFolders(
                folders.into_iter().map(SharedFolderEntry::from).collect(),
            ))
        }

        Command::DeleteSharedFolder { id, folder_id } => {
            client
                .delete_shared_folder(id.as_str(), &folder_id)
                .await?;
            Ok(CommandResult::Ok)
        }

        // ── Host networks ────────────────────────────────────────────
        Command::CreateNetwork { name, net_type } => {
            let net = client
                .create_network(&CreateNetworkParams { name, net_type })
                .await?;
            Ok(CommandResult::Network(HostNetwork::from(net)))
        }

        Command::SetPortForward {
            vmnet,
            protocol,
            port,
            guest_ip,
            guest_port,
            desc,
        } => {
            client
                .set_port_forward(
                    &vmnet,
                    &protocol,
                    port,
                    &PortForwardParams {
                        guest_ip,
                        guest_port,
                        desc,
                    },
                )
                .await?;
            Ok(CommandResult::Ok)
        }

        Command::DeletePortForward {
            vmnet,
            protocol,
            port,
        } => {
            client.delete_port_forward(&vmnet, &protocol, port).await?;
            Ok(CommandResult::Ok)
        }
    }
}

// ── Transport ────────────────────────────────────────────────────────

fn build_transport(config: &MonitorConfig) -> TransportConfig {
    TransportConfig {
        tls: match &config.tls {
            TlsVerification::SystemDefaults => TlsMode::System,
            TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
            TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
        },
        timeout: config.timeout,
    }
}
