use super::cli::Cli;
use super::client_handler::client_command_handler::ClientHandler;
use super::fabric::container_fabric::ContainerFabric;
use super::fabric::sandbox_fabric::SandboxFabric;
use super::kubernetes::kube_client::KubeClusterClient;
use super::managers::container_configuration::ProvisioningDefaults;
use super::managers::sandbox::Sandbox;
use super::socket::unix_socket_server::{UnixSocketServer, UnixSocketServerError};
use anyhow::Error;
use log::{debug, error, info};
use std::sync::Arc;
use std::time::Duration;
use tokio::select;
use tokio::signal::unix::{signal, SignalKind};
use tokio::spawn;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

pub struct DaemonBuilder;

impl DaemonBuilder {
    pub async fn build(cli: Cli) -> anyhow::Result<Daemon, Error> {
        let client = kube::Client::try_default().await?;
        let namespace = cli
            .namespace
            .clone()
            .unwrap_or_else(|| client.default_namespace().to_string());
        info!("Managing project containers in namespace: {namespace}");
        let cluster = Arc::new(KubeClusterClient::new(
            client,
            &namespace,
            Duration::from_secs(cli.cluster_request_timeout_secs),
        ));
        let container_fabric = Box::new(ContainerFabric::new(
            cli.workdir_path.clone(),
            cluster,
            Arc::new(Self::provisioning_defaults(&cli)),
        ));
        let sandbox = SandboxFabric::new(cli.workdir_path)
            .await?
            .create_sandbox(container_fabric)
            .await?;
        let usock_server = UnixSocketServer::new(&cli.unix_sock_path)?;
        Ok(Daemon {
            sandbox,
            usock_server,
            cancellation_token: Arc::new(CancellationToken::new()),
        })
    }

    fn provisioning_defaults(cli: &Cli) -> ProvisioningDefaults {
        ProvisioningDefaults {
            app_label: cli.app_label.clone(),
            storage_size: cli.storage_size.clone(),
            storage_class: cli.storage_class.clone(),
            cpu_limit: cli.cpu_limit.clone(),
            memory_limit: cli.memory_limit.clone(),
            cpu_request: cli.cpu_request.clone(),
            memory_request: cli.memory_request.clone(),
            ..Default::default()
        }
    }
}

pub struct Daemon {
    usock_server: UnixSocketServer,
    sandbox: Arc<dyn Sandbox + Send + Sync>,
    cancellation_token: Arc<CancellationToken>,
}

impl Daemon {
    pub async fn run(self) -> anyhow::Result<JoinHandle<Result<(), Error>>, Error> {
        info!("Starting sandbox daemon.");
        let mut usock_thread = Self::spawn_unix_socket_server_thread(
            self.usock_server,
            self.sandbox,
            self.cancellation_token.clone(),
        );
        let mut sigint = signal(SignalKind::interrupt())?;
        let mut sigterm = signal(SignalKind::terminate())?;

        Ok(spawn(async move {
            select! {
                _ = sigint.recv() => {
                    info!("SIGINT received shutting down");
                }

                _ = sigterm.recv() => {
                    info!("SIGTERM recevied shutting down");
                }

                v = &mut usock_thread => {
                    error!("Error while listening on unixsocket: {:?}", v);
                }
            }
            info!("Shutting down sandbox daemon.");
            self.cancellation_token.cancel();

            if !usock_thread.is_finished() {
                debug!("UnixSocketServer result: {:#?}", usock_thread.await);
            }

            info!("Sandbox daemon succesfully shutdown.");
            Ok(())
        }))
    }

    fn spawn_unix_socket_server_thread(
        usock_server: UnixSocketServer,
        sandbox: Arc<dyn Sandbox + Send + Sync>,
        token: Arc<CancellationToken>,
    ) -> JoinHandle<Result<(), UnixSocketServerError>> {
        tokio::spawn(async move { usock_server.listen::<ClientHandler>(sandbox, token).await })
    }
}
