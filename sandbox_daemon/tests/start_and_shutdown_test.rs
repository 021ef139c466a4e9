use client_lib::SandboxConnection;
use common::{create_example_files, WorkdirManager};
use nix::{
    sys::signal::{
        self,
        Signal::{SIGINT, SIGTERM},
    },
    unistd::Pid,
};
use sandbox_client::container::ContainerConfig;
use sandbox_daemon::daemon::DaemonBuilder;
use uuid::Uuid;

mod common;

#[tokio::test]
#[ignore]
async fn sig_term_shutdown_removes_socket() {
    let workdir_path_manager = WorkdirManager::new().await;
    let usock_path = workdir_path_manager
        .get_path()
        .join(format!("usock-{}", Uuid::new_v4()));
    let cli = common::create_example_cli(
        usock_path.clone(),
        workdir_path_manager.get_path().to_path_buf(),
    );
    let daemon = DaemonBuilder::build(cli).await.unwrap();
    assert!(usock_path.exists());
    let handle = daemon.run().await.unwrap();

    signal::kill(Pid::this(), SIGTERM).unwrap();
    assert!(handle.await.unwrap().is_ok());
    assert!(!usock_path.exists());
    assert!(SandboxConnection::connect(usock_path).await.is_err());
}

#[tokio::test]
#[ignore]
async fn sig_int_shutdown_keeps_project_records() {
    let workdir_path_manager = WorkdirManager::new().await;
    let usock_path = workdir_path_manager
        .get_path()
        .join(format!("usock-{}", Uuid::new_v4()));
    let cli = common::create_example_cli(
        usock_path.clone(),
        workdir_path_manager.get_path().to_path_buf(),
    );
    let daemon = DaemonBuilder::build(cli).await.unwrap();
    let handle = daemon.run().await.unwrap();
    let project_id = Uuid::new_v4();
    let mut connection = SandboxConnection::connect(usock_path).await.unwrap();
    connection
        .create_project(
            project_id,
            Some(String::from("python")),
            create_example_files(),
            ContainerConfig::default(),
            false,
        )
        .await
        .unwrap();
    drop(connection);

    signal::kill(Pid::this(), SIGINT).unwrap();
    assert!(handle.await.unwrap().is_ok());
    assert!(workdir_path_manager
        .get_path()
        .join(project_id.to_string())
        .join("record.yaml")
        .exists());
}
