use std::{
    env,
    fs::{remove_dir_all, remove_file},
    path::{Path, PathBuf},
};

use nix::{
    sys::signal::{self, Signal::SIGINT},
    unistd::Pid,
};
use sandbox_client::container::ProjectFile;
use sandbox_daemon::cli::Cli;
use uuid::Uuid;

pub struct WorkdirManager {
    resource_path: Box<dyn AsRef<Path>>,
}

impl WorkdirManager {
    pub async fn new() -> Self {
        const TEST_FOLDER_PATH: &str = "/tmp/sandbox-daemon-integration-tests";
        tokio::fs::create_dir_all(TEST_FOLDER_PATH).await.unwrap();
        Self {
            resource_path: Box::new(format!("{}/{}", TEST_FOLDER_PATH, Uuid::new_v4())),
        }
    }

    pub fn get_path(&self) -> &Path {
        (*self.resource_path).as_ref()
    }
}

impl Drop for WorkdirManager {
    fn drop(&mut self) {
        let path = self.get_path();
        if remove_dir_all(path).is_err() {
            let _ = remove_file(path);
        }
    }
}

#[allow(dead_code)]
pub fn request_shutdown() {
    signal::kill(Pid::this(), SIGINT).unwrap();
}

#[allow(dead_code)]
pub fn create_example_files() -> Vec<ProjectFile> {
    vec![ProjectFile {
        name: String::from("main.py"),
        content: String::from(
            "import http.server\nhttp.server.test(HandlerClass=http.server.SimpleHTTPRequestHandler, port=8000, bind='0.0.0.0')\n",
        ),
        language: Some(String::from("python")),
    }]
}

pub fn create_example_cli(unix_sock_path: PathBuf, workdir_path: PathBuf) -> Cli {
    const NAMESPACE_ENV: &str = "SANDBOX_TEST_NAMESPACE";
    const STORAGE_CLASS_ENV: &str = "SANDBOX_TEST_STORAGE_CLASS";
    Cli {
        unix_sock_path,
        workdir_path,
        namespace: env::var(NAMESPACE_ENV).ok(),
        app_label: String::from("sandbox-integration-tests"),
        storage_class: env::var(STORAGE_CLASS_ENV).unwrap_or(String::from("standard")),
        storage_size: String::from("100Mi"),
        cpu_limit: String::from("500m"),
        memory_limit: String::from("512Mi"),
        cpu_request: String::from("100m"),
        memory_request: String::from("128Mi"),
        cluster_request_timeout_secs: 30,
    }
}
