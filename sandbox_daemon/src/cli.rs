use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(version, about)]
pub struct Cli {
    #[arg(short, long)]
    pub unix_sock_path: PathBuf,
    #[arg(short, long)]
    pub workdir_path: PathBuf,
    /// Namespace of the project resources, the kube client's default when omitted
    #[arg(short, long)]
    pub namespace: Option<String>,
    #[arg(short, long, default_value_t = String::from("vibecode"))]
    pub app_label: String,
    #[arg(long, default_value_t = String::from("standard"))]
    pub storage_class: String,
    #[arg(long, default_value_t = String::from("1Gi"))]
    pub storage_size: String,
    #[arg(long, default_value_t = String::from("500m"))]
    pub cpu_limit: String,
    #[arg(long, default_value_t = String::from("512Mi"))]
    pub memory_limit: String,
    #[arg(long, default_value_t = String::from("100m"))]
    pub cpu_request: String,
    #[arg(long, default_value_t = String::from("128Mi"))]
    pub memory_request: String,
    #[arg(short = 't', long, value_parser=clap::value_parser!(u64).range(1..), default_value_t = 30)]
    pub cluster_request_timeout_secs: u64,
}

#[cfg(test)]
mod test {
    use clap::Parser;

    use super::Cli;

    #[test]
    fn defaults() {
        let cli = Cli::parse_from(["sandbox_daemon", "-u", "/tmp/sock", "-w", "/tmp/work"]);
        assert!(cli.namespace.is_none());
        assert_eq!(cli.app_label, "vibecode");
        assert_eq!(cli.storage_size, "1Gi");
        assert_eq!(cli.cluster_request_timeout_secs, 30);
    }

    #[test]
    fn zero_timeout_rejected() {
        assert!(Cli::try_parse_from([
            "sandbox_daemon",
            "-u",
            "/tmp/sock",
            "-w",
            "/tmp/work",
            "-t",
            "0"
        ])
        .is_err());
    }
}
