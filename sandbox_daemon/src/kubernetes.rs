pub mod kube_client;
