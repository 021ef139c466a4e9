use std::io;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::anyhow;
use clap::Parser;
use sandbox_client::container::{ContainerConfig, EnvVar, ProjectFile};

use crate::cmd_parser::CmdParser;
use crate::commands::ContainerConfigArgs;

/// Returns `None` once stdin is closed.
pub fn read_command_line() -> Result<Option<CmdParser>, anyhow::Error> {
    write_line_begining()?;
    let mut line = String::new();
    if io::stdin().read_line(&mut line)? == 0 {
        return Ok(None);
    }
    let argv =
        shlex::split(line.trim().as_ref()).ok_or(io::Error::other("Can't split readed line!"))?;
    let cmd = CmdParser::try_parse_from(argv.iter())?;
    Ok(Some(cmd))
}

fn write_line_begining() -> Result<(), anyhow::Error> {
    write!(std::io::stdout(), "$ ")?;
    Ok(std::io::stdout().flush()?)
}

pub fn read_project_files(
    paths: &[PathBuf],
    language: Option<&str>,
) -> Result<Vec<ProjectFile>, anyhow::Error> {
    paths
        .iter()
        .map(|path| -> Result<ProjectFile, anyhow::Error> {
            Ok(ProjectFile {
                name: file_name(path)?,
                content: std::fs::read_to_string(path)?,
                language: language.map(String::from),
            })
        })
        .collect()
}

fn file_name(path: &Path) -> Result<String, anyhow::Error> {
    path.file_name()
        .and_then(|name| name.to_str())
        .map(String::from)
        .ok_or(anyhow!("Path {path:?} doesn't name a file"))
}

pub fn container_config(args: ContainerConfigArgs) -> Result<ContainerConfig, anyhow::Error> {
    let env_vars = args
        .env_vars
        .iter()
        .map(|entry| parse_env_var(entry))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(ContainerConfig {
        image: args.image,
        port: args.port,
        env_vars: (!env_vars.is_empty()).then_some(env_vars),
        cpu_limit: args.cpu_limit,
        memory_limit: args.memory_limit,
        storage_size: args.storage_size,
        ..Default::default()
    })
}

fn parse_env_var(entry: &str) -> Result<EnvVar, anyhow::Error> {
    let (name, value) = entry
        .split_once('=')
        .ok_or(anyhow!("Environment variable '{entry}' isn't in NAME=VALUE form"))?;
    if name.is_empty() {
        return Err(anyhow!("Environment variable '{entry}' has an empty name"));
    }
    Ok(EnvVar {
        name: name.to_string(),
        value: value.to_string(),
    })
}
