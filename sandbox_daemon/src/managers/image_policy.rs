use super::container_configuration::{ContainerConfig, EnvVar};

pub const DEFAULT_PORT: u16 = 8000;
pub const FALLBACK_IMAGE: &str = "python:3.9-slim";

const LANGUAGE_TABLE: [(&str, &str, &[&str]); 4] = [
    ("python", "python:3.9-slim", &["python", "main.py"]),
    ("javascript", "node:14-alpine", &["node", "index.js"]),
    ("go", "golang:1.17-alpine", &["go", "run", "main.go"]),
    ("java", "openjdk:11-jdk-slim", &["java", "-jar", "app.jar"]),
];

/// Fully resolved image and entrypoint of a project's container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchSpec {
    pub image: String,
    pub command: Option<Vec<String>>,
    pub args: Option<Vec<String>>,
    pub port: u16,
    pub env_vars: Vec<EnvVar>,
}

/// Picks the image and command for a language, letting explicit overrides win field by field.
pub fn resolve(language: Option<&str>, overrides: &ContainerConfig) -> LaunchSpec {
    let language = language.map(str::to_lowercase);
    let (default_image, default_command) = LANGUAGE_TABLE
        .iter()
        .find(|(name, _, _)| Some(*name) == language.as_deref())
        .map(|(_, image, command)| {
            (
                image.to_string(),
                Some(command.iter().map(|part| part.to_string()).collect()),
            )
        })
        .unwrap_or((FALLBACK_IMAGE.to_string(), None));

    LaunchSpec {
        image: overrides.image.clone().unwrap_or(default_image),
        command: overrides.command.clone().or(default_command),
        args: overrides.args.clone(),
        port: overrides.port.unwrap_or(DEFAULT_PORT),
        env_vars: overrides.env_vars.clone().unwrap_or_default(),
    }
}

#[cfg(test)]
mod test {
    use parameterized::parameterized;

    use super::{resolve, DEFAULT_PORT, FALLBACK_IMAGE};
    use crate::managers::container_configuration::{ContainerConfig, EnvVar};

    #[parameterized(language_image_command = {
        ("python", "python:3.9-slim", "python main.py"),
        ("javascript", "node:14-alpine", "node index.js"),
        ("go", "golang:1.17-alpine", "go run main.go"),
        ("java", "openjdk:11-jdk-slim", "java -jar app.jar"),
        ("Python", "python:3.9-slim", "python main.py"),
        ("JAVA", "openjdk:11-jdk-slim", "java -jar app.jar"),
    })]
    fn known_languages(language_image_command: (&str, &str, &str)) {
        let (language, image, command) = language_image_command;
        let launch = resolve(Some(language), &ContainerConfig::default());
        assert_eq!(launch.image, image);
        assert_eq!(launch.command.unwrap().join(" "), command);
        assert_eq!(launch.port, DEFAULT_PORT);
        assert!(launch.args.is_none());
    }

    #[parameterized(language = {Some("rust"), Some(""), None})]
    fn unknown_language(language: Option<&str>) {
        let launch = resolve(language, &ContainerConfig::default());
        assert_eq!(launch.image, FALLBACK_IMAGE);
        assert!(launch.command.is_none());
        assert_eq!(launch.port, DEFAULT_PORT);
    }

    #[test]
    fn overrides_win_field_by_field() {
        let overrides = ContainerConfig {
            image: Some(String::from("custom:latest")),
            port: Some(3000),
            args: Some(vec![String::from("--verbose")]),
            env_vars: Some(vec![EnvVar {
                name: String::from("MODE"),
                value: String::from("dev"),
            }]),
            ..Default::default()
        };
        let launch = resolve(Some("javascript"), &overrides);
        assert_eq!(launch.image, "custom:latest");
        assert_eq!(
            launch.command,
            Some(vec![String::from("node"), String::from("index.js")])
        );
        assert_eq!(launch.args, Some(vec![String::from("--verbose")]));
        assert_eq!(launch.port, 3000);
        assert_eq!(launch.env_vars.len(), 1);
    }

    #[test]
    fn command_override() {
        let overrides = ContainerConfig {
            command: Some(vec![String::from("python"), String::from("app.py")]),
            ..Default::default()
        };
        let launch = resolve(Some("python"), &overrides);
        assert_eq!(launch.image, "python:3.9-slim");
        assert_eq!(
            launch.command,
            Some(vec![String::from("python"), String::from("app.py")])
        );
    }
}
