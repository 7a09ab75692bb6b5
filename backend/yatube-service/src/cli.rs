/// Command line entry points besides the HTTP server
///
/// ```text
/// yatube-service                                   run the server
/// yatube-service healthcheck                       check the local liveness endpoint
/// yatube-service create-group <title> <slug> [description]
/// ```
use crate::models::NewGroup;

pub const USAGE: &str = "Usage:
  yatube-service
  yatube-service healthcheck
  yatube-service create-group <title> <slug> [description]";

#[derive(Debug, Clone)]
pub enum Command {
    Serve,
    Healthcheck,
    CreateGroup(NewGroup),
}

/// Parse arguments, program name excluded.
pub fn parse_args(args: &[String]) -> Result<Command, String> {
    match args {
        [] => Ok(Command::Serve),
        [cmd] if cmd == "healthcheck" || cmd == "healthcheck-http" => Ok(Command::Healthcheck),
        [cmd, title, slug, rest @ ..] if cmd == "create-group" && rest.len() <= 1 => {
            Ok(Command::CreateGroup(NewGroup {
                title: title.clone(),
                slug: slug.clone(),
                description: rest.first().cloned().unwrap_or_default(),
            }))
        }
        _ => Err(format!("Invalid arguments\n{}", USAGE)),
    }
}

/// Check `/api/v1/health/live` on the configured port.
pub async fn healthcheck(port: u16) -> Result<(), String> {
    let url = format!("http://127.0.0.1:{}/api/v1/health/live", port);
    match reqwest::Client::new().get(&url).send().await {
        Ok(resp) if resp.status().is_success() => Ok(()),
        Ok(resp) => Err(format!("healthcheck HTTP status: {}", resp.status())),
        Err(e) => Err(format!("healthcheck HTTP error: {}", e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_no_arguments_serves() {
        assert!(matches!(parse_args(&[]), Ok(Command::Serve)));
    }

    #[test]
    fn test_healthcheck() {
        assert!(matches!(
            parse_args(&args(&["healthcheck"])),
            Ok(Command::Healthcheck)
        ));
    }

    #[test]
    fn test_create_group() {
        match parse_args(&args(&["create-group", "Cats", "cats"])) {
            Ok(Command::CreateGroup(group)) => {
                assert_eq!(group.title, "Cats");
                assert_eq!(group.slug, "cats");
                assert_eq!(group.description, "");
            }
            other => panic!("unexpected: {other:?}"),
        }

        match parse_args(&args(&["create-group", "Cats", "cats", "All about cats"])) {
            Ok(Command::CreateGroup(group)) => assert_eq!(group.description, "All about cats"),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_invalid_arguments() {
        assert!(parse_args(&args(&["create-group", "Cats"])).is_err());
        assert!(parse_args(&args(&["create-group", "a", "b", "c", "d"])).is_err());
        assert!(parse_args(&args(&["migrate"])).is_err());
    }
}
