/// Enum representing CLI commands
#[derive(Debug, PartialEq)]
pub enum Command {
    Help,
    Use { owner: String, repo: String },
    Token { token: String },
    TokenClear,
    Body { code: String, manifest_name: String },
    Submit { code: String, manifest_name: String },
    List { state: String, labels: Vec<String> },
    Pending,
    Convert { code: String },
    Provision { code: String, enterprise: String, org: String },
    Unknown(String),
}

/// Issue states accepted by `list`
const VALID_STATES: &[&str] = &["open", "closed", "all"];

pub const USAGE: &str = "\
Usage: issue-ops <command>

Commands:
  use <owner>/<repo>                      Set the repository for this directory
  token <value>                           Store the GitHub token
  token clear                             Remove the stored token
  body <code> <manifest_name>             Print an app creation issue body
  submit <code> <manifest_name>           Open an app creation issue
  list [state] [label,label...]           List issues
  pending                                 List open app creation requests
  convert <code>                          Create the app from a manifest code
  provision <code> <enterprise> <org>     Create and install the app, then store
                                          its credentials in Terraform Cloud
                                          (needs TFC_TOKEN and TFC_WORKSPACE_ID)
  help                                    Show this message";

/// Parse command line arguments and return a Command
///
/// # Arguments
/// * `args` - Command line arguments (including program name)
pub fn parse_args(args: &[String]) -> Command {
    let rest: Vec<&str> = args.iter().skip(1).map(String::as_str).collect();

    match rest.as_slice() {
        [] | ["help"] => Command::Help,
        ["use", repo_arg] => parse_repository(repo_arg),
        ["use"] => Command::Unknown(
            "Missing repository argument. Usage: issue-ops use <owner>/<repo>".to_string(),
        ),
        ["token", "clear"] => Command::TokenClear,
        ["token", token] => Command::Token {
            token: token.to_string(),
        },
        ["body", code, manifest_name] => Command::Body {
            code: code.to_string(),
            manifest_name: manifest_name.to_string(),
        },
        ["submit", code, manifest_name] => Command::Submit {
            code: code.to_string(),
            manifest_name: manifest_name.to_string(),
        },
        ["list"] => Command::List {
            state: "open".to_string(),
            labels: Vec::new(),
        },
        ["list", state] => parse_list(state, ""),
        ["list", state, labels] => parse_list(state, labels),
        ["pending"] => Command::Pending,
        ["convert", code] => Command::Convert {
            code: code.to_string(),
        },
        ["provision", code, enterprise, org] => Command::Provision {
            code: code.to_string(),
            enterprise: enterprise.to_string(),
            org: org.to_string(),
        },
        other => Command::Unknown(format!("Unknown command: {}", other.join(" "))),
    }
}

fn parse_repository(repo_arg: &str) -> Command {
    match repo_arg.split_once('/') {
        Some((owner, repo)) if !owner.is_empty() && !repo.is_empty() && !repo.contains('/') => {
            Command::Use {
                owner: owner.to_string(),
                repo: repo.to_string(),
            }
        }
        _ => Command::Unknown("Invalid repository format. Please use <owner>/<repo>.".to_string()),
    }
}

fn parse_list(state: &str, labels: &str) -> Command {
    if !VALID_STATES.contains(&state) {
        return Command::Unknown(format!(
            "Invalid state '{state}'. Expected one of: {}",
            VALID_STATES.join(", ")
        ));
    }
    Command::List {
        state: state.to_string(),
        labels: split_labels(labels),
    }
}

/// Splits a comma-separated label list, dropping blanks.
pub fn split_labels(labels: &str) -> Vec<String> {
    labels
        .split(',')
        .map(str::trim)
        .filter(|label| !label.is_empty())
        .map(str::to_string)
        .collect()
}
