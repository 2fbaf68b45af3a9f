use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use thomas_client::commands::{self, HttpMethod, Options, parse_query_pair};
use thomas_client::config::DEFAULT_URL;

/// thomas - client for Thomas' RESTful API
///
/// List, download and upload Bayesian networks stored on a Thomas server.
///
/// When a username is given, the client authenticates first. Credentials can
/// also be passed through THOMAS_USERNAME and THOMAS_PASSWORD.
///
/// Examples:
///   thomas list
///   thomas --username alice show asia
///   thomas push asia.json --as asia-copy
#[derive(Parser, Debug)]
#[command(author, version = env!("THOMAS_VERSION"), about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// URL of the server, may include protocol and port number
    #[arg(long, env = "THOMAS_URL", default_value = DEFAULT_URL, global = true)]
    url: String,

    /// Username to authenticate with
    #[arg(long, short = 'u', env = "THOMAS_USERNAME", global = true)]
    username: Option<String>,

    /// Password to authenticate with
    #[arg(long, env = "THOMAS_PASSWORD", hide_env_values = true, global = true)]
    password: Option<String>,

    /// Request timeout in seconds
    #[arg(
        long,
        env = "THOMAS_TIMEOUT",
        value_name = "SECONDS",
        default_value_t = 30,
        global = true
    )]
    timeout: u64,

    /// Endpoint used to exchange credentials for tokens
    #[arg(long, value_name = "ENDPOINT", default_value = "token", global = true)]
    auth_endpoint: String,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// List the networks available on the server
    List,

    /// Print a network and its metadata
    Show(ShowArgs),

    /// Upload a network from a JSON file
    Push(PushArgs),

    /// Send a raw request to the API and print the JSON response
    Request(RequestArgs),
}

#[derive(clap::Args, Debug)]
struct ShowArgs {
    /// Id of the network on the server
    #[arg(value_name = "ID")]
    id: String,
}

#[derive(clap::Args, Debug)]
struct PushArgs {
    /// JSON file holding the serialized network
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Store the network under this id instead of creating a new one
    #[arg(long = "as", value_name = "ID")]
    save_as: Option<String>,
}

#[derive(clap::Args, Debug)]
struct RequestArgs {
    #[arg(value_enum, value_name = "METHOD")]
    method: HttpMethod,

    /// Endpoint relative to the server URL, e.g. network/asia
    #[arg(value_name = "ENDPOINT")]
    endpoint: String,

    /// JSON body to send
    #[arg(long, short = 'd', value_name = "JSON")]
    data: Option<String>,

    /// Query parameter, may be repeated
    #[arg(long, short = 'q', value_name = "KEY=VALUE", value_parser = parse_query_pair)]
    query: Vec<(String, String)>,
}

impl Cli {
    fn options(&self) -> Options {
        Options {
            url: self.url.clone(),
            username: self.username.clone(),
            password: self.password.clone(),
            timeout: Duration::from_secs(self.timeout),
            auth_endpoint: self.auth_endpoint.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    let mut client = commands::connect(&cli.options()).await?;
    let mut out = std::io::stdout().lock();

    match cli.command {
        Commands::List => commands::list(&mut client, &mut out).await?,
        Commands::Show(args) => commands::show(&mut client, &args.id, &mut out).await?,
        Commands::Push(args) => {
            commands::push(&mut client, &args.file, args.save_as.as_deref(), &mut out).await?
        }
        Commands::Request(args) => {
            commands::request(
                &mut client,
                args.method,
                &args.endpoint,
                args.data.as_deref(),
                &args.query,
                &mut out,
            )
            .await?
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_cli_list_parsing() {
        let cli = Cli::try_parse_from(["thomas", "list"]).unwrap();
        assert!(matches!(cli.command, Commands::List));
        assert_eq!(cli.timeout, 30);
        assert_eq!(cli.auth_endpoint, "token");
    }

    #[test]
    fn test_cli_global_options_after_subcommand() {
        let cli = Cli::try_parse_from([
            "thomas",
            "show",
            "asia",
            "--url",
            "http://example.com",
            "-u",
            "alice",
            "--password",
            "pw",
        ])
        .unwrap();

        match &cli.command {
            Commands::Show(args) => assert_eq!(args.id, "asia"),
            _ => panic!("Expected Show command"),
        }
        let options = cli.options();
        assert_eq!(options.url, "http://example.com");
        assert_eq!(options.username.as_deref(), Some("alice"));
        assert_eq!(options.password.as_deref(), Some("pw"));
    }

    #[test]
    fn test_cli_push_parsing() {
        let cli = Cli::try_parse_from(["thomas", "push", "asia.json", "--as", "foo"]).unwrap();
        match cli.command {
            Commands::Push(args) => {
                assert_eq!(args.file, PathBuf::from("asia.json"));
                assert_eq!(args.save_as.as_deref(), Some("foo"));
            }
            _ => panic!("Expected Push command"),
        }
    }

    #[test]
    fn test_cli_request_parsing() {
        let cli = Cli::try_parse_from([
            "thomas", "request", "delete", "network/asia", "-q", "force=1", "-q", "x=y",
        ])
        .unwrap();
        match cli.command {
            Commands::Request(args) => {
                assert_eq!(args.method, HttpMethod::Delete);
                assert_eq!(args.endpoint, "network/asia");
                assert_eq!(
                    args.query,
                    vec![
                        ("force".to_string(), "1".to_string()),
                        ("x".to_string(), "y".to_string())
                    ]
                );
                assert_eq!(args.data, None);
            }
            _ => panic!("Expected Request command"),
        }
    }

    #[test]
    fn test_cli_request_invalid_method() {
        let result = Cli::try_parse_from(["thomas", "request", "head", "network"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_no_subcommand_fails() {
        let result = Cli::try_parse_from(["thomas"]);
        assert!(result.is_err());
    }
}
