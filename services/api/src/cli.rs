use crate::report::{run_evaluate, run_screen, EvaluateArgs, ScreenArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use evidence_grader::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Evidence Grader",
    about = "Grade psychology research articles by the strength of their evidence",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Grade the articles in a JSON export and print a report for each
    Evaluate(EvaluateArgs),
    /// Screen a JSON export against the publication threshold
    Screen(ScreenArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Evaluate(args) => run_evaluate(args),
        Command::Screen(args) => run_screen(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_serve_without_subcommand() {
        let cli = Cli::try_parse_from(["evidence-grader"]).expect("parses");
        assert!(cli.command.is_none());
    }

    #[test]
    fn parses_screen_overrides() {
        let cli = Cli::try_parse_from([
            "evidence-grader",
            "screen",
            "--input",
            "articles.json",
            "--threshold",
            "60",
            "--limit",
            "5",
            "--today",
            "2025-06-01",
            "--json",
        ])
        .expect("parses");

        match cli.command {
            Some(Command::Screen(args)) => {
                assert_eq!(args.threshold, Some(60));
                assert_eq!(args.limit, Some(5));
                assert!(args.json);
                assert_eq!(
                    args.today.map(|date| date.to_string()).as_deref(),
                    Some("2025-06-01")
                );
            }
            other => panic!("expected screen command, got {other:?}"),
        }
    }

    #[test]
    fn rejects_malformed_today() {
        let result = Cli::try_parse_from([
            "evidence-grader",
            "evaluate",
            "--input",
            "article.json",
            "--today",
            "June 1st",
        ]);
        assert!(result.is_err());
    }
}
