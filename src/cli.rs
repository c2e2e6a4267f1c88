use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::commands::generate::GenerateInput;

#[derive(Parser, Debug)]
#[command(
    name = "aia-generator",
    version,
    about = "Generate MIT App Inventor .aia projects backed by Google Custom Search"
)]
pub struct Cli {
    /// Path of the saved configuration file (default: ~/aia_generator_config.json)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Build an .aia project archive
    Generate(GenerateArgs),
    /// Show the saved configuration
    Config,
}

#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Project name (letters and digits only), e.g. SearchApp
    #[arg(long, short = 'n')]
    pub project_name: String,

    /// App Inventor user id; falls back to the saved configuration
    #[arg(long, short = 'u')]
    pub user_id: Option<String>,

    /// Google API key; falls back to the saved configuration
    #[arg(long)]
    pub api_key: Option<String>,

    /// Custom search engine id; falls back to the saved configuration
    #[arg(long)]
    pub cse_id: Option<String>,

    /// Initial search prompt, e.g. "AI news"
    #[arg(long, short = 'p')]
    pub search_prompt: String,

    /// Functional requirements, e.g. "play a sound, list view"
    #[arg(long, short = 'r', default_value = "")]
    pub requirements: String,

    /// Extension file (.aix) to bundle; repeat for several
    #[arg(long = "extension", short = 'e', value_name = "PATH")]
    pub extensions: Vec<PathBuf>,

    /// Output .aia path (default: ./<project>.aia)
    #[arg(long, short = 'o', value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Directory for the temporary build tree (default: system temp dir)
    #[arg(long, value_name = "DIR")]
    pub work_dir: Option<PathBuf>,

    /// Do not update the saved configuration after a successful build
    #[arg(long)]
    pub no_save_config: bool,
}

impl GenerateArgs {
    pub fn to_input(&self) -> GenerateInput {
        GenerateInput {
            project_name: self.project_name.clone(),
            user_id: self.user_id.clone(),
            api_key: self.api_key.clone(),
            cse_id: self.cse_id.clone(),
            search_prompt: self.search_prompt.clone(),
            requirements: self.requirements.clone(),
            extensions: self.extensions.clone(),
            output: self.output.clone(),
            save_config: !self.no_save_config,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_generate_with_repeated_extensions() {
        let cli = Cli::try_parse_from([
            "aia-generator",
            "generate",
            "-n",
            "SearchApp",
            "-p",
            "AI news",
            "-e",
            "a.aix",
            "--extension",
            "b.aix",
            "--no-save-config",
        ])
        .unwrap();

        match cli.command {
            Command::Generate(args) => {
                let input = args.to_input();
                assert_eq!(input.project_name, "SearchApp");
                assert_eq!(
                    input.extensions,
                    vec![PathBuf::from("a.aix"), PathBuf::from("b.aix")]
                );
                assert_eq!(input.requirements, "");
                assert!(input.user_id.is_none());
                assert!(!input.save_config);
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_parse_config_with_global_path() {
        let cli = Cli::try_parse_from(["aia-generator", "config", "--config", "/tmp/c.json"]).unwrap();
        assert!(matches!(cli.command, Command::Config));
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/c.json")));
    }

    #[test]
    fn test_cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
